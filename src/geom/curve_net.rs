//! Cubic wireframe over a revolved mesh.
//!
//! Every group is four control points of one cubic Bézier span. Longitudinal
//! spans follow each slice across stations `0..=3`, `3..=6`, `6..=9` and
//! `9..=12`; ring spans are straight cubics `(P, P, Q, Q)` joining neighbouring
//! slices of a ring station.

use serde::Serialize;

use super::Point3;
use super::profile::STATION_COUNT;
use super::revolve::Mesh3D;

/// First station of each longitudinal span.
pub const SPAN_STARTS: [usize; 4] = [0, 3, 6, 9];

/// Stations that get a ring of connectors by default.
pub const DEFAULT_RING_STATIONS: [usize; 4] = [0, 3, 6, 9];

pub type CubicGroup = [Point3; 4];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveNet {
    groups: Vec<CubicGroup>,
    longitudinal_count: usize,
}

impl CurveNet {
    /// Build the net for `mesh`. Ring stations outside `0..13` are ignored.
    #[must_use]
    pub fn from_mesh(mesh: &Mesh3D, ring_stations: &[usize]) -> Self {
        let slices = mesh.slices();
        let mut groups = Vec::with_capacity(slices * (SPAN_STARTS.len() + ring_stations.len()));

        for slice in 0..slices {
            for &start in &SPAN_STARTS {
                groups.push([
                    mesh.point(start, slice),
                    mesh.point(start + 1, slice),
                    mesh.point(start + 2, slice),
                    mesh.point(start + 3, slice),
                ]);
            }
        }
        let longitudinal_count = groups.len();

        for &station in ring_stations {
            if station >= STATION_COUNT {
                log::debug!("skipping ring station {station}");
                continue;
            }
            for slice in 0..slices {
                let p = mesh.point(station, slice);
                let q = mesh.point(station, slice + 1);
                groups.push([p, p, q, q]);
            }
        }

        Self {
            groups,
            longitudinal_count,
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[CubicGroup] {
        &self.groups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups running along the axis (the rest are ring connectors).
    #[must_use]
    pub fn longitudinal(&self) -> &[CubicGroup] {
        &self.groups[..self.longitudinal_count]
    }

    /// Copy with every group pulled towards its anchor by `morph`.
    ///
    /// `morph < 0` anchors on the last point with factor `-morph`,
    /// `0 <= morph < 1` anchors on the first point with factor `morph`,
    /// `morph >= 1` leaves the net unchanged.
    #[must_use]
    pub fn compressed(&self, morph: f64) -> CurveNet {
        CurveNet {
            groups: self.groups.iter().map(|g| compress_group(g, morph)).collect(),
            longitudinal_count: self.longitudinal_count,
        }
    }
}

/// Pull the points of one group towards its anchor.
#[must_use]
pub fn compress_group(group: &CubicGroup, morph: f64) -> CubicGroup {
    let (anchor, k) = if morph < 0.0 {
        (group[3], -morph)
    } else if morph < 1.0 {
        (group[0], morph)
    } else {
        return *group;
    };
    group.map(|p| anchor.lerp(p, k))
}
