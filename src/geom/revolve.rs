use serde::Serialize;

use super::diagnostics::RevolveDiagnostics;
use super::metrics::{PipelineMetrics, TimingBucket};
use super::profile::{ControlPolygon, STATION_COUNT};
use super::{BBox, Point2, Point3, Tolerance, Vec2};

/// Fewest slices that still enclose a volume.
pub const MIN_SLICES: usize = 3;

/// Extent used for the perspective distance when the mesh has no size.
pub const FALLBACK_EXTENT: f64 = 100.0;

/// Options for revolving a control polygon.
#[derive(Debug, Clone, Copy)]
pub struct RevolveOptions {
    /// Angular positions per station.
    pub slices: usize,
    /// Angle of slice 0 in degrees. 270° puts slice 0 on the lower profile edge
    /// with zero depth.
    pub phase_offset_deg: f64,
    /// Radius below which a station collapses onto its center.
    pub station_tolerance: Tolerance,
}

impl Default for RevolveOptions {
    fn default() -> Self {
        Self {
            slices: 12,
            phase_offset_deg: 270.0,
            station_tolerance: Tolerance::STATION_RADIUS,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RevolveError {
    #[error("revolution requires at least {min} slices (got {slices})")]
    TooFewSlices { slices: usize, min: usize },
    #[error("control polygon points must be finite")]
    NonFinitePoint,
    #[error("meshes differ in slice count ({left} vs {right})")]
    SliceMismatch { left: usize, right: usize },
}

/// Revolved surface: 13 stations × `slices` points, stored station-major.
///
/// Built once per parameter set and shared read-only by every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh3D {
    slices: usize,
    points: Vec<Point3>,
    centers: [Point2; STATION_COUNT],
    radius_vectors: [Vec2; STATION_COUNT],
}

impl Mesh3D {
    #[must_use]
    pub fn slices(&self) -> usize {
        self.slices
    }

    #[must_use]
    pub fn station_count(&self) -> usize {
        STATION_COUNT
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Point at (`station`, `slice`). Slice indices wrap, so `slices` is slice 0.
    ///
    /// # Panics
    /// Panics if `station >= 13`.
    #[must_use]
    pub fn point(&self, station: usize, slice: usize) -> Point3 {
        self.points[station * self.slices + slice % self.slices]
    }

    /// All slices of one station.
    #[must_use]
    pub fn ring(&self, station: usize) -> &[Point3] {
        let start = station * self.slices;
        &self.points[start..start + self.slices]
    }

    /// In-plane center of a station.
    #[must_use]
    pub fn station_center(&self, station: usize) -> Point2 {
        self.centers[station]
    }

    /// Accepted (post anti-twist) radius vector of a station.
    #[must_use]
    pub fn radius_vector(&self, station: usize) -> Vec2 {
        self.radius_vectors[station]
    }

    /// Mean of every mesh point; the pivot for camera rotation.
    #[must_use]
    pub fn centroid(&self) -> Point3 {
        let n = self.points.len() as f64;
        let (sx, sy, sz) = self
            .points
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
        Point3::new(sx / n, sy / n, sz / n)
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.points)
    }

    /// Twice the largest bounding box extent, with a fixed fallback for an empty
    /// or zero-size mesh.
    #[must_use]
    pub fn perspective_distance(&self) -> f64 {
        let extent = self.bbox().map_or(0.0, BBox::max_extent);
        let extent = if extent > 0.0 { extent } else { FALLBACK_EXTENT };
        extent * 2.0
    }

    /// Point-wise blend towards `other` (`t = 0` is `self`).
    pub fn lerp(&self, other: &Mesh3D, t: f64) -> Result<Mesh3D, RevolveError> {
        if self.slices != other.slices {
            return Err(RevolveError::SliceMismatch {
                left: self.slices,
                right: other.slices,
            });
        }
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| a.lerp(*b, t))
            .collect();
        let mut centers = self.centers;
        let mut radius_vectors = self.radius_vectors;
        for i in 0..STATION_COUNT {
            centers[i] = self.centers[i].lerp(other.centers[i], t);
            let (a, b) = (self.radius_vectors[i], other.radius_vectors[i]);
            radius_vectors[i] = Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        }
        Ok(Mesh3D {
            slices: self.slices,
            points,
            centers,
            radius_vectors,
        })
    }
}

/// Revolve a control polygon into a mesh with `slices` rings per station.
pub fn revolve(polygon: &ControlPolygon, slices: usize) -> Result<Mesh3D, RevolveError> {
    let options = RevolveOptions {
        slices,
        ..RevolveOptions::default()
    };
    revolve_with_options(polygon, options).map(|(mesh, _)| mesh)
}

/// Revolve a control polygon with full options control.
///
/// Each station's radius vector is compared with the last accepted one; a
/// negative dot product between two real radii means the top/bottom pairing
/// flipped, and the vector is negated. This is a local heuristic: it keeps
/// neighbouring rings aligned but does not propagate a frame along the axis.
pub fn revolve_with_options(
    polygon: &ControlPolygon,
    options: RevolveOptions,
) -> Result<(Mesh3D, RevolveDiagnostics), RevolveError> {
    if options.slices < MIN_SLICES {
        log::warn!("rejecting revolve with {} slices", options.slices);
        return Err(RevolveError::TooFewSlices {
            slices: options.slices,
            min: MIN_SLICES,
        });
    }
    if !polygon.is_finite() {
        return Err(RevolveError::NonFinitePoint);
    }

    let mut metrics = PipelineMetrics::default();
    metrics.begin();
    let mut diag = RevolveDiagnostics::new();

    let mesh = metrics.time(TimingBucket::Revolve, || {
        let eps = options.station_tolerance.eps;
        let step = 360.0 / options.slices as f64;
        let angles: Vec<(f64, f64)> = (0..options.slices)
            .map(|k| (options.phase_offset_deg + k as f64 * step).to_radians().sin_cos())
            .collect();

        let mut points = Vec::with_capacity(STATION_COUNT * options.slices);
        let mut centers = [Point2::ORIGIN; STATION_COUNT];
        let mut radius_vectors = [Vec2::ZERO; STATION_COUNT];
        let mut previous: Option<Vec2> = None;

        for station in 0..STATION_COUNT {
            let (top, bottom) = polygon.station_pair(station);
            let center = top.midpoint(bottom);
            let mut radius = top - center;
            let magnitude = radius.length();

            if let Some(prev) = previous {
                if radius.dot(prev) < 0.0 && magnitude > eps && prev.length() > eps {
                    radius = -radius;
                    diag.flipped_stations.push(station);
                }
            }

            centers[station] = center;
            radius_vectors[station] = radius;

            if magnitude < eps {
                diag.collapsed_stations.push(station);
                points.extend(std::iter::repeat_n(
                    Point3::new(center.x, center.y, 0.0),
                    options.slices,
                ));
                continue;
            }

            previous = Some(radius);
            points.extend(angles.iter().map(|&(sin_t, cos_t)| {
                Point3::new(
                    center.x + radius.x * sin_t,
                    center.y + radius.y * sin_t,
                    magnitude * cos_t,
                )
            }));
        }

        Mesh3D {
            slices: options.slices,
            points,
            centers,
            radius_vectors,
        }
    });

    diag.point_count = mesh.points.len();
    diag.timing = metrics.end();
    log::debug!("{diag}");
    Ok((mesh, diag))
}
