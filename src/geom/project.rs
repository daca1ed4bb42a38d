use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::core::rotate_polar;
use super::revolve::{FALLBACK_EXTENT, Mesh3D};
use super::{Point2, Point3, Vec3};

/// Camera for one frame. Angles are degrees; `display_scale` maps mesh units
/// to screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub angle_x: f64,
    pub angle_y: f64,
    pub angle_z: f64,
    pub perspective_distance: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub display_scale: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            perspective_distance: FALLBACK_EXTENT * 2.0,
            origin_x: 0.0,
            origin_y: 0.0,
            display_scale: 1.0,
        }
    }
}

impl CameraState {
    /// Unrotated camera at `origin` with unit display scale.
    #[must_use]
    pub fn identity(origin: Point2, perspective_distance: f64) -> Self {
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            perspective_distance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn origin(&self) -> Point2 {
        Point2::new(self.origin_x, self.origin_y)
    }

    /// Perspective distance with the zero guard applied.
    #[must_use]
    pub fn effective_perspective(&self) -> f64 {
        if self.perspective_distance == 0.0 {
            1.0
        } else {
            self.perspective_distance
        }
    }
}

/// Rotate an offset about Z, then X, then Y. Whole-turn angles are skipped.
///
/// The Y rotation works in the (z, x) plane with the angle negated.
#[must_use]
pub fn rotate_zxy(v: Vec3, angle_x: f64, angle_y: f64, angle_z: f64) -> Vec3 {
    let (x, y) = rotate_polar(v.x, v.y, angle_z);
    let (y, z) = rotate_polar(y, v.z, angle_x);
    let (z, x) = rotate_polar(z, x, -angle_y);
    Vec3::new(x, y, z)
}

/// Projects points about a fixed pivot, normally the centroid of the mesh they
/// came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    centroid: Point3,
}

impl Projector {
    /// Captures the mesh centroid once; every frame reuses it.
    #[must_use]
    pub fn new(mesh: &Mesh3D) -> Self {
        Self {
            centroid: mesh.centroid(),
        }
    }

    #[must_use]
    pub const fn with_centroid(centroid: Point3) -> Self {
        Self { centroid }
    }

    #[must_use]
    pub fn centroid(&self) -> Point3 {
        self.centroid
    }

    #[must_use]
    pub fn project_point(&self, point: Point3, camera: &CameraState) -> Point2 {
        let v = rotate_zxy(
            point - self.centroid,
            camera.angle_x,
            camera.angle_y,
            camera.angle_z,
        );
        let d = camera.effective_perspective();
        let factor = (d - v.z) / d;
        Point2::new(
            camera.origin_x + camera.display_scale * (v.x * factor),
            camera.origin_y + camera.display_scale * (v.y * factor),
        )
    }

    /// One screen point per input point, in input order.
    #[cfg(feature = "parallel")]
    #[must_use]
    pub fn project_points(&self, points: &[Point3], camera: &CameraState) -> Vec<Point2> {
        points
            .par_iter()
            .map(|p| self.project_point(*p, camera))
            .collect()
    }

    /// One screen point per input point, in input order.
    #[cfg(not(feature = "parallel"))]
    #[must_use]
    pub fn project_points(&self, points: &[Point3], camera: &CameraState) -> Vec<Point2> {
        points
            .iter()
            .map(|p| self.project_point(*p, camera))
            .collect()
    }

    #[must_use]
    pub fn project_group(&self, group: &[Point3; 4], camera: &CameraState) -> [Point2; 4] {
        group.map(|p| self.project_point(p, camera))
    }
}

/// Project every mesh point, station-major like the mesh itself.
#[must_use]
pub fn project(mesh: &Mesh3D, camera: &CameraState) -> Vec<Point2> {
    Projector::new(mesh).project_points(mesh.points(), camera)
}
