use serde::Serialize;

use crate::geom::{CameraState, Point2};

use super::color::Rgba;
use super::keyframes::AnimationState;

/// One rendered frame: projected mesh points and cubic groups in screen space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub index: usize,
    pub state: AnimationState,
    pub phase: usize,
    /// Eased progress within `phase`.
    pub progress: f64,
    pub camera: CameraState,
    /// Mesh points, station-major.
    pub points: Vec<Point2>,
    /// Cubic Bézier control quadruples, longitudinal spans first.
    pub curves: Vec<[Point2; 4]>,
    pub color: Rgba,
    pub line_width: f64,
}

impl Frame {
    /// Number of screen points that are not finite.
    #[must_use]
    pub fn non_finite_count(&self) -> usize {
        self.points
            .iter()
            .chain(self.curves.iter().flatten())
            .filter(|p| !(p.x.is_finite() && p.y.is_finite()))
            .count()
    }
}
