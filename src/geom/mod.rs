//! Geometry core: profile generation, revolution and projection.
//!
//! Data flows one way: [`ShapeParameters`] → [`ControlPolygon`] → [`Mesh3D`]
//! → screen points via [`Projector`]. Every stage is a pure function of its
//! inputs; the mesh is built once and only read afterwards.

mod core;
mod curve_net;
mod diagnostics;
mod metrics;
mod profile;
mod project;
mod revolve;

pub use self::core::{BBox, Point2, Point3, Tolerance, Vec2, Vec3, is_whole_turn, rotate_polar};
pub use curve_net::{
    CubicGroup, CurveNet, DEFAULT_RING_STATIONS, SPAN_STARTS, compress_group,
};
pub use diagnostics::{ProfileDiagnostics, RevolveDiagnostics};
pub use metrics::{PipelineMetrics, PipelineTimingReport, TimingBucket};
pub use profile::{
    CONTROL_POINT_COUNT, ControlPolygon, FLARE_ANGLE_LIMIT_DEG, KITO0, KITO1, KITO2, KITO3, KUKI0,
    KUKI1, KUKI2, KUKI3, PARAMETER_RANGES, ParameterError, ParameterRange, ProfilePreset, RINKO,
    STATION_COUNT, ShapeParameters, generate, generate_preset, generate_with_diagnostics,
};
pub use project::{CameraState, Projector, project, rotate_zxy};
pub use revolve::{
    FALLBACK_EXTENT, MIN_SLICES, Mesh3D, RevolveError, RevolveOptions, revolve,
    revolve_with_options,
};

#[cfg(test)]
mod tests;
