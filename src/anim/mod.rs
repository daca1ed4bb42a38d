//! Camera animation over a revolved mesh.
//!
//! [`MorphDriver`] builds the mesh once and then maps frame indices to
//! [`Frame`]s: four eased phases between five camera keyframes, with an
//! optional reveal during the first phase.

mod color;
mod driver;
mod easing;
mod frame;
mod keyframes;
mod options;

pub use color::{Rgb, Rgba, opacity_to_alpha};
pub use driver::{AnimationError, MorphDriver, Playback};
pub use easing::{ease, lerp};
pub use frame::Frame;
pub use keyframes::{AnimationState, CameraKeyframes, PHASE_COUNT, PhaseClock, PhaseProgress};
pub use options::{RenderOptions, RevealMode};
