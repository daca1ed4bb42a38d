//! Camera keyframes and the phase clock that walks them.

use serde::{Deserialize, Serialize};

use super::easing::{ease, lerp};

/// Number of phases between five keyframes.
pub const PHASE_COUNT: usize = 4;

/// Camera angle keyframes, one entry per phase boundary, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframes {
    pub x: [f64; PHASE_COUNT + 1],
    pub y: [f64; PHASE_COUNT + 1],
    pub z: [f64; PHASE_COUNT + 1],
}

impl CameraKeyframes {
    /// Turntable sweep: a slow quarter turn, a half turn, a tumble over X and a
    /// final spin.
    pub const DEFAULT: Self = Self {
        x: [0.0, 0.0, 0.0, 90.0, 0.0],
        y: [-160.0, -90.0, 180.0, 360.0, 630.0],
        z: [0.0, 0.0, 0.0, 0.0, 0.0],
    };

    /// Angles `(x, y, z)` at eased progress `eased` through `phase`.
    #[must_use]
    pub fn angles_at(&self, phase: usize, eased: f64) -> (f64, f64, f64) {
        let phase = phase.min(PHASE_COUNT - 1);
        (
            lerp(self.x[phase], self.x[phase + 1], eased),
            lerp(self.y[phase], self.y[phase + 1], eased),
            lerp(self.z[phase], self.z[phase + 1], eased),
        )
    }

    /// Angles held once the animation is done.
    #[must_use]
    pub fn final_angles(&self) -> (f64, f64, f64) {
        (self.x[PHASE_COUNT], self.y[PHASE_COUNT], self.z[PHASE_COUNT])
    }
}

impl Default for CameraKeyframes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AnimationState
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of one playback. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Phase0,
    Phase1,
    Phase2,
    Phase3,
    Done,
}

impl AnimationState {
    #[must_use]
    pub const fn from_phase(phase: usize) -> Self {
        match phase {
            0 => AnimationState::Phase0,
            1 => AnimationState::Phase1,
            2 => AnimationState::Phase2,
            _ => AnimationState::Phase3,
        }
    }

    /// The next state; `Done` is terminal.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            AnimationState::Idle => AnimationState::Phase0,
            AnimationState::Phase0 => AnimationState::Phase1,
            AnimationState::Phase1 => AnimationState::Phase2,
            AnimationState::Phase2 => AnimationState::Phase3,
            AnimationState::Phase3 | AnimationState::Done => AnimationState::Done,
        }
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, AnimationState::Done)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PhaseClock
// ─────────────────────────────────────────────────────────────────────────────

/// Where a frame index falls on the keyframe timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseProgress {
    pub state: AnimationState,
    pub phase: usize,
    /// Linear progress within the phase.
    pub t: f64,
    /// `ease(t)`.
    pub eased: f64,
}

/// Maps frame indices onto phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseClock {
    frames_per_phase: usize,
}

impl PhaseClock {
    /// A clock with at least one frame per phase. The count is capped so the
    /// total frame count still fits in a `usize`.
    #[must_use]
    pub fn new(frames_per_phase: usize) -> Self {
        Self {
            frames_per_phase: frames_per_phase.clamp(1, usize::MAX / PHASE_COUNT),
        }
    }

    #[must_use]
    pub fn frames_per_phase(&self) -> usize {
        self.frames_per_phase
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.frames_per_phase * PHASE_COUNT
    }

    /// Phase and progress of frame `frame`.
    ///
    /// The last frame is pinned to the end of phase 3 so the final keyframe is
    /// reached exactly; indices past the end report `Done` with the same values.
    #[must_use]
    pub fn progress(&self, frame: usize) -> PhaseProgress {
        let total = self.total_frames();
        if frame >= total {
            return PhaseProgress {
                state: AnimationState::Done,
                phase: PHASE_COUNT - 1,
                t: 1.0,
                eased: 1.0,
            };
        }
        let (phase, t) = if frame + 1 >= total {
            (PHASE_COUNT - 1, 1.0)
        } else {
            let phase = (frame / self.frames_per_phase).min(PHASE_COUNT - 1);
            let t = (frame % self.frames_per_phase) as f64 / self.frames_per_phase as f64;
            (phase, t)
        };
        PhaseProgress {
            state: AnimationState::from_phase(phase),
            phase,
            t,
            eased: ease(t),
        }
    }
}
