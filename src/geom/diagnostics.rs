//! Diagnostics for the profile and revolution stages.
//!
//! Neither stage ever fails on numeric input: degenerate denominators fall back
//! to a neutral factor, singular flare angles skip the flare scale and vanishing
//! station radii collapse to a point. These structs record which of those
//! recoveries fired so callers (and tests) can tell a clean run from a patched one.
//!
//! # Example
//!
//! ```ignore
//! use revolve_engine::geom::{generate_with_diagnostics, ShapeParameters};
//!
//! let (polygon, diagnostics) = generate_with_diagnostics(&ShapeParameters::default());
//! if !diagnostics.is_clean() {
//!     for warning in &diagnostics.warnings {
//!         eprintln!("Warning: {warning}");
//!     }
//! }
//! ```

use std::fmt;

use super::metrics::PipelineTimingReport;

/// Recoveries applied while generating a control polygon.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfileDiagnostics {
    /// Girth or base height span was zero; the diameter scale fell back to 1.
    pub diameter_scale_fallback: bool,

    /// The neck-width candidate scale would pinch the neck and was replaced.
    pub neck_scale_replaced: bool,

    /// The neck replacement ratio had a zero denominator and fell back to 1.
    pub neck_scale_fallback: bool,

    /// Tip-to-base span was zero; the length scale fell back to 1.
    pub length_scale_fallback: bool,

    /// `|curve| >= 89°`: the bend flare scale was skipped.
    pub curve_flare_skipped: bool,

    /// `|base_angle| >= 89°`: the base flare scale was skipped.
    pub base_flare_skipped: bool,

    /// Optional timing for the generation pass.
    pub timing: Option<PipelineTimingReport>,

    /// Human-readable notes about each recovery.
    pub warnings: Vec<String>,
}

impl ProfileDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no fallback fired.
    ///
    /// A replaced neck scale is part of the normal algorithm and does not
    /// count as a fallback.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.diameter_scale_fallback
            && !self.neck_scale_fallback
            && !self.length_scale_fallback
            && !self.curve_flare_skipped
            && !self.base_flare_skipped
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.diameter_scale_fallback {
            parts.push("diameter-fallback");
        }
        if self.neck_scale_replaced {
            parts.push("neck-replaced");
        }
        if self.neck_scale_fallback {
            parts.push("neck-fallback");
        }
        if self.length_scale_fallback {
            parts.push("length-fallback");
        }
        if self.curve_flare_skipped {
            parts.push("curve-flare-skipped");
        }
        if self.base_flare_skipped {
            parts.push("base-flare-skipped");
        }
        if parts.is_empty() {
            "clean".to_string()
        } else {
            parts.join(" ")
        }
    }
}

impl fmt::Display for ProfileDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile: {}", self.summary())
    }
}

/// What the mesher did to each station.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RevolveDiagnostics {
    /// Stations whose radius vector was negated to keep the ring orientation continuous.
    pub flipped_stations: Vec<usize>,

    /// Stations whose radius fell below the station tolerance and collapsed to a point.
    pub collapsed_stations: Vec<usize>,

    /// Number of mesh points produced.
    pub point_count: usize,

    /// Optional timing for the revolution pass.
    pub timing: Option<PipelineTimingReport>,
}

impl RevolveDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.flipped_stations.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("P:{}", self.point_count)];
        if !self.flipped_stations.is_empty() {
            parts.push(format!("flipped:{:?}", self.flipped_stations));
        }
        if !self.collapsed_stations.is_empty() {
            parts.push(format!("collapsed:{:?}", self.collapsed_stations));
        }
        parts.join(" ")
    }
}

impl fmt::Display for RevolveDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "revolve: {}", self.summary())
    }
}
