//! Opt-in timing hooks for the profile → mesh → frame pipeline.
//!
//! Timing is only collected when the `pipeline_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). In every
//! other build the calls compile down to running the closure.
//!
//! # Usage
//!
//! ```ignore
//! use revolve_engine::geom::{PipelineMetrics, TimingBucket};
//!
//! let mut metrics = PipelineMetrics::default();
//! metrics.begin();
//! let polygon = metrics.time(TimingBucket::Profile, || generate(&params));
//! if let Some(report) = metrics.end() {
//!     println!("profile: {} ns", report.profile_ns);
//! }
//! ```

/// Pipeline stage a measurement is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Control polygon generation.
    Profile,
    /// Revolution of the polygon into stations × slices.
    Revolve,
    /// Rotation and perspective of mesh or curve points.
    Projection,
    /// Camera interpolation, reveal and color resolution for a frame.
    FrameAssembly,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineTimingReport {
    pub profile_ns: u64,
    pub revolve_ns: u64,
    pub projection_ns: u64,
    pub frame_assembly_ns: u64,
}

impl PipelineTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.profile_ns
            .saturating_add(self.revolve_ns)
            .saturating_add(self.projection_ns)
            .saturating_add(self.frame_assembly_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    /// Adds another report bucket by bucket.
    pub fn merge(&mut self, other: &PipelineTimingReport) {
        self.profile_ns = self.profile_ns.saturating_add(other.profile_ns);
        self.revolve_ns = self.revolve_ns.saturating_add(other.revolve_ns);
        self.projection_ns = self.projection_ns.saturating_add(other.projection_ns);
        self.frame_assembly_ns = self.frame_assembly_ns.saturating_add(other.frame_assembly_ns);
    }
}

/// Accumulator for timing pipeline stages.
///
/// When the `pipeline_metrics` feature is disabled (or on WASM), all methods
/// are no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    #[cfg(all(feature = "pipeline_metrics", not(target_arch = "wasm32")))]
    report: PipelineTimingReport,
}

impl PipelineMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "pipeline_metrics", not(target_arch = "wasm32")))]
        {
            self.report = PipelineTimingReport::default();
        }
    }

    /// Returns the accumulated report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<PipelineTimingReport> {
        #[cfg(all(feature = "pipeline_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "pipeline_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times `f` and charges the elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "pipeline_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "pipeline_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "pipeline_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Profile => &mut self.report.profile_ns,
            TimingBucket::Revolve => &mut self.report.revolve_ns,
            TimingBucket::Projection => &mut self.report.projection_ns,
            TimingBucket::FrameAssembly => &mut self.report.frame_assembly_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
