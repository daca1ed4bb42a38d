//! Frame-by-frame playback over a mesh built once up front.
//!
//! The driver owns the target mesh behind an [`Arc`] and only reads it after
//! construction, so frames can be produced in any order and on any thread.

use std::borrow::Cow;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::{
    CameraState, CurveNet, Mesh3D, ParameterError, PipelineMetrics, Point2, ProfileDiagnostics,
    ProfilePreset, Projector, RevolveDiagnostics, RevolveError, RevolveOptions, ShapeParameters,
    TimingBucket, generate_preset, generate_with_diagnostics, revolve, revolve_with_options,
};

use super::color::{Rgb, Rgba};
use super::frame::Frame;
use super::keyframes::{AnimationState, PhaseClock, PhaseProgress};
use super::options::{RenderOptions, RevealMode};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnimationError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error(transparent)]
    Revolve(#[from] RevolveError),
}

/// Drives the four-phase camera animation for one shape.
#[derive(Debug, Clone)]
pub struct MorphDriver {
    params: ShapeParameters,
    options: RenderOptions,
    mesh: Arc<Mesh3D>,
    /// Opened pose, present only in blend mode.
    opened: Option<Arc<Mesh3D>>,
    net: CurveNet,
    projector: Projector,
    perspective_distance: f64,
    clock: PhaseClock,
    line_color: Rgba,
    profile_diagnostics: ProfileDiagnostics,
    revolve_diagnostics: RevolveDiagnostics,
}

impl MorphDriver {
    /// Validate `params`, then generate and revolve the mesh once.
    pub fn new(params: &ShapeParameters, options: RenderOptions) -> Result<Self, AnimationError> {
        if let Err(err) = params.validate() {
            log::warn!("rejecting shape parameters: {err}");
            return Err(err.into());
        }

        let (polygon, profile_diagnostics) = generate_with_diagnostics(params);
        let revolve_options = RevolveOptions {
            slices: options.slices,
            ..RevolveOptions::default()
        };
        let (mesh, revolve_diagnostics) = revolve_with_options(&polygon, revolve_options)?;

        let opened = match options.reveal {
            RevealMode::Blend => {
                let polygon = generate_preset(ProfilePreset::Open, params);
                Some(Arc::new(revolve(&polygon, options.slices)?))
            }
            RevealMode::Off | RevealMode::Compress => None,
        };

        let net = CurveNet::from_mesh(&mesh, &options.ring_stations);
        let projector = Projector::new(&mesh);
        let perspective_distance = mesh.perspective_distance();
        let clock = PhaseClock::new(options.frames_per_phase);
        let line_color = options.line_rgba();

        log::debug!(
            "morph driver ready: {} points, {} curve groups, {} frames, perspective {perspective_distance}",
            mesh.points().len(),
            net.len(),
            clock.total_frames(),
        );

        Ok(Self {
            params: *params,
            options,
            mesh: Arc::new(mesh),
            opened,
            net,
            projector,
            perspective_distance,
            clock,
            line_color,
            profile_diagnostics,
            revolve_diagnostics,
        })
    }

    #[must_use]
    pub fn params(&self) -> &ShapeParameters {
        &self.params
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh3D {
        &self.mesh
    }

    /// Shared handle to the target mesh.
    #[must_use]
    pub fn shared_mesh(&self) -> Arc<Mesh3D> {
        Arc::clone(&self.mesh)
    }

    #[must_use]
    pub fn curve_net(&self) -> &CurveNet {
        &self.net
    }

    #[must_use]
    pub fn perspective_distance(&self) -> f64 {
        self.perspective_distance
    }

    #[must_use]
    pub fn profile_diagnostics(&self) -> &ProfileDiagnostics {
        &self.profile_diagnostics
    }

    #[must_use]
    pub fn revolve_diagnostics(&self) -> &RevolveDiagnostics {
        &self.revolve_diagnostics
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.clock.total_frames()
    }

    #[must_use]
    pub fn progress_at(&self, frame: usize) -> PhaseProgress {
        self.clock.progress(frame)
    }

    #[must_use]
    pub fn state_at(&self, frame: usize) -> AnimationState {
        self.clock.progress(frame).state
    }

    #[must_use]
    pub fn camera_at(&self, frame: usize) -> CameraState {
        self.camera_for(&self.clock.progress(frame))
    }

    fn camera_for(&self, progress: &PhaseProgress) -> CameraState {
        let keyframes = &self.options.keyframes;
        let (angle_x, angle_y, angle_z) = if progress.state.is_done() {
            keyframes.final_angles()
        } else {
            keyframes.angles_at(progress.phase, progress.eased)
        };
        let origin = self.options.origin();
        CameraState {
            angle_x,
            angle_y,
            angle_z,
            perspective_distance: self.perspective_distance,
            origin_x: origin.x,
            origin_y: origin.y,
            display_scale: self.options.display_scale(),
        }
    }

    fn in_reveal(&self, progress: &PhaseProgress) -> bool {
        self.options.reveal != RevealMode::Off && progress.state == AnimationState::Phase0
    }

    /// Line color for a frame: a fade from white during the reveal, the target
    /// color otherwise.
    fn color_for(&self, progress: &PhaseProgress) -> Rgba {
        if self.in_reveal(progress) {
            Rgb::WHITE
                .lerp(self.line_color.rgb(), progress.eased)
                .with_alpha(self.line_color.a)
        } else {
            self.line_color
        }
    }

    /// Mesh and curve net shown in a frame.
    fn geometry_for(&self, progress: &PhaseProgress) -> (Cow<'_, Mesh3D>, Cow<'_, CurveNet>) {
        if !self.in_reveal(progress) {
            return (Cow::Borrowed(&*self.mesh), Cow::Borrowed(&self.net));
        }
        match (self.options.reveal, &self.opened) {
            (RevealMode::Blend, Some(opened)) => match opened.lerp(&self.mesh, progress.eased) {
                Ok(blended) => {
                    let net = CurveNet::from_mesh(&blended, &self.options.ring_stations);
                    (Cow::Owned(blended), Cow::Owned(net))
                }
                Err(err) => {
                    log::warn!("reveal blend skipped: {err}");
                    (Cow::Borrowed(&*self.mesh), Cow::Borrowed(&self.net))
                }
            },
            _ => (
                Cow::Borrowed(&*self.mesh),
                Cow::Owned(self.net.compressed(-progress.eased)),
            ),
        }
    }

    /// Render frame `index`. Indices past the end give the frozen final frame.
    #[must_use]
    pub fn frame_at(&self, index: usize) -> Frame {
        let mut metrics = PipelineMetrics::default();
        metrics.begin();

        let progress = self.clock.progress(index);
        let camera = self.camera_for(&progress);
        let (mesh, net) = metrics.time(TimingBucket::FrameAssembly, || self.geometry_for(&progress));

        let (points, curves) = metrics.time(TimingBucket::Projection, || {
            let points = self.projector.project_points(mesh.points(), &camera);
            let curves: Vec<[Point2; 4]> = net
                .groups()
                .iter()
                .map(|group| self.projector.project_group(group, &camera))
                .collect();
            (points, curves)
        });

        if let Some(report) = metrics.end() {
            log::trace!("frame {index}: {:.3} ms", report.total_ms());
        }

        Frame {
            index,
            state: progress.state,
            phase: progress.phase,
            progress: progress.eased,
            camera,
            points,
            curves,
            color: self.color_for(&progress),
            line_width: self.options.line_width,
        }
    }

    /// Every frame of one playback, in order.
    #[cfg(feature = "parallel")]
    #[must_use]
    pub fn render_all(&self) -> Vec<Frame> {
        (0..self.total_frames())
            .into_par_iter()
            .map(|index| self.frame_at(index))
            .collect()
    }

    /// Every frame of one playback, in order.
    #[cfg(not(feature = "parallel"))]
    #[must_use]
    pub fn render_all(&self) -> Vec<Frame> {
        (0..self.total_frames()).map(|index| self.frame_at(index)).collect()
    }

    /// Sequential playback that walks the state machine from `Idle` to `Done`.
    #[must_use]
    pub fn playback(&self) -> Playback<'_> {
        Playback {
            driver: self,
            state: AnimationState::Idle,
            next: 0,
        }
    }
}

/// Iterator over the frames of one playback.
#[derive(Debug)]
pub struct Playback<'a> {
    driver: &'a MorphDriver,
    state: AnimationState,
    next: usize,
}

impl Playback<'_> {
    /// State of the last frame handed out (`Idle` before the first).
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }
}

impl Iterator for Playback<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.driver.total_frames() {
            self.state = AnimationState::Done;
            return None;
        }
        let frame = self.driver.frame_at(self.next);
        self.state = frame.state;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.driver.total_frames().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Playback<'_> {}
