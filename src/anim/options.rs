use serde::{Deserialize, Serialize};

use crate::geom::{DEFAULT_RING_STATIONS, Point2};

use super::color::{Rgb, Rgba, opacity_to_alpha};
use super::keyframes::{CameraKeyframes, PHASE_COUNT};

/// Reference canvas the display scale is calibrated against.
const REFERENCE_SIZE: f64 = 320.0;
const REFERENCE_SCALE: f64 = 0.9375;

/// How the shape appears during phase 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Shape is fully drawn from the first frame.
    Off,
    /// Every cubic group grows out of its anchor point.
    #[default]
    Compress,
    /// Mesh blends from the opened pose into the target.
    Blend,
}

impl RevealMode {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(RevealMode::Off),
            "compress" => Some(RevealMode::Compress),
            "blend" => Some(RevealMode::Blend),
            _ => None,
        }
    }
}

/// Everything that shapes playback and output, independent of the shape
/// parameters themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub slices: usize,
    pub frames_per_phase: usize,
    pub frame_rate: f64,
    /// Output width and height in pixels.
    pub size: u32,
    pub background: String,
    pub line_color: String,
    /// Line opacity, `0..=100`.
    pub line_opacity: f64,
    pub line_width: f64,
    pub reveal: RevealMode,
    pub ring_stations: Vec<usize>,
    /// Overrides the size-derived display scale.
    pub display_scale: Option<f64>,
    pub keyframes: CameraKeyframes,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            slices: 12,
            frames_per_phase: 50,
            frame_rate: 25.0,
            size: 640,
            background: "1A1A1A".to_owned(),
            line_color: "FF3737".to_owned(),
            line_opacity: 100.0,
            line_width: 2.0,
            reveal: RevealMode::default(),
            ring_stations: DEFAULT_RING_STATIONS.to_vec(),
            display_scale: None,
            keyframes: CameraKeyframes::DEFAULT,
        }
    }
}

impl RenderOptions {
    /// Frames per phase for an animation lasting `seconds` in total.
    ///
    /// Never returns zero.
    #[must_use]
    pub fn frames_per_phase_for(seconds: f64, frame_rate: f64) -> usize {
        let frames = seconds * frame_rate / PHASE_COUNT as f64;
        if frames.is_finite() && frames >= 1.0 {
            frames.round() as usize
        } else {
            1
        }
    }

    /// Set `frames_per_phase` from a total animation length.
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.frames_per_phase = Self::frames_per_phase_for(seconds, self.frame_rate);
        self
    }

    #[must_use]
    pub fn display_scale(&self) -> f64 {
        self.display_scale
            .unwrap_or_else(|| f64::from(self.size) * REFERENCE_SCALE / REFERENCE_SIZE)
    }

    /// Image center.
    #[must_use]
    pub fn origin(&self) -> Point2 {
        let half = f64::from(self.size) / 2.0;
        Point2::new(half, half)
    }

    #[must_use]
    pub fn line_rgba(&self) -> Rgba {
        Rgb::parse_hex(&self.line_color).with_alpha(opacity_to_alpha(self.line_opacity))
    }

    #[must_use]
    pub fn background_rgb(&self) -> Rgb {
        Rgb::parse_hex(&self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.slices, 12);
        assert_eq!(options.frames_per_phase, 50);
        assert_eq!(options.ring_stations, vec![0, 3, 6, 9]);
        assert_eq!(options.reveal, RevealMode::Compress);
        assert_eq!(options.line_rgba(), Rgba { r: 255, g: 55, b: 55, a: 255 });
    }

    #[test]
    fn test_display_scale_and_origin() {
        let options = RenderOptions::default();
        assert_eq!(options.display_scale(), 1.875);
        assert_eq!(options.origin(), Point2::new(320.0, 320.0));

        let fixed = RenderOptions {
            display_scale: Some(0.5),
            ..RenderOptions::default()
        };
        assert_eq!(fixed.display_scale(), 0.5);
    }

    #[test]
    fn test_frames_per_phase_from_duration() {
        assert_eq!(RenderOptions::frames_per_phase_for(8.0, 25.0), 50);
        assert_eq!(RenderOptions::frames_per_phase_for(0.0, 25.0), 1);
        assert_eq!(RenderOptions::frames_per_phase_for(f64::NAN, 25.0), 1);
        assert_eq!(RenderOptions::default().with_duration(4.0).frames_per_phase, 25);
    }

    #[test]
    fn test_reveal_from_name() {
        assert_eq!(RevealMode::from_name("Blend"), Some(RevealMode::Blend));
        assert_eq!(RevealMode::from_name("none"), Some(RevealMode::Off));
        assert_eq!(RevealMode::from_name("fade"), None);
    }
}
