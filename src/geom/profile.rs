//! Shape parameters → 25-point half-profile control polygon.
//!
//! The polygon is a fixed base outline that is scaled, expanded, bent and
//! rotated in nine ordered steps. Each step reads the coordinates left behind by
//! the previous one, so the order in [`generate_with_diagnostics`] is part of
//! the result and must not be rearranged.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::diagnostics::ProfileDiagnostics;
use super::metrics::{PipelineMetrics, TimingBucket};
use super::{Point2, Tolerance};

// ─────────────────────────────────────────────────────────────────────────────
// Named control point indices
// ─────────────────────────────────────────────────────────────────────────────

/// Shaft base, upper side.
pub const KUKI0: usize = 0;
/// Shaft/neck boundary, upper side.
pub const KUKI1: usize = 3;
pub const KITO0: usize = 6;
pub const KITO1: usize = 9;
/// Tip. The only control point without a partner.
pub const RINKO: usize = 12;
pub const KITO2: usize = 15;
pub const KITO3: usize = 18;
/// Shaft/neck boundary, lower side.
pub const KUKI2: usize = 21;
/// Shaft base, lower side.
pub const KUKI3: usize = 24;

pub const CONTROL_POINT_COUNT: usize = 25;
/// Paired stations `(i, 24 - i)` for `i in 0..=12`.
pub const STATION_COUNT: usize = 13;

/// Curve/base angles at or beyond this magnitude skip their flare scale.
pub const FLARE_ANGLE_LIMIT_DEG: f64 = 89.0;

const NECK_MIN_FRACTION: f64 = 0.1;

const BASE_X: [f64; CONTROL_POINT_COUNT] = [
    0.0, 29.0, 55.0, 84.0, 86.0, 89.0, 91.0, 92.0, 93.0, 96.0, 105.0, 124.0, 129.0, 128.0, 123.0,
    116.0, 113.0, 113.0, 111.0, 109.0, 106.0, 103.0, 66.0, 34.0, 0.0,
];
const BASE_Y: [f64; CONTROL_POINT_COUNT] = [
    0.0, 2.0, 3.0, 1.0, 2.0, 2.0, 4.0, 2.0, 0.0, -3.0, 0.0, 1.0, 13.0, 21.0, 29.0, 32.0, 31.0,
    31.0, 30.0, 31.0, 32.0, 33.0, 36.0, 35.0, 35.0,
];

// ─────────────────────────────────────────────────────────────────────────────
// ShapeParameters
// ─────────────────────────────────────────────────────────────────────────────

/// Scalar inputs for one shape. Angles are degrees; `length` and `girth`
/// share one linear unit; expansions are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParameters {
    pub length: f64,
    /// Circumference; the profile diameter is `girth / π`.
    pub girth: f64,
    pub curve: f64,
    pub base_angle: f64,
    pub glans_angle: f64,
    pub shaft_expansion: f64,
    pub glans_expansion: f64,
    /// Slots `p7..p9` of the serialized layer format. Carried, never read.
    pub reserved: [f64; 3],
}

/// Slider bounds for one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterRange {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParameterRange {
    const fn new(key: &'static str, label: &'static str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self { key, label, min, max, step, default }
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Slider table in slot order `p0..p9`.
pub const PARAMETER_RANGES: [ParameterRange; 10] = [
    ParameterRange::new("p0", "Length", 50.0, 300.0, 1.0, 140.0),
    ParameterRange::new("p1", "Girth", 50.0, 300.0, 1.0, 140.0),
    ParameterRange::new("p2", "Shaft Curve", -60.0, 60.0, 1.0, 10.0),
    ParameterRange::new("p3", "Shaft Angle", -60.0, 60.0, 1.0, 10.0),
    ParameterRange::new("p4", "Glans Angle", -40.0, 40.0, 1.0, 0.0),
    ParameterRange::new("p5", "Shaft Expansion rate", 75.0, 200.0, 1.0, 100.0),
    ParameterRange::new("p6", "Glans Expansion rate", 75.0, 150.0, 1.0, 100.0),
    ParameterRange::new("p7", "Reserved 7", 0.0, 1.0, 1.0, 0.0),
    ParameterRange::new("p8", "Reserved 8", 0.0, 1.0, 1.0, 0.0),
    ParameterRange::new("p9", "Reserved 9", 0.0, 1.0, 1.0, 0.0),
];

impl Default for ShapeParameters {
    fn default() -> Self {
        let mut slots = [0.0; 10];
        for (slot, range) in slots.iter_mut().zip(PARAMETER_RANGES.iter()) {
            *slot = range.default;
        }
        Self::from_slots(slots)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParameterError {
    #[error("parameter `{field}` must be finite")]
    NonFinite { field: &'static str },
    #[error("parameter `{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
}

impl ShapeParameters {
    /// Builds parameters from the ten serialized slots `p0..p9`.
    #[must_use]
    pub const fn from_slots(slots: [f64; 10]) -> Self {
        Self {
            length: slots[0],
            girth: slots[1],
            curve: slots[2],
            base_angle: slots[3],
            glans_angle: slots[4],
            shaft_expansion: slots[5],
            glans_expansion: slots[6],
            reserved: [slots[7], slots[8], slots[9]],
        }
    }

    #[must_use]
    pub const fn to_slots(&self) -> [f64; 10] {
        [
            self.length,
            self.girth,
            self.curve,
            self.base_angle,
            self.glans_angle,
            self.shaft_expansion,
            self.glans_expansion,
            self.reserved[0],
            self.reserved[1],
            self.reserved[2],
        ]
    }

    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.girth / PI
    }

    /// Boundary check run before any value enters the pipeline.
    ///
    /// Everything that passes here is guaranteed to produce a renderable shape.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("length", self.length),
            ("girth", self.girth),
            ("curve", self.curve),
            ("base_angle", self.base_angle),
            ("glans_angle", self.glans_angle),
            ("shaft_expansion", self.shaft_expansion),
            ("glans_expansion", self.glans_expansion),
            ("reserved", self.reserved[0]),
            ("reserved", self.reserved[1]),
            ("reserved", self.reserved[2]),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { field });
            }
        }
        for (field, value) in [
            ("length", self.length),
            ("girth", self.girth),
            ("shaft_expansion", self.shaft_expansion),
            ("glans_expansion", self.glans_expansion),
        ] {
            if value < 0.0 {
                return Err(ParameterError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Copy with every slot clamped into its slider range.
    #[must_use]
    pub fn clamped_to_ranges(&self) -> Self {
        let mut slots = self.to_slots();
        for (slot, range) in slots.iter_mut().zip(PARAMETER_RANGES.iter()) {
            *slot = range.clamp(*slot);
        }
        Self::from_slots(slots)
    }

    /// Plain-text summary, one line per visible parameter.
    #[must_use]
    pub fn description_lines(&self) -> Vec<String> {
        vec![
            format!("Length : {}mm", self.length),
            format!("Diameter : φ{}mm", self.diameter().floor()),
            format!("Shaft Curve : {}°", self.curve),
            format!("Shaft Angle : {}°", self.base_angle),
            format!("Glans Angle : {}°", self.glans_angle),
            format!("Shaft Expansion rate : {}%", self.shaft_expansion),
            format!("Glans Expansion rate : {}%", self.glans_expansion),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

/// Profile variant selected at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilePreset {
    /// Parameters are used as given.
    #[default]
    Standard,
    /// Fixed short, bent pose. Used as the starting shape of the reveal blend.
    Open,
    /// Girth pinned to 80, all angles zeroed.
    FixedGirth,
    /// All angles zeroed.
    Straight,
    /// Curve and base angle zeroed, glans angle kept.
    GlansTilt,
}

impl ProfilePreset {
    pub const ALL: &'static [ProfilePreset] = &[
        ProfilePreset::Standard,
        ProfilePreset::Open,
        ProfilePreset::FixedGirth,
        ProfilePreset::Straight,
        ProfilePreset::GlansTilt,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ProfilePreset::Standard => "standard",
            ProfilePreset::Open => "open",
            ProfilePreset::FixedGirth => "fixed_girth",
            ProfilePreset::Straight => "straight",
            ProfilePreset::GlansTilt => "glans_tilt",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|preset| preset.name() == name)
    }

    /// Parameters the generator actually sees for this preset.
    #[must_use]
    pub fn apply(self, params: &ShapeParameters) -> ShapeParameters {
        let p = *params;
        match self {
            ProfilePreset::Standard => p,
            ProfilePreset::Open => ShapeParameters {
                length: 90.0,
                girth: 80.0,
                curve: -20.0,
                base_angle: -40.0,
                glans_angle: -30.0,
                shaft_expansion: 140.0,
                glans_expansion: 80.0,
                reserved: p.reserved,
            },
            ProfilePreset::FixedGirth => ShapeParameters {
                girth: 80.0,
                curve: 0.0,
                base_angle: 0.0,
                glans_angle: 0.0,
                ..p
            },
            ProfilePreset::Straight => ShapeParameters {
                curve: 0.0,
                base_angle: 0.0,
                glans_angle: 0.0,
                ..p
            },
            ProfilePreset::GlansTilt => ShapeParameters {
                curve: 0.0,
                base_angle: 0.0,
                ..p
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ControlPolygon
// ─────────────────────────────────────────────────────────────────────────────

/// One half-profile: 25 planar points, paired `(i, 24 - i)` into stations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPolygon {
    points: [Point2; CONTROL_POINT_COUNT],
}

impl ControlPolygon {
    #[must_use]
    pub const fn new(points: [Point2; CONTROL_POINT_COUNT]) -> Self {
        Self { points }
    }

    /// The untransformed base outline.
    #[must_use]
    pub fn base() -> Self {
        let mut points = [Point2::ORIGIN; CONTROL_POINT_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            *p = Point2::new(BASE_X[i], BASE_Y[i]);
        }
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2; CONTROL_POINT_COUNT] {
        &self.points
    }

    /// # Panics
    /// Panics if `index >= 25`.
    #[must_use]
    pub fn point(&self, index: usize) -> Point2 {
        self.points[index]
    }

    /// Upper and lower point of station `station` (`0..=12`).
    #[must_use]
    pub fn station_pair(&self, station: usize) -> (Point2, Point2) {
        (self.points[station], self.points[CONTROL_POINT_COUNT - 1 - station])
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate the control polygon for `params`.
#[must_use]
pub fn generate(params: &ShapeParameters) -> ControlPolygon {
    generate_with_diagnostics(params).0
}

/// Generate the control polygon for `params` as seen through `preset`.
#[must_use]
pub fn generate_preset(preset: ProfilePreset, params: &ShapeParameters) -> ControlPolygon {
    generate(&preset.apply(params))
}

/// Generate the control polygon and report which numeric fallbacks fired.
#[must_use]
pub fn generate_with_diagnostics(params: &ShapeParameters) -> (ControlPolygon, ProfileDiagnostics) {
    let mut metrics = PipelineMetrics::default();
    metrics.begin();
    let mut diag = ProfileDiagnostics::new();

    let polygon = metrics.time(TimingBucket::Profile, || {
        let mut p = ControlPolygon::base().points;
        let pr = scale_diameter(&mut p, params, &mut diag);
        scale_neck(&mut p, pr, &mut diag);
        expand_glans(&mut p, params.glans_expansion);
        expand_shaft(&mut p, params.shaft_expansion);
        scale_length(&mut p, params.length, &mut diag);
        bend_shaft(&mut p, params.curve, &mut diag);
        tilt_base(&mut p, params.base_angle, &mut diag);
        tilt_glans(&mut p, params.glans_angle);
        center_vertically(&mut p);
        ControlPolygon::new(p)
    });

    diag.timing = metrics.end();
    if !diag.is_clean() {
        log::debug!("profile generated with fallbacks: {}", diag.summary());
    }
    (polygon, diag)
}

type Points = [Point2; CONTROL_POINT_COUNT];

/// Indices strictly between the shaft bases and outside the neck/glans block.
fn pure_shaft_indices() -> impl Iterator<Item = usize> {
    (KUKI0 + 1..KUKI3).filter(|&i| i < KUKI1 || i > KUKI2)
}

fn ratio_or_neutral(num: f64, den: f64) -> Option<f64> {
    if Tolerance::ZERO_LENGTH.approx_zero_f64(den) || !den.is_finite() {
        None
    } else {
        Some(num / den)
    }
}

/// Step 1. Returns the y factor, which seeds the neck correction.
fn scale_diameter(p: &mut Points, params: &ShapeParameters, diag: &mut ProfileDiagnostics) -> f64 {
    let diameter = params.diameter();
    let span = p[KUKI3].y - p[KUKI0].y;
    let pr = match ratio_or_neutral(diameter, span) {
        Some(pr) if !Tolerance::ZERO_LENGTH.approx_zero_f64(diameter) => pr,
        _ => {
            diag.diameter_scale_fallback = true;
            diag.add_warning(format!("diameter scale fallback (girth {}, span {span})", params.girth));
            1.0
        }
    };
    for pt in p.iter_mut() {
        pt.y *= pr;
    }
    pr
}

/// Step 2.
fn scale_neck(p: &mut Points, candidate: f64, diag: &mut ProfileDiagnostics) {
    let rinko_x = p[RINKO].x;
    let floor = p[KUKI0].x + (rinko_x - p[KUKI0].x) * NECK_MIN_FRACTION;
    let mut pr = candidate;
    if rinko_x + (p[KUKI1].x - rinko_x) * pr < floor {
        diag.neck_scale_replaced = true;
        pr = ratio_or_neutral(floor, rinko_x - p[KUKI1].x).unwrap_or_else(|| {
            diag.neck_scale_fallback = true;
            diag.add_warning("neck scale fallback (tip and neck share x)");
            1.0
        });
    }
    for pt in &mut p[KUKI1..=KUKI2] {
        pt.x = rinko_x + (pt.x - rinko_x) * pr;
    }
}

/// Step 3.
fn expand_glans(p: &mut Points, percent: f64) {
    let pivot = p[KITO0].midpoint(p[KITO3]);
    let factor = percent / 100.0;
    for pt in &mut p[KITO1 - 1..=KITO2 + 1] {
        *pt = pt.scale_about(pivot, factor);
    }
}

/// Step 4.
fn expand_shaft(p: &mut Points, percent: f64) {
    let pivot = p[KUKI0].midpoint(p[KUKI2]);
    let factor = percent / 100.0;
    for i in pure_shaft_indices() {
        p[i] = p[i].scale_about(pivot, factor);
    }
}

/// Step 5. The base stays put; the neck/glans block slides so the tip lands at `length`.
fn scale_length(p: &mut Points, length: f64, diag: &mut ProfileDiagnostics) {
    let pr = ratio_or_neutral(length, p[RINKO].x - p[KUKI0].x).unwrap_or_else(|| {
        diag.length_scale_fallback = true;
        diag.add_warning("length scale fallback (tip at base)");
        1.0
    });
    let shift = p[RINKO].x * pr - p[RINKO].x;
    for pt in &mut p[KUKI1..=KUKI2] {
        pt.x += shift;
    }
    for k in 1..=2 {
        let t = k as f64 / 3.0;
        p[KUKI0 + k].x = p[KUKI0].x + (p[KUKI1].x - p[KUKI0].x) * t;
        p[KUKI3 - k].x = p[KUKI3].x + (p[KUKI2].x - p[KUKI3].x) * t;
    }
}

/// Step 6.
fn bend_shaft(p: &mut Points, curve: f64, diag: &mut ProfileDiagnostics) {
    let mid = p[KUKI0 + 1].midpoint(p[KUKI0 + 2]);
    let rel = mid - p[KUKI0];
    let r = rel.length();
    let s = (rel.y.atan2(rel.x).to_degrees() - curve).to_radians();
    let dy = rel.y - s.sin() * r;
    for i in pure_shaft_indices() {
        p[i].y += dy;
    }

    if curve.abs() < FLARE_ANGLE_LIMIT_DEG {
        let flare = (1.0 / curve.to_radians().cos() - 1.0) * 0.5 + 1.0;
        p[KUKI0].y *= flare;
        p[KUKI3].y *= flare;
    } else {
        diag.curve_flare_skipped = true;
        diag.add_warning(format!("curve flare skipped at {curve}°"));
    }

    let pivot = p[KUKI1].midpoint(p[KUKI2]);
    for pt in &mut p[KUKI1..=KUKI2] {
        *pt = pt.rotate_about(pivot, -curve);
    }
}

/// Step 7.
fn tilt_base(p: &mut Points, base_angle: f64, diag: &mut ProfileDiagnostics) {
    let pivot = p[KUKI0];
    for pt in &mut p[KUKI0 + 1..KUKI3] {
        *pt = pt.rotate_about(pivot, -base_angle);
    }

    if base_angle.abs() < FLARE_ANGLE_LIMIT_DEG {
        let flare = 1.0 / base_angle.to_radians().cos();
        p[KUKI0].y *= flare;
        p[KUKI3].y *= flare;
    } else {
        diag.base_flare_skipped = true;
        diag.add_warning(format!("base flare skipped at {base_angle}°"));
    }
}

/// Step 8.
fn tilt_glans(p: &mut Points, glans_angle: f64) {
    let pivot = p[KITO1].midpoint(p[KITO2]);
    for pt in &mut p[RINKO - 1..=RINKO + 1] {
        *pt = pt.rotate_about(pivot, -glans_angle);
    }
}

/// Step 9.
fn center_vertically(p: &mut Points) {
    let half = (p[KUKI3].y - p[KUKI0].y) * 0.5;
    for pt in p.iter_mut() {
        pt.y -= half;
    }
}
