use super::super::*;
use std::f64::consts::PI;

fn straight(length: f64, girth: f64) -> ShapeParameters {
    ShapeParameters {
        length,
        girth,
        curve: 0.0,
        base_angle: 0.0,
        glans_angle: 0.0,
        shaft_expansion: 100.0,
        glans_expansion: 100.0,
        reserved: [0.0; 3],
    }
}

#[test]
fn generated_profile_is_vertically_centered() {
    let cases = [
        ShapeParameters::default(),
        straight(140.0, 140.0 * PI),
        ShapeParameters {
            length: 300.0,
            girth: 50.0,
            curve: -60.0,
            base_angle: 60.0,
            glans_angle: 40.0,
            shaft_expansion: 200.0,
            glans_expansion: 75.0,
            reserved: [0.0; 3],
        },
    ];

    for params in cases {
        let polygon = generate(&params);
        let mean = (polygon.point(KUKI0).y + polygon.point(KUKI3).y) * 0.5;
        assert!(mean.abs() < 1e-9, "base not centered for {params:?}: {mean}");
    }
}

#[test]
fn straight_profile_mirrors_base_about_axis() {
    let polygon = generate(&straight(140.0, 140.0 * PI));
    let top = polygon.point(KUKI0);
    let bottom = polygon.point(KUKI3);

    assert!((top.x - bottom.x).abs() < 1e-9);
    assert!((top.y + bottom.y).abs() < 1e-9);
    assert!((top.y + 70.0).abs() < 1e-9);
    assert!((bottom.y - 70.0).abs() < 1e-9);
}

#[test]
fn doubling_length_doubles_tip_offset() {
    let short = generate(&straight(100.0, 140.0));
    let long = generate(&straight(200.0, 140.0));

    let short_offset = short.point(RINKO).x - short.point(KUKI0).x;
    let long_offset = long.point(RINKO).x - long.point(KUKI0).x;

    assert!((long_offset - 2.0 * short_offset).abs() < 1e-9);
    assert!((short_offset - 100.0).abs() < 1e-9);
    assert_eq!(short.point(KUKI0), long.point(KUKI0));
}

#[test]
fn interior_shaft_handles_sit_at_thirds() {
    let polygon = generate(&straight(160.0, 120.0));
    let base = polygon.point(KUKI0).x;
    let neck = polygon.point(KUKI1).x;

    assert!((polygon.point(KUKI0 + 1).x - (base + (neck - base) / 3.0)).abs() < 1e-9);
    assert!((polygon.point(KUKI0 + 2).x - (base + (neck - base) * 2.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn shaft_expansion_leaves_neck_and_glans_block_untouched() {
    let narrow = generate(&ShapeParameters::default());
    let wide = generate(&ShapeParameters {
        shaft_expansion: 150.0,
        ..ShapeParameters::default()
    });

    for i in KUKI1..=KUKI2 {
        assert_eq!(narrow.point(i), wide.point(i), "index {i} moved");
    }
    assert_ne!(narrow.point(KUKI0 + 1), wide.point(KUKI0 + 1));
}

#[test]
fn zero_girth_falls_back_to_neutral_scale() {
    let (polygon, diag) = generate_with_diagnostics(&straight(140.0, 0.0));

    assert!(diag.diameter_scale_fallback);
    assert!(!diag.is_clean());
    assert!(polygon.is_finite());
    // base height span of the outline is 35 before centering
    assert!((polygon.point(KUKI3).y - polygon.point(KUKI0).y - 35.0).abs() < 1e-9);
}

#[test]
fn zero_length_keeps_profile_finite() {
    let (polygon, _diag) = generate_with_diagnostics(&straight(0.0, 140.0));
    assert!(polygon.is_finite());
    assert!(polygon.point(RINKO).x.abs() < 1e-9);
}

#[test]
fn singular_angles_skip_flare_but_still_rotate() {
    let params = ShapeParameters {
        curve: 89.0,
        base_angle: -95.0,
        ..ShapeParameters::default()
    };
    let (polygon, diag) = generate_with_diagnostics(&params);

    assert!(diag.curve_flare_skipped);
    assert!(diag.base_flare_skipped);
    assert!(polygon.is_finite());

    let (unrotated, _) = generate_with_diagnostics(&ShapeParameters {
        base_angle: 0.0,
        ..params
    });
    assert_ne!(polygon.point(RINKO), unrotated.point(RINKO));
}

#[test]
fn large_girth_replaces_neck_scale() {
    let (_, diag) = generate_with_diagnostics(&straight(140.0, 140.0 * PI));
    assert!(diag.neck_scale_replaced);
    assert!(diag.is_clean());

    let (_, diag) = generate_with_diagnostics(&straight(140.0, 140.0));
    assert!(!diag.neck_scale_replaced);
}

#[test]
fn glans_angle_only_moves_tip_triplet() {
    let flat = generate(&ShapeParameters::default());
    let tilted = generate(&ShapeParameters {
        glans_angle: 25.0,
        ..ShapeParameters::default()
    });

    for i in 0..CONTROL_POINT_COUNT {
        if (RINKO - 1..=RINKO + 1).contains(&i) {
            assert_ne!(flat.point(i), tilted.point(i), "index {i} should rotate");
        } else {
            assert_eq!(flat.point(i), tilted.point(i), "index {i} should stay");
        }
    }
}

#[test]
fn straight_preset_matches_zeroed_angles() {
    let params = ShapeParameters::default();
    let preset = generate_preset(ProfilePreset::Straight, &params);
    let manual = generate(&ShapeParameters {
        curve: 0.0,
        base_angle: 0.0,
        glans_angle: 0.0,
        ..params
    });
    assert_eq!(preset, manual);
    assert_eq!(generate_preset(ProfilePreset::Standard, &params), generate(&params));
}

#[test]
fn generation_is_deterministic() {
    let params = ShapeParameters {
        curve: 17.5,
        base_angle: -12.0,
        glans_angle: 8.0,
        ..ShapeParameters::default()
    };
    assert_eq!(generate(&params), generate(&params));
}
