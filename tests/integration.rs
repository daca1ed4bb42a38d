use revolve_engine::anim::{AnimationState, MorphDriver, RenderOptions, RevealMode};
use revolve_engine::export::{frame_to_svg, mesh_snapshot, mesh_to_obj};
use revolve_engine::geom::{
    CameraState, ProfilePreset, Projector, RevolveOptions, ShapeParameters, Tolerance,
    generate_preset, generate_with_diagnostics, project, revolve, revolve_with_options,
};
use revolve_engine::parse::parse_layers;
use revolve_engine::sample::random_shape;

const SAMPLE_LAYER: &str = "~p0220~p1143~p216~p36~p41~p5119~p675~lcFF3737~q0THE GLITTER APACHE REVOLVER~q1A&#39;s Penis~q2Ability : 30%";

fn short_options() -> RenderOptions {
    RenderOptions {
        frames_per_phase: 6,
        ..RenderOptions::default()
    }
}

#[test]
fn layer_string_drives_full_pipeline() {
    let layers = parse_layers(SAMPLE_LAYER).expect("parse layer");
    let layer = &layers[0];
    let options = layer.render_options(short_options());
    let driver = MorphDriver::new(&layer.params, options).expect("driver");

    // `as` defaults to 8 seconds: 50 frames per phase at 25 fps.
    assert_eq!(driver.total_frames(), 200);

    let last = driver.frame_at(driver.total_frames() - 1);
    assert_eq!(last.state, AnimationState::Phase3);
    assert_eq!(last.camera.angle_y, 630.0);
    assert_eq!(last.non_finite_count(), 0);
}

#[test]
fn every_frame_is_finite_for_random_shapes() {
    for seed in 0..8 {
        let shape = random_shape(seed);
        let driver = MorphDriver::new(&shape.params, short_options()).expect("driver");
        for frame in driver.playback() {
            assert_eq!(frame.non_finite_count(), 0, "seed {seed} frame {}", frame.index);
        }
    }
}

#[test]
fn presets_all_revolve_cleanly() {
    let params = ShapeParameters::default();
    for preset in ProfilePreset::ALL {
        let polygon = generate_preset(*preset, &params);
        let mesh = revolve(&polygon, 12).expect("revolve preset");
        assert_eq!(mesh.points().len(), 13 * 12, "{}", preset.name());
        assert!(mesh.points().iter().all(|p| p.is_finite()));
    }
}

#[test]
fn projection_is_pure_and_count_preserving() {
    let (polygon, _) = generate_with_diagnostics(&ShapeParameters::default());
    let mesh = revolve(&polygon, 16).expect("revolve");
    let camera = CameraState {
        angle_x: 30.0,
        angle_y: -45.0,
        angle_z: 10.0,
        perspective_distance: mesh.perspective_distance(),
        ..CameraState::default()
    };
    let a = project(&mesh, &camera);
    let b = Projector::new(&mesh).project_points(mesh.points(), &camera);
    assert_eq!(a.len(), mesh.points().len());
    assert_eq!(a, b);
}

#[test]
fn identity_camera_returns_centered_profile() {
    let (polygon, _) = generate_with_diagnostics(&ShapeParameters::default());
    let mesh = revolve(&polygon, 12).expect("revolve");
    let centroid = mesh.centroid();
    let camera = CameraState {
        perspective_distance: 0.0,
        ..CameraState::default()
    };
    let tol = Tolerance::new(1e-9);
    for (screen, point) in project(&mesh, &camera).iter().zip(mesh.points()) {
        // z is measured from the centroid, so only points at centroid depth
        // project without perspective distortion.
        if tol.approx_eq_f64(point.z, centroid.z) {
            assert!(tol.approx_eq_f64(screen.x, point.x - centroid.x));
            assert!(tol.approx_eq_f64(screen.y, point.y - centroid.y));
        }
    }
}

#[test]
fn blend_reveal_and_compress_reveal_agree_after_phase_zero() {
    let params = ShapeParameters::default();
    let blend = MorphDriver::new(
        &params,
        RenderOptions {
            reveal: RevealMode::Blend,
            ..short_options()
        },
    )
    .expect("blend driver");
    let compress = MorphDriver::new(&params, short_options()).expect("compress driver");
    for index in 6..blend.total_frames() {
        assert_eq!(blend.frame_at(index), compress.frame_at(index));
    }
}

#[test]
fn exports_agree_with_mesh() {
    let (polygon, _) = generate_with_diagnostics(&ShapeParameters::default());
    let (mesh, diagnostics) = revolve_with_options(&polygon, RevolveOptions::default()).expect("revolve");
    let obj = mesh_to_obj(&mesh, "shape").expect("obj");
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), mesh.points().len());

    let snapshot = mesh_snapshot(&mesh, &diagnostics);
    assert!(snapshot.ends_with('\n'));
    assert_eq!(snapshot.lines().filter(|l| l.starts_with("p ")).count(), mesh.points().len());

    let options = short_options();
    let driver = MorphDriver::new(&ShapeParameters::default(), options.clone()).expect("driver");
    let svg = frame_to_svg(&driver.frame_at(10), &options);
    assert_eq!(svg.matches("<path ").count(), driver.curve_net().len());
}
