use super::super::*;

fn planar_points() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 2.0, 0.0),
        Point3::new(-4.0, 7.5, 0.0),
        Point3::new(3.0, -6.0, 0.0),
    ]
}

fn mean(points: &[Point3]) -> Point3 {
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Vec3::ZERO, |acc, p| Vec3::new(acc.x + p.x, acc.y + p.y, acc.z + p.z));
    Point3::new(sum.x / n, sum.y / n, sum.z / n)
}

#[test]
fn identity_camera_on_flat_points_is_scaled_translation() {
    let points = planar_points();
    let centroid = mean(&points);
    let projector = Projector::with_centroid(centroid);
    let camera = CameraState {
        origin_x: 320.0,
        origin_y: 240.0,
        display_scale: 1.875,
        perspective_distance: 250.0,
        ..CameraState::default()
    };

    let projected = projector.project_points(&points, &camera);
    assert_eq!(projected.len(), points.len());
    for (p, s) in points.iter().zip(&projected) {
        let expected = Point2::new(
            320.0 + 1.875 * (p.x - centroid.x),
            240.0 + 1.875 * (p.y - centroid.y),
        );
        assert_eq!(*s, expected);
    }
}

#[test]
fn whole_turn_angles_match_zero_angles_exactly() {
    let mesh = revolve(&generate(&ShapeParameters::default()), 12).expect("revolve should succeed");
    let still = CameraState {
        perspective_distance: mesh.perspective_distance(),
        ..CameraState::default()
    };
    let turned = CameraState {
        angle_x: 360.0,
        angle_y: -720.0,
        angle_z: 1080.0,
        ..still
    };
    assert_eq!(project(&mesh, &still), project(&mesh, &turned));
}

#[test]
fn centroid_always_lands_on_origin() {
    let mesh = revolve(&generate(&ShapeParameters::default()), 12).expect("revolve should succeed");
    let projector = Projector::new(&mesh);
    let camera = CameraState {
        angle_x: 33.0,
        angle_y: -160.0,
        angle_z: 12.0,
        perspective_distance: mesh.perspective_distance(),
        origin_x: 100.0,
        origin_y: 50.0,
        display_scale: 2.0,
    };
    let p = projector.project_point(projector.centroid(), &camera);
    assert!(Tolerance::DEFAULT.approx_eq_point2(p, camera.origin()));
}

#[test]
fn rotation_order_is_z_then_x_then_y() {
    let tol = Tolerance::new(1e-12);

    let v = rotate_zxy(Vec3::new(1.0, 0.0, 0.0), 0.0, 0.0, 90.0);
    assert!(tol.approx_eq_point3(Point3::new(v.x, v.y, v.z), Point3::new(0.0, 1.0, 0.0)));

    // Z first carries +x onto +y, then X carries +y onto +z
    let v = rotate_zxy(Vec3::new(1.0, 0.0, 0.0), 90.0, 0.0, 90.0);
    assert!(tol.approx_eq_point3(Point3::new(v.x, v.y, v.z), Point3::new(0.0, 0.0, 1.0)));

    // Y turns in the (z, x) plane with the angle negated
    let v = rotate_zxy(Vec3::new(0.0, 0.0, 1.0), 0.0, 90.0, 0.0);
    assert!(tol.approx_eq_point3(Point3::new(v.x, v.y, v.z), Point3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn nearer_points_are_magnified() {
    let projector = Projector::with_centroid(Point3::ORIGIN);
    let camera = CameraState::identity(Point2::ORIGIN, 100.0);

    let far = projector.project_point(Point3::new(10.0, 0.0, 50.0), &camera);
    let flat = projector.project_point(Point3::new(10.0, 0.0, 0.0), &camera);
    let near = projector.project_point(Point3::new(10.0, 0.0, -50.0), &camera);

    assert!((far.x - 5.0).abs() < 1e-12);
    assert!((flat.x - 10.0).abs() < 1e-12);
    assert!((near.x - 15.0).abs() < 1e-12);
}

#[test]
fn zero_perspective_distance_is_guarded() {
    let projector = Projector::with_centroid(Point3::ORIGIN);
    let camera = CameraState::identity(Point2::ORIGIN, 0.0);
    assert_eq!(camera.effective_perspective(), 1.0);

    let p = projector.project_point(Point3::new(2.0, 3.0, 0.5), &camera);
    assert!(p.x.is_finite() && p.y.is_finite());
    assert!((p.x - 1.0).abs() < 1e-12);
    assert!((p.y - 1.5).abs() < 1e-12);
}

#[test]
fn projection_is_one_to_one_with_mesh_points() {
    let mesh = revolve(&generate(&ShapeParameters::default()), 9).expect("revolve should succeed");
    let camera = CameraState {
        angle_y: -160.0,
        perspective_distance: mesh.perspective_distance(),
        ..CameraState::default()
    };
    assert_eq!(project(&mesh, &camera).len(), 13 * 9);
}
