use super::super::*;
use std::f64::consts::PI;

fn end_to_end_params() -> ShapeParameters {
    ShapeParameters {
        length: 140.0,
        girth: 140.0 * PI,
        curve: 0.0,
        base_angle: 0.0,
        glans_angle: 0.0,
        shaft_expansion: 100.0,
        glans_expansion: 100.0,
        reserved: [0.0; 3],
    }
}

/// Straight tube of radius 1 along +x whose pairing flips at `flipped`.
fn tube_with_flip(flipped: usize) -> ControlPolygon {
    let mut points = [Point2::ORIGIN; CONTROL_POINT_COUNT];
    for station in 0..STATION_COUNT {
        let x = station as f64;
        let (top, bottom) = if station == flipped { (1.0, -1.0) } else { (-1.0, 1.0) };
        points[station] = Point2::new(x, top);
        points[CONTROL_POINT_COUNT - 1 - station] = Point2::new(x, bottom);
    }
    ControlPolygon::new(points)
}

#[test]
fn end_to_end_base_radius_is_half_diameter() {
    let polygon = generate(&end_to_end_params());
    let (mesh, diag) = revolve_with_options(&polygon, RevolveOptions::default())
        .expect("revolve should succeed");

    assert_eq!(mesh.slices(), 12);
    assert_eq!(mesh.points().len(), 13 * 12);
    assert_eq!(diag.point_count, 13 * 12);
    assert!((mesh.radius_vector(0).length() - 70.0).abs() < 1e-9);

    let center = mesh.station_center(0);
    for p in mesh.ring(0) {
        let d = Point3::new(center.x, center.y, 0.0).distance(*p);
        assert!((d - 70.0).abs() < 1e-9);
    }
}

#[test]
fn tip_station_collapses_to_single_point() {
    let mesh = revolve(&generate(&end_to_end_params()), 12).expect("revolve should succeed");
    let (_, diag) = revolve_with_options(&generate(&end_to_end_params()), RevolveOptions::default())
        .expect("revolve should succeed");

    let tip = mesh.ring(RINKO);
    assert!(tip.iter().all(|p| *p == tip[0]));
    assert_eq!(tip[0].z, 0.0);
    assert!(diag.collapsed_stations.contains(&RINKO));
}

#[test]
fn ring_points_are_equidistant_from_station_center() {
    let polygon = generate(&ShapeParameters::default());
    let mesh = revolve(&polygon, 16).expect("revolve should succeed");

    for station in 0..STATION_COUNT {
        let radius = mesh.radius_vector(station).length();
        if radius < Tolerance::STATION_RADIUS.eps {
            continue;
        }
        let c = mesh.station_center(station);
        let center = Point3::new(c.x, c.y, 0.0);
        for p in mesh.ring(station) {
            assert!(
                (center.distance(*p) - radius).abs() < 1e-9,
                "station {station} off radius"
            );
        }
    }
}

#[test]
fn slice_index_wraps_around() {
    let mesh = revolve(&generate(&ShapeParameters::default()), 12).expect("revolve should succeed");
    for station in 0..STATION_COUNT {
        assert_eq!(mesh.point(station, 12), mesh.point(station, 0));
        assert_eq!(mesh.point(station, 25), mesh.point(station, 1));
    }
}

#[test]
fn full_turn_phase_reproduces_slice_zero() {
    let polygon = generate(&ShapeParameters::default());
    let mesh = revolve(&polygon, 12).expect("revolve should succeed");
    let (turned, _) = revolve_with_options(
        &polygon,
        RevolveOptions {
            phase_offset_deg: 270.0 + 360.0,
            ..RevolveOptions::default()
        },
    )
    .expect("revolve should succeed");

    let tol = Tolerance::new(1e-9);
    for station in 0..STATION_COUNT {
        assert!(tol.approx_eq_point3(mesh.point(station, 0), turned.point(station, 0)));
    }
}

#[test]
fn slice_zero_lies_on_lower_profile_edge() {
    let polygon = generate(&end_to_end_params());
    let mesh = revolve(&polygon, 12).expect("revolve should succeed");
    let lower = polygon.point(KUKI3);
    let p = mesh.point(0, 0);

    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(p, Point3::new(lower.x, lower.y, 0.0)));
}

#[test]
fn anti_twist_negates_flipped_pairing() {
    let polygon = tube_with_flip(5);
    let (mesh, diag) = revolve_with_options(&polygon, RevolveOptions::default())
        .expect("revolve should succeed");

    assert_eq!(diag.flipped_stations, vec![5]);
    assert!(!diag.is_clean());

    let raw = {
        let (top, bottom) = polygon.station_pair(5);
        top - top.midpoint(bottom)
    };
    assert!(raw.dot(mesh.radius_vector(4)) < 0.0);
    for station in 1..STATION_COUNT {
        let dot = mesh.radius_vector(station).dot(mesh.radius_vector(station - 1));
        assert!(dot >= 0.0, "stations {} and {station} still opposed", station - 1);
    }
    // the flipped ring is the same set of points as an unflipped one
    assert_eq!(mesh.ring(5)[0].y, mesh.ring(4)[0].y);
}

#[test]
fn collapsed_station_is_not_a_continuity_reference() {
    let mut polygon = *tube_with_flip(usize::MAX).points();
    // pinch station 4 to a point, then flip station 5
    polygon[4] = Point2::new(4.0, 0.0);
    polygon[CONTROL_POINT_COUNT - 1 - 4] = Point2::new(4.0, 0.0);
    polygon[5] = Point2::new(5.0, 1.0);
    polygon[CONTROL_POINT_COUNT - 1 - 5] = Point2::new(5.0, -1.0);

    let (mesh, diag) = revolve_with_options(&ControlPolygon::new(polygon), RevolveOptions::default())
        .expect("revolve should succeed");

    assert_eq!(diag.collapsed_stations, vec![4, RINKO]);
    assert_eq!(diag.flipped_stations, vec![5]);
    assert!(mesh.radius_vector(5).dot(mesh.radius_vector(3)) > 0.0);
}

#[test]
fn too_few_slices_is_rejected() {
    let polygon = generate(&ShapeParameters::default());
    assert_eq!(
        revolve(&polygon, 2),
        Err(RevolveError::TooFewSlices { slices: 2, min: MIN_SLICES })
    );
    assert!(revolve(&polygon, MIN_SLICES).is_ok());
}

#[test]
fn non_finite_polygon_is_rejected() {
    let mut points = *ControlPolygon::base().points();
    points[7] = Point2::new(f64::NAN, 0.0);
    assert_eq!(
        revolve(&ControlPolygon::new(points), 12),
        Err(RevolveError::NonFinitePoint)
    );
}

#[test]
fn perspective_distance_is_twice_largest_extent() {
    let mesh = revolve(&generate(&end_to_end_params()), 12).expect("revolve should succeed");
    let bbox = mesh.bbox().expect("mesh has points");
    assert!((mesh.perspective_distance() - 2.0 * bbox.max_extent()).abs() < 1e-12);

    let flat = ControlPolygon::new([Point2::ORIGIN; CONTROL_POINT_COUNT]);
    let point_mesh = revolve(&flat, 12).expect("revolve should succeed");
    assert_eq!(point_mesh.perspective_distance(), 2.0 * FALLBACK_EXTENT);
}

#[test]
fn lerp_between_meshes() {
    let polygon = generate(&ShapeParameters::default());
    let target = revolve(&polygon, 12).expect("revolve should succeed");
    let open = revolve(&generate_preset(ProfilePreset::Open, &ShapeParameters::default()), 12)
        .expect("revolve should succeed");

    let start = open.lerp(&target, 0.0).expect("same slice count");
    let end = open.lerp(&target, 1.0).expect("same slice count");
    let tol = Tolerance::new(1e-9);
    for (a, b) in start.points().iter().zip(open.points()) {
        assert!(tol.approx_eq_point3(*a, *b));
    }
    for (a, b) in end.points().iter().zip(target.points()) {
        assert!(tol.approx_eq_point3(*a, *b));
    }

    let coarse = revolve(&polygon, 6).expect("revolve should succeed");
    assert_eq!(
        target.lerp(&coarse, 0.5),
        Err(RevolveError::SliceMismatch { left: 12, right: 6 })
    );
}
