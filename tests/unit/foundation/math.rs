use super::*;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn quarter_turn_about_z() {
    let p = Vec3::new(1.0, 0.0, 0.0);
    let r = rotate_about_axis(p, Vec3::Z, std::f64::consts::FRAC_PI_2);
    assert!(approx(r, Vec3::new(0.0, 1.0, 0.0)), "got {r:?}");
}

#[test]
fn rotation_preserves_length() {
    let axis = Vec3::new(1.0, 1.0, 0.0).normalized(1e-9).unwrap();
    let p = Vec3::new(0.3, -2.0, 5.0);
    let r = rotate_about_axis(p, axis, 1.234);
    assert!((r.length() - p.length()).abs() < 1e-9);
}

#[test]
fn vertical_plane_lies_flat_after_rotation() {
    // Points in the YZ plane have normal +X.
    let (axis, angle) = plane_rotation(Vec3::new(1.0, 0.0, 0.0)).unwrap();
    assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!(approx(axis, Vec3::new(0.0, 1.0, 0.0)));

    for p in [
        Vec3::new(0.0, 1.0, 2.0),
        Vec3::new(0.0, -3.0, 0.5),
        Vec3::new(0.0, 0.0, -1.0),
    ] {
        let r = rotate_about_axis(p, axis, angle);
        assert!(r.z.abs() < 1e-9, "z not flattened for {p:?}: {r:?}");
        assert!((r.x - p.z).abs() < 1e-9);
        assert!((r.y - p.y).abs() < 1e-9);
    }
}

#[test]
fn plane_rotation_skips_parallel_normals() {
    assert!(plane_rotation(Vec3::Z).is_none());
    assert!(plane_rotation(Vec3::new(0.0, 0.0, -1.0)).is_none());
}
