use super::*;

#[test]
fn cross_follows_right_hand_rule() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vec3::Z);
    assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn normalized_rejects_short_vectors() {
    assert!(Vec3::new(0.0, 0.0, 1e-6).normalized(1e-4).is_none());
    let n = Vec3::new(3.0, 0.0, 4.0).normalized(1e-4).unwrap();
    assert!((n.length() - 1.0).abs() < 1e-12);
    assert!((n.x - 0.6).abs() < 1e-12);
}

#[test]
fn rgb8_packs_opaque_argb() {
    let c = Rgb8::new(0x12, 0x34, 0x56);
    assert_eq!(c.to_argb(), 0xFF12_3456);
    assert_eq!(c.to_hex(), "#123456");
    assert_eq!(Rgb8::BLACK.to_argb(), 0xFF00_0000);
}
