use crate::foundation::core::Vec3;

/// Lengths and angles below this are treated as zero when fitting and rotating planes.
pub(crate) const GEOMETRY_EPSILON: f64 = 1e-4;

/// Rotate `p` around the unit vector `axis` by `angle` radians (Rodrigues' formula).
///
/// `axis` must already be normalized.
pub(crate) fn rotate_about_axis(p: Vec3, axis: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    let along = p.dot(axis);
    p * cos + axis.cross(p) * sin + axis * (along * (1.0 - cos))
}

/// Plane rotation as (unit axis, angle): `axis = Z × normal`, `angle = acos(Z · normal)`.
///
/// Returns `None` when the axis or the angle is too small to rotate by, which includes normals
/// already parallel to Z in either direction.
pub(crate) fn plane_rotation(normal: Vec3) -> Option<(Vec3, f64)> {
    let angle = Vec3::Z.dot(normal).clamp(-1.0, 1.0).acos();
    let axis = Vec3::Z.cross(normal).normalized(GEOMETRY_EPSILON)?;
    if angle <= GEOMETRY_EPSILON {
        return None;
    }
    Some((axis, angle))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
