use rayon::prelude::*;

use crate::foundation::core::Vec3;
use crate::foundation::math::{GEOMETRY_EPSILON, plane_rotation, rotate_about_axis};
use crate::geometry::point::GeometryPoint;

// Below this many points the rayon fan-out costs more than it saves.
const PARALLEL_MIN_POINTS: usize = 4096;

/// A geometry point paired with its normalized texture coordinate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct UvPoint {
    /// Output color index of the source point.
    pub index: usize,
    /// Horizontal coordinate in `[0, 1]`.
    pub u: f64,
    /// Vertical coordinate in `[0, 1]`.
    pub v: f64,
}

/// Which degenerate-input fallbacks were taken while building a [`UvTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct UvFallbacks {
    /// The three plane-fit samples were collinear (or coincident); X/Y were used unrotated.
    pub degenerate_plane: bool,
    /// All points share one U value; U was set to 0 instead of dividing by zero.
    pub degenerate_u_range: bool,
    /// All points share one V value; V was set to 0 instead of dividing by zero.
    pub degenerate_v_range: bool,
}

impl UvFallbacks {
    /// Return `true` when any fallback path was taken.
    pub fn any(self) -> bool {
        self.degenerate_plane || self.degenerate_u_range || self.degenerate_v_range
    }
}

/// Cached UV parametrization of a point layout.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct UvTable {
    points: Vec<UvPoint>,
    fallbacks: UvFallbacks,
}

impl UvTable {
    /// Wrap precomputed UV points; no normalization or fallback detection is applied.
    pub fn from_points(points: Vec<UvPoint>) -> Self {
        Self {
            points,
            fallbacks: UvFallbacks::default(),
        }
    }

    /// UV points in geometry order.
    pub fn points(&self) -> &[UvPoint] {
        &self.points
    }

    /// Number of points in the table.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when the table has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Degenerate-input fallbacks taken while computing the table.
    pub fn fallbacks(&self) -> UvFallbacks {
        self.fallbacks
    }
}

/// Project `points` onto their best-fit plane and normalize the result into the unit square.
///
/// The plane is fit through the first, middle and last point. Each axis is normalized by its
/// own range, so both axes span `[0, 1]` and the layout's aspect ratio is not kept.
#[tracing::instrument(skip(points), fields(points = points.len()))]
pub fn compute_uvs(points: &[GeometryPoint]) -> UvTable {
    let mut fallbacks = UvFallbacks::default();
    if points.is_empty() {
        return UvTable {
            points: Vec::new(),
            fallbacks,
        };
    }

    let rotation = match plane_normal(points) {
        Some(normal) => plane_rotation(normal),
        None => {
            tracing::debug!("plane fit is degenerate; using unrotated x/y");
            fallbacks.degenerate_plane = true;
            None
        }
    };

    let project = |p: &GeometryPoint| {
        let pos = match rotation {
            Some((axis, angle)) => rotate_about_axis(p.position(), axis, angle),
            None => p.position(),
        };
        UvPoint {
            index: p.index,
            u: pos.x,
            v: pos.y,
        }
    };
    let mut uvs: Vec<UvPoint> = if points.len() >= PARALLEL_MIN_POINTS {
        points.par_iter().map(project).collect()
    } else {
        points.iter().map(project).collect()
    };

    renormalize(&mut uvs, &mut fallbacks);
    UvTable {
        points: uvs,
        fallbacks,
    }
}

/// Unit normal of the plane through the first, middle and last point.
fn plane_normal(points: &[GeometryPoint]) -> Option<Vec3> {
    let p0 = points[0].position();
    let p1 = points[points.len() / 2].position();
    let p2 = points[points.len() - 1].position();
    (p1 - p0).cross(p2 - p0).normalized(GEOMETRY_EPSILON)
}

fn renormalize(uvs: &mut [UvPoint], fallbacks: &mut UvFallbacks) {
    let (mut u_min, mut u_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for uv in uvs.iter() {
        u_min = u_min.min(uv.u);
        u_max = u_max.max(uv.u);
        v_min = v_min.min(uv.v);
        v_max = v_max.max(uv.v);
    }

    let u_range = u_max - u_min;
    let v_range = v_max - v_min;
    let degenerate = |range: f64| !range.is_finite() || range <= f64::EPSILON;
    fallbacks.degenerate_u_range = degenerate(u_range);
    fallbacks.degenerate_v_range = degenerate(v_range);
    if fallbacks.degenerate_u_range || fallbacks.degenerate_v_range {
        tracing::debug!(u_range, v_range, "zero-width uv axis; pinning it to 0");
    }

    for uv in uvs.iter_mut() {
        uv.u = if fallbacks.degenerate_u_range {
            0.0
        } else {
            (uv.u - u_min) / u_range
        };
        uv.v = if fallbacks.degenerate_v_range {
            0.0
        } else {
            (uv.v - v_min) / v_range
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/uv.rs"]
mod tests;
