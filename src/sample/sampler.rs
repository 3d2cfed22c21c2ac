use std::f64::consts::TAU;

use crate::foundation::core::{Affine, Point, Rgb8};
use crate::geometry::uv::UvTable;
use crate::receive::frame::Frame;
use crate::sample::transform::TransformConfig;

/// Bias subtracted before wrapping a tiled coordinate so `u = 1/n` boundaries stay on the
/// lower tile.
pub const TILE_EPSILON: f64 = 0.01;

const UV_CENTER: Point = Point::new(0.5, 0.5);

/// Outcome of one sampling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SampleStats {
    /// Colors written to the output buffer, including black for out-of-frame points.
    pub written: usize,
    /// Points whose pixel coordinate fell outside the frame.
    pub out_of_frame: usize,
    /// Points skipped because their index does not fit the output buffer.
    pub stale: usize,
}

impl SampleStats {
    /// Return `true` when the UV table no longer matches the output buffer.
    pub fn is_stale(self) -> bool {
        self.stale > 0
    }
}

/// Apply flip, tile and rotation to one UV coordinate.
pub fn transform_uv(u: f64, v: f64, cfg: &TransformConfig) -> Point {
    let mut u = if cfg.flip_horizontal { 1.0 - u } else { u };
    let mut v = if cfg.flip_vertical { 1.0 - v } else { v };

    if cfg.tile_x > 1 {
        u = (u * f64::from(cfg.tile_x) - TILE_EPSILON) % 1.0;
    }
    if cfg.tile_y > 1 {
        v = (v * f64::from(cfg.tile_y) - TILE_EPSILON) % 1.0;
    }

    let p = Point::new(u, v);
    if cfg.rotate > 0.0 {
        Affine::rotate_about(cfg.rotate * TAU, UV_CENTER) * p
    } else {
        p
    }
}

/// Nearest pixel along one axis, rounding half up.
fn to_pixel(coord: f64, offset: f64, scale: f64, extent: u32) -> Option<i64> {
    let px = ((offset + coord * scale) * f64::from(extent.saturating_sub(1)) + 0.5).floor();
    px.is_finite().then_some(px as i64)
}

/// Pixel coordinate a transformed UV point samples from.
pub fn pixel_for(uv: Point, cfg: &TransformConfig, frame: &Frame) -> Option<(i64, i64)> {
    let x = to_pixel(uv.x, cfg.offset_u, cfg.width_scale, frame.width())?;
    let y = to_pixel(uv.y, cfg.offset_v, cfg.height_scale, frame.height())?;
    Some((x, y))
}

/// Resample `frame` once for every point of `table`, writing into `colors[index]`.
///
/// Out-of-frame points get black. Points whose index is outside `colors` are counted as
/// stale and left untouched.
pub fn sample_into(
    frame: &Frame,
    table: &UvTable,
    cfg: &TransformConfig,
    colors: &mut [Rgb8],
) -> SampleStats {
    let mut stats = SampleStats::default();
    for uv in table.points() {
        let Some(slot) = colors.get_mut(uv.index) else {
            stats.stale += 1;
            continue;
        };
        let color = pixel_for(transform_uv(uv.u, uv.v, cfg), cfg, frame)
            .and_then(|(x, y)| frame.pixel(x, y));
        *slot = color.unwrap_or_else(|| {
            stats.out_of_frame += 1;
            Rgb8::BLACK
        });
        stats.written += 1;
    }
    if stats.stale > 0 {
        tracing::debug!(stale = stats.stale, "uv table does not fit the output buffer");
    }
    stats
}

#[cfg(test)]
#[path = "../../tests/unit/sample/sampler.rs"]
mod tests;
