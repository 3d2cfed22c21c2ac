use crate::foundation::error::{LumaError, LumaResult};

/// Per-point resampling transform, applied in a fixed order: flip, tile, rotate, then
/// offset and scale into pixel space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Horizontal offset in frame widths, typically `[-1, 1]`.
    pub offset_u: f64,
    /// Vertical offset in frame heights, typically `[-1, 1]`.
    pub offset_v: f64,
    /// Horizontal scale, typically `[0, 2]`.
    pub width_scale: f64,
    /// Vertical scale, typically `[0, 2]`.
    pub height_scale: f64,
    /// Rotation about the UV center as a fraction of a full turn, `[0, 1]`.
    pub rotate: f64,
    /// Horizontal repeat count, `>= 1`.
    pub tile_x: u32,
    /// Vertical repeat count, `>= 1`.
    pub tile_y: u32,
    /// Mirror U.
    pub flip_horizontal: bool,
    /// Mirror V.
    pub flip_vertical: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            offset_u: 0.0,
            offset_v: 0.0,
            width_scale: 1.0,
            height_scale: 1.0,
            rotate: 0.0,
            tile_x: 1,
            tile_y: 1,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl TransformConfig {
    /// Reject zero tile counts and non-finite values.
    pub fn validate(&self) -> LumaResult<()> {
        if self.tile_x == 0 || self.tile_y == 0 {
            return Err(LumaError::validation("tile_x/tile_y must be >= 1"));
        }
        let reals = [
            ("offset_u", self.offset_u),
            ("offset_v", self.offset_v),
            ("width_scale", self.width_scale),
            ("height_scale", self.height_scale),
            ("rotate", self.rotate),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                return Err(LumaError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/transform.rs"]
mod tests;
