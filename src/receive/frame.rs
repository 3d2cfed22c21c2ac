use image::RgbImage;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{LumaError, LumaResult};
use crate::source::wire::RawVideoFrame;

/// Bytes per pixel on the wire (B, G, R, padding/alpha).
pub const WIRE_BYTES_PER_PIXEL: usize = 4;

/// Largest decoded RGB buffer accepted from a single frame (16384 x 16384 pixels).
pub const MAX_DECODED_BYTES: usize = 16_384 * 16_384 * 3;

/// A decoded, immutable RGB video frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an already decoded image.
    pub fn from_image(image: RgbImage) -> LumaResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(LumaError::decode("frame dimensions must be non-zero"));
        }
        Ok(Self { image })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb8> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.image.get_pixel_checked(x, y).map(|px| Rgb8::from(*px))
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Decode a BGRX wire frame into RGB, dropping the fourth byte of every pixel.
///
/// Rows shorter than the declared size (truncated payloads) decode what is present and leave
/// the remaining pixels black.
pub fn decode_bgrx(raw: &RawVideoFrame) -> LumaResult<Frame> {
    if raw.width <= 0 || raw.height <= 0 {
        return Err(LumaError::decode(format!(
            "invalid frame size {}x{}",
            raw.width, raw.height
        )));
    }
    if raw.data.is_empty() {
        return Err(LumaError::decode("frame has no pixel data"));
    }

    let width = raw.width as u32;
    let height = raw.height as u32;
    let decoded_bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .filter(|&n| n <= MAX_DECODED_BYTES)
        .ok_or_else(|| {
            LumaError::decode(format!(
                "frame size {width}x{height} exceeds the decode limit ({} bytes of payload)",
                raw.data.len()
            ))
        })?;
    let row_bytes = width as usize * WIRE_BYTES_PER_PIXEL;
    let stride = if raw.line_stride == 0 {
        row_bytes
    } else if raw.line_stride < row_bytes {
        return Err(LumaError::decode(format!(
            "line stride {} is smaller than a {width}-pixel row",
            raw.line_stride
        )));
    } else {
        raw.line_stride
    };

    let mut buffer = vec![0u8; decoded_bytes];
    for (out, row) in buffer
        .chunks_exact_mut(width as usize * 3)
        .zip(raw.data.chunks(stride))
    {
        let row = &row[..row.len().min(row_bytes)];
        for (dst, px) in out
            .chunks_exact_mut(3)
            .zip(row.chunks_exact(WIRE_BYTES_PER_PIXEL))
        {
            dst.copy_from_slice(&[px[2], px[1], px[0]]);
        }
    }
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| LumaError::decode("decoded buffer does not match the frame size"))?;
    Ok(Frame { image })
}

#[cfg(test)]
#[path = "../../tests/unit/receive/frame.rs"]
mod tests;
