use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{LumaError, LumaResult};
use crate::receive::frame::WIRE_BYTES_PER_PIXEL;
use crate::source::wire::RawVideoFrame;

/// Encode an image as a packed BGRX wire frame with an opaque padding byte.
pub fn bgrx_from_image(img: &image::DynamicImage) -> LumaResult<RawVideoFrame> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(LumaError::validation(format!(
                "image size {width}x{height} cannot be sent as a video frame"
            )));
        }
    };

    let mut data = Vec::with_capacity(rgb.as_raw().len() / 3 * WIRE_BYTES_PER_PIXEL);
    for px in rgb.pixels() {
        let [r, g, b] = px.0;
        data.extend_from_slice(&[b, g, r, 0xFF]);
    }
    Ok(RawVideoFrame::packed(w, h, data))
}

/// Decode an image file into a wire frame.
pub fn load_still(path: impl AsRef<Path>) -> LumaResult<RawVideoFrame> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("decode image {}", path.display()))?;
    bgrx_from_image(&img)
}

#[cfg(test)]
#[path = "../../tests/unit/backend/still.rs"]
mod tests;
