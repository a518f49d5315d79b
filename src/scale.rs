use image::{RgbaImage, imageops};

use crate::error::GifloopResult;

/// Resolve the output dimensions from the first clip's native dimensions.
///
/// An explicit width override wins over the preset scale factor; height is
/// scaled proportionally and rounded to the nearest pixel. Every clip in a
/// run is resized to this one size.
pub fn target_size(
    reference: (u32, u32),
    width_override: Option<u32>,
    scale: f64,
) -> GifloopResult<(u32, u32)> {
    let (ref_w, ref_h) = reference;
    if ref_w == 0 || ref_h == 0 {
        return Err(anyhow::anyhow!("reference clip has zero dimensions").into());
    }

    let (w, h) = match width_override {
        Some(w) => {
            if w == 0 {
                return Err(anyhow::anyhow!("--width must be non-zero").into());
            }
            let h = (f64::from(ref_h) * f64::from(w) / f64::from(ref_w)).round() as u32;
            (w, h)
        }
        None => {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(anyhow::anyhow!("scale factor must be positive").into());
            }
            let w = (f64::from(ref_w) * scale).round() as u32;
            let h = (f64::from(ref_h) * scale).round() as u32;
            (w, h)
        }
    };

    Ok((w.max(1), h.max(1)))
}

/// Resize one raw RGBA8 frame. Direct scale, aspect distortion allowed.
pub fn resize_rgba8(
    data: Vec<u8>,
    from: (u32, u32),
    to: (u32, u32),
) -> GifloopResult<Vec<u8>> {
    if from == to {
        return Ok(data);
    }

    let img = RgbaImage::from_raw(from.0, from.1, data)
        .ok_or_else(|| anyhow::anyhow!("frame buffer does not match {}x{} rgba8", from.0, from.1))?;
    let resized = imageops::resize(&img, to.0, to.1, imageops::FilterType::Triangle);
    Ok(resized.into_raw())
}
