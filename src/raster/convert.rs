use crate::foundation::error::{CopGifError, CopGifResult};
use crate::foundation::math::{f16_to_f32, quantize_unit};
use crate::raster::format::{ChannelPacking, PixelFormat, channel_count};

/// Convert one source pixel to straight RGBA8.
///
/// Channels present in the source are clamped to `[0, 1]` and quantized with the
/// `floor(v * 256)` law (exactly `1.0` saturates to 255). Absent color channels become 0 and an
/// absent alpha channel becomes 255.
///
/// Fails on an unrecognized packing, a non-float format, or a pixel slice that is too short.
pub fn convert_pixel(
    raw: &[u8],
    packing: ChannelPacking,
    format: PixelFormat,
) -> CopGifResult<[u8; 4]> {
    let n = channel_count(packing);
    if n == 0 {
        return Err(CopGifError::invalid_raster(format!(
            "cannot convert pixel with unrecognized channel packing {packing:?}"
        )));
    }
    if !format.is_floating_point() {
        return Err(CopGifError::unsupported_format(format!(
            "{format:?} is not a floating-point sample encoding"
        )));
    }
    let size = format.sample_size();
    if raw.len() < n * size {
        return Err(CopGifError::invalid_raster(format!(
            "pixel holds {} bytes, {packing:?} {format:?} needs {}",
            raw.len(),
            n * size
        )));
    }

    let mut out = [0u8; 4];
    for (c, dst) in out.iter_mut().enumerate() {
        *dst = if c < n {
            quantize_unit(read_sample(&raw[c * size..(c + 1) * size], format))
        } else if c == 3 {
            255
        } else {
            0
        };
    }
    Ok(out)
}

fn read_sample(bytes: &[u8], format: PixelFormat) -> f32 {
    match (format, bytes) {
        (PixelFormat::Float16, &[b0, b1]) => f16_to_f32(u16::from_le_bytes([b0, b1])),
        (PixelFormat::Float32, &[b0, b1, b2, b3]) => f32::from_le_bytes([b0, b1, b2, b3]),
        // Unreachable after the format and length checks in `convert_pixel`.
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/convert.rs"]
mod tests;
