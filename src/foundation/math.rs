/// Decode an IEEE 754 binary16 value into `f32`.
///
/// Handles signed zero, subnormals, infinities and NaN.
pub(crate) fn f16_to_f32(half: u16) -> f32 {
    let sign = u32::from((half >> 15) & 1);
    let exponent = u32::from((half >> 10) & 0x1f);
    let mantissa = u32::from(half & 0x3ff);

    if exponent == 0 {
        if mantissa == 0 {
            return f32::from_bits(sign << 31);
        }
        // Subnormal: shift until the hidden bit appears.
        let mut e = 0i32;
        let mut m = mantissa;
        while (m & 0x400) == 0 {
            m <<= 1;
            e -= 1;
        }
        m &= 0x3ff;
        let f32_exp = (127 - 15 + 1 + e) as u32;
        f32::from_bits((sign << 31) | (f32_exp << 23) | (m << 13))
    } else if exponent == 31 {
        f32::from_bits((sign << 31) | (0xff << 23) | (mantissa << 13))
    } else {
        let f32_exp = exponent + 127 - 15;
        f32::from_bits((sign << 31) | (f32_exp << 23) | (mantissa << 13))
    }
}

/// Quantize a real sample to a byte.
///
/// The sample is clamped to `[0, 1]`; exactly `1.0` maps to 255, everything else to
/// `floor(v * 256)`. NaN maps to 0.
pub(crate) fn quantize_unit(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    let v = v.clamp(0.0, 1.0);
    if v == 1.0 {
        255
    } else {
        (v * 256.0).floor() as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
