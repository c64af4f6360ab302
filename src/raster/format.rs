/// Storage encoding of one raster sample.
///
/// Only [`PixelFormat::Float16`] and [`PixelFormat::Float32`] can be converted; the fixed-point
/// variants exist so sources can describe what they hold and be rejected cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// IEEE 754 half precision, little-endian.
    Float16,
    /// IEEE 754 single precision, little-endian.
    Float32,
    /// Unsigned 8-bit fixed point.
    Fixed8,
    /// Unsigned 16-bit fixed point.
    Fixed16,
    /// Unsigned 32-bit fixed point.
    Fixed32,
}

impl PixelFormat {
    /// Size of one sample in bytes.
    pub fn sample_size(self) -> usize {
        match self {
            PixelFormat::Fixed8 => 1,
            PixelFormat::Float16 | PixelFormat::Fixed16 => 2,
            PixelFormat::Float32 | PixelFormat::Fixed32 => 4,
        }
    }

    /// Return `true` for the floating-point encodings the converter accepts.
    pub fn is_floating_point(self) -> bool {
        is_floating_point(self)
    }
}

/// Count and arrangement of meaningful channels stored per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChannelPacking {
    /// One channel.
    Single,
    /// Two channels.
    Dual,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// A packing the pipeline does not recognize.
    Unknown,
}

impl ChannelPacking {
    /// Packing for `n` leading channels; anything outside `1..=4` is [`ChannelPacking::Unknown`].
    pub fn from_channel_count(n: usize) -> Self {
        match n {
            1 => ChannelPacking::Single,
            2 => ChannelPacking::Dual,
            3 => ChannelPacking::Rgb,
            4 => ChannelPacking::Rgba,
            _ => ChannelPacking::Unknown,
        }
    }

    /// Number of meaningful channels (0 for [`ChannelPacking::Unknown`]).
    pub fn channel_count(self) -> usize {
        channel_count(self)
    }
}

/// Number of meaningful channels for `packing`.
///
/// Returns 0 for an unrecognized packing; callers must not convert pixels in that case.
pub fn channel_count(packing: ChannelPacking) -> usize {
    match packing {
        ChannelPacking::Single => 1,
        ChannelPacking::Dual => 2,
        ChannelPacking::Rgb => 3,
        ChannelPacking::Rgba => 4,
        ChannelPacking::Unknown => 0,
    }
}

/// Return `true` only for half and single precision float storage.
pub fn is_floating_point(format: PixelFormat) -> bool {
    matches!(format, PixelFormat::Float16 | PixelFormat::Float32)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/format.rs"]
mod tests;
