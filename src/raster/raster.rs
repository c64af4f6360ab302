use crate::foundation::core::Dimensions;
use crate::raster::format::{ChannelPacking, PixelFormat};

/// A 2D grid of pixel samples for one instant in time.
///
/// Samples are stored row-major and tightly packed: pixel `(x, y)` starts at byte
/// `(y * width + x) * pixel_stride()`. Multi-byte samples are little-endian.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    format: PixelFormat,
    packing: ChannelPacking,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap raw sample bytes. Use [`Raster::is_valid`] to check the buffer is consistent.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        packing: ChannelPacking,
        data: Vec<u8>,
    ) -> Self {
        Self {
            width,
            height,
            format,
            packing,
            data,
        }
    }

    /// A 0x0 placeholder raster that owns no sample storage.
    pub fn empty() -> Self {
        Self::new(0, 0, PixelFormat::Float32, ChannelPacking::Unknown, Vec::new())
    }

    /// Build a single-precision raster from samples in row-major order.
    pub fn from_f32(width: u32, height: u32, packing: ChannelPacking, samples: &[f32]) -> Self {
        let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::new(width, height, PixelFormat::Float32, packing, data)
    }

    /// Build a half-precision raster from raw binary16 bit patterns in row-major order.
    pub fn from_f16_bits(width: u32, height: u32, packing: ChannelPacking, bits: &[u16]) -> Self {
        let data = bits.iter().flat_map(|b| b.to_le_bytes()).collect();
        Self::new(width, height, PixelFormat::Float16, packing, data)
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height together.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Sample storage encoding.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Channel packing.
    pub fn packing(&self) -> ChannelPacking {
        self.packing
    }

    /// Bytes per pixel.
    pub fn pixel_stride(&self) -> usize {
        self.packing.channel_count() * self.format.sample_size()
    }

    /// Raw sample bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Return `true` when the packing is recognized and the buffer covers every pixel exactly.
    pub fn is_valid(&self) -> bool {
        let stride = self.pixel_stride();
        if stride == 0 {
            return false;
        }
        self.dimensions()
            .pixel_count()
            .checked_mul(stride)
            .is_some_and(|len| len == self.data.len())
    }

    /// Raw bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.pixel_stride();
        let start = (y as usize * self.width as usize + x as usize) * stride;
        self.data.get(start..start + stride)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/raster.rs"]
mod tests;
