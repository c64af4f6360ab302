use crate::foundation::core::Dimensions;
use crate::foundation::error::{CopGifError, CopGifResult};
use crate::raster::convert::convert_pixel;
use crate::raster::raster::Raster;

/// One converted frame of straight RGBA8 pixels.
///
/// Pixels are stored in capture scan order: column by column (outer `x`, inner `y`), so the
/// quadruple for `(x, y)` starts at byte `(x * height + y) * 4`. Use [`Frame::to_row_major`] for
/// the conventional row-major layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    dims: Dimensions,
    data: Vec<u8>,
}

impl Frame {
    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// RGBA8 bytes in capture scan order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGBA8 quadruple at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = (x as usize * self.dims.height as usize + y as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy the pixels into a row-major RGBA8 buffer.
    pub fn to_row_major(&self) -> Vec<u8> {
        scan_order_to_row_major(&self.data, self.dims)
    }
}

/// Ordered frames plus the dimensions every frame shares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSequence {
    /// Locked width (0 until the first frame is accepted).
    pub width: u32,
    /// Locked height (0 until the first frame is accepted).
    pub height: u32,
    /// Frames in capture order.
    pub frames: Vec<Frame>,
}

impl FrameSequence {
    /// Locked dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when no frame has been accepted.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Converts rasters into [`Frame`]s and collects them in capture order.
///
/// The first accepted raster locks the sequence dimensions; every later raster must match them.
/// A rejected raster never changes the accumulated state.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    seq: FrameSequence,
}

impl FrameAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset dimensions and drop any frames from a previous session.
    pub fn begin_sequence(&mut self) {
        self.seq = FrameSequence::default();
    }

    /// Validate and convert `raster`, then append it as the next frame.
    pub fn accept_frame(&mut self, raster: &Raster) -> CopGifResult<()> {
        if !raster.is_valid() {
            return Err(CopGifError::invalid_raster(format!(
                "{}x{} {:?} {:?} raster with {} data bytes",
                raster.width(),
                raster.height(),
                raster.format(),
                raster.packing(),
                raster.data().len()
            )));
        }

        let dims = raster.dimensions();
        if self.seq.is_empty() {
            if dims.is_degenerate() {
                return Err(CopGifError::DegenerateDimensions(dims));
            }
        } else if dims != self.seq.dimensions() {
            return Err(CopGifError::DimensionMismatch {
                expected: self.seq.dimensions(),
                actual: dims,
            });
        }

        if !raster.format().is_floating_point() {
            return Err(CopGifError::unsupported_format(format!(
                "raster stores {:?} samples; only Float16 and Float32 are supported",
                raster.format()
            )));
        }

        let frame = convert_raster(raster)?;
        self.seq.width = dims.width;
        self.seq.height = dims.height;
        self.seq.frames.push(frame);
        tracing::debug!(
            frame = self.seq.frames.len(),
            width = dims.width,
            height = dims.height,
            "accepted frame"
        );
        Ok(())
    }

    /// Borrow the sequence accumulated so far.
    pub fn sequence(&self) -> &FrameSequence {
        &self.seq
    }

    /// Hand over the accumulated sequence, leaving the accumulator empty.
    pub fn finish(&mut self) -> FrameSequence {
        std::mem::take(&mut self.seq)
    }
}

/// Reorder RGBA8 quadruples from capture scan order (outer `x`, inner `y`) to row-major.
pub(crate) fn scan_order_to_row_major(src: &[u8], dims: Dimensions) -> Vec<u8> {
    let (w, h) = (dims.width as usize, dims.height as usize);
    let mut out = vec![0u8; src.len()];
    if h == 0 {
        return out;
    }
    for (i, px) in src.chunks_exact(4).enumerate() {
        let (x, y) = (i / h, i % h);
        let dst = (y * w + x) * 4;
        if let Some(d) = out.get_mut(dst..dst + 4) {
            d.copy_from_slice(px);
        }
    }
    out
}

fn convert_raster(raster: &Raster) -> CopGifResult<Frame> {
    let dims = raster.dimensions();
    let mut data = Vec::with_capacity(dims.rgba8_len());
    for x in 0..dims.width {
        for y in 0..dims.height {
            let raw = raster.pixel(x, y).ok_or_else(|| {
                CopGifError::invalid_raster(format!("pixel ({x}, {y}) is out of bounds"))
            })?;
            data.extend_from_slice(&convert_pixel(raw, raster.packing(), raster.format())?);
        }
    }
    Ok(Frame { dims, data })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/accumulator.rs"]
mod tests;
