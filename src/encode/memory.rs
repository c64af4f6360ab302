use crate::encode::encoder::{AnimatedEncoder, EncoderConfig};
use crate::foundation::error::{CopGifError, CopGifResult};

/// One recorded encoder call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderCall {
    /// `open` with the configuration it received.
    Open(EncoderConfig),
    /// `write_frame` with its arguments.
    WriteFrame {
        /// Frame bytes as received.
        rgba: Vec<u8>,
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Delay in 1/100 s.
        delay_ticks: u16,
    },
    /// `close`.
    Close,
}

/// Step at which an [`InMemoryEncoder`] should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    /// Fail in `open`.
    Open,
    /// Fail on the n-th (0-based) `write_frame`.
    WriteFrame(usize),
    /// Fail in `close`.
    Close,
}

/// Encoder that records every call instead of producing a file.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    calls: Vec<EncoderCall>,
    fail_at: Option<FailPoint>,
}

/// Handle issued by [`InMemoryEncoder::open`].
#[derive(Debug)]
pub struct MemoryHandle {
    written: usize,
}

impl InMemoryEncoder {
    /// Create a recording encoder that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording encoder that fails at `point`.
    pub fn failing_at(point: FailPoint) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(point),
        }
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> &[EncoderCall] {
        &self.calls
    }

    /// Frames written so far.
    pub fn frames(&self) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EncoderCall::WriteFrame { rgba, .. } => Some(rgba.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl AnimatedEncoder for InMemoryEncoder {
    type Handle = MemoryHandle;

    fn open(&mut self, cfg: &EncoderConfig) -> CopGifResult<MemoryHandle> {
        self.calls.push(EncoderCall::Open(cfg.clone()));
        if self.fail_at == Some(FailPoint::Open) {
            return Err(CopGifError::encoder(format!(
                "cannot open '{}'",
                cfg.out_path.display()
            )));
        }
        Ok(MemoryHandle { written: 0 })
    }

    fn write_frame(
        &mut self,
        handle: &mut MemoryHandle,
        rgba: &[u8],
        width: u32,
        height: u32,
        delay_ticks: u16,
    ) -> CopGifResult<()> {
        self.calls.push(EncoderCall::WriteFrame {
            rgba: rgba.to_vec(),
            width,
            height,
            delay_ticks,
        });
        if self.fail_at == Some(FailPoint::WriteFrame(handle.written)) {
            return Err(CopGifError::encoder(format!(
                "cannot write frame {}",
                handle.written
            )));
        }
        handle.written += 1;
        Ok(())
    }

    fn close(&mut self, _handle: MemoryHandle) -> CopGifResult<()> {
        self.calls.push(EncoderCall::Close);
        if self.fail_at == Some(FailPoint::Close) {
            return Err(CopGifError::encoder("cannot finalize container"));
        }
        Ok(())
    }
}
