use crate::capture::accumulator::scan_order_to_row_major;
use crate::encode::encoder::{AnimatedEncoder, EncoderConfig, LoopCount};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{CopGifError, CopGifResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for [`GifFileEncoder`].
#[derive(Clone, Copy, Debug)]
pub struct GifEncoderOpts {
    /// NeuQuant speed, 1 (best) to 30 (fastest).
    pub speed: i32,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for GifEncoderOpts {
    fn default() -> Self {
        Self {
            speed: 10,
            overwrite: true,
        }
    }
}

/// Open GIF output.
pub struct GifHandle {
    out_path: PathBuf,
    stream: GifStream<File>,
}

/// Frame-by-frame GIF writer over any byte sink.
///
/// Output is buffered; nothing is known to be on the sink until [`GifStream::finish`] returns.
struct GifStream<W: Write> {
    encoder: gif::Encoder<BufWriter<W>>,
    width: u16,
    height: u16,
    speed: i32,
    frames: usize,
}

impl<W: Write> GifStream<W> {
    fn new(sink: W, width: u16, height: u16, speed: i32, repeat: gif::Repeat) -> CopGifResult<Self> {
        let mut encoder = gif::Encoder::new(BufWriter::new(sink), width, height, &[])
            .map_err(|e| CopGifError::encoder(format!("cannot write gif header: {e}")))?;
        encoder
            .set_repeat(repeat)
            .map_err(|e| CopGifError::encoder(format!("cannot set gif repeat: {e}")))?;
        Ok(Self {
            encoder,
            width,
            height,
            speed,
            frames: 0,
        })
    }

    /// Quantize and append one row-major RGBA8 frame.
    fn push(&mut self, mut rgba: Vec<u8>, delay_ticks: u16) -> CopGifResult<()> {
        let expected = usize::from(self.width) * usize::from(self.height) * 4;
        if rgba.len() != expected {
            return Err(CopGifError::encoder(format!(
                "frame holds {} bytes, expected {expected}",
                rgba.len()
            )));
        }
        let mut frame = gif::Frame::from_rgba_speed(self.width, self.height, &mut rgba, self.speed);
        frame.delay = delay_ticks;
        self.encoder.write_frame(&frame).map_err(|e| {
            CopGifError::encoder(format!("cannot write frame {}: {e}", self.frames))
        })?;
        self.frames += 1;
        Ok(())
    }

    /// Write the trailer, flush every buffered byte and hand back the sink.
    fn finish(self) -> CopGifResult<W> {
        let buffered = self
            .encoder
            .into_inner()
            .map_err(|e| CopGifError::encoder(format!("cannot write gif trailer: {e}")))?;
        let mut sink = buffered.into_inner().map_err(|e| {
            CopGifError::encoder(format!("cannot flush gif output: {}", e.error()))
        })?;
        sink.flush()
            .map_err(|e| CopGifError::encoder(format!("cannot flush gif output: {e}")))?;
        Ok(sink)
    }
}

/// Writes animated GIF files with the `gif` codec.
#[derive(Clone, Debug, Default)]
pub struct GifFileEncoder {
    opts: GifEncoderOpts,
}

impl GifFileEncoder {
    /// Create an encoder with the given options.
    pub fn new(opts: GifEncoderOpts) -> Self {
        Self { opts }
    }
}

impl AnimatedEncoder for GifFileEncoder {
    type Handle = GifHandle;

    fn open(&mut self, cfg: &EncoderConfig) -> CopGifResult<GifHandle> {
        let (width, height) = match (u16::try_from(cfg.width), u16::try_from(cfg.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(CopGifError::encoder(format!(
                    "gif dimensions must be within 1..={}, got {}x{}",
                    u16::MAX,
                    cfg.width,
                    cfg.height
                )));
            }
        };
        if !(1..=30).contains(&self.opts.speed) {
            return Err(CopGifError::encoder(format!(
                "gif speed must be within 1..=30, got {}",
                self.opts.speed
            )));
        }

        ensure_parent_dir(&cfg.out_path)?;
        if !self.opts.overwrite && cfg.out_path.exists() {
            return Err(CopGifError::encoder(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        let file = File::create(&cfg.out_path).map_err(|e| {
            CopGifError::encoder(format!(
                "cannot create output '{}': {e}",
                cfg.out_path.display()
            ))
        })?;
        let repeat = match cfg.loop_count {
            LoopCount::Infinite => gif::Repeat::Infinite,
            LoopCount::Finite(n) => gif::Repeat::Finite(n),
        };
        let stream = GifStream::new(file, width, height, self.opts.speed, repeat)?;

        Ok(GifHandle {
            out_path: cfg.out_path.clone(),
            stream,
        })
    }

    fn write_frame(
        &mut self,
        handle: &mut GifHandle,
        rgba: &[u8],
        width: u32,
        height: u32,
        delay_ticks: u16,
    ) -> CopGifResult<()> {
        let stream = &mut handle.stream;
        if width != u32::from(stream.width) || height != u32::from(stream.height) {
            return Err(CopGifError::encoder(format!(
                "frame size mismatch: got {width}x{height}, expected {}x{}",
                stream.width, stream.height
            )));
        }
        let row_major = scan_order_to_row_major(rgba, Dimensions::new(width, height));
        stream.push(row_major, delay_ticks)
    }

    fn close(&mut self, handle: GifHandle) -> CopGifResult<()> {
        let GifHandle { out_path, stream } = handle;
        let frames = stream.frames;

        let file = stream.finish()?;
        file.sync_all().map_err(|e| {
            CopGifError::encoder(format!("cannot sync '{}': {e}", out_path.display()))
        })?;
        let len = file
            .metadata()
            .map_err(|e| {
                CopGifError::encoder(format!("cannot stat '{}': {e}", out_path.display()))
            })?
            .len();
        if len == 0 {
            return Err(CopGifError::encoder(format!(
                "'{}' is empty after finalizing",
                out_path.display()
            )));
        }
        tracing::info!(path = %out_path.display(), frames, bytes = len, "wrote gif");
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> CopGifResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CopGifError::encoder(format!(
                "cannot create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
