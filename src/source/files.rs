use crate::foundation::error::{CopGifError, CopGifResult};
use crate::raster::format::ChannelPacking;
use crate::raster::raster::Raster;
use crate::source::provider::ImageSource;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// Image source backed by numbered image files on disk.
///
/// Paths are patterns relative to `root` in which `$F` expands to the frame number and `$F<n>`
/// to the frame number zero-padded to `n` digits (`render/beauty.$F4.png`). The frame for a time
/// is `round(time * fps) + frame_offset`; the default offset of 1 makes time 0 frame 1.
///
/// Supported planes:
/// - `C`: color, RGBA when the file has alpha and RGB otherwise
/// - `A`: alpha as a single channel (not found when the file has no alpha)
/// - `L`: luminance as a single channel
#[derive(Debug, Clone)]
pub struct FileSequenceSource {
    root: PathBuf,
    fps: f64,
    frame_offset: i64,
}

impl FileSequenceSource {
    /// Create a source rooted at `root`, sampling at `fps` frames per second.
    pub fn new(root: impl Into<PathBuf>, fps: f64) -> CopGifResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CopGifError::config(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        Ok(Self {
            root: root.into(),
            fps,
            frame_offset: 1,
        })
    }

    /// Override the frame number assigned to time 0.
    pub fn with_frame_offset(mut self, frame_offset: i64) -> Self {
        self.frame_offset = frame_offset;
        self
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frame number sampled at `time`.
    pub fn frame_at(&self, time: f64) -> i64 {
        (time * self.fps).round() as i64 + self.frame_offset
    }

    /// Time (seconds) at which `frame` is sampled.
    pub fn time_of_frame(&self, frame: i64) -> f64 {
        (frame - self.frame_offset) as f64 / self.fps
    }
}

impl ImageSource for FileSequenceSource {
    fn full_path(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        let full = self.root.join(path);
        image::ImageFormat::from_path(&full).ok()?;
        let sample = PathBuf::from(expand_frame_pattern(
            &full.to_string_lossy(),
            self.frame_offset,
        ));
        let dir_exists = sample.parent().is_none_or(|p| p.as_os_str().is_empty() || p.is_dir());
        dir_exists.then(|| full.to_string_lossy().into_owned())
    }

    fn resolve_raster(
        &mut self,
        full_path: &str,
        plane: &str,
        time: f64,
    ) -> CopGifResult<Option<Raster>> {
        let frame = self.frame_at(time);
        let path = PathBuf::from(expand_frame_pattern(full_path, frame));
        if !path.is_file() {
            tracing::debug!(path = %path.display(), frame, "no image file for frame");
            return Ok(None);
        }
        let raster = load_plane(&path, plane)?;
        if raster.is_some() {
            tracing::debug!(path = %path.display(), frame, plane, "resolved raster");
        }
        Ok(raster)
    }

    fn release(&mut self, _raster: Raster) {}
}

fn load_plane(path: &Path, plane: &str) -> CopGifResult<Option<Raster>> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    let (width, height) = (img.width(), img.height());
    let has_alpha = img.color().has_alpha();

    let raster = match plane {
        "C" if has_alpha => {
            let buf = img.to_rgba32f();
            Raster::from_f32(width, height, ChannelPacking::Rgba, buf.as_raw())
        }
        "C" => {
            let buf = img.to_rgb32f();
            Raster::from_f32(width, height, ChannelPacking::Rgb, buf.as_raw())
        }
        "A" if has_alpha => {
            let buf = img.to_rgba32f();
            let alpha: Vec<f32> = buf.as_raw().chunks_exact(4).map(|px| px[3]).collect();
            Raster::from_f32(width, height, ChannelPacking::Single, &alpha)
        }
        "L" => {
            let buf = img.to_luma32f();
            Raster::from_f32(width, height, ChannelPacking::Single, buf.as_raw())
        }
        _ => return Ok(None),
    };
    Ok(Some(raster))
}

/// Expand `$F` and `$F<n>` frame tokens in `pattern`.
pub fn expand_frame_pattern(pattern: &str, frame: i64) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    while let Some(pos) = rest.find("$F") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let width: usize = after[..digits].parse().unwrap_or(0);
        out.push_str(&format!("{frame:0width$}"));
        rest = &after[digits..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/source/files.rs"]
mod tests;
