use super::*;
use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;
use std::io::BufReader;

/// Sink that refuses writes past `cap` bytes, like a process hitting its file size limit.
struct CappedSink {
    written: Vec<u8>,
    cap: usize,
    fail_flush: bool,
}

impl CappedSink {
    fn new(cap: usize) -> Self {
        Self {
            written: Vec::new(),
            cap,
            fail_flush: false,
        }
    }
}

impl Write for CappedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.written.len() + buf.len() > self.cap {
            return Err(std::io::Error::other("file size limit exceeded"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.fail_flush {
            return Err(std::io::Error::other("flush failed"));
        }
        Ok(())
    }
}

fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "copgif_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn cfg(out_path: PathBuf, width: u32, height: u32) -> EncoderConfig {
    EncoderConfig {
        out_path,
        width,
        height,
        loop_count: LoopCount::Infinite,
    }
}

#[test]
fn open_rejects_degenerate_and_oversized_dimensions() {
    let dir = temp_path("gif_dims");
    let mut enc = GifFileEncoder::default();
    for (w, h) in [(0, 4), (4, 0), (70_000, 1)] {
        let err = enc.open(&cfg(dir.join("x.gif"), w, h)).err().unwrap();
        assert!(matches!(err, CopGifError::Encoder(_)), "{w}x{h}");
    }
}

#[test]
fn open_rejects_bad_speed() {
    let dir = temp_path("gif_speed");
    let mut enc = GifFileEncoder::new(GifEncoderOpts {
        speed: 0,
        overwrite: true,
    });
    assert!(enc.open(&cfg(dir.join("x.gif"), 2, 2)).is_err());
}

#[test]
fn open_respects_overwrite_flag() {
    let dir = temp_path("gif_overwrite");
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.gif");
    std::fs::write(&out, b"old").unwrap();

    let mut enc = GifFileEncoder::new(GifEncoderOpts {
        speed: 10,
        overwrite: false,
    });
    assert!(matches!(
        enc.open(&cfg(out.clone(), 2, 2)).err().unwrap(),
        CopGifError::Encoder(_)
    ));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn write_frame_checks_size() {
    let dir = temp_path("gif_frame_size");
    let mut enc = GifFileEncoder::default();
    let mut h = enc.open(&cfg(dir.join("x.gif"), 2, 2)).unwrap();
    assert!(enc.write_frame(&mut h, &[0; 16], 2, 3, 4).is_err());
    assert!(enc.write_frame(&mut h, &[0; 12], 2, 2, 4).is_err());
    drop(h);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn writes_decodable_animation_in_row_major_order() {
    let dir = temp_path("gif_roundtrip");
    let out = dir.join("nested").join("anim.gif");
    let mut enc = GifFileEncoder::default();
    let mut h = enc.open(&cfg(out.clone(), 2, 1)).unwrap();

    // Scan order for a 2x1 frame is (0,0), (1,0).
    let red_then_blue = [255, 0, 0, 255, 0, 0, 255, 255];
    enc.write_frame(&mut h, &red_then_blue, 2, 1, 5).unwrap();
    enc.write_frame(&mut h, &red_then_blue, 2, 1, 5).unwrap();
    enc.close(h).unwrap();

    let file = BufReader::new(std::fs::File::open(&out).unwrap());
    let frames = GifDecoder::new(file)
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 2);

    let first = frames[0].buffer();
    assert_eq!(first.dimensions(), (2, 1));
    let left = first.get_pixel(0, 0).0;
    let right = first.get_pixel(1, 0).0;
    assert!(left[0] > 200 && left[2] < 50, "left = {left:?}");
    assert!(right[2] > 200 && right[0] < 50, "right = {right:?}");

    let (numer, denom) = frames[0].delay().numer_denom_ms();
    assert_eq!(numer / denom, 50);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn column_scan_order_is_transposed_to_rows() {
    let dir = temp_path("gif_transpose");
    let out = dir.join("square.gif");
    let mut enc = GifFileEncoder::default();
    let mut h = enc.open(&cfg(out.clone(), 2, 2)).unwrap();

    // Scan order (0,0), (0,1), (1,0), (1,1): red, green, blue, white.
    let scan = [
        255, 0, 0, 255, //
        0, 255, 0, 255, //
        0, 0, 255, 255, //
        255, 255, 255, 255,
    ];
    enc.write_frame(&mut h, &scan, 2, 2, 4).unwrap();
    enc.close(h).unwrap();

    let file = BufReader::new(std::fs::File::open(&out).unwrap());
    let frames = GifDecoder::new(file)
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    let buf = frames[0].buffer();
    let px = |x, y| buf.get_pixel(x, y).0;
    assert!(px(0, 0)[0] > 200 && px(0, 0)[1] < 50, "(0,0) = {:?}", px(0, 0));
    assert!(px(0, 1)[1] > 200 && px(0, 1)[0] < 50, "(0,1) = {:?}", px(0, 1));
    assert!(px(1, 0)[2] > 200 && px(1, 0)[0] < 50, "(1,0) = {:?}", px(1, 0));
    assert!(px(1, 1).iter().all(|&c| c > 200), "(1,1) = {:?}", px(1, 1));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn finished_stream_ends_with_trailer_and_decodes() {
    let mut stream = GifStream::new(CappedSink::new(usize::MAX), 8, 8, 10, gif::Repeat::Infinite)
        .unwrap();
    for seed in 0..3 {
        stream.push(noise(8 * 8 * 4, seed), 4).unwrap();
    }
    let sink = stream.finish().unwrap();
    assert_eq!(sink.written.last(), Some(&0x3b));

    let frames = GifDecoder::new(std::io::Cursor::new(sink.written))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 3);
}

#[test]
fn truncated_output_fails_finish() {
    // Everything stays buffered until finish, so the cap is only hit there.
    let mut stream =
        GifStream::new(CappedSink::new(64), 8, 8, 10, gif::Repeat::Infinite).unwrap();
    for seed in 0..3 {
        stream.push(noise(8 * 8 * 4, seed), 4).unwrap();
    }
    let err = stream.finish().err().unwrap();
    assert!(matches!(err, CopGifError::Encoder(_)), "{err}");
    assert!(err.to_string().contains("file size limit exceeded"), "{err}");
}

#[test]
fn failing_final_flush_fails_finish() {
    let mut sink = CappedSink::new(usize::MAX);
    sink.fail_flush = true;
    let mut stream = GifStream::new(sink, 2, 2, 10, gif::Repeat::Infinite).unwrap();
    stream.push(vec![255; 16], 4).unwrap();
    let err = stream.finish().err().unwrap();
    assert!(matches!(err, CopGifError::Encoder(_)), "{err}");
    assert!(err.to_string().contains("flush failed"), "{err}");
}

#[cfg(target_os = "linux")]
#[test]
fn close_reports_full_device() {
    let full = PathBuf::from("/dev/full");
    if !std::fs::metadata(&full).is_ok_and(|m| !m.is_file()) {
        return;
    }
    let mut enc = GifFileEncoder::default();
    let mut h = enc.open(&cfg(full, 2, 2)).unwrap();
    enc.write_frame(&mut h, &[255; 16], 2, 2, 4).unwrap();
    let err = enc.close(h).err().unwrap();
    assert!(matches!(err, CopGifError::Encoder(_)), "{err}");
}
