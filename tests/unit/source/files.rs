use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "copgif_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_rgba_png(path: &Path, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(2, 1, image::Rgba(px));
    img.save(path).unwrap();
}

fn write_rgb_png(path: &Path, px: [u8; 3]) {
    let img = image::RgbImage::from_pixel(2, 1, image::Rgb(px));
    img.save(path).unwrap();
}

#[test]
fn frame_tokens_expand_with_optional_padding() {
    assert_eq!(expand_frame_pattern("img.$F.png", 7), "img.7.png");
    assert_eq!(expand_frame_pattern("img.$F4.png", 7), "img.0007.png");
    assert_eq!(expand_frame_pattern("$F2/$F3.exr", 12), "12/012.exr");
    assert_eq!(expand_frame_pattern("still.png", 3), "still.png");
}

#[test]
fn time_maps_to_frames_with_offset() {
    let src = FileSequenceSource::new(".", 24.0).unwrap();
    assert_eq!(src.frame_at(0.0), 1);
    assert_eq!(src.frame_at(1.0), 25);
    assert_eq!(src.time_of_frame(25), 1.0);

    let src = src.with_frame_offset(0);
    assert_eq!(src.frame_at(0.5), 12);
}

#[test]
fn non_positive_fps_is_rejected() {
    assert!(FileSequenceSource::new(".", 0.0).is_err());
    assert!(FileSequenceSource::new(".", f64::NAN).is_err());
}

#[test]
fn full_path_requires_image_extension_and_directory() {
    let tmp = temp_dir("files_full_path");
    std::fs::create_dir_all(tmp.join("seq")).unwrap();
    let src = FileSequenceSource::new(&tmp, 24.0).unwrap();

    assert!(src.full_path("seq/img.$F4.png").is_some());
    assert!(src.full_path("seq/img.$F4.txt").is_none());
    assert!(src.full_path("missing/img.$F4.png").is_none());
    assert!(src.full_path("").is_none());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn color_alpha_and_luma_planes_decode_to_float() {
    let tmp = temp_dir("files_planes");
    std::fs::create_dir_all(&tmp).unwrap();
    write_rgba_png(&tmp.join("img.0001.png"), [255, 0, 0, 255]);

    let mut src = FileSequenceSource::new(&tmp, 24.0).unwrap();
    let full = src.full_path("img.$F4.png").unwrap();

    let c = src.resolve_raster(&full, "C", 0.0).unwrap().unwrap();
    assert_eq!(c.packing(), ChannelPacking::Rgba);
    assert_eq!((c.width(), c.height()), (2, 1));
    assert!(c.is_valid());
    assert_eq!(&c.pixel(0, 0).unwrap()[..4], &1.0f32.to_le_bytes());

    let a = src.resolve_raster(&full, "A", 0.0).unwrap().unwrap();
    assert_eq!(a.packing(), ChannelPacking::Single);
    assert_eq!(a.pixel(1, 0).unwrap(), 1.0f32.to_le_bytes());

    let l = src.resolve_raster(&full, "L", 0.0).unwrap().unwrap();
    assert_eq!(l.packing(), ChannelPacking::Single);

    assert!(src.resolve_raster(&full, "N", 0.0).unwrap().is_none());
    // Frame 2 does not exist.
    assert!(src.resolve_raster(&full, "C", 1.0 / 24.0).unwrap().is_none());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn files_without_alpha_use_rgb_and_have_no_alpha_plane() {
    let tmp = temp_dir("files_rgb");
    std::fs::create_dir_all(&tmp).unwrap();
    write_rgb_png(&tmp.join("img.3.png"), [0, 255, 0]);

    let mut src = FileSequenceSource::new(&tmp, 10.0).unwrap();
    let full = src.full_path("img.$F.png").unwrap();
    let c = src.resolve_raster(&full, "C", 0.2).unwrap().unwrap();
    assert_eq!(c.packing(), ChannelPacking::Rgb);
    assert!(src.resolve_raster(&full, "A", 0.2).unwrap().is_none());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn undecodable_files_surface_as_errors() {
    let tmp = temp_dir("files_corrupt");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("img.1.png"), b"not a png").unwrap();

    let mut src = FileSequenceSource::new(&tmp, 24.0).unwrap();
    let full = src.full_path("img.$F.png").unwrap();
    let err = src.resolve_raster(&full, "C", 0.0).unwrap_err();
    assert!(matches!(err, CopGifError::Other(_)));

    std::fs::remove_dir_all(&tmp).ok();
}
