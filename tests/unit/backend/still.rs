use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use super::*;
use crate::foundation::core::Rgb8;
use crate::receive::frame::decode_bgrx;

#[test]
fn encodes_bgrx_with_opaque_padding() {
    let img = RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).expect("raw");
    let raw = bgrx_from_image(&DynamicImage::ImageRgb8(img)).expect("encode");
    assert_eq!((raw.width, raw.height), (2, 1));
    assert_eq!(raw.data, vec![30, 20, 10, 0xFF, 60, 50, 40, 0xFF]);
}

#[test]
fn decoding_restores_the_rgb_image() {
    let img = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
    let raw = bgrx_from_image(&DynamicImage::ImageRgb8(img.clone())).expect("encode");
    let frame = decode_bgrx(&raw).expect("decode");
    assert_eq!(frame.image(), &img);
    assert_eq!(frame.pixel(4, 2), Some(Rgb8::new(160, 160, 7)));
}

#[test]
fn alpha_is_dropped() {
    let img = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 0]).expect("raw");
    let raw = bgrx_from_image(&DynamicImage::ImageRgba8(img)).expect("encode");
    assert_eq!(raw.data, vec![3, 2, 1, 0xFF]);
}

#[test]
fn empty_images_are_rejected() {
    let img = DynamicImage::ImageRgb8(RgbImage::new(0, 4));
    assert!(bgrx_from_image(&img).is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = load_still("target/lumamap-no-such-image.png").expect_err("missing");
    assert!(err.to_string().contains("lumamap-no-such-image.png"));
}
