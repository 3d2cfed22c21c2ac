use image::{Rgb, RgbImage};

use super::*;
use crate::geometry::uv::UvPoint;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

fn gradient_frame(w: u32, h: u32) -> Frame {
    let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 200]));
    Frame::from_image(img).expect("frame")
}

fn table(points: &[(usize, f64, f64)]) -> UvTable {
    UvTable::from_points(
        points
            .iter()
            .map(|&(index, u, v)| UvPoint { index, u, v })
            .collect(),
    )
}

#[test]
fn default_transform_is_identity() {
    let cfg = TransformConfig::default();
    assert!(close(transform_uv(0.25, 0.75, &cfg), Point::new(0.25, 0.75)));
}

#[test]
fn flipping_twice_is_identity() {
    let cfg = TransformConfig {
        flip_horizontal: true,
        flip_vertical: true,
        ..TransformConfig::default()
    };
    let once = transform_uv(0.2, 0.9, &cfg);
    assert!(close(once, Point::new(0.8, 0.1)));
    let twice = transform_uv(once.x, once.y, &cfg);
    assert!(close(twice, Point::new(0.2, 0.9)));
}

#[test]
fn tiling_wraps_coordinates_one_tile_apart() {
    let cfg = TransformConfig {
        tile_x: 3,
        tile_y: 2,
        ..TransformConfig::default()
    };
    let a = transform_uv(0.2, 0.1, &cfg);
    let b = transform_uv(0.2 + 1.0 / 3.0, 0.6, &cfg);
    assert!(close(a, b), "{a:?} vs {b:?}");
    assert!((a.x - (0.6 - TILE_EPSILON)).abs() < 1e-9);
}

#[test]
fn tiling_zero_keeps_sign_of_bias() {
    let cfg = TransformConfig {
        tile_x: 2,
        ..TransformConfig::default()
    };
    let p = transform_uv(0.0, 0.0, &cfg);
    assert!((p.x + TILE_EPSILON).abs() < 1e-12);
}

#[test]
fn full_turn_rotation_is_identity() {
    let cfg = TransformConfig {
        rotate: 1.0,
        ..TransformConfig::default()
    };
    assert!(close(transform_uv(0.1, 0.7, &cfg), Point::new(0.1, 0.7)));
}

#[test]
fn quarter_turn_rotates_about_center() {
    let cfg = TransformConfig {
        rotate: 0.25,
        ..TransformConfig::default()
    };
    assert!(close(transform_uv(1.0, 0.5, &cfg), Point::new(0.5, 1.0)));
    assert!(close(transform_uv(0.5, 0.5, &cfg), UV_CENTER));
}

#[test]
fn pixel_rounding_is_half_up() {
    let frame = gradient_frame(11, 3);
    let cfg = TransformConfig::default();
    // 0.05 * 10 = 0.5 -> 1
    assert_eq!(pixel_for(Point::new(0.05, 0.0), &cfg, &frame), Some((1, 0)));
    assert_eq!(pixel_for(Point::new(1.0, 1.0), &cfg, &frame), Some((10, 2)));
    assert_eq!(pixel_for(Point::new(f64::NAN, 0.0), &cfg, &frame), None);
}

#[test]
fn samples_nearest_pixel_into_output_index() {
    let frame = gradient_frame(11, 11);
    let uvs = table(&[(2, 0.0, 0.0), (0, 1.0, 1.0), (1, 0.5, 0.3)]);
    let mut colors = vec![Rgb8::BLACK; 3];
    let stats = sample_into(&frame, &uvs, &TransformConfig::default(), &mut colors);

    assert_eq!(stats.written, 3);
    assert_eq!(stats.out_of_frame, 0);
    assert_eq!(colors[2], Rgb8::new(0, 0, 200));
    assert_eq!(colors[0], Rgb8::new(100, 100, 200));
    assert_eq!(colors[1], Rgb8::new(50, 30, 200));
}

#[test]
fn out_of_frame_points_are_black() {
    let frame = gradient_frame(4, 4);
    let cfg = TransformConfig {
        offset_u: 1.5,
        ..TransformConfig::default()
    };
    let uvs = table(&[(0, 0.5, 0.5)]);
    let mut colors = vec![Rgb8::new(1, 2, 3)];
    let stats = sample_into(&frame, &uvs, &cfg, &mut colors);
    assert_eq!(stats.out_of_frame, 1);
    assert_eq!(colors[0], Rgb8::BLACK);

    let cfg = TransformConfig {
        offset_v: -2.0,
        ..TransformConfig::default()
    };
    let mut colors = vec![Rgb8::new(1, 2, 3)];
    sample_into(&frame, &uvs, &cfg, &mut colors);
    assert_eq!(colors[0], Rgb8::BLACK);
}

#[test]
fn indices_past_the_buffer_are_reported_stale() {
    let frame = gradient_frame(4, 4);
    let uvs = table(&[(0, 0.0, 0.0), (5, 1.0, 1.0)]);
    let mut colors = vec![Rgb8::new(9, 9, 9)];
    let stats = sample_into(&frame, &uvs, &TransformConfig::default(), &mut colors);
    assert!(stats.is_stale());
    assert_eq!(stats.stale, 1);
    assert_eq!(stats.written, 1);
    assert_eq!(colors[0], Rgb8::new(0, 0, 200));
}

#[test]
fn single_pixel_frame_samples_origin_everywhere() {
    let frame = gradient_frame(1, 1);
    let uvs = table(&[(0, 0.0, 0.0), (1, 1.0, 1.0)]);
    let mut colors = vec![Rgb8::BLACK; 2];
    let stats = sample_into(&frame, &uvs, &TransformConfig::default(), &mut colors);
    assert_eq!(stats.out_of_frame, 0);
    assert_eq!(colors, vec![Rgb8::new(0, 0, 200); 2]);
}
