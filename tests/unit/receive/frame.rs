use super::*;

fn bgrx(pixels: &[[u8; 3]]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|&[r, g, b]| [b, g, r, 0xEE])
        .collect()
}

#[test]
fn decode_reverses_component_order_and_drops_padding() {
    let raw = RawVideoFrame::packed(2, 1, bgrx(&[[10, 20, 30], [200, 100, 50]]));
    let frame = decode_bgrx(&raw).unwrap();
    assert_eq!((frame.width(), frame.height()), (2, 1));
    assert_eq!(frame.pixel(0, 0), Some(Rgb8::new(10, 20, 30)));
    assert_eq!(frame.pixel(1, 0), Some(Rgb8::new(200, 100, 50)));
}

#[test]
fn decode_is_row_major() {
    let raw = RawVideoFrame::packed(
        2,
        2,
        bgrx(&[[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]]),
    );
    let frame = decode_bgrx(&raw).unwrap();
    assert_eq!(frame.pixel(1, 0).unwrap().r, 2);
    assert_eq!(frame.pixel(0, 1).unwrap().r, 3);
    assert_eq!(frame.pixel(1, 1).unwrap().r, 4);
}

#[test]
fn decode_honors_padded_rows() {
    let mut data = bgrx(&[[9, 9, 9]]);
    data.extend_from_slice(&[0xFF; 4]); // row padding
    data.extend(bgrx(&[[7, 7, 7]]));
    let raw = RawVideoFrame {
        width: 1,
        height: 2,
        line_stride: 8,
        data,
    };
    let frame = decode_bgrx(&raw).unwrap();
    assert_eq!(frame.pixel(0, 0), Some(Rgb8::new(9, 9, 9)));
    assert_eq!(frame.pixel(0, 1), Some(Rgb8::new(7, 7, 7)));
}

#[test]
fn truncated_payload_leaves_missing_pixels_black() {
    let raw = RawVideoFrame::packed(2, 2, bgrx(&[[5, 6, 7], [8, 9, 10], [11, 12, 13]]));
    let frame = decode_bgrx(&raw).unwrap();
    assert_eq!(frame.pixel(0, 1), Some(Rgb8::new(11, 12, 13)));
    assert_eq!(frame.pixel(1, 1), Some(Rgb8::BLACK));
}

#[test]
fn decode_rejects_unusable_frames() {
    assert!(decode_bgrx(&RawVideoFrame::packed(0, 4, vec![0; 16])).is_err());
    assert!(decode_bgrx(&RawVideoFrame::packed(4, -1, vec![0; 16])).is_err());
    assert!(decode_bgrx(&RawVideoFrame::packed(2, 2, Vec::new())).is_err());
    let narrow = RawVideoFrame {
        width: 4,
        height: 1,
        line_stride: 8,
        data: vec![0; 16],
    };
    assert!(decode_bgrx(&narrow).is_err());
}

#[test]
fn oversized_declared_frame_is_a_decode_error() {
    let huge = RawVideoFrame::packed(i32::MAX, i32::MAX, vec![1, 2, 3, 4]);
    assert!(matches!(decode_bgrx(&huge), Err(LumaError::Decode(_))));

    let wide = RawVideoFrame::packed(i32::MAX, 1, vec![1, 2, 3, 4]);
    assert!(matches!(decode_bgrx(&wide), Err(LumaError::Decode(_))));
}

#[test]
fn pixel_outside_frame_is_none() {
    let frame = decode_bgrx(&RawVideoFrame::packed(1, 1, bgrx(&[[1, 2, 3]]))).unwrap();
    assert_eq!(frame.pixel(-1, 0), None);
    assert_eq!(frame.pixel(0, 1), None);
    assert_eq!(frame.pixel(1, 0), None);
    assert_eq!(frame.pixel(i64::MAX, i64::MIN), None);
}
