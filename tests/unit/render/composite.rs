use super::*;

fn striped(width: u32, height: u32) -> FrameRGBA {
    // Each pixel encodes its own coordinates so copies are easy to check.
    let mut f = FrameRGBA::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            f.data[i..i + 4].copy_from_slice(&[x as u8, y as u8, 7, 255]);
        }
    }
    f
}

#[test]
fn equal_size_copies_rows() {
    let src = striped(8, 4);
    let mut dst = FrameRGBA::new(3, 2);
    blit_tile(&src, TileRect::new(4, 1, 3, 2), &mut dst).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([4, 1, 7, 255]));
    assert_eq!(dst.pixel(2, 1), Some([6, 2, 7, 255]));
}

#[test]
fn mismatched_size_resamples_nearest() {
    let src = striped(4, 4);
    let mut dst = FrameRGBA::new(8, 2);
    blit_tile(&src, TileRect::new(0, 0, 4, 4), &mut dst).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([0, 1, 7, 255]));
    assert_eq!(dst.pixel(1, 0), Some([0, 1, 7, 255]));
    assert_eq!(dst.pixel(7, 1), Some([3, 3, 7, 255]));
}

#[test]
fn rect_is_clipped_to_source() {
    let src = striped(4, 2);
    let mut dst = FrameRGBA::new(2, 2);
    blit_tile(&src, TileRect::new(2, 0, 10, 10), &mut dst).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([2, 0, 7, 255]));
    assert_eq!(dst.pixel(1, 1), Some([3, 1, 7, 255]));
}

#[test]
fn empty_rect_leaves_destination_untouched() {
    let src = striped(4, 2);
    let mut dst = FrameRGBA::new(2, 2);
    dst.fill([1, 2, 3, 4]);
    blit_tile(&src, TileRect::new(9, 0, 2, 2), &mut dst).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([1, 2, 3, 4]));
}

#[test]
fn corrupt_buffers_are_rejected() {
    let mut src = striped(2, 2);
    src.data.truncate(3);
    let mut dst = FrameRGBA::new(2, 2);
    assert!(blit_tile(&src, TileRect::new(0, 0, 2, 2), &mut dst).is_err());
}
