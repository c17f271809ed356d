use super::*;

#[test]
fn frame_new_is_transparent() {
    let f = FrameRGBA::new(3, 2);
    assert_eq!(f.data.len(), 3 * 2 * 4);
    assert!(f.premultiplied);
    assert_eq!(f.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(3, 0), None);
}

#[test]
fn frame_resize_discards_contents() {
    let mut f = FrameRGBA::new(2, 2);
    f.fill([9, 9, 9, 255]);
    f.resize(PixelSize::new(4, 1));
    assert_eq!(f.size(), PixelSize::new(4, 1));
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn check_len_detects_corruption() {
    let mut f = FrameRGBA::new(2, 2);
    assert!(f.check_len("test").is_ok());
    f.data.pop();
    assert!(f.check_len("test").is_err());
}

#[test]
fn output_target_pixel_size_and_fill() {
    let out = OutputTarget::new("a", 10, 5);
    assert_eq!(out.client_size(), PixelSize::new(10, 5));
    assert_eq!(out.pixel_size(), PixelSize::ZERO);

    out.set_pixel_size(PixelSize::new(4, 4)).unwrap();
    out.fill_background(Some(Background([1.0, 0.0, 0.0])));
    assert_eq!(out.snapshot().pixel(3, 3), Some([255, 0, 0, 255]));

    out.fill_background(None);
    assert_eq!(out.snapshot().pixel(0, 0), Some([0, 0, 0, 255]));

    out.clear();
    assert_eq!(out.snapshot().pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn output_target_rejects_oversized_buffer() {
    let out = OutputTarget::new("a", 1, 1);
    assert!(out.set_pixel_size(PixelSize::new(70_000, 1)).is_err());
}

#[test]
fn weak_handle_detaches_when_owner_drops() {
    let out = OutputTarget::new("a", 1, 1);
    let weak = out.downgrade();
    assert!(weak.is_attached());
    assert!(weak.upgrade().unwrap().ptr_eq(&out));
    drop(out);
    assert!(!weak.is_attached());
    assert!(weak.upgrade().is_none());
}
