use super::*;

#[test]
fn scaled_truncates_fractional_pixels() {
    let s = PixelSize::new(101, 51).scaled(1.5);
    assert_eq!(s, PixelSize::new(151, 76));
    assert_eq!(PixelSize::new(10, 10).scaled(0.0), PixelSize::ZERO);
    assert_eq!(PixelSize::new(10, 10).scaled(f64::NAN), PixelSize::ZERO);
}

#[test]
fn validate_surface_rejects_oversized() {
    assert!(PixelSize::new(MAX_SURFACE_DIM, 1).validate_surface().is_ok());
    let err = PixelSize::new(MAX_SURFACE_DIM + 1, 1)
        .validate_surface()
        .unwrap_err();
    assert!(matches!(err, TilemuxError::Validation(_)));
}

#[test]
fn background_floors_channels() {
    assert_eq!(Background([1.0, 0.5, 0.0]).to_rgba8(), [255, 127, 0, 255]);
    assert_eq!(Background::default().to_rgba8(), [0, 0, 0, 255]);
    assert_eq!(Background([2.0, -1.0, f32::NAN]).to_rgba8(), [255, 0, 0, 255]);
}

#[test]
fn tile_rect_min_size() {
    assert!(TileRect::new(0, 0, 1, 100).is_smaller_than(2));
    assert!(TileRect::new(0, 0, 100, 1).is_smaller_than(2));
    assert!(!TileRect::new(0, 0, 2, 2).is_smaller_than(2));
    assert_eq!(TileRect::full(PixelSize::new(3, 4)), TileRect::new(0, 0, 3, 4));
}

#[test]
fn engine_ids_are_unique() {
    let a = generate_engine_id();
    let b = generate_engine_id();
    assert_ne!(a, b);
    assert!(a.starts_with("engine-"));
}
