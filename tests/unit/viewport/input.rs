use super::*;

#[test]
fn empty_options_default_to_black() {
    let o = ViewportOptions::default().normalized(ViewportKind::Stack);
    assert_eq!(o.background, Some(Background::BLACK));
    assert_eq!(o.orientation, None);
}

#[test]
fn empty_orthographic_options_get_axial() {
    let o = ViewportOptions::default().normalized(ViewportKind::Orthographic);
    assert_eq!(o.orientation, Some(Orientation::Axial));
}

#[test]
fn non_empty_options_are_untouched() {
    let given = ViewportOptions {
        orientation: Some(Orientation::Coronal),
        ..ViewportOptions::default()
    };
    let o = given.clone().normalized(ViewportKind::Orthographic);
    assert_eq!(o, given);
    assert_eq!(o.background, None);
}

#[test]
fn input_normalization_uses_kind() {
    let input = ViewportInput::new("v", ViewportKind::Orthographic, OutputTarget::new("v", 1, 1))
        .normalized();
    assert_eq!(input.default_options.orientation, Some(Orientation::Axial));
    assert_eq!(input.default_options.background, Some(Background::BLACK));
}

#[test]
fn options_deserialize_with_defaults() {
    let o: ViewportOptions =
        serde_json::from_str(r#"{"background":[0.5,0.5,0.5],"orientation":"sagittal"}"#)
            .unwrap();
    assert_eq!(o.background, Some(Background([0.5, 0.5, 0.5])));
    assert_eq!(o.orientation, Some(Orientation::Sagittal));
    assert!(o.display_area.is_none());
}
