use super::*;
use crate::foundation::core::{PixelSize, TileRect};

const TWO_ORTHO: &str = r#"{
  "engine": { "id": "doc" },
  "viewports": [
    { "id": "a", "kind": "orthographic", "width": 20, "height": 20,
      "options": { "background": [1.0, 0.0, 0.0] } },
    { "id": "b", "kind": "orthographic", "width": 20, "height": 10,
      "options": { "background": [0.0, 0.0, 1.0] } },
    { "id": "clip", "kind": "video", "width": 8, "height": 6 }
  ]
}"#;

#[test]
fn parse_and_plan() {
    let doc = LayoutDoc::from_json_str(TWO_ORTHO).unwrap();
    assert_eq!(doc.viewports.len(), 3);
    let layout = plan_layout(&doc).unwrap();
    assert_eq!(layout.size(), PixelSize::new(40, 20));
    assert_eq!(layout.tile("b").unwrap().rect, TileRect::new(20, 0, 20, 10));
    assert!(layout.tile("clip").is_none());
}

#[test]
fn compose_draws_every_output() {
    let doc = LayoutDoc::from_json_str(TWO_ORTHO).unwrap();
    let out = compose_layout(&doc, 1).unwrap();
    assert_eq!(out.ticks, 1);

    let frame = out.offscreen.unwrap();
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(25, 5), Some([0, 0, 255, 255]));

    let (id, b) = &out.outputs[1];
    assert_eq!(id, "b");
    assert_eq!(b.size(), PixelSize::new(20, 10));
    assert_eq!(b.pixel(19, 9), Some([0, 0, 255, 255]));

    let (_, clip) = &out.outputs[2];
    assert_eq!(clip.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn unknown_kind_is_rejected_at_parse() {
    let err = LayoutDoc::from_json_str(
        r#"{"viewports":[{"id":"x","kind":"hologram","width":1,"height":1}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, TilemuxError::Serde(ref m) if m.contains("hologram")));
}

#[test]
fn duplicate_ids_fail_validation() {
    let doc = LayoutDoc::from_json_str(
        r#"{"viewports":[
            {"id":"x","kind":"stack","width":4,"height":4},
            {"id":"x","kind":"stack","width":4,"height":4}]}"#,
    )
    .unwrap();
    assert!(matches!(doc.validate(), Err(TilemuxError::Validation(_))));
}
