use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    engine::scheduler::{FrameScheduler, ManualTickSource, RenderRequester},
    foundation::core::{PixelSize, Rect, TileRect},
    render::surface::WeakOutputTarget,
    viewport::{
        Pipeline,
        behavior::{StandardViewport, ViewportContext},
        input::ViewportOptions,
        kind::ViewportStatus,
    },
};

fn viewport(id: &str, kind: ViewportKind) -> Viewport {
    let scheduler = Rc::new(RefCell::new(FrameScheduler::new(Box::new(
        ManualTickSource::new(),
    ))));
    let ctx = ViewportContext {
        id: id.to_string(),
        kind,
        engine_id: "engine".to_string(),
        pipeline: Pipeline::Shared,
        pixel_size: PixelSize::new(4, 4),
        normalized_rect: Rect::ZERO,
        options: ViewportOptions::default(),
        requester: RenderRequester::new(&scheduler),
    };
    Viewport {
        id: id.to_string(),
        kind,
        pipeline: Pipeline::Shared,
        output: WeakOutputTarget::default(),
        pixel_size: PixelSize::new(4, 4),
        tile: TileRect::new(0, 0, 4, 4),
        normalized: Rect::ZERO,
        is_disabled: false,
        suppress_events: false,
        engine_id: "engine".to_string(),
        status: ViewportStatus::NoData,
        options: ViewportOptions::default(),
        behavior: Box::new(StandardViewport::new(&ctx)),
    }
}

#[test]
fn add_keeps_registration_order() {
    let mut r = ViewportRegistry::new();
    r.add(viewport("a", ViewportKind::Stack));
    r.add(viewport("b", ViewportKind::Orthographic));
    r.add(viewport("c", ViewportKind::Stack));
    assert_eq!(r.ids(), vec!["a", "b", "c"]);
}

#[test]
fn replacing_moves_entry_to_end() {
    let mut r = ViewportRegistry::new();
    r.add(viewport("a", ViewportKind::Stack));
    r.add(viewport("b", ViewportKind::Stack));
    r.add(viewport("a", ViewportKind::Video));
    assert_eq!(r.ids(), vec!["b", "a"]);
    assert_eq!(r.get("a").unwrap().kind(), ViewportKind::Video);
}

#[test]
fn remove_marks_disabled_and_is_idempotent() {
    let mut r = ViewportRegistry::new();
    r.add(viewport("a", ViewportKind::Stack));
    let removed = r.remove("a").unwrap();
    assert!(removed.is_disabled());
    assert!(r.remove("a").is_none());
    assert!(r.remove("missing").is_none());
    assert!(r.is_empty());
}

#[test]
fn of_kind_filters() {
    let mut r = ViewportRegistry::new();
    r.add(viewport("a", ViewportKind::Stack));
    r.add(viewport("b", ViewportKind::Orthographic));
    r.add(viewport("c", ViewportKind::Volume3D));
    let volumes: Vec<&str> = r
        .of_kind(ViewportKind::is_volume)
        .into_iter()
        .map(|v| v.id())
        .collect();
    assert_eq!(volumes, vec!["b", "c"]);
}
