use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    engine::scheduler::{FrameScheduler, ManualTickSource},
    foundation::core::Background,
};

fn ctx(kind: ViewportKind, pipeline: Pipeline) -> (Rc<RefCell<FrameScheduler>>, ViewportContext) {
    let scheduler = Rc::new(RefCell::new(FrameScheduler::new(Box::new(
        ManualTickSource::new(),
    ))));
    let ctx = ViewportContext {
        id: "vp".to_string(),
        kind,
        engine_id: "engine".to_string(),
        pipeline,
        pixel_size: PixelSize::new(64, 32),
        normalized_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        options: ViewportOptions {
            background: Some(Background([0.0, 1.0, 0.0])),
            ..ViewportOptions::default()
        },
        requester: RenderRequester::new(&scheduler),
    };
    (scheduler, ctx)
}

#[test]
fn custom_cpu_kind_gets_background_fill() {
    let (_s, ctx) = ctx(ViewportKind::Stack, Pipeline::Custom);
    let mut vp = StandardViewport::new(&ctx);
    let mut target = FrameRGBA::new(2, 2);
    vp.custom_renderer()
        .unwrap()
        .render_to_surface(&mut target)
        .unwrap();
    assert_eq!(target.pixel(1, 1), Some([0, 255, 0, 255]));
    assert_eq!(vp.fill_draws(), 1);
}

#[test]
fn shared_pipeline_has_no_custom_renderer() {
    let (_s, ctx) = ctx(ViewportKind::Stack, Pipeline::Shared);
    let mut vp = StandardViewport::new(&ctx);
    assert!(vp.custom_renderer().is_none());
}

#[test]
fn gpu_only_kind_on_custom_pipeline_has_no_renderer() {
    let (_s, ctx) = ctx(ViewportKind::Orthographic, Pipeline::Custom);
    let mut vp = StandardViewport::new(&ctx);
    assert!(vp.custom_renderer().is_none());
}

#[test]
fn reset_camera_restores_orientation_defaults() {
    let (_s, ctx) = ctx(ViewportKind::Orthographic, Pipeline::Shared);
    let mut vp = StandardViewport::new(&ctx);
    let initial = vp.camera();
    assert_eq!(initial.parallel_scale, 16.0);

    let mut moved = initial.clone();
    moved.parallel_scale = 3.0;
    moved.flip_horizontal = true;
    vp.set_camera(moved);
    vp.set_presentation(Presentation { rotation: 90.0 });
    vp.reset_camera();

    assert_eq!(vp.camera(), initial);
    assert_eq!(vp.rotation(), 90.0);
}

#[test]
fn sagittal_camera_axes() {
    let cam = Camera::for_orientation(Orientation::Sagittal, PixelSize::new(10, 10));
    assert_eq!(cam.view_up, [0.0, 0.0, 1.0]);
    assert_eq!(cam.position, [-1.0, 0.0, 0.0]);
}

#[test]
fn frame_of_reference_is_reported() {
    let (_s, ctx) = ctx(ViewportKind::Stack, Pipeline::Shared);
    let vp = StandardViewport::new(&ctx).with_frame_of_reference("1.2.3");
    assert_eq!(vp.frame_of_reference_uid(), Some("1.2.3"));
}
