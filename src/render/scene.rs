use crate::{
    foundation::{
        core::{Background, PixelSize, Rect},
        error::TilemuxResult,
    },
    render::surface::FrameRGBA,
};

/// One viewport's slot on the shared scene renderer.
///
/// `viewport` is a normalized rectangle in display space (bottom-left origin, +y up).
#[derive(Clone, Debug, PartialEq)]
pub struct SubRenderer {
    pub id: String,
    pub viewport: Rect,
    pub background: Background,
    pub draw: bool,
    pub draw_count: u64,
}

impl SubRenderer {
    pub fn new(id: impl Into<String>, viewport: Rect, background: Background) -> Self {
        Self {
            id: id.into(),
            viewport,
            background,
            draw: false,
            draw_count: 0,
        }
    }
}

/// The shared GPU-style scene renderer backing the offscreen surface.
///
/// Implementations draw every sub-renderer flagged `draw` in a single pass and expose the
/// composed premultiplied RGBA8 frame for blitting.
pub trait SceneRenderer {
    fn add_sub_renderer(&mut self, sub: SubRenderer) -> TilemuxResult<()>;

    /// Returns `false` when no sub-renderer has that id.
    fn remove_sub_renderer(&mut self, id: &str) -> bool;

    fn sub_renderer(&self, id: &str) -> Option<&SubRenderer>;

    fn set_sub_renderer_rect(&mut self, id: &str, viewport: Rect) -> bool;

    fn set_sub_renderer_draw(&mut self, id: &str, draw: bool) -> bool;

    fn sub_renderer_ids(&self) -> Vec<String>;

    fn size(&self) -> PixelSize;

    fn resize(&mut self, size: PixelSize) -> TilemuxResult<()>;

    fn draw_all(&mut self) -> TilemuxResult<()>;

    fn frame(&self) -> &FrameRGBA;

    /// Drop every sub-renderer and any backing resources.
    fn release(&mut self);
}
