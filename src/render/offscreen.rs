use std::collections::HashSet;

use crate::{
    engine::tiling::{TileLayout, pack_tiles},
    foundation::{
        core::{Background, PixelSize, Rect},
        error::TilemuxResult,
    },
    render::{
        scene::{SceneRenderer, SubRenderer},
        surface::FrameRGBA,
    },
};

/// The engine's single shared offscreen surface: the scene renderer plus the current layout.
///
/// An engine running CPU-only has no scene renderer; every operation then degrades to a
/// no-op and `frame()` is `None`.
pub struct OffscreenSurface {
    renderer: Option<Box<dyn SceneRenderer>>,
    layout: TileLayout,
}

impl std::fmt::Debug for OffscreenSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffscreenSurface")
            .field("has_renderer", &self.renderer.is_some())
            .field("layout", &self.layout)
            .finish()
    }
}

impl OffscreenSurface {
    pub fn new(renderer: Option<Box<dyn SceneRenderer>>) -> Self {
        Self {
            renderer,
            layout: TileLayout::default(),
        }
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn size(&self) -> PixelSize {
        self.renderer
            .as_ref()
            .map(|r| r.size())
            .unwrap_or(PixelSize::ZERO)
    }

    /// Re-derive the whole layout from `participants` and push the new geometry to the
    /// scene renderer. An empty participant set leaves the surface size untouched.
    #[tracing::instrument(skip_all)]
    pub fn retile<'a, I>(&mut self, participants: I) -> TilemuxResult<&TileLayout>
    where
        I: IntoIterator<Item = (&'a str, PixelSize)>,
    {
        let layout = pack_tiles(participants);
        if let Some(renderer) = self.renderer.as_mut()
            && !layout.is_empty()
        {
            renderer.resize(layout.size())?;
            for tile in &layout.tiles {
                let changed = renderer
                    .sub_renderer(&tile.id)
                    .is_some_and(|s| s.viewport != tile.normalized);
                if changed {
                    renderer.set_sub_renderer_rect(&tile.id, tile.normalized);
                }
            }
        }
        tracing::debug!(
            width = layout.width,
            height = layout.height,
            tiles = layout.tiles.len(),
            "offscreen retiled"
        );
        self.layout = layout;
        Ok(&self.layout)
    }

    /// Drop every tile. The scene renderer keeps its current size.
    pub fn clear_layout(&mut self) {
        self.layout = TileLayout::default();
    }

    pub fn add_sub_renderer(
        &mut self,
        id: &str,
        viewport: Rect,
        background: Background,
    ) -> TilemuxResult<()> {
        match self.renderer.as_mut() {
            Some(r) => r.add_sub_renderer(SubRenderer::new(id, viewport, background)),
            None => Ok(()),
        }
    }

    pub fn remove_sub_renderer(&mut self, id: &str) -> bool {
        self.renderer
            .as_mut()
            .is_some_and(|r| r.remove_sub_renderer(id))
    }

    pub fn sub_renderer(&self, id: &str) -> Option<&SubRenderer> {
        self.renderer.as_ref().and_then(|r| r.sub_renderer(id))
    }

    /// One shared draw call covering every sub-renderer whose id is in `ids`.
    ///
    /// All draw flags are cleared afterwards, including when the draw fails.
    pub fn draw_pass(&mut self, ids: &HashSet<String>) -> TilemuxResult<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let all = renderer.sub_renderer_ids();
        if all.is_empty() {
            return Ok(());
        }
        for id in &all {
            renderer.set_sub_renderer_draw(id, ids.contains(id));
        }
        let out = renderer.draw_all();
        for id in &all {
            renderer.set_sub_renderer_draw(id, false);
        }
        out
    }

    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.renderer.as_ref().map(|r| r.frame())
    }

    pub fn release(&mut self) {
        if let Some(r) = self.renderer.as_mut() {
            r.release();
        }
        self.clear_layout();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/offscreen.rs"]
mod tests;
