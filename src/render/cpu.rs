use crate::{
    foundation::{
        core::{PixelSize, Rect},
        error::{TilemuxError, TilemuxResult},
    },
    render::{
        scene::{SceneRenderer, SubRenderer},
        surface::FrameRGBA,
    },
};

/// Reference [`SceneRenderer`] rasterizing on the CPU with `vello_cpu`.
///
/// Each drawn sub-renderer paints its region with its background colour. Regions that are
/// not drawn in a pass keep the pixels of the previous pass.
pub struct CpuSceneRenderer {
    size: PixelSize,
    subs: Vec<SubRenderer>,
    frame: FrameRGBA,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Default for CpuSceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuSceneRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSceneRenderer")
            .field("size", &self.size)
            .field("subs", &self.subs)
            .finish_non_exhaustive()
    }
}

impl CpuSceneRenderer {
    pub fn new() -> Self {
        Self {
            size: PixelSize::ZERO,
            subs: Vec::new(),
            frame: FrameRGBA::default(),
            ctx: None,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> TilemuxResult<R>,
    ) -> TilemuxResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

/// Integer buffer-space bounds `(x0, y0, x1, y1)` of a display-space normalized rect.
pub(crate) fn buffer_bounds(viewport: Rect, size: PixelSize) -> (u32, u32, u32, u32) {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let px = |v: f64, max: f64| -> u32 { (v * max).round().clamp(0.0, max) as u32 };
    let x0 = px(viewport.x0, w);
    let x1 = px(viewport.x1, w);
    let top = px(1.0 - viewport.y1, h);
    let bottom = px(1.0 - viewport.y0, h);
    (x0.min(x1), top.min(bottom), x0.max(x1), top.max(bottom))
}

impl SceneRenderer for CpuSceneRenderer {
    fn add_sub_renderer(&mut self, sub: SubRenderer) -> TilemuxResult<()> {
        if self.subs.iter().any(|s| s.id == sub.id) {
            return Err(TilemuxError::validation(format!(
                "sub-renderer '{}' already exists",
                sub.id
            )));
        }
        self.subs.push(sub);
        Ok(())
    }

    fn remove_sub_renderer(&mut self, id: &str) -> bool {
        let before = self.subs.len();
        self.subs.retain(|s| s.id != id);
        self.subs.len() != before
    }

    fn sub_renderer(&self, id: &str) -> Option<&SubRenderer> {
        self.subs.iter().find(|s| s.id == id)
    }

    fn set_sub_renderer_rect(&mut self, id: &str, viewport: Rect) -> bool {
        match self.subs.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.viewport = viewport;
                true
            }
            None => false,
        }
    }

    fn set_sub_renderer_draw(&mut self, id: &str, draw: bool) -> bool {
        match self.subs.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.draw = draw;
                true
            }
            None => false,
        }
    }

    fn sub_renderer_ids(&self) -> Vec<String> {
        self.subs.iter().map(|s| s.id.clone()).collect()
    }

    fn size(&self) -> PixelSize {
        self.size
    }

    fn resize(&mut self, size: PixelSize) -> TilemuxResult<()> {
        size.validate_surface()?;
        if size != self.size {
            self.size = size;
            self.frame = FrameRGBA::new(size.width, size.height);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(width = self.size.width, height = self.size.height))]
    fn draw_all(&mut self) -> TilemuxResult<()> {
        if self.size.is_empty() || !self.subs.iter().any(|s| s.draw) {
            return Ok(());
        }
        let width = u16::try_from(self.size.width)
            .map_err(|_| TilemuxError::validation("scene width exceeds u16"))?;
        let height = u16::try_from(self.size.height)
            .map_err(|_| TilemuxError::validation("scene height exceeds u16"))?;

        let pixmap = self.with_ctx_mut(width, height, |this, ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for sub in this.subs.iter().filter(|s| s.draw) {
                let (x0, y0, x1, y1) = buffer_bounds(sub.viewport, this.size);
                let [r, g, b, a] = sub.background.to_rgba8();
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    f64::from(x0),
                    f64::from(y0),
                    f64::from(x1),
                    f64::from(y1),
                ));
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        let src = pixmap.data_as_u8_slice();
        let stride = self.frame.stride();
        if src.len() != self.frame.data.len() {
            return Err(TilemuxError::render(format!(
                "scene pixmap has {} bytes, expected {}",
                src.len(),
                self.frame.data.len()
            )));
        }

        for sub in self.subs.iter_mut().filter(|s| s.draw) {
            let (x0, y0, x1, y1) = buffer_bounds(sub.viewport, self.size);
            let (start, end) = (x0 as usize * 4, x1 as usize * 4);
            for row in y0 as usize..y1 as usize {
                let base = row * stride;
                self.frame.data[base + start..base + end]
                    .copy_from_slice(&src[base + start..base + end]);
            }
            sub.draw_count += 1;
        }
        tracing::trace!("scene pass complete");
        Ok(())
    }

    fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    fn release(&mut self) {
        self.subs.clear();
        self.ctx = None;
        self.size = PixelSize::ZERO;
        self.frame = FrameRGBA::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
