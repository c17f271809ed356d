use crate::{
    engine::scheduler::RenderRequester,
    foundation::{
        core::{PixelSize, Rect},
        error::TilemuxResult,
    },
    render::surface::FrameRGBA,
    viewport::{
        Pipeline,
        input::{DisplayArea, Orientation, ViewportOptions},
        kind::ViewportKind,
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub position: [f64; 3],
    pub focal_point: [f64; 3],
    pub view_up: [f64; 3],
    pub parallel_scale: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -1.0],
            focal_point: [0.0, 0.0, 0.0],
            view_up: [0.0, -1.0, 0.0],
            parallel_scale: 1.0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

impl Camera {
    /// Canonical camera looking down `orientation`'s view-plane normal, framing `size`.
    pub fn for_orientation(orientation: Orientation, size: PixelSize) -> Self {
        let (normal, view_up) = match orientation {
            Orientation::Axial => ([0.0, 0.0, -1.0], [0.0, -1.0, 0.0]),
            Orientation::Sagittal => ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Orientation::Coronal => ([0.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
        };
        Self {
            position: [-normal[0], -normal[1], -normal[2]],
            focal_point: [0.0; 3],
            view_up,
            parallel_scale: (f64::from(size.height) / 2.0).max(1.0),
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Presentation {
    /// Degrees, clockwise.
    pub rotation: f64,
}

/// A viewport's own render entry point. It draws straight into the viewport's output
/// surface, bypassing the shared offscreen surface.
pub trait CustomRenderer {
    fn render_to_surface(&mut self, target: &mut FrameRGBA) -> TilemuxResult<()>;
}

/// Per-viewport behaviour: camera state plus an optional custom pipeline.
pub trait ViewportBehavior {
    fn camera(&self) -> Camera;

    fn set_camera(&mut self, camera: Camera);

    fn reset_camera(&mut self);

    fn rotation(&self) -> f64;

    fn set_presentation(&mut self, presentation: Presentation);

    fn display_area(&self) -> Option<&DisplayArea>;

    /// Called after the viewport's output surface changed size.
    fn resize(&mut self, _size: PixelSize) {}

    fn frame_of_reference_uid(&self) -> Option<&str> {
        None
    }

    /// `Some` when the viewport draws through its own pipeline.
    fn custom_renderer(&mut self) -> Option<&mut dyn CustomRenderer> {
        None
    }
}

/// What a factory knows about the viewport it is building.
#[derive(Clone, Debug)]
pub struct ViewportContext {
    pub id: String,
    pub kind: ViewportKind,
    pub engine_id: String,
    pub pipeline: Pipeline,
    pub pixel_size: PixelSize,
    /// Placement on the shared surface, display-space fractions.
    pub normalized_rect: Rect,
    pub options: ViewportOptions,
    pub requester: RenderRequester,
}

/// Builds the behaviour for each viewport kind.
pub trait ViewportFactory {
    fn create(&self, ctx: &ViewportContext) -> TilemuxResult<Box<dyn ViewportBehavior>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardViewportFactory;

impl ViewportFactory for StandardViewportFactory {
    fn create(&self, ctx: &ViewportContext) -> TilemuxResult<Box<dyn ViewportBehavior>> {
        Ok(Box::new(StandardViewport::new(ctx)))
    }
}

/// Custom pipeline that paints the configured background.
#[derive(Clone, Debug)]
pub struct BackgroundFill {
    rgba: [u8; 4],
    draws: u64,
}

impl BackgroundFill {
    pub fn new(rgba: [u8; 4]) -> Self {
        Self { rgba, draws: 0 }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl CustomRenderer for BackgroundFill {
    fn render_to_surface(&mut self, target: &mut FrameRGBA) -> TilemuxResult<()> {
        target.fill(self.rgba);
        self.draws += 1;
        Ok(())
    }
}

/// Default behaviour for every kind.
///
/// Viewports placed on a custom pipeline get a [`BackgroundFill`] when their kind can draw
/// without a GPU context; shared-surface viewports have no custom renderer.
#[derive(Clone, Debug)]
pub struct StandardViewport {
    kind: ViewportKind,
    orientation: Orientation,
    size: PixelSize,
    camera: Camera,
    rotation: f64,
    display_area: Option<DisplayArea>,
    frame_of_reference_uid: Option<String>,
    fill: Option<BackgroundFill>,
}

impl StandardViewport {
    pub fn new(ctx: &ViewportContext) -> Self {
        let orientation = ctx.options.orientation.unwrap_or(Orientation::Axial);
        let fill = (ctx.pipeline == Pipeline::Custom && ctx.kind.has_cpu_pipeline()).then(|| {
            BackgroundFill::new(ctx.options.background.unwrap_or_default().to_rgba8())
        });
        Self {
            kind: ctx.kind,
            orientation,
            size: ctx.pixel_size,
            camera: Camera::for_orientation(orientation, ctx.pixel_size),
            rotation: 0.0,
            display_area: ctx.options.display_area.clone(),
            frame_of_reference_uid: None,
            fill,
        }
    }

    pub fn with_frame_of_reference(mut self, uid: impl Into<String>) -> Self {
        self.frame_of_reference_uid = Some(uid.into());
        self
    }

    pub fn kind(&self) -> ViewportKind {
        self.kind
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn fill_draws(&self) -> u64 {
        self.fill.as_ref().map_or(0, BackgroundFill::draws)
    }
}

impl ViewportBehavior for StandardViewport {
    fn camera(&self) -> Camera {
        self.camera.clone()
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    fn reset_camera(&mut self) {
        self.camera = Camera::for_orientation(self.orientation, self.size);
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_presentation(&mut self, presentation: Presentation) {
        self.rotation = presentation.rotation;
    }

    fn display_area(&self) -> Option<&DisplayArea> {
        self.display_area.as_ref()
    }

    fn resize(&mut self, size: PixelSize) {
        self.size = size;
    }

    fn frame_of_reference_uid(&self) -> Option<&str> {
        self.frame_of_reference_uid.as_deref()
    }

    fn custom_renderer(&mut self) -> Option<&mut dyn CustomRenderer> {
        self.fill.as_mut().map(|f| f as &mut dyn CustomRenderer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/behavior.rs"]
mod tests;
