pub mod behavior;
pub mod input;
pub mod kind;

use crate::{
    foundation::core::{PixelSize, Rect, TileRect},
    render::surface::{OutputTarget, WeakOutputTarget},
    viewport::{
        behavior::ViewportBehavior,
        input::ViewportOptions,
        kind::{ViewportKind, ViewportStatus},
    },
};

/// Which pipeline draws a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// Drawn by the shared scene renderer, then blitted from the offscreen surface.
    Shared,
    /// Drawn by the viewport's own renderer straight into its output surface.
    Custom,
}

/// An enabled viewport, owned by the engine's registry.
pub struct Viewport {
    pub(crate) id: String,
    pub(crate) kind: ViewportKind,
    pub(crate) pipeline: Pipeline,
    pub(crate) output: WeakOutputTarget,
    pub(crate) pixel_size: PixelSize,
    pub(crate) tile: TileRect,
    pub(crate) normalized: Rect,
    pub(crate) is_disabled: bool,
    pub(crate) suppress_events: bool,
    pub(crate) engine_id: String,
    pub(crate) status: ViewportStatus,
    pub(crate) options: ViewportOptions,
    pub(crate) behavior: Box<dyn ViewportBehavior>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("pipeline", &self.pipeline)
            .field("pixel_size", &self.pixel_size)
            .field("tile", &self.tile)
            .field("normalized", &self.normalized)
            .field("is_disabled", &self.is_disabled)
            .field("suppress_events", &self.suppress_events)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Viewport {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ViewportKind {
        self.kind
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    pub fn uses_custom_pipeline(&self) -> bool {
        self.pipeline == Pipeline::Custom
    }

    /// The output target, unless its owner dropped it.
    pub fn output(&self) -> Option<OutputTarget> {
        self.output.upgrade()
    }

    pub fn pixel_size(&self) -> PixelSize {
        self.pixel_size
    }

    pub fn tile_rect(&self) -> TileRect {
        self.tile
    }

    pub fn normalized_rect(&self) -> Rect {
        self.normalized
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    pub fn suppress_events(&self) -> bool {
        self.suppress_events
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    pub fn status(&self) -> ViewportStatus {
        self.status
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn behavior(&self) -> &dyn ViewportBehavior {
        &*self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ViewportBehavior {
        &mut *self.behavior
    }
}
