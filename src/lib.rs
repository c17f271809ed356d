//! tilemux multiplexes many independent viewports onto one shared offscreen surface.
//!
//! A [`RenderingEngine`] owns three pieces:
//!
//! 1. **Tiling**: GPU-driven viewports are packed left to right onto the shared surface
//!    (`width = Σw`, `height = max(h)`), each with a pixel [`TileRect`] and a normalized
//!    display-space rectangle for its [`SubRenderer`].
//! 2. **Scheduling**: render requests from anywhere coalesce into a single pending set and
//!    at most one armed pump, driven by a host [`TickSource`].
//! 3. **Dispatch**: when a tick fires, one shared draw call renders every flagged
//!    sub-renderer, then each viewport is either blitted from the shared surface or drawn
//!    by its own [`CustomRenderer`].
//!
//! Everything is single-threaded and synchronous within a tick. Re-entrant render
//! requests (from a viewport's own render, or from an event listener holding a
//! [`RenderRequester`]) arm a new pump instead of running nested.
//!
//! Pixels are premultiplied RGBA8 throughout. [`CpuSceneRenderer`] is the reference scene
//! renderer, built on `vello_cpu`.
#![forbid(unsafe_code)]

mod engine;
mod foundation;
mod layout;
mod render;
mod viewport;

pub use engine::config::{EngineConfig, VIEWPORT_MIN_SIZE};
pub use engine::engine_registry::{EngineRegistry, SharedEngine};
pub use engine::events::{EngineEvent, EventBus, ListenerId};
pub use engine::registry::ViewportRegistry;
pub use engine::rendering_engine::{EngineServices, RenderingEngine, TickReport};
pub use engine::scheduler::{
    FrameScheduler, ManualTickSource, RenderRequester, SchedulerState, TickHandle, TickSource,
};
pub use engine::tiling::{Tile, TileLayout, normalized_rect, pack_tiles};
pub use foundation::core::{
    Background, MAX_SURFACE_DIM, PixelSize, Rect, TileRect, generate_engine_id,
};
pub use foundation::error::{TilemuxError, TilemuxResult};
pub use layout::doc::{
    Composed, LayoutDoc, MAX_TICKS_PER_FRAME, ViewportEntry, compose_layout, plan_layout,
};
pub use render::composite::blit_tile;
pub use render::cpu::CpuSceneRenderer;
pub use render::offscreen::OffscreenSurface;
pub use render::scene::{SceneRenderer, SubRenderer};
pub use render::surface::{FrameRGBA, OutputTarget, WeakOutputTarget};
pub use viewport::behavior::{
    BackgroundFill, Camera, CustomRenderer, Presentation, StandardViewport,
    StandardViewportFactory, ViewportBehavior, ViewportContext, ViewportFactory,
};
pub use viewport::input::{DisplayArea, Orientation, ViewportInput, ViewportOptions};
pub use viewport::kind::{ViewportKind, ViewportStatus};
pub use viewport::{Pipeline, Viewport};
