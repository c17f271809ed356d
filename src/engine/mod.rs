pub mod config;
pub(crate) mod dispatch;
pub mod engine_registry;
pub mod events;
pub mod registry;
pub mod rendering_engine;
pub mod scheduler;
pub mod tiling;
