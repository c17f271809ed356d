use std::io::Read;

use crate::{
    engine::{
        config::EngineConfig,
        rendering_engine::{EngineServices, RenderingEngine},
        scheduler::ManualTickSource,
        tiling::TileLayout,
    },
    foundation::error::{TilemuxError, TilemuxResult},
    render::surface::{FrameRGBA, OutputTarget},
    viewport::{
        input::{ViewportInput, ViewportOptions},
        kind::ViewportKind,
    },
};

/// Upper bound on pump ticks per requested frame, so a viewport that re-requests itself
/// forever cannot hang a headless run.
pub const MAX_TICKS_PER_FRAME: usize = 16;

/// A JSON document describing an engine and its viewports.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutDoc {
    pub engine: EngineConfig,
    pub viewports: Vec<ViewportEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportEntry {
    pub id: String,
    pub kind: ViewportKind,
    /// Client width of the output element.
    pub width: u32,
    /// Client height of the output element.
    pub height: u32,
    #[serde(default)]
    pub options: ViewportOptions,
    #[serde(default)]
    pub suppress_events: bool,
}

impl LayoutDoc {
    pub fn from_json_str(s: &str) -> TilemuxResult<Self> {
        serde_json::from_str(s).map_err(|e| TilemuxError::serde(e.to_string()))
    }

    pub fn from_json_reader(r: impl Read) -> TilemuxResult<Self> {
        serde_json::from_reader(r).map_err(|e| TilemuxError::serde(e.to_string()))
    }

    pub fn validate(&self) -> TilemuxResult<()> {
        self.engine.validate()?;
        let mut seen = std::collections::HashSet::new();
        for vp in &self.viewports {
            if vp.id.trim().is_empty() {
                return Err(TilemuxError::validation("viewport id must not be empty"));
            }
            if !seen.insert(vp.id.as_str()) {
                return Err(TilemuxError::validation(format!(
                    "duplicate viewport id '{}'",
                    vp.id
                )));
            }
        }
        Ok(())
    }

    /// One output target per viewport entry, in document order.
    pub fn outputs(&self) -> Vec<OutputTarget> {
        self.viewports
            .iter()
            .map(|v| OutputTarget::new(v.id.clone(), v.width, v.height))
            .collect()
    }

    pub fn inputs(&self, outputs: &[OutputTarget]) -> Vec<ViewportInput> {
        self.viewports
            .iter()
            .zip(outputs)
            .map(|(v, out)| {
                ViewportInput::new(v.id.clone(), v.kind, out.clone())
                    .with_options(v.options.clone())
                    .with_suppress_events(v.suppress_events)
            })
            .collect()
    }

    fn build(&self) -> TilemuxResult<(RenderingEngine, ManualTickSource, Vec<OutputTarget>)> {
        self.validate()?;
        let ticks = ManualTickSource::new();
        let mut engine =
            RenderingEngine::new(self.engine.clone(), EngineServices::new(ticks.clone()))?;
        let outputs = self.outputs();
        engine.set_viewports(self.inputs(&outputs))?;
        Ok((engine, ticks, outputs))
    }
}

/// Pixels produced by [`compose_layout`].
#[derive(Clone, Debug)]
pub struct Composed {
    pub layout: TileLayout,
    /// `None` for a CPU-only engine.
    pub offscreen: Option<FrameRGBA>,
    /// Each viewport's output surface, in document order.
    pub outputs: Vec<(String, FrameRGBA)>,
    pub ticks: usize,
}

/// Tile the document's viewports without drawing anything.
pub fn plan_layout(doc: &LayoutDoc) -> TilemuxResult<TileLayout> {
    let (mut engine, _ticks, _outputs) = doc.build()?;
    let layout = engine.tile_layout().clone();
    engine.destroy();
    Ok(layout)
}

/// Enable the document's viewports on a headless engine, render `frames` times and
/// snapshot every surface.
#[tracing::instrument(skip(doc), fields(viewports = doc.viewports.len()))]
pub fn compose_layout(doc: &LayoutDoc, frames: u32) -> TilemuxResult<Composed> {
    let (mut engine, ticks, outputs) = doc.build()?;

    let mut fired = 0;
    for _ in 0..frames.max(1) {
        engine.render()?;
        fired += ticks.drain(&mut engine, MAX_TICKS_PER_FRAME)?;
    }

    let composed = Composed {
        layout: engine.tile_layout().clone(),
        offscreen: engine.offscreen_frame().cloned(),
        outputs: outputs.iter().map(|o| (o.id(), o.snapshot())).collect(),
        ticks: fired,
    };
    engine.destroy();
    Ok(composed)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/doc.rs"]
mod tests;
