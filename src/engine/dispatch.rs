use std::collections::HashSet;

use crate::{
    engine::{events::EngineEvent, registry::ViewportRegistry},
    foundation::error::{TilemuxError, TilemuxResult},
    render::{
        composite::blit_tile,
        offscreen::OffscreenSurface,
        surface::{FrameRGBA, OutputTarget},
    },
    viewport::{Pipeline, Viewport, kind::ViewportStatus},
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct DispatchOptions {
    pub cpu_only: bool,
    pub min_tile_size: u32,
}

/// What one pump did. Events are not yet emitted.
#[derive(Debug, Default)]
pub(crate) struct CycleOutcome {
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
    pub events: Vec<EngineEvent>,
    /// The first custom-pipeline failure, or the fatal error that stopped the cycle.
    pub error: Option<TilemuxError>,
}

/// Draw every viewport in `cycle`, in registry order.
///
/// Scene renderer failures abort the cycle before any viewport is visited. A custom
/// renderer failure is recorded and the cycle continues; a fatal error stops it.
#[tracing::instrument(skip_all, fields(pending = cycle.len()))]
pub(crate) fn dispatch_cycle(
    offscreen: &mut OffscreenSurface,
    registry: &mut ViewportRegistry,
    mut cycle: HashSet<String>,
    opts: DispatchOptions,
) -> TilemuxResult<CycleOutcome> {
    offscreen.draw_pass(&cycle)?;
    let frame = offscreen.frame();

    let mut out = CycleOutcome::default();
    for vp in registry.iter_mut() {
        if cycle.is_empty() {
            break;
        }
        if !cycle.remove(&vp.id) || vp.is_disabled {
            continue;
        }

        match draw_viewport(frame, vp, opts) {
            Ok(Some(output)) => {
                vp.status = ViewportStatus::Rendered;
                out.rendered.push(vp.id.clone());
                if !vp.suppress_events {
                    out.events.push(EngineEvent::ImageRendered {
                        output,
                        viewport_id: vp.id.clone(),
                        engine_id: vp.engine_id.clone(),
                        suppress_events: vp.suppress_events,
                        status: vp.status,
                    });
                }
            }
            Ok(None) => out.skipped.push(vp.id.clone()),
            Err(err) if err.is_fatal() => {
                out.error = Some(err);
                break;
            }
            Err(err) => {
                tracing::warn!(viewport = %vp.id, error = %err, "viewport render failed");
                out.skipped.push(vp.id.clone());
                if out.error.is_none() {
                    out.error = Some(err);
                }
            }
        }
    }

    if !cycle.is_empty() {
        tracing::trace!(discarded = cycle.len(), "pending ids without a viewport dropped");
    }
    Ok(out)
}

/// `Ok(None)` when the viewport was skipped.
fn draw_viewport(
    frame: Option<&FrameRGBA>,
    vp: &mut Viewport,
    opts: DispatchOptions,
) -> TilemuxResult<Option<OutputTarget>> {
    if vp.tile.is_smaller_than(opts.min_tile_size) {
        tracing::warn!(
            viewport = %vp.id,
            width = vp.tile.s_width,
            height = vp.tile.s_height,
            "tile below minimum drawable size, skipped"
        );
        return Ok(None);
    }

    if let Some(renderer) = vp.behavior.custom_renderer() {
        let Some(output) = vp.output.upgrade() else {
            tracing::warn!(viewport = %vp.id, "output target dropped, skipped");
            return Ok(None);
        };
        output.with_pixels_mut(|buf| renderer.render_to_surface(buf))?;
        return Ok(Some(output));
    }

    if opts.cpu_only {
        return Err(TilemuxError::GpuUnavailable(vp.id.clone()));
    }
    if vp.pipeline == Pipeline::Custom {
        return Err(TilemuxError::validation(format!(
            "viewport '{}' uses a custom pipeline but has no custom renderer",
            vp.id
        )));
    }
    let Some(frame) = frame else {
        return Err(TilemuxError::render("shared scene renderer unavailable"));
    };
    let Some(output) = vp.output.upgrade() else {
        tracing::warn!(viewport = %vp.id, "output target dropped, skipped");
        return Ok(None);
    };
    output.with_pixels_mut(|dst| blit_tile(frame, vp.tile, dst))?;
    Ok(Some(output))
}

/// Draw every sub-renderer and blit every shared-surface viewport, ignoring pending state.
pub(crate) fn debug_pass(
    offscreen: &mut OffscreenSurface,
    registry: &ViewportRegistry,
    opts: DispatchOptions,
) -> TilemuxResult<FrameRGBA> {
    let shared: HashSet<String> = registry
        .iter()
        .filter(|v| v.pipeline == Pipeline::Shared)
        .map(|v| v.id.clone())
        .collect();
    offscreen.draw_pass(&shared)?;

    let Some(frame) = offscreen.frame() else {
        return Ok(FrameRGBA::default());
    };
    for vp in registry.iter().filter(|v| v.pipeline == Pipeline::Shared) {
        if vp.tile.is_smaller_than(opts.min_tile_size) {
            continue;
        }
        if let Some(output) = vp.output.upgrade() {
            output.with_pixels_mut(|dst| blit_tile(frame, vp.tile, dst))?;
        }
    }
    Ok(frame.clone())
}
