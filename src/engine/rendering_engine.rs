use std::{cell::RefCell, collections::HashSet, rc::Rc};

use crate::{
    engine::{
        config::EngineConfig,
        dispatch::{DispatchOptions, debug_pass, dispatch_cycle},
        engine_registry::EngineRegistry,
        events::{EngineEvent, EventBus, ListenerId},
        registry::ViewportRegistry,
        scheduler::{FrameScheduler, RenderRequester, SchedulerState, TickHandle, TickSource},
        tiling::TileLayout,
    },
    foundation::{
        core::{Background, PixelSize, Rect, TileRect},
        error::{TilemuxError, TilemuxResult},
    },
    render::{
        cpu::CpuSceneRenderer,
        offscreen::OffscreenSurface,
        scene::{SceneRenderer, SubRenderer},
        surface::{FrameRGBA, OutputTarget},
    },
    viewport::{
        Pipeline, Viewport,
        behavior::{Presentation, StandardViewportFactory, ViewportContext, ViewportFactory},
        input::ViewportInput,
        kind::{ViewportKind, ViewportStatus},
    },
};

/// Collaborators injected into an engine.
pub struct EngineServices {
    /// Required unless the engine runs CPU-only.
    pub scene: Option<Box<dyn SceneRenderer>>,
    pub ticks: Box<dyn TickSource>,
    pub factory: Box<dyn ViewportFactory>,
}

impl EngineServices {
    /// [`CpuSceneRenderer`] plus [`StandardViewportFactory`], driven by `ticks`.
    pub fn new(ticks: impl TickSource + 'static) -> Self {
        Self {
            scene: Some(Box::new(CpuSceneRenderer::new())),
            ticks: Box::new(ticks),
            factory: Box::new(StandardViewportFactory),
        }
    }

    pub fn with_scene(mut self, scene: impl SceneRenderer + 'static) -> Self {
        self.scene = Some(Box::new(scene));
        self
    }

    pub fn without_scene(mut self) -> Self {
        self.scene = None;
        self
    }

    pub fn with_factory(mut self, factory: impl ViewportFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }
}

/// What one call to [`RenderingEngine::on_tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub handle: TickHandle,
    /// `false` when the handle was stale and nothing ran.
    pub fired: bool,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
}

impl TickReport {
    fn idle(handle: TickHandle) -> Self {
        Self {
            handle,
            fired: false,
            rendered: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Multiplexes viewports onto one shared offscreen surface and pumps their renders.
pub struct RenderingEngine {
    id: String,
    config: EngineConfig,
    offscreen: OffscreenSurface,
    registry: ViewportRegistry,
    scheduler: Rc<RefCell<FrameScheduler>>,
    factory: Box<dyn ViewportFactory>,
    events: EventBus,
    engines: Option<EngineRegistry>,
    destroyed: bool,
}

impl std::fmt::Debug for RenderingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingEngine")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("offscreen", &self.offscreen)
            .field("registry", &self.registry)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl RenderingEngine {
    pub fn new(config: EngineConfig, services: EngineServices) -> TilemuxResult<Self> {
        config.validate()?;
        let EngineServices {
            scene,
            ticks,
            factory,
        } = services;

        let scene = if config.cpu_only {
            if scene.is_some() {
                tracing::debug!("cpu_only engine: scene renderer unused");
            }
            None
        } else {
            Some(scene.ok_or_else(|| {
                TilemuxError::validation("a scene renderer is required unless cpu_only is set")
            })?)
        };

        let id = config.resolve_id();
        tracing::debug!(engine = %id, cpu_only = config.cpu_only, "engine created");
        Ok(Self {
            id,
            config,
            offscreen: OffscreenSurface::new(scene),
            registry: ViewportRegistry::new(),
            scheduler: Rc::new(RefCell::new(FrameScheduler::new(ticks))),
            factory,
            events: EventBus::default(),
            engines: None,
            destroyed: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn attach_registry(&mut self, engines: EngineRegistry) {
        self.engines = Some(engines);
    }

    /// Handle for requesting renders from viewport behaviours and listeners.
    pub fn requester(&self) -> RenderRequester {
        RenderRequester::new(&self.scheduler)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Fill `output` with an opaque colour, black when `color` is `None`.
    pub fn fill_background(output: &OutputTarget, color: Option<Background>) {
        output.fill_background(color);
    }

    fn ensure_alive(&self) -> TilemuxResult<()> {
        if self.destroyed {
            return Err(TilemuxError::Destroyed);
        }
        Ok(())
    }

    fn classify(&self, kind: ViewportKind) -> Pipeline {
        if self.config.cpu_only || kind.uses_custom_pipeline() {
            Pipeline::Custom
        } else {
            Pipeline::Shared
        }
    }

    fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            cpu_only: self.config.cpu_only,
            min_tile_size: self.config.min_tile_size,
        }
    }

    fn shared_participants(&self) -> Vec<(String, PixelSize)> {
        self.registry
            .iter()
            .filter(|v| v.pipeline == Pipeline::Shared)
            .map(|v| (v.id.clone(), v.pixel_size))
            .collect()
    }

    // Re-pack the full participant set and push the new rects into the viewports.
    fn retile(&mut self, participants: &[(String, PixelSize)]) -> TilemuxResult<()> {
        let layout = self
            .offscreen
            .retile(participants.iter().map(|(id, s)| (id.as_str(), *s)))?;
        for vp in self
            .registry
            .iter_mut()
            .filter(|v| v.pipeline == Pipeline::Shared)
        {
            if let Some(tile) = layout.tile(&vp.id) {
                vp.tile = tile.rect;
                vp.normalized = tile.normalized;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, input), fields(engine = %self.id, viewport = %input.id, kind = %input.kind))]
    pub fn enable_element(&mut self, input: ViewportInput) -> TilemuxResult<()> {
        let input = input.normalized();
        self.ensure_alive()?;

        if self.registry.contains(&input.id) {
            self.disable_element(&input.id)?;
        }

        match self.classify(input.kind) {
            Pipeline::Shared => self.enable_shared(vec![input]),
            Pipeline::Custom => self.enable_custom(input),
        }
    }

    // Tiles all `inputs` together with the shared viewports already registered.
    fn enable_shared(&mut self, inputs: Vec<ViewportInput>) -> TilemuxResult<()> {
        let dpr = self.config.device_pixel_ratio;
        let mut sized = Vec::with_capacity(inputs.len());
        for input in inputs {
            let size = input.output.client_size().scaled(dpr);
            input.output.set_pixel_size(size)?;
            sized.push((input, size));
        }

        let mut participants = self.shared_participants();
        participants.extend(sized.iter().map(|(i, s)| (i.id.clone(), *s)));
        self.retile(&participants)?;

        for (input, size) in sized {
            let tile = self.offscreen.layout().tile(&input.id).cloned().ok_or_else(|| {
                TilemuxError::render(format!("no tile allocated for viewport '{}'", input.id))
            })?;
            let background = input.default_options.background.unwrap_or_default();
            self.offscreen
                .add_sub_renderer(&input.id, tile.normalized, background)?;

            let id = input.id.clone();
            if let Err(err) = self.register(input, Pipeline::Shared, size, tile.rect, tile.normalized)
            {
                self.offscreen.remove_sub_renderer(&id);
                return Err(err);
            }
        }
        Ok(())
    }

    fn enable_custom(&mut self, input: ViewportInput) -> TilemuxResult<()> {
        let size = input.output.client_size();
        input.output.set_pixel_size(size)?;
        self.register(
            input,
            Pipeline::Custom,
            size,
            TileRect::full(size),
            Rect::new(0.0, 0.0, 1.0, 1.0),
        )
    }

    fn register(
        &mut self,
        input: ViewportInput,
        pipeline: Pipeline,
        pixel_size: PixelSize,
        tile: TileRect,
        normalized: Rect,
    ) -> TilemuxResult<()> {
        let ViewportInput {
            id,
            kind,
            output,
            default_options,
            suppress_events,
            behavior,
        } = input;

        let behavior = match behavior {
            Some(b) => b,
            None => self.factory.create(&ViewportContext {
                id: id.clone(),
                kind,
                engine_id: self.id.clone(),
                pipeline,
                pixel_size,
                normalized_rect: normalized,
                options: default_options.clone(),
                requester: self.requester(),
            })?,
        };

        let background = default_options.background;
        self.registry.add(Viewport {
            id: id.clone(),
            kind,
            pipeline,
            output: output.downgrade(),
            pixel_size,
            tile,
            normalized,
            is_disabled: false,
            suppress_events,
            engine_id: self.id.clone(),
            status: ViewportStatus::NoData,
            options: default_options,
            behavior,
        });

        output.fill_background(background);
        if !suppress_events {
            self.events.emit(&EngineEvent::ElementEnabled {
                output,
                viewport_id: id.clone(),
                engine_id: self.id.clone(),
            });
        }
        tracing::debug!(viewport = %id, ?pipeline, sx = tile.sx, width = tile.s_width, height = tile.s_height, "viewport enabled");
        Ok(())
    }

    /// Disable a viewport and re-pack the remaining shared-surface tiles. Unknown ids are
    /// ignored with a warning.
    #[tracing::instrument(skip(self), fields(engine = %self.id))]
    pub fn disable_element(&mut self, id: &str) -> TilemuxResult<()> {
        self.ensure_alive()?;
        if !self.registry.contains(id) {
            tracing::warn!(viewport = id, "disable requested for unknown viewport");
            return Ok(());
        }
        let pipeline = self.reset_viewport(id);
        if pipeline == Some(Pipeline::Shared) {
            let participants = self.shared_participants();
            self.retile(&participants)?;
        }
        if self.registry.is_empty() {
            self.scheduler.borrow_mut().cancel();
        }
        Ok(())
    }

    // Returns the pipeline of the removed viewport. Does not re-tile.
    fn reset_viewport(&mut self, id: &str) -> Option<Pipeline> {
        let Some(vp) = self.registry.get_mut(id) else {
            return None;
        };
        vp.is_disabled = true;
        let output = vp.output.upgrade();
        let suppress = vp.suppress_events;
        let pipeline = vp.pipeline;

        if let Some(output) = output {
            if !suppress {
                self.events.emit(&EngineEvent::ElementDisabled {
                    output: output.clone(),
                    viewport_id: id.to_string(),
                    engine_id: self.id.clone(),
                });
            }
            output.clear();
        }
        if pipeline == Pipeline::Shared {
            self.offscreen.remove_sub_renderer(id);
        }
        self.registry.remove(id);
        self.scheduler.borrow_mut().remove(id);
        tracing::debug!(viewport = id, "viewport disabled");
        Some(pipeline)
    }

    fn reset(&mut self) {
        for id in self.registry.ids() {
            self.reset_viewport(&id);
        }
        self.offscreen.clear_layout();
        self.scheduler.borrow_mut().cancel();
    }

    /// Replace every viewport with `inputs`. Shared-surface viewports are tiled in one pass
    /// and registered first, in input order, followed by custom-pipeline viewports.
    #[tracing::instrument(skip_all, fields(engine = %self.id, count = inputs.len()))]
    pub fn set_viewports(&mut self, inputs: Vec<ViewportInput>) -> TilemuxResult<()> {
        let inputs: Vec<ViewportInput> =
            inputs.into_iter().map(ViewportInput::normalized).collect();
        self.ensure_alive()?;

        let mut seen = HashSet::new();
        for input in &inputs {
            if !seen.insert(input.id.as_str()) {
                return Err(TilemuxError::validation(format!(
                    "duplicate viewport id '{}'",
                    input.id
                )));
            }
        }

        self.reset();

        let (shared, custom): (Vec<_>, Vec<_>) = inputs
            .into_iter()
            .partition(|i| self.classify(i.kind) == Pipeline::Shared);
        if !shared.is_empty() {
            self.enable_shared(shared)?;
        }
        for input in custom {
            self.enable_custom(input)?;
        }
        Ok(())
    }

    /// Re-read every output's displayed size, re-tile, and optionally render at once.
    #[tracing::instrument(skip(self), fields(engine = %self.id))]
    pub fn resize(&mut self, immediate: bool, keep_camera: bool) -> TilemuxResult<()> {
        self.ensure_alive()?;
        let dpr = self.config.device_pixel_ratio;

        for vp in self.registry.iter_mut() {
            let Some(output) = vp.output.upgrade() else {
                continue;
            };
            let size = match vp.pipeline {
                Pipeline::Shared => output.client_size().scaled(dpr),
                Pipeline::Custom => output.client_size(),
            };
            output.set_pixel_size(size)?;
            vp.pixel_size = size;
            if vp.pipeline == Pipeline::Custom {
                vp.tile = TileRect::full(size);
            }
        }

        let participants = self.shared_participants();
        self.retile(&participants)?;

        for vp in self.registry.iter_mut() {
            let size = vp.pixel_size;
            let behavior = &mut *vp.behavior;
            let prev = behavior.camera();
            let rotation = behavior.rotation();

            behavior.resize(size);
            behavior.reset_camera();
            if keep_camera {
                if behavior.display_area().is_some() {
                    let mut camera = behavior.camera();
                    camera.flip_horizontal = prev.flip_horizontal;
                    behavior.set_camera(camera);
                } else {
                    behavior.set_camera(prev);
                }
                behavior.set_presentation(Presentation { rotation });
            }
            vp.status = ViewportStatus::Resize;
        }

        if immediate {
            self.render()?;
        }
        Ok(())
    }

    /// Request a render of every viewport.
    pub fn render(&mut self) -> TilemuxResult<()> {
        self.ensure_alive()?;
        let ids = self.registry.ids();
        self.scheduler.borrow_mut().request_render(ids);
        Ok(())
    }

    pub fn render_viewports<I, S>(&mut self, ids: I) -> TilemuxResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_alive()?;
        self.scheduler.borrow_mut().request_render(ids);
        Ok(())
    }

    pub fn render_viewport(&mut self, id: &str) -> TilemuxResult<()> {
        self.render_viewports([id])
    }

    /// Request a render of every viewport showing frame of reference `uid`.
    pub fn render_frame_of_reference(&mut self, uid: &str) -> TilemuxResult<()> {
        self.ensure_alive()?;
        let ids: Vec<String> = self
            .registry
            .iter()
            .filter(|v| v.behavior.frame_of_reference_uid() == Some(uid))
            .map(|v| v.id.clone())
            .collect();
        self.scheduler.borrow_mut().request_render(ids);
        Ok(())
    }

    /// Pump entry point, called by the host for each armed [`TickHandle`].
    ///
    /// Completion events are emitted before any custom-pipeline error is returned.
    #[tracing::instrument(skip(self), fields(engine = %self.id, handle = handle.0))]
    pub fn on_tick(&mut self, handle: TickHandle) -> TilemuxResult<TickReport> {
        if self.destroyed {
            return Ok(TickReport::idle(handle));
        }
        let cycle = self.scheduler.borrow_mut().begin_cycle(handle);
        let Some(cycle) = cycle else {
            return Ok(TickReport::idle(handle));
        };

        let opts = self.dispatch_options();
        let outcome = dispatch_cycle(&mut self.offscreen, &mut self.registry, cycle, opts)?;
        for event in &outcome.events {
            self.events.emit(event);
        }
        if let Some(err) = outcome.error {
            return Err(err);
        }
        tracing::debug!(
            rendered = outcome.rendered.len(),
            skipped = outcome.skipped.len(),
            "pump complete"
        );
        Ok(TickReport {
            handle,
            fired: true,
            rendered: outcome.rendered,
            skipped: outcome.skipped,
        })
    }

    /// Draw and blit every shared-surface viewport now and return the composed offscreen
    /// buffer. Pending state and events are untouched.
    pub fn debug_render(&mut self) -> TilemuxResult<FrameRGBA> {
        self.ensure_alive()?;
        let opts = self.dispatch_options();
        debug_pass(&mut self.offscreen, &self.registry, opts)
    }

    pub fn get_viewport(&self, id: &str) -> Option<&Viewport> {
        self.registry.get(id)
    }

    pub fn get_viewport_mut(&mut self, id: &str) -> Option<&mut Viewport> {
        self.registry.get_mut(id)
    }

    pub fn get_viewports(&self) -> TilemuxResult<Vec<&Viewport>> {
        self.ensure_alive()?;
        Ok(self.registry.iter().collect())
    }

    pub fn get_viewports_of_kind(&self, kind: ViewportKind) -> TilemuxResult<Vec<&Viewport>> {
        self.ensure_alive()?;
        Ok(self.registry.of_kind(|k| k == kind))
    }

    pub fn get_stack_viewport(&self, id: &str) -> TilemuxResult<&Viewport> {
        self.ensure_alive()?;
        let vp = self
            .registry
            .get(id)
            .ok_or_else(|| TilemuxError::ViewportNotFound(id.to_string()))?;
        if vp.kind != ViewportKind::Stack {
            return Err(TilemuxError::WrongKind {
                id: id.to_string(),
                expected: "stack",
            });
        }
        Ok(vp)
    }

    pub fn get_stack_viewports(&self) -> TilemuxResult<Vec<&Viewport>> {
        self.get_viewports_of_kind(ViewportKind::Stack)
    }

    pub fn get_volume_viewports(&self) -> TilemuxResult<Vec<&Viewport>> {
        self.ensure_alive()?;
        Ok(self.registry.of_kind(ViewportKind::is_volume))
    }

    pub fn tile_layout(&self) -> &TileLayout {
        self.offscreen.layout()
    }

    pub fn offscreen_size(&self) -> PixelSize {
        self.offscreen.size()
    }

    pub fn offscreen_frame(&self) -> Option<&FrameRGBA> {
        self.offscreen.frame()
    }

    pub fn sub_renderer(&self, id: &str) -> Option<&SubRenderer> {
        self.offscreen.sub_renderer(id)
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.borrow().state()
    }

    /// Pending ids, sorted.
    pub fn pending_render_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.scheduler.borrow().pending().iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Release the shared surface and every viewport. Later calls fail with
    /// [`TilemuxError::Destroyed`]; destroying twice is a no-op.
    #[tracing::instrument(skip(self), fields(engine = %self.id))]
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.offscreen.release();
        self.reset();
        self.scheduler.borrow_mut().close();
        if let Some(engines) = self.engines.take() {
            engines.remove(&self.id);
        }
        self.destroyed = true;
        tracing::debug!("engine destroyed");
    }
}
