use crate::{
    foundation::core::Background,
    render::surface::OutputTarget,
    viewport::{behavior::ViewportBehavior, kind::ViewportKind},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Axial,
    Sagittal,
    Coronal,
}

/// A custom display area: which fraction of the image fills the viewport.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplayArea {
    pub image_area: [f64; 2],
    pub image_canvas_point: Option<[f64; 2]>,
    pub store_as_initial_camera: bool,
}

impl Default for DisplayArea {
    fn default() -> Self {
        Self {
            image_area: [1.0, 1.0],
            image_canvas_point: None,
            store_as_initial_camera: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportOptions {
    pub background: Option<Background>,
    pub orientation: Option<Orientation>,
    pub display_area: Option<DisplayArea>,
}

impl ViewportOptions {
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.orientation.is_none() && self.display_area.is_none()
    }

    /// Fill in defaults for an empty option set: black background, and an axial orientation
    /// for orthographic viewports. Non-empty options are kept as given.
    pub fn normalized(self, kind: ViewportKind) -> Self {
        if !self.is_empty() {
            return self;
        }
        Self {
            background: Some(Background::BLACK),
            orientation: (kind == ViewportKind::Orthographic).then_some(Orientation::Axial),
            display_area: None,
        }
    }
}

/// Everything needed to enable one viewport.
pub struct ViewportInput {
    pub id: String,
    pub kind: ViewportKind,
    pub output: OutputTarget,
    pub default_options: ViewportOptions,
    pub suppress_events: bool,
    /// Overrides the engine's factory for this viewport.
    pub behavior: Option<Box<dyn ViewportBehavior>>,
}

impl std::fmt::Debug for ViewportInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportInput")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("default_options", &self.default_options)
            .field("suppress_events", &self.suppress_events)
            .field("custom_behavior", &self.behavior.is_some())
            .finish_non_exhaustive()
    }
}

impl ViewportInput {
    pub fn new(id: impl Into<String>, kind: ViewportKind, output: OutputTarget) -> Self {
        Self {
            id: id.into(),
            kind,
            output,
            default_options: ViewportOptions::default(),
            suppress_events: false,
            behavior: None,
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.default_options.background = Some(background);
        self
    }

    pub fn with_options(mut self, options: ViewportOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_suppress_events(mut self, suppress: bool) -> Self {
        self.suppress_events = suppress;
        self
    }

    pub fn with_behavior(mut self, behavior: Box<dyn ViewportBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn normalized(mut self) -> Self {
        self.default_options = self.default_options.normalized(self.kind);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/input.rs"]
mod tests;
