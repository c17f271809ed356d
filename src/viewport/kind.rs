use std::{fmt, str::FromStr};

use crate::foundation::error::TilemuxError;

/// The kind of a viewport. It decides which render pipeline the viewport uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ViewportKind {
    Stack,
    Orthographic,
    Perspective,
    Volume3D,
    Video,
    WholeSlide,
}

impl ViewportKind {
    pub const ALL: [ViewportKind; 6] = [
        Self::Stack,
        Self::Orthographic,
        Self::Perspective,
        Self::Volume3D,
        Self::Video,
        Self::WholeSlide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Orthographic => "orthographic",
            Self::Perspective => "perspective",
            Self::Volume3D => "volume3d",
            Self::Video => "video",
            Self::WholeSlide => "wholeslide",
        }
    }

    /// Kinds that always draw through their own pipeline, never the shared surface.
    pub fn uses_custom_pipeline(self) -> bool {
        matches!(self, Self::Video | Self::WholeSlide)
    }

    /// Kinds that can draw without a GPU context.
    pub fn has_cpu_pipeline(self) -> bool {
        matches!(self, Self::Stack | Self::Video | Self::WholeSlide)
    }

    pub fn is_volume(self) -> bool {
        matches!(self, Self::Orthographic | Self::Perspective | Self::Volume3D)
    }
}

impl fmt::Display for ViewportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewportKind {
    type Err = TilemuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| TilemuxError::UnsupportedViewportKind(s.to_string()))
    }
}

impl TryFrom<String> for ViewportKind {
    type Error = TilemuxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewportKind> for &'static str {
    fn from(kind: ViewportKind) -> Self {
        kind.as_str()
    }
}

/// Lifecycle status reported with render notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportStatus {
    #[default]
    NoData,
    Loading,
    PreRender,
    Resize,
    Rendered,
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/kind.rs"]
mod tests;
