use crate::foundation::{
    core::generate_engine_id,
    error::{TilemuxError, TilemuxResult},
};

/// Smallest tile side, in pixels, the pipelines can draw.
pub const VIEWPORT_MIN_SIZE: u32 = 2;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine identifier. Generated when absent.
    pub id: Option<String>,
    /// Run without a shared scene renderer; every viewport uses a custom pipeline.
    pub cpu_only: bool,
    pub device_pixel_ratio: f64,
    pub min_tile_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id: None,
            cpu_only: false,
            device_pixel_ratio: 1.0,
            min_tile_size: VIEWPORT_MIN_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn cpu_only(mut self, cpu_only: bool) -> Self {
        self.cpu_only = cpu_only;
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn validate(&self) -> TilemuxResult<()> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(TilemuxError::validation(format!(
                "device_pixel_ratio must be finite and > 0, got {}",
                self.device_pixel_ratio
            )));
        }
        if let Some(id) = &self.id
            && id.trim().is_empty()
        {
            return Err(TilemuxError::validation("engine id must not be empty"));
        }
        Ok(())
    }

    /// The configured id, or a freshly generated one.
    pub fn resolve_id(&self) -> String {
        self.id.clone().unwrap_or_else(generate_engine_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
