use crate::viewport::{Viewport, kind::ViewportKind};

/// Enabled viewports in registration order.
#[derive(Debug, Default)]
pub struct ViewportRegistry {
    viewports: Vec<Viewport>,
}

impl ViewportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.viewports.iter().any(|v| v.id == id)
    }

    /// Append `viewport`. An existing entry with the same id is replaced and the new one
    /// goes to the end of the order.
    pub fn add(&mut self, viewport: Viewport) {
        if self.contains(&viewport.id) {
            self.remove(&viewport.id);
        }
        self.viewports.push(viewport);
    }

    /// Mark the viewport disabled and take it out of the registry.
    pub fn remove(&mut self, id: &str) -> Option<Viewport> {
        let Some(pos) = self.viewports.iter().position(|v| v.id == id) else {
            tracing::warn!(viewport = id, "remove requested for unknown viewport");
            return None;
        };
        let mut vp = self.viewports.remove(pos);
        vp.is_disabled = true;
        Some(vp)
    }

    pub fn get(&self, id: &str) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Viewport> {
        self.viewports.iter_mut().find(|v| v.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Viewport> {
        self.viewports.iter_mut()
    }

    pub fn ids(&self) -> Vec<String> {
        self.viewports.iter().map(|v| v.id.clone()).collect()
    }

    pub fn of_kind(&self, pred: impl Fn(ViewportKind) -> bool) -> Vec<&Viewport> {
        self.viewports.iter().filter(|v| pred(v.kind)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/registry.rs"]
mod tests;
