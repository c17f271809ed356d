use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use crate::{
    engine::{
        config::EngineConfig,
        rendering_engine::{EngineServices, RenderingEngine},
    },
    foundation::error::{TilemuxError, TilemuxResult},
};

pub type SharedEngine = Rc<RefCell<RenderingEngine>>;

/// Lookup of live engines by id.
///
/// Holds weak references only: an engine dropped without `destroy()` disappears from
/// lookups on its own. Clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct EngineRegistry {
    engines: Rc<RefCell<BTreeMap<String, Weak<RefCell<RenderingEngine>>>>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine and register it under its id.
    pub fn create_engine(
        &self,
        config: EngineConfig,
        services: EngineServices,
    ) -> TilemuxResult<SharedEngine> {
        let mut engine = RenderingEngine::new(config, services)?;
        let id = engine.id().to_string();
        if self.get(&id).is_some() {
            return Err(TilemuxError::validation(format!(
                "an engine with id '{id}' already exists"
            )));
        }
        engine.attach_registry(self.clone());

        let shared = Rc::new(RefCell::new(engine));
        self.engines
            .borrow_mut()
            .insert(id.clone(), Rc::downgrade(&shared));
        tracing::debug!(engine = %id, "engine registered");
        Ok(shared)
    }

    pub fn get(&self, id: &str) -> Option<SharedEngine> {
        self.engines.borrow().get(id).and_then(Weak::upgrade)
    }

    pub fn ids(&self) -> Vec<String> {
        self.prune();
        self.engines.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.prune();
        self.engines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn remove(&self, id: &str) {
        self.engines.borrow_mut().remove(id);
    }

    fn prune(&self) {
        self.engines
            .borrow_mut()
            .retain(|_, engine| engine.strong_count() > 0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine_registry.rs"]
mod tests;
