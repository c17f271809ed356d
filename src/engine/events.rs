use crate::{render::surface::OutputTarget, viewport::kind::ViewportStatus};

/// Notifications emitted by the engine. Observers cannot veto or reply.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    ElementEnabled {
        output: OutputTarget,
        viewport_id: String,
        engine_id: String,
    },
    ElementDisabled {
        output: OutputTarget,
        viewport_id: String,
        engine_id: String,
    },
    ImageRendered {
        output: OutputTarget,
        viewport_id: String,
        engine_id: String,
        suppress_events: bool,
        status: ViewportStatus,
    },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ElementEnabled { .. } => "element_enabled",
            Self::ElementDisabled { .. } => "element_disabled",
            Self::ImageRendered { .. } => "image_rendered",
        }
    }

    pub fn viewport_id(&self) -> &str {
        match self {
            Self::ElementEnabled { viewport_id, .. }
            | Self::ElementDisabled { viewport_id, .. }
            | Self::ImageRendered { viewport_id, .. } => viewport_id,
        }
    }

    pub fn output(&self) -> &OutputTarget {
        match self {
            Self::ElementEnabled { output, .. }
            | Self::ElementDisabled { output, .. }
            | Self::ImageRendered { output, .. } => output,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&EngineEvent)>;

/// Synchronous observer list. Listeners run in subscription order.
#[derive(Default)]
pub struct EventBus {
    next: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &EngineEvent) {
        tracing::trace!(event = event.name(), viewport = event.viewport_id(), "emit");
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/events.rs"]
mod tests;
