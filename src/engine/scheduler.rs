use std::{
    cell::RefCell,
    collections::{HashSet, VecDeque},
    rc::{Rc, Weak},
};

use crate::{engine::rendering_engine::RenderingEngine, foundation::error::TilemuxResult};

/// Token identifying one armed display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(pub u64);

/// Display-refresh scheduling primitive supplied by the host.
///
/// `arm_next_tick` schedules exactly one future call to [`RenderingEngine::on_tick`] with the
/// returned handle. `cancel` revokes an armed handle; a later tick for it is ignored anyway.
pub trait TickSource {
    fn arm_next_tick(&mut self) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Default)]
struct ManualQueue {
    next: u64,
    queue: VecDeque<TickHandle>,
    armed_total: u64,
}

/// FIFO [`TickSource`] for headless hosts and tests. Clones share one queue.
#[derive(Clone, Debug, Default)]
pub struct ManualTickSource {
    inner: Rc<RefCell<ManualQueue>>,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&self) -> Option<TickHandle> {
        self.inner.borrow_mut().queue.pop_front()
    }

    pub fn pending_ticks(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Number of ticks armed over the lifetime of the source.
    pub fn armed_count(&self) -> u64 {
        self.inner.borrow().armed_total
    }

    /// Fire queued ticks into `engine` until the queue is empty or `max_ticks` fired.
    /// Returns the number of ticks fired.
    pub fn drain(&self, engine: &mut RenderingEngine, max_ticks: usize) -> TilemuxResult<usize> {
        let mut fired = 0;
        while fired < max_ticks {
            let Some(handle) = self.pop() else {
                break;
            };
            engine.on_tick(handle)?;
            fired += 1;
        }
        Ok(fired)
    }
}

impl TickSource for ManualTickSource {
    fn arm_next_tick(&mut self) -> TickHandle {
        let mut q = self.inner.borrow_mut();
        q.next += 1;
        q.armed_total += 1;
        let handle = TickHandle(q.next);
        q.queue.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.inner.borrow_mut().queue.retain(|h| *h != handle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Armed(TickHandle),
}

/// Coalesces render requests into at most one armed pump.
pub struct FrameScheduler {
    pending: HashSet<String>,
    state: SchedulerState,
    ticks: Box<dyn TickSource>,
    closed: bool,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending)
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl FrameScheduler {
    pub fn new(ticks: Box<dyn TickSource>) -> Self {
        Self {
            pending: HashSet::new(),
            state: SchedulerState::Idle,
            ticks,
            closed: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SchedulerState::Armed(_))
    }

    pub fn pending(&self) -> &HashSet<String> {
        &self.pending
    }

    /// Returns `false` once the scheduler is closed; the ids are then dropped.
    pub fn request_render<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.closed {
            tracing::trace!("render request ignored: scheduler closed");
            return false;
        }
        self.pending.extend(ids.into_iter().map(Into::into));
        if self.state == SchedulerState::Idle && !self.pending.is_empty() {
            let handle = self.ticks.arm_next_tick();
            tracing::trace!(handle = handle.0, "pump armed");
            self.state = SchedulerState::Armed(handle);
        }
        true
    }

    /// Start a pump for `handle`, taking the pending set as the cycle's set.
    ///
    /// Returns `None` for a stale or cancelled handle. The scheduler is Idle on return, so
    /// requests made while the cycle is dispatched arm a fresh pump.
    pub fn begin_cycle(&mut self, handle: TickHandle) -> Option<HashSet<String>> {
        match self.state {
            SchedulerState::Armed(armed) if armed == handle => {
                self.state = SchedulerState::Idle;
                Some(std::mem::take(&mut self.pending))
            }
            _ => {
                tracing::trace!(handle = handle.0, "stale tick ignored");
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.pending.remove(id);
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
        if let SchedulerState::Armed(handle) = self.state {
            self.ticks.cancel(handle);
            tracing::trace!(handle = handle.0, "pump cancelled");
        }
        self.state = SchedulerState::Idle;
    }

    /// Cancel and refuse all later requests.
    pub fn close(&mut self) {
        self.cancel();
        self.closed = true;
    }
}

/// Cloneable handle for requesting renders, including from inside a dispatch.
///
/// It does not keep the scheduler alive; requests after the engine is dropped are ignored.
#[derive(Clone, Debug)]
pub struct RenderRequester {
    scheduler: Weak<RefCell<FrameScheduler>>,
}

impl RenderRequester {
    pub(crate) fn new(scheduler: &Rc<RefCell<FrameScheduler>>) -> Self {
        Self {
            scheduler: Rc::downgrade(scheduler),
        }
    }

    /// Returns `false` when the request could not be recorded: the engine is gone or
    /// destroyed, or the scheduler is mid-update.
    pub fn request_render<I, S>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut s) = scheduler.try_borrow_mut() else {
            tracing::warn!("render request dropped: scheduler busy");
            return false;
        };
        s.request_render(ids)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;
