use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Viewport;
use crate::interaction::SettleTimer;
use crate::render::RenderMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Idle,
    /// A resize or layout-affecting change is settling; redraws are held back.
    Resizing,
}

/// Permission to run exactly one redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawTicket {
    pub mode: RenderMode,
    /// Monotonic redraw counter, starting at 1.
    pub sequence: u64,
    pub viewport: Viewport,
}

/// Debounced redraw state machine.
///
/// Viewport changes and tracked dependency changes move the scheduler to
/// [`SchedulerState::Resizing`] and (re)arm the settle timer. Once the timer
/// fires the scheduler returns to idle and hands out a single redraw ticket,
/// however many triggers arrived in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScheduler {
    state: SchedulerState,
    settle: SettleTimer,
    viewport: Viewport,
    dependencies: IndexMap<String, u64>,
    redraw_pending: bool,
    first_render: bool,
    sequence: u64,
    destroyed: bool,
}

impl RenderScheduler {
    /// New scheduler with the mount redraw already pending.
    #[must_use]
    pub fn new(viewport: Viewport, settle_ms: u64) -> Self {
        Self {
            state: SchedulerState::Idle,
            settle: SettleTimer::new(settle_ms),
            viewport,
            dependencies: IndexMap::new(),
            redraw_pending: true,
            first_render: true,
            sequence: 0,
            destroyed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.state == SchedulerState::Resizing
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn is_first_render(&self) -> bool {
        self.first_render
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.redraw_pending || self.is_resizing()
    }

    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.settle.deadline_ms()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Records a viewport notification; returns whether the size changed.
    pub fn on_viewport_resize(&mut self, viewport: Viewport, now_ms: u64) -> bool {
        if self.destroyed || viewport == self.viewport {
            return false;
        }
        trace!(
            width = viewport.width,
            height = viewport.height,
            now_ms,
            "viewport resize"
        );
        self.viewport = viewport;
        self.enter_resizing(now_ms);
        true
    }

    /// Tracks a layout-affecting value such as the visible metric count.
    ///
    /// The first observation of `key` only records it; later changes behave
    /// like a resize. Returns whether the value changed.
    pub fn track_dependency(&mut self, key: &str, value: u64, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        match self.dependencies.insert(key.to_owned(), value) {
            Some(previous) if previous != value => {
                trace!(key, previous, value, "tracked dependency changed");
                self.enter_resizing(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Asks for a redraw at the next poll; folded into the settle redraw while resizing.
    pub fn request_redraw(&mut self) {
        if !self.destroyed {
            self.redraw_pending = true;
        }
    }

    /// Advances the clock; yields a ticket when a redraw may run now.
    pub fn poll(&mut self, now_ms: u64) -> Option<RedrawTicket> {
        if self.destroyed {
            return None;
        }
        if self.is_resizing() {
            if !self.settle.poll(now_ms) {
                return None;
            }
            debug!(now_ms, "resize settled");
            self.state = SchedulerState::Idle;
            self.redraw_pending = true;
        }
        if !self.redraw_pending {
            return None;
        }
        self.redraw_pending = false;
        let mode = if self.first_render {
            RenderMode::Initial
        } else {
            RenderMode::Update
        };
        self.first_render = false;
        self.sequence += 1;
        Some(RedrawTicket {
            mode,
            sequence: self.sequence,
            viewport: self.viewport,
        })
    }

    /// Cancels the settle timer and drops pending work; later calls are no-ops.
    pub fn destroy(&mut self) {
        self.settle.cancel();
        self.state = SchedulerState::Idle;
        self.redraw_pending = false;
        self.destroyed = true;
    }

    fn enter_resizing(&mut self, now_ms: u64) {
        if !self.is_resizing() {
            debug!(now_ms, "scheduler entering resizing state");
        }
        self.state = SchedulerState::Resizing;
        self.settle.arm(now_ms);
    }
}
