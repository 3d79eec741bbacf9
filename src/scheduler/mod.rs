//! Deferred callbacks on the single UI thread.
//!
//! Debounce, transition and chunk delays are fire-and-forget timers. The core
//! only sees the [`Scheduler`] trait; the browser runs them on
//! `window.setTimeout`, tests run them on a virtual clock.

mod browser;

pub use browser::BrowserScheduler;

use std::cell::{Cell, RefCell};

pub type Task = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub i32);

pub trait Scheduler {
    /// Milliseconds since an arbitrary epoch; used for generated block ids.
    fn now_ms(&self) -> i64;

    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId;

    /// Cancelling an already-fired or unknown timer is a no-op.
    fn clear_timeout(&self, id: TimerId);
}

struct Pending {
    due_ms: i64,
    id: TimerId,
    task: Task,
}

/// Deterministic virtual-time scheduler.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock. Tasks fire
/// in due-time order, ties in the order they were scheduled.
pub struct ManualScheduler {
    now_ms: Cell<i64>,
    next_id: Cell<i32>,
    pending: RefCell<Vec<Pending>>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ManualScheduler {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
            next_id: Cell::new(1),
            pending: RefCell::new(vec![]),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, running every task that falls due, including
    /// tasks scheduled by tasks within the window.
    pub fn advance(&self, ms: u32) {
        let target = self.now_ms.get() + i64::from(ms);
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let idx = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due_ms <= target)
                    .min_by_key(|(_, p)| (p.due_ms, p.id))
                    .map(|(i, _)| i);
                idx.map(|i| pending.remove(i))
            };
            let Some(p) = next else {
                break;
            };
            self.now_ms.set(p.due_ms.max(self.now_ms.get()));
            // The borrow is released here, so the task may schedule more work.
            (p.task)();
        }
        self.now_ms.set(target);
    }

    /// Run everything that is pending, however far in the future.
    pub fn run_all(&self) {
        loop {
            let latest = self.pending.borrow().iter().map(|p| p.due_ms).max();
            let Some(due) = latest else {
                break;
            };
            let delta = (due - self.now_ms.get()).max(0);
            self.advance(u32::try_from(delta).unwrap_or(u32::MAX));
        }
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.pending.borrow_mut().push(Pending {
            due_ms: self.now_ms.get() + i64::from(delay_ms),
            id,
            task,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.pending.borrow_mut().retain(|p| p.id != id);
    }
}
