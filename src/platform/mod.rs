//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (`requestAnimationFrame` on web, manual in tests)
//! - Canvas drawing, input listeners and visibility (web only, see `web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::{Cell, RefCell};

/// Frame callback; receives a monotonic timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies one pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something that can run a callback on the next frame
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;
    /// Drop a pending request; unknown or already-run handles are ignored
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Scheduler driven by hand: callbacks run only when [`ManualScheduler::run_frame`]
/// is called
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<i32>,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run everything queued so far at `now_ms`. Requests made by the callbacks
    /// wait for the next call. Returns how many callbacks ran.
    pub fn run_frame(&self, now_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(now_ms);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
    }
}
