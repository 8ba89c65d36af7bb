//! Self-rescheduling frame loop
//!
//! Each frame runs the tick and then requests the next frame. The scheduled
//! callback only holds a weak reference, so dropping the [`FrameLoop`] (or
//! calling [`FrameLoop::stop`]) cancels the pending frame and ends the loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::platform::{FrameHandle, FrameScheduler};

struct LoopShared {
    scheduler: Rc<dyn FrameScheduler>,
    tick: RefCell<Box<dyn FnMut(f64)>>,
    pending: Cell<Option<FrameHandle>>,
    active: Cell<bool>,
    frames: Cell<u64>,
}

fn schedule(shared: &Rc<LoopShared>) {
    let weak: Weak<LoopShared> = Rc::downgrade(shared);
    let handle = shared.scheduler.request_frame(Box::new(move |now_ms| {
        if let Some(shared) = weak.upgrade() {
            run(&shared, now_ms);
        }
    }));
    shared.pending.set(Some(handle));
}

fn run(shared: &Rc<LoopShared>, now_ms: f64) {
    shared.pending.set(None);
    if !shared.active.get() {
        return;
    }
    {
        let mut tick = shared.tick.borrow_mut();
        (*tick)(now_ms);
    }
    shared.frames.set(shared.frames.get() + 1);
    if shared.active.get() {
        schedule(shared);
    }
}

/// A running frame loop; stops when dropped
pub struct FrameLoop {
    shared: Rc<LoopShared>,
}

impl FrameLoop {
    /// Request the first frame and keep ticking until stopped
    pub fn start(scheduler: Rc<dyn FrameScheduler>, tick: impl FnMut(f64) + 'static) -> Self {
        let shared = Rc::new(LoopShared {
            scheduler,
            tick: RefCell::new(Box::new(tick)),
            pending: Cell::new(None),
            active: Cell::new(true),
            frames: Cell::new(0),
        });
        schedule(&shared);
        Self { shared }
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.shared.frames.get()
    }

    /// Cancel the pending frame; no further ticks run
    pub fn stop(&self) {
        if !self.shared.active.replace(false) {
            return;
        }
        if let Some(handle) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(handle);
        }
        log::debug!("frame loop stopped after {} frames", self.frames());
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{BestScoreStore, MemoryBackend};
    use crate::platform::ManualScheduler;
    use crate::renderer::DrawList;
    use crate::session::Session;
    use crate::sim::DodgeState;

    #[test]
    fn test_loop_reschedules_every_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let frame_loop = FrameLoop::start(scheduler.clone(), move |now| log.borrow_mut().push(now));

        assert_eq!(scheduler.pending(), 1);
        for i in 1..=3 {
            scheduler.run_frame(i as f64 * 16.0);
        }
        assert_eq!(*seen.borrow(), vec![16.0, 32.0, 48.0]);
        assert_eq!(frame_loop.frames(), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let frame_loop = FrameLoop::start(scheduler.clone(), move |_| counter.set(counter.get() + 1));
        scheduler.run_frame(16.0);
        frame_loop.stop();
        assert!(!frame_loop.is_active());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.run_frame(32.0), 0);
        assert_eq!(count.get(), 1);
        // Stopping twice is harmless
        frame_loop.stop();
    }

    #[test]
    fn test_drop_ends_loop() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        {
            let _frame_loop =
                FrameLoop::start(scheduler.clone(), move |_| counter.set(counter.get() + 1));
            scheduler.run_frame(16.0);
        }
        assert_eq!(scheduler.pending(), 0);
        scheduler.run_frame(32.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drives_a_session() {
        let scheduler = Rc::new(ManualScheduler::new());
        let store = Rc::new(BestScoreStore::new(MemoryBackend::new(), "test"));
        let session = Rc::new(RefCell::new(Session::<DodgeState>::new(720.0, store, 4)));

        let ticking = session.clone();
        let _frame_loop = FrameLoop::start(scheduler.clone(), move |now| {
            let mut surface = DrawList::new();
            ticking.borrow_mut().frame(now, &mut surface);
        });
        for i in 0..=10 {
            scheduler.run_frame(1000.0 + i as f64 * 20.0);
        }
        assert_eq!(session.borrow().state().elapsed_ms, 200.0);
    }
}
