//! Continuous repaint scheduling
//!
//! Each tick checks the stop flag before asking for the next one, so
//! teardown is a flag flip. The flag is shared through [`StopHandle`] for
//! hosts that need to stop the loop from outside the globe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle that stops a [`RepaintLoop`]
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct RepaintLoop {
    stop: Arc<AtomicBool>,
    scheduled: bool,
    ticks: u64,
}

impl Default for RepaintLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RepaintLoop {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            scheduled: false,
            ticks: 0,
        }
    }

    /// Schedule the first tick. A stopped loop stays stopped.
    pub fn start(&mut self) {
        if !self.stop.load(Ordering::SeqCst) {
            self.scheduled = true;
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.scheduled = false;
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Run one tick: `true` if the frame should be drawn and the next tick
    /// is requested
    pub fn tick(&mut self) -> bool {
        if !self.scheduled {
            return false;
        }
        if self.stop.load(Ordering::SeqCst) {
            self.scheduled = false;
            return false;
        }
        self.ticks += 1;
        true
    }

    /// Whether another tick is pending
    pub fn is_scheduled(&self) -> bool {
        self.scheduled && !self.stop.load(Ordering::SeqCst)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
