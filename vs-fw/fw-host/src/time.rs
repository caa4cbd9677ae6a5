//! Millisecond tick source backed by [`Instant`].

use std::time::Instant;

use fw_core::TickSource;

pub struct StdClock {
    start: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TickSource for StdClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the same wrap a 32-bit hardware counter has
        self.start.elapsed().as_millis() as u32
    }
}
