//! Ports the engine calls into.
//!
//! Implementations live outside the engine: a UART/USB driver for
//! [`FrameSink`], a SysTick or RTC counter for [`TickSource`].

use core::fmt::Debug;

/// Outbound transport for assembled frames
///
/// Sending is fire-and-forget: the engine logs a failed send and moves on,
/// it never retries. Backpressure or dropping is the transport's business.
pub trait FrameSink {
    type Error: Debug;

    /// Send one complete frame (SOP through EOP)
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    type Error = T::Error;

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        (**self).send_frame(frame)
    }
}

/// Monotonic millisecond tick that wraps at `u32::MAX`
pub trait TickSource {
    fn now_ms(&self) -> u32;

    /// Milliseconds since `since`, correct across one wraparound
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
