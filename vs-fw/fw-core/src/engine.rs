//! Engine state shared between the ingress and service contexts.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, trace};
use vs_protocol::AckStatus;

use crate::monitor::MonitorSet;
use crate::queue::ResponseQueue;
use crate::{
    EngineConfig, FrameSink, Ingress, ReportError, SampleClock, Service, TickSource,
    VariableMemory,
};

/// Everything both contexts touch
///
/// Only ever accessed through [`Engine::with_state`], and only for plain
/// data copies: no lock region spans a transmission or a variable access.
#[derive(Debug)]
pub(crate) struct SharedState {
    pub(crate) monitor: MonitorSet,
    pub(crate) clock: SampleClock,
    pub(crate) queue: ResponseQueue,
}

impl SharedState {
    const fn new(config: &EngineConfig) -> Self {
        Self {
            monitor: MonitorSet::new(),
            clock: SampleClock::new(config.default_sample_period_ms()),
            queue: ResponseQueue::new(),
        }
    }
}

/// The VarScope protocol engine
///
/// `M` selects the mutual-exclusion primitive guarding the shared state:
/// `CriticalSectionRawMutex` when bytes arrive from an interrupt,
/// `NoopRawMutex` when both contexts run on one thread.
///
/// # Example
///
/// ```ignore
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use fw_core::{Engine, EngineConfig, RawMemory};
///
/// static ENGINE: Engine<CriticalSectionRawMutex> = Engine::new(EngineConfig::new());
///
/// // UART interrupt
/// ingress.feed_byte(byte);
///
/// // Main loop
/// service.tick();
/// ```
pub struct Engine<M: RawMutex> {
    config: EngineConfig,
    state: Mutex<M, RefCell<SharedState>>,
}

impl<M: RawMutex> Engine<M> {
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RefCell::new(SharedState::new(&config))),
        }
    }

    /// Return the shared state to start-up: monitoring off, default period,
    /// empty queue
    ///
    /// Receive state belongs to each [`Ingress`]; call [`Ingress::reset`] as
    /// well to drop a partially received frame.
    pub fn init(&self) {
        let config = self.config;
        self.with_state(|state| *state = SharedState::new(&config));
        debug!("Engine initialized: {:?}", config);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for the context that receives bytes
    pub fn ingress<'a, C, Mem>(&'a self, clock: &'a C, memory: &'a Mem) -> Ingress<'a, M, C, Mem>
    where
        C: TickSource,
        Mem: VariableMemory,
    {
        Ingress::new(self, clock, memory)
    }

    /// Handle for the periodic service context
    ///
    /// Only one service handle should run at a time; it owns the transmit
    /// buffer.
    pub fn service<'a, C, Mem, S>(
        &'a self,
        clock: &'a C,
        memory: &'a Mem,
        sink: S,
    ) -> Service<'a, M, C, Mem, S>
    where
        C: TickSource,
        Mem: VariableMemory,
        S: FrameSink,
    {
        Service::new(self, clock, memory, sink)
    }

    /// Queue a device-initiated error report for the next service tick
    pub fn report_error(&self, code: u8, message: &[u8]) -> Result<(), ReportError> {
        if !self.config.error_reports() {
            return Err(ReportError::Disabled);
        }
        self.with_state(|state| state.queue.queue_error(code, message))
    }

    pub fn is_monitoring(&self) -> bool {
        self.with_state(|state| state.monitor.is_active())
    }

    pub fn monitored_count(&self) -> usize {
        self.with_state(|state| state.monitor.len())
    }

    pub fn sample_period_ms(&self) -> u32 {
        self.with_state(|state| state.clock.period_ms())
    }

    pub(crate) fn queue_ack(&self, command: u8, status: AckStatus) {
        let replaced = self.with_state(|state| state.queue.queue_ack(command, status));
        if let Some(lost) = replaced {
            trace!(
                "Ack for {:#04x} ({}) replaced before sending",
                lost.command, lost.status
            );
        }
    }

    /// Run `f` with exclusive access to the shared state
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut SharedState) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
