//! Monitor set and sample scheduling.

use heapless::Vec;
use vs_protocol::{MAX_MONITORED_VARS, VarDescriptor};

/// A watched location: raw address plus the host-declared type tag
///
/// The table never owns the memory behind the address.
pub type MonitoredVariable = VarDescriptor;

/// Fixed-capacity snapshot of the monitor set
pub type MonitorSnapshot = Vec<MonitoredVariable, MAX_MONITORED_VARS>;

/// The variables currently being sampled
///
/// Replaced wholesale by each start-monitor command, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct MonitorSet {
    variables: MonitorSnapshot,
    active: bool,
}

impl MonitorSet {
    pub const fn new() -> Self {
        Self {
            variables: Vec::new(),
            active: false,
        }
    }

    /// Deactivate and empty the table
    pub fn clear(&mut self) {
        self.active = false;
        self.variables.clear();
    }

    /// Install a new set and activate monitoring.
    ///
    /// An empty set leaves monitoring stopped.
    pub fn replace(&mut self, variables: &[MonitoredVariable]) {
        self.clear();
        for variable in variables.iter().take(MAX_MONITORED_VARS) {
            let _ = self.variables.push(*variable);
        }
        self.active = !self.variables.is_empty();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Active with at least one variable
    pub fn is_sampling(&self) -> bool {
        self.active && !self.variables.is_empty()
    }

    pub fn variables(&self) -> &[MonitoredVariable] {
        &self.variables
    }

    /// Copy of the table, taken while the caller holds the engine lock
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.variables.clone()
    }
}

/// Sample period and the time of the last sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleClock {
    period_ms: u32,
    last_sample_ms: u32,
}

impl SampleClock {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms: if period_ms == 0 { 1 } else { period_ms },
            last_sample_ms: 0,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn last_sample_ms(&self) -> u32 {
        self.last_sample_ms
    }

    /// Zero is ignored; the period is never zero
    pub fn set_period(&mut self, period_ms: u32) {
        if period_ms != 0 {
            self.period_ms = period_ms;
        }
    }

    /// Start counting the next period from `now`
    pub fn restart(&mut self, now_ms: u32) {
        self.last_sample_ms = now_ms;
    }

    /// Whether a full period has elapsed, across tick wraparound
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_sample_ms) >= self.period_ms
    }
}

/// Period for a requested rate: rate 0 selects `default_ms`, everything
/// else is `1000 / rate` floored at 1 ms.
pub fn period_for_rate(rate_hz: u32, default_ms: u32) -> u32 {
    if rate_hz == 0 {
        default_ms
    } else {
        (1000 / rate_hz).max(1)
    }
}
