//! Periodic service: drain the response queue, sample, transmit.

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;
use log::{trace, warn};
use vs_protocol::{
    DeviceCommand, ERROR_MESSAGE_CAPACITY, MONITOR_DATA_CAPACITY, SHARED_BUFFER_SIZE, encode_frame,
};

use crate::monitor::MonitoredVariable;
use crate::{Engine, FrameSink, MemoryError, TickSource, VariableMemory};

/// Handle for the periodic service context
///
/// Each [`tick`](Service::tick) sends, in order: the pending ack, the pending
/// error report (when enabled), and a monitor-data frame if a sample is due.
/// The transmit buffer is owned here and reused for every frame.
pub struct Service<'a, M: RawMutex, C, Mem, S> {
    engine: &'a Engine<M>,
    clock: &'a C,
    memory: &'a Mem,
    sink: S,
    tx_buffer: [u8; SHARED_BUFFER_SIZE],
}

impl<'a, M, C, Mem, S> Service<'a, M, C, Mem, S>
where
    M: RawMutex,
    C: TickSource,
    Mem: VariableMemory,
    S: FrameSink,
{
    pub(crate) fn new(engine: &'a Engine<M>, clock: &'a C, memory: &'a Mem, sink: S) -> Self {
        Self {
            engine,
            clock,
            memory,
            sink,
            tx_buffer: [0; SHARED_BUFFER_SIZE],
        }
    }

    pub fn tick(&mut self) {
        self.send_pending_ack();
        if self.engine.config().error_reports() {
            self.send_pending_error();
        }
        self.sample_if_due();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn send_pending_ack(&mut self) {
        let Some(ack) = self.engine.with_state(|state| state.queue.take_ack()) else {
            return;
        };
        self.transmit(DeviceCommand::Ack, &[ack.command, ack.status.code()]);
    }

    fn send_pending_error(&mut self) {
        let Some(report) = self.engine.with_state(|state| state.queue.take_error()) else {
            return;
        };
        let mut payload: Vec<u8, { 1 + ERROR_MESSAGE_CAPACITY }> = Vec::new();
        let _ = payload.push(report.code);
        let _ = payload.extend_from_slice(&report.message);
        self.transmit(DeviceCommand::ErrorReport, &payload);
    }

    fn sample_if_due(&mut self) {
        let clock = self.clock;

        // Tick read, due check, snapshot and clock advance happen in one short
        // region so a restart from the ingress context never lands in between.
        let due = self.engine.with_state(|state| {
            let now = clock.now_ms();
            if !state.monitor.is_sampling() || !state.clock.is_due(now) {
                return None;
            }
            state.clock.restart(now);
            Some((now, state.monitor.snapshot()))
        });
        let Some((now, variables)) = due else {
            return;
        };

        let mut payload: Vec<u8, MONITOR_DATA_CAPACITY> = Vec::new();
        let _ = payload.extend_from_slice(&now.to_le_bytes());
        for variable in &variables {
            let value = self.read_sample(variable);
            let _ = payload.extend_from_slice(&value.to_le_bytes());
        }
        trace!("Sample at {} ms: {} variables", now, variables.len());
        self.transmit(DeviceCommand::MonitorData, &payload);
    }

    /// Read one variable widened to f32; anything unreadable samples as 0.0
    fn read_sample(&self, variable: &MonitoredVariable) -> f32 {
        let Some(var_type) = variable.var_type() else {
            return 0.0;
        };
        match self.memory.read(variable.address, var_type) {
            Ok(value) => value.to_f32(),
            Err(MemoryError::NullAddress) => 0.0,
            Err(err) => {
                warn!("Sample of {:#010x} refused: {}", variable.address, err);
                0.0
            }
        }
    }

    fn transmit(&mut self, command: DeviceCommand, payload: &[u8]) {
        let len = match encode_frame(command.id(), payload, &mut self.tx_buffer) {
            Ok(len) => len,
            Err(err) => {
                warn!("Dropping {:?} frame: {}", command, err);
                return;
            }
        };
        if let Err(err) = self.sink.send_frame(&self.tx_buffer[..len]) {
            warn!("Transport rejected {:?} frame: {:?}", command, err);
        }
    }
}
