//! Command handlers.
//!
//! Every handler ends in exactly one acknowledgement enqueue. Handlers never
//! transmit; the service tick sends whatever ack is pending.

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, warn};
use vs_protocol::{
    AckStatus, Command, FrameRef, MonitorRequest, Request, SetVariableRequest, Value, VarType,
};

use crate::monitor::period_for_rate;
use crate::{Engine, TickSource, VariableMemory};

pub(crate) fn dispatch<M, C, Mem>(engine: &Engine<M>, clock: &C, memory: &Mem, frame: FrameRef<'_>)
where
    M: RawMutex,
    C: TickSource,
    Mem: VariableMemory,
{
    let status = match Request::parse(frame.command, frame.payload) {
        Ok(Request::Monitor(request)) => start_monitor(engine, clock, &request),
        Ok(Request::SetVariable(request)) => set_variable(memory, &request),
        Ok(Request::SetSampleRate(rate_hz)) => set_sample_rate(engine, clock, rate_hz),
        Err(err) => {
            // A rejected start-monitor still stops monitoring.
            if frame.command == Command::StartMonitor.id() {
                engine.with_state(|state| state.monitor.clear());
            }
            debug!("Rejected command {:#04x}: {}", frame.command, err);
            err.status()
        }
    };
    engine.queue_ack(frame.command, status);
}

fn start_monitor<M: RawMutex, C: TickSource>(
    engine: &Engine<M>,
    clock: &C,
    request: &MonitorRequest,
) -> AckStatus {
    engine.with_state(|state| {
        state.monitor.clear();
        if !request.is_stop() {
            state.monitor.replace(&request.variables);
            state.clock.restart(clock.now_ms());
        }
    });

    if request.is_stop() {
        debug!("Monitoring stopped");
    } else {
        debug!("Monitoring {} variables", request.variables.len());
    }
    AckStatus::Ok
}

fn set_variable<Mem: VariableMemory>(memory: &Mem, request: &SetVariableRequest) -> AckStatus {
    // f64 targets can be sampled but not written
    if request.var_type == VarType::F64 {
        debug!("Write to {:#010x} refused: f64 is read-only", request.address);
        return AckStatus::TypeUnsupported;
    }
    let value = Value::from_f32(request.var_type, request.value);
    match memory.write(request.address, value) {
        Ok(()) => {
            debug!("Set {:#010x} to {:?}", request.address, value);
            AckStatus::Ok
        }
        Err(err) => {
            warn!("Write to {:#010x} refused: {}", request.address, err);
            err.status()
        }
    }
}

fn set_sample_rate<M: RawMutex, C: TickSource>(
    engine: &Engine<M>,
    clock: &C,
    rate_hz: u32,
) -> AckStatus {
    let period_ms = period_for_rate(rate_hz, engine.config().default_sample_period_ms());
    engine.with_state(|state| {
        state.clock.set_period(period_ms);
        state.clock.restart(clock.now_ms());
    });
    debug!("Sample period {} ms ({} Hz requested)", period_ms, rate_hz);
    // Rates are never reported as unachievable
    AckStatus::Ok
}
