//! Ingress and service loops
//!
//! The ingress loop blocks on the serial port and feeds whatever arrives to
//! the engine. The service loop ticks the engine on a fixed poll interval and
//! animates the demo variables between ticks.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use embassy_sync::blocking_mutex::raw::RawMutex;
use fw_core::sim::SimMemory;
use fw_core::{FrameSink, Ingress, Service, TickSource, VariableMemory};
use log::{debug, error};
use serialport::SerialPort;

use crate::demo::Demo;

pub fn run_ingress<M, C, Mem>(
    mut ingress: Ingress<'_, M, C, Mem>,
    mut port: Box<dyn SerialPort>,
    stop: &AtomicBool,
) -> Result<()>
where
    M: RawMutex,
    C: TickSource,
    Mem: VariableMemory,
{
    let mut buf = [0u8; 64];
    let result = loop {
        if stop.load(Ordering::Relaxed) {
            break Ok(());
        }
        match port.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => ingress.feed_packet(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => break Err(err).context("Serial read failed"),
        }
    };
    stop.store(true, Ordering::Relaxed);
    result
}

pub fn run_service<M, C, S>(
    mut service: Service<'_, M, C, SimMemory, S>,
    clock: &C,
    demo: &Demo,
    poll: Duration,
    stop: &AtomicBool,
) where
    M: RawMutex,
    C: TickSource,
    S: FrameSink,
{
    let mut ticks: u64 = 0;
    while !stop.load(Ordering::Relaxed) {
        demo.animate(clock.now_ms());
        service.tick();
        ticks += 1;
        if ticks % 10_000 == 0 {
            debug!("{ticks} service ticks");
        }
        thread::sleep(poll);
    }
    error!("Ingress stopped; shutting down service loop");
}
