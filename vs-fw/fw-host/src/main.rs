//! VarScope engine hosted on a desktop OS
//!
//! Serves the protocol over a real serial port, with simulated RAM holding a
//! few animated variables. Useful for exercising host tools without hardware.

mod args;
mod demo;
mod serial;
mod server_loop;
mod time;

use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use fw_core::Engine;
use log::info;

use crate::args::Args;
use crate::demo::Demo;
use crate::serial::SerialSink;
use crate::time::StdClock;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_ports {
        return serial::list_ports();
    }
    let port_name = args
        .port
        .as_deref()
        .ok_or_else(|| anyhow!("--port is required"))?;

    let port = serial::open(port_name, args.baud)?;
    let reader = port.try_clone().context("Failed to clone serial port")?;

    let engine: Engine<CriticalSectionRawMutex> = Engine::new(args.engine_config());
    engine.init();
    let clock = StdClock::new();
    let demo = Demo::new();
    demo.log_layout();

    let stop = &AtomicBool::new(false);
    let poll = Duration::from_millis(args.poll_ms.max(1));

    thread::scope(|scope| {
        let ingress = engine.ingress(&clock, demo.memory());
        let ingress_thread = scope.spawn(move || server_loop::run_ingress(ingress, reader, stop));

        let service = engine.service(&clock, demo.memory(), SerialSink::new(port));
        info!("Serving; sample period {} ms", engine.sample_period_ms());
        server_loop::run_service(service, &clock, &demo, poll, stop);

        ingress_thread
            .join()
            .map_err(|_| anyhow!("Ingress thread panicked"))?
    })
}
