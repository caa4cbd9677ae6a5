//! Serial port transport

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use fw_core::FrameSink;
use log::info;
use serialport::SerialPort;

/// Read timeout; bounds how long the ingress thread blocks between checks
const READ_TIMEOUT: Duration = Duration::from_millis(100);

pub fn open(port_name: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(port_name, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("Failed to open serial port {port_name}"))?;
    info!("Opened {port_name} @ {baud_rate} baud");
    Ok(port)
}

pub fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to list serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port.port_name);
    }
    Ok(())
}

/// Writes each frame in full, then flushes
pub struct SerialSink {
    port: Box<dyn SerialPort>,
}

impl SerialSink {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl FrameSink for SerialSink {
    type Error = io::Error;

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(frame)?;
        self.port.flush()
    }
}
