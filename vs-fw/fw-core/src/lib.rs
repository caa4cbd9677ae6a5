//! Firmware core library.
//!
//! This crate is the on-device half of the VarScope protocol. It decodes
//! inbound command frames, runs them against a small table of monitored
//! variables, and periodically emits sampled values back to the host.
//!
//! The engine is split across two execution contexts:
//! - [`Ingress`] is fed received bytes (UART interrupt, DMA completion, USB packet)
//! - [`Service`] drains the response queue and samples variables (main loop or low-priority task)
//!
//! Both borrow one [`Engine`], whose shared state sits behind an
//! `embassy-sync` blocking mutex so the caller picks the mutual-exclusion
//! primitive. Transport, tick source and memory access are ports
//! ([`FrameSink`], [`TickSource`], [`VariableMemory`]).

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod config;
mod dispatch;
pub mod engine;
pub mod error;
pub mod ingress;
pub mod memory;
pub mod monitor;
pub mod ports;
pub mod queue;
pub mod service;

#[cfg(any(test, feature = "std"))]
pub mod sim;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{MemoryError, ReportError};
pub use ingress::Ingress;
pub use memory::{RawMemory, VariableMemory};
pub use monitor::{MonitorSet, MonitoredVariable, SampleClock};
pub use ports::{FrameSink, TickSource};
pub use queue::{PendingAck, PendingErrorReport, ResponseQueue};
pub use service::Service;
