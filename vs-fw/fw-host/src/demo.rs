//! Demo variables living in simulated RAM.

use fw_core::VariableMemory;
use fw_core::sim::SimMemory;
use log::{info, warn};
use vs_protocol::{Value, VarType};

/// Base address the demo RAM is mapped at
pub const DEMO_BASE: u32 = 0x2000_0000;

const DEMO_SIZE: usize = 64;

/// One named variable at a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct DemoVariable {
    pub name: &'static str,
    pub offset: usize,
    pub var_type: VarType,
}

pub const DEMO_VARIABLES: [DemoVariable; 5] = [
    DemoVariable {
        name: "sine",
        offset: 0,
        var_type: VarType::F32,
    },
    DemoVariable {
        name: "counter",
        offset: 4,
        var_type: VarType::U32,
    },
    DemoVariable {
        name: "sawtooth",
        offset: 8,
        var_type: VarType::I16,
    },
    DemoVariable {
        name: "toggle",
        offset: 10,
        var_type: VarType::Bool,
    },
    // Written by the host, never animated
    DemoVariable {
        name: "gain",
        offset: 12,
        var_type: VarType::F32,
    },
];

pub struct Demo {
    memory: SimMemory,
}

impl Demo {
    pub fn new() -> Self {
        let demo = Self {
            memory: SimMemory::new(DEMO_BASE, DEMO_SIZE),
        };
        demo.memory.set(demo.address("gain"), Value::F32(1.0));
        demo
    }

    pub fn memory(&self) -> &SimMemory {
        &self.memory
    }

    pub fn address(&self, name: &str) -> u32 {
        DEMO_VARIABLES
            .iter()
            .find(|var| var.name == name)
            .map(|var| self.memory.address_of(var.offset))
            .unwrap_or(0)
    }

    pub fn log_layout(&self) {
        for var in &DEMO_VARIABLES {
            info!(
                "{:>9} {:?} @ {:#010x}",
                var.name,
                var.var_type,
                self.memory.address_of(var.offset)
            );
        }
    }

    /// Update the animated variables for time `now_ms`
    pub fn animate(&self, now_ms: u32) {
        let gain = match self.memory.read(self.address("gain"), VarType::F32) {
            Ok(value) => value.to_f32(),
            Err(_) => 1.0,
        };
        let seconds = now_ms as f32 / 1000.0;
        let sawtooth = (now_ms % 2000) as i32 - 1000;

        let updates = [
            ("sine", Value::F32(gain * wave(seconds))),
            ("counter", Value::U32(now_ms / 100)),
            ("sawtooth", Value::I16(sawtooth as i16)),
            ("toggle", Value::Bool((now_ms / 500) % 2 == 1)),
        ];
        for (name, value) in updates {
            if let Err(err) = self.memory.write(self.address(name), value) {
                warn!("Demo update of {name} failed: {err}");
            }
        }
    }
}

/// One full period per second
fn wave(x: f32) -> f32 {
    (x * core::f32::consts::TAU).sin()
}
