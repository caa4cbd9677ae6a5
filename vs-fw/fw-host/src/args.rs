use clap::Parser;
use fw_core::EngineConfig;
use vs_protocol::DEFAULT_SAMPLE_PERIOD_MS;

/// Run the VarScope engine on the host against a serial port
///
/// A set of animated demo variables lives in simulated RAM; their addresses
/// are logged at startup so a host tool can monitor and write them.
#[derive(Parser, Debug)]
#[command(name = "vs-host", version)]
pub struct Args {
    /// Serial port to serve (e.g. /dev/ttyUSB0)
    #[arg(long, required_unless_present = "list_ports")]
    pub port: Option<String>,

    /// Baud rate for the serial port
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,

    /// Sampling period used at startup and after a rate-0 request
    #[arg(long, default_value_t = DEFAULT_SAMPLE_PERIOD_MS)]
    pub sample_period_ms: u32,

    /// Enable device-initiated error reports
    #[arg(long)]
    pub error_reports: bool,

    /// How often the service loop ticks
    #[arg(long, default_value_t = 1)]
    pub poll_ms: u64,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_default_sample_period_ms(self.sample_period_ms)
            .with_error_reports(self.error_reports)
    }
}
