//! Command identifiers.

/// Host → device commands
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start, update or stop monitoring (count = 0 stops)
    StartMonitor = 0x01,
    /// Write a value to a variable
    SetVariable = 0x02,
    /// Change the sampling rate
    SetSampleRate = 0x03,
}

impl Command {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Command::StartMonitor),
            0x02 => Ok(Command::SetVariable),
            0x03 => Ok(Command::SetSampleRate),
            other => Err(other),
        }
    }
}

/// Device → host commands
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Periodic sample of the monitor set
    MonitorData = 0x81,
    /// Acknowledgement of a host command
    Ack = 0x82,
    /// Device-initiated error report (optional)
    ErrorReport = 0x8F,
}

impl DeviceCommand {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DeviceCommand {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x81 => Ok(DeviceCommand::MonitorData),
            0x82 => Ok(DeviceCommand::Ack),
            0x8F => Ok(DeviceCommand::ErrorReport),
            other => Err(other),
        }
    }
}
