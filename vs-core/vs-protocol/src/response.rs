//! Device → host response payloads, parsed on the host side.

use heapless::Vec;

use crate::{
    AckStatus, DeviceCommand, FrameRef, MAX_MONITORED_VARS, ResponseError, read_u32_le,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Response<'a> {
    /// `[acked command, status]`
    Ack { command: u8, status: AckStatus },
    /// `[u32 timestamp][f32 per monitored variable]`
    MonitorData {
        timestamp: u32,
        values: Vec<f32, MAX_MONITORED_VARS>,
    },
    /// `[code][message bytes]`
    ErrorReport { code: u8, message: &'a [u8] },
}

impl<'a> Response<'a> {
    pub fn parse(frame: FrameRef<'a>) -> Result<Self, ResponseError> {
        let payload = frame.payload;
        let malformed = ResponseError::Malformed {
            command: frame.command,
            len: payload.len(),
        };

        match DeviceCommand::try_from(frame.command).map_err(ResponseError::UnknownCommand)? {
            DeviceCommand::Ack => {
                let [command, status] = payload else {
                    return Err(malformed);
                };
                let status = AckStatus::try_from(*status).map_err(ResponseError::UnknownStatus)?;
                Ok(Response::Ack {
                    command: *command,
                    status,
                })
            }
            DeviceCommand::MonitorData => {
                if payload.len() < 4 || (payload.len() - 4) % 4 != 0 {
                    return Err(malformed);
                }
                let mut values = Vec::new();
                for chunk in payload[4..].chunks_exact(4) {
                    let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    values.push(value).map_err(|_| malformed)?;
                }
                Ok(Response::MonitorData {
                    timestamp: read_u32_le(payload),
                    values,
                })
            }
            DeviceCommand::ErrorReport => {
                let Some((&code, message)) = payload.split_first() else {
                    return Err(malformed);
                };
                Ok(Response::ErrorReport { code, message })
            }
        }
    }
}
