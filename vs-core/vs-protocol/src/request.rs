//! Host → device request payloads.
//!
//! | ID   | Request         | Payload                                     |
//! |------|-----------------|---------------------------------------------|
//! | 0x01 | StartMonitor    | count + count × (u32 address, u8 type)      |
//! | 0x02 | SetVariable     | u32 address + u8 type + f32 value           |
//! | 0x03 | SetSampleRate   | u32 rate in Hz (0 = default period)         |
//!
//! All multi-byte fields are little-endian.

use heapless::Vec;

use crate::{
    Command, FrameError, MAX_MONITORED_VARS, RequestError, SHARED_BUFFER_SIZE, VAR_DESCRIPTOR_LEN,
    VarType, encode_frame, read_u32_le,
};

const SET_VARIABLE_LEN: usize = 9;
const SET_SAMPLE_RATE_LEN: usize = 4;

/// One entry of a start-monitor request
///
/// The type tag is kept raw: the device stores whatever the host declared,
/// and an unknown tag samples as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarDescriptor {
    pub address: u32,
    pub type_tag: u8,
}

impl VarDescriptor {
    pub fn new(address: u32, var_type: VarType) -> Self {
        Self {
            address,
            type_tag: var_type.tag(),
        }
    }

    pub fn var_type(&self) -> Option<VarType> {
        VarType::try_from(self.type_tag).ok()
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            address: read_u32_le(bytes),
            type_tag: bytes[4],
        }
    }

    fn to_bytes(self) -> [u8; VAR_DESCRIPTOR_LEN] {
        let [a0, a1, a2, a3] = self.address.to_le_bytes();
        [a0, a1, a2, a3, self.type_tag]
    }
}

/// Replace the monitor set; an empty list stops monitoring
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorRequest {
    pub variables: Vec<VarDescriptor, MAX_MONITORED_VARS>,
}

impl MonitorRequest {
    pub fn stop() -> Self {
        Self::default()
    }

    pub fn is_stop(&self) -> bool {
        self.variables.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetVariableRequest {
    pub address: u32,
    pub var_type: VarType,
    pub value: f32,
}

/// A parsed host request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Monitor(MonitorRequest),
    SetVariable(SetVariableRequest),
    /// Requested rate in Hz
    SetSampleRate(u32),
}

impl Request {
    /// Parse and validate a request payload
    pub fn parse(command: u8, payload: &[u8]) -> Result<Self, RequestError> {
        match Command::try_from(command).map_err(RequestError::UnknownCommand)? {
            Command::StartMonitor => parse_monitor(payload).map(Request::Monitor),
            Command::SetVariable => parse_set_variable(payload).map(Request::SetVariable),
            Command::SetSampleRate => {
                expect_len(payload, SET_SAMPLE_RATE_LEN)?;
                Ok(Request::SetSampleRate(read_u32_le(payload)))
            }
        }
    }

    pub fn command(&self) -> Command {
        match self {
            Request::Monitor(_) => Command::StartMonitor,
            Request::SetVariable(_) => Command::SetVariable,
            Request::SetSampleRate(_) => Command::SetSampleRate,
        }
    }

    /// Encode as a complete frame (host side)
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let mut payload: Vec<u8, SHARED_BUFFER_SIZE> = Vec::new();
        // Every request payload is far below the buffer capacity.
        let _ = match self {
            Request::Monitor(request) => {
                let _ = payload.push(request.variables.len() as u8);
                request
                    .variables
                    .iter()
                    .try_for_each(|var| payload.extend_from_slice(&var.to_bytes()))
            }
            Request::SetVariable(request) => {
                let _ = payload.extend_from_slice(&request.address.to_le_bytes());
                let _ = payload.push(request.var_type.tag());
                payload.extend_from_slice(&request.value.to_le_bytes())
            }
            Request::SetSampleRate(rate_hz) => payload.extend_from_slice(&rate_hz.to_le_bytes()),
        };
        encode_frame(self.command().id(), &payload, out)
    }
}

fn expect_len(payload: &[u8], expected: usize) -> Result<(), RequestError> {
    if payload.len() != expected {
        return Err(RequestError::LengthMismatch {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn parse_monitor(payload: &[u8]) -> Result<MonitorRequest, RequestError> {
    let Some((&count, entries)) = payload.split_first() else {
        return Err(RequestError::LengthMismatch {
            expected: 1,
            actual: 0,
        });
    };
    let count = count as usize;

    // A stop request ignores anything after the count byte.
    if count == 0 {
        return Ok(MonitorRequest::stop());
    }
    if count > MAX_MONITORED_VARS {
        return Err(RequestError::TooManyVariables {
            requested: count,
            max: MAX_MONITORED_VARS,
        });
    }
    expect_len(payload, 1 + count * VAR_DESCRIPTOR_LEN)?;

    let mut request = MonitorRequest::default();
    for chunk in entries.chunks_exact(VAR_DESCRIPTOR_LEN) {
        // count <= MAX_MONITORED_VARS was checked above
        let _ = request.variables.push(VarDescriptor::from_bytes(chunk));
    }
    Ok(request)
}

fn parse_set_variable(payload: &[u8]) -> Result<SetVariableRequest, RequestError> {
    expect_len(payload, SET_VARIABLE_LEN)?;
    let var_type = VarType::try_from(payload[4]).map_err(RequestError::UnsupportedType)?;
    Ok(SetVariableRequest {
        address: read_u32_le(&payload[0..4]),
        var_type,
        value: f32::from_le_bytes([payload[5], payload[6], payload[7], payload[8]]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AckStatus, DecodeEvent, FrameDecoder};

    #[test]
    fn test_parse_monitor_in_declared_order() {
        let payload = [
            2, 0x00, 0x10, 0x00, 0x20, 0x06, 0x04, 0x10, 0x00, 0x20, 0x01,
        ];
        let Request::Monitor(request) = Request::parse(0x01, &payload).unwrap() else {
            panic!("Expected monitor request");
        };
        assert_eq!(request.variables.len(), 2);
        assert_eq!(request.variables[0].address, 0x2000_1000);
        assert_eq!(request.variables[0].var_type(), Some(VarType::F32));
        assert_eq!(request.variables[1].address, 0x2000_1004);
        assert_eq!(request.variables[1].var_type(), Some(VarType::U8));
    }

    #[test]
    fn test_parse_monitor_count_zero_is_stop() {
        let request = Request::parse(0x01, &[0]).unwrap();
        assert_eq!(request, Request::Monitor(MonitorRequest::stop()));

        let with_trailing = Request::parse(0x01, &[0, 1, 2, 3]).unwrap();
        assert_eq!(with_trailing, Request::Monitor(MonitorRequest::stop()));
    }

    #[test]
    fn test_parse_monitor_too_many_is_limit_error() {
        let err = Request::parse(0x01, &[11]).unwrap_err();
        assert_eq!(err.status(), AckStatus::BusyOrLimit);
    }

    #[test]
    fn test_parse_monitor_length_mismatch() {
        let err = Request::parse(0x01, &[1, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            RequestError::LengthMismatch {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(err.status(), AckStatus::InvalidPayload);

        let empty = Request::parse(0x01, &[]).unwrap_err();
        assert_eq!(empty.status(), AckStatus::InvalidPayload);
    }

    #[test]
    fn test_parse_monitor_keeps_unknown_type_tags() {
        let Request::Monitor(request) = Request::parse(0x01, &[1, 4, 0, 0, 0, 0x42]).unwrap()
        else {
            panic!("Expected monitor request");
        };
        assert_eq!(request.variables[0].type_tag, 0x42);
        assert_eq!(request.variables[0].var_type(), None);
    }

    #[test]
    fn test_parse_set_variable() {
        let mut payload = [0u8; 9];
        payload[..4].copy_from_slice(&0x2000_0040u32.to_le_bytes());
        payload[4] = VarType::I16.tag();
        payload[5..].copy_from_slice(&(-12.5f32).to_le_bytes());

        let request = Request::parse(0x02, &payload).unwrap();
        assert_eq!(
            request,
            Request::SetVariable(SetVariableRequest {
                address: 0x2000_0040,
                var_type: VarType::I16,
                value: -12.5,
            })
        );

        payload[4] = 0x09;
        assert_eq!(
            Request::parse(0x02, &payload),
            Err(RequestError::UnsupportedType(0x09))
        );
        assert_eq!(
            Request::parse(0x02, &payload[..8]).unwrap_err().status(),
            AckStatus::InvalidPayload
        );
    }

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(
            Request::parse(0x03, &1000u32.to_le_bytes()),
            Ok(Request::SetSampleRate(1000))
        );
        assert_eq!(
            Request::parse(0x03, &[1, 0]).unwrap_err().status(),
            AckStatus::InvalidPayload
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Request::parse(0x7E, &[]),
            Err(RequestError::UnknownCommand(0x7E))
        );
    }

    #[test]
    fn test_encoded_request_parses_back() {
        let mut variables = Vec::new();
        variables
            .push(VarDescriptor::new(0x2000_0000, VarType::U32))
            .unwrap();
        variables
            .push(VarDescriptor::new(0x2000_0008, VarType::F64))
            .unwrap();
        let request = Request::Monitor(MonitorRequest { variables });

        let mut out = [0u8; SHARED_BUFFER_SIZE];
        let len = request.encode(&mut out).unwrap();

        let mut decoder: FrameDecoder = FrameDecoder::new();
        let mut parsed = None;
        for &byte in &out[..len] {
            if let Some(DecodeEvent::Frame(frame)) = decoder.push(byte) {
                parsed = Some(Request::parse(frame.command, frame.payload).unwrap());
            }
        }
        assert_eq!(parsed, Some(request));
    }
}
