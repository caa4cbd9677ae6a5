//! Firmware integration test helpers
//!
//! Host-side builders for request frames and a parser that turns the frames a
//! [`RecordingSink`](fw_core::sim::RecordingSink) captured back into owned
//! responses.

use vs_protocol::{
    AckStatus, DecodeEvent, FrameDecoder, MonitorRequest, Request, Response, SHARED_BUFFER_SIZE,
    SetVariableRequest, VarDescriptor, VarType, encode_frame,
};

/// Base address of the simulated RAM used by the tests
pub const SIM_BASE: u32 = 0x2000_0000;

/// Owned copy of a device response
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceFrame {
    Ack { command: u8, status: AckStatus },
    Data { timestamp: u32, values: Vec<f32> },
    Error { code: u8, message: Vec<u8> },
}

impl DeviceFrame {
    pub fn ack(command: u8, status: AckStatus) -> Self {
        DeviceFrame::Ack { command, status }
    }
}

/// Encode a typed request as wire bytes
pub fn request_bytes(request: &Request) -> Vec<u8> {
    let mut out = [0u8; SHARED_BUFFER_SIZE];
    let len = request.encode(&mut out).expect("request fits a frame");
    out[..len].to_vec()
}

/// Encode an arbitrary command/payload, including malformed payloads
pub fn raw_frame(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; payload.len() + vs_protocol::FRAME_OVERHEAD];
    let len = encode_frame(command, payload, &mut out).expect("buffer sized for frame");
    out.truncate(len);
    out
}

pub fn monitor(variables: &[(u32, VarType)]) -> Request {
    let mut request = MonitorRequest::default();
    for &(address, var_type) in variables {
        request
            .variables
            .push(VarDescriptor::new(address, var_type))
            .expect("within monitor capacity");
    }
    Request::Monitor(request)
}

pub fn set_variable(address: u32, var_type: VarType, value: f32) -> Request {
    Request::SetVariable(SetVariableRequest {
        address,
        var_type,
        value,
    })
}

/// Parse captured frames; each must be exactly one valid frame
pub fn parse_frames(frames: &[Vec<u8>]) -> Vec<DeviceFrame> {
    frames.iter().map(|bytes| parse_frame(bytes)).collect()
}

pub fn parse_frame(bytes: &[u8]) -> DeviceFrame {
    let mut decoder: FrameDecoder = FrameDecoder::new();
    let mut parsed = None;
    for (i, &byte) in bytes.iter().enumerate() {
        match decoder.push(byte) {
            None => {}
            Some(DecodeEvent::Frame(frame)) => {
                assert_eq!(i + 1, bytes.len(), "trailing bytes after frame");
                parsed = Some(to_owned(Response::parse(frame).expect("valid response")));
            }
            Some(other) => panic!("Invalid device frame: {other:?}"),
        }
    }
    parsed.expect("complete frame")
}

fn to_owned(response: Response<'_>) -> DeviceFrame {
    match response {
        Response::Ack { command, status } => DeviceFrame::Ack { command, status },
        Response::MonitorData { timestamp, values } => DeviceFrame::Data {
            timestamp,
            values: values.to_vec(),
        },
        Response::ErrorReport { code, message } => DeviceFrame::Error {
            code,
            message: message.to_vec(),
        },
    }
}
