use super::checksum;
use crate::{EOP, FRAME_OVERHEAD, FrameError, SOP};

/// Assemble a complete frame into `out`.
///
/// Returns the number of bytes written. Nothing is written when the frame
/// would not fit, or when the payload length does not fit the 16-bit field.
pub fn encode_frame(command: u8, payload: &[u8], out: &mut [u8]) -> Result<usize, FrameError> {
    let needed = payload.len() + FRAME_OVERHEAD;
    if needed > out.len() || payload.len() > u16::MAX as usize {
        return Err(FrameError::TooLarge {
            needed,
            capacity: out.len(),
        });
    }

    let [len_lo, len_hi] = (payload.len() as u16).to_le_bytes();
    out[0] = SOP;
    out[1] = command;
    out[2] = len_lo;
    out[3] = len_hi;
    out[4..4 + payload.len()].copy_from_slice(payload);
    out[4 + payload.len()] = checksum(command, payload);
    out[5 + payload.len()] = EOP;

    Ok(needed)
}
