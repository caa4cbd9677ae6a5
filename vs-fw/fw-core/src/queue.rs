//! Single-slot response queue.
//!
//! At most one acknowledgement and one error report wait for the next
//! service tick. A new ack replaces an unsent one; a new error report is
//! refused while one is pending.

use heapless::Vec;
use vs_protocol::{AckStatus, ERROR_MESSAGE_CAPACITY};

use crate::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAck {
    pub command: u8,
    pub status: AckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingErrorReport {
    pub code: u8,
    pub message: Vec<u8, ERROR_MESSAGE_CAPACITY>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseQueue {
    ack: Option<PendingAck>,
    error: Option<PendingErrorReport>,
}

impl ResponseQueue {
    pub const fn new() -> Self {
        Self {
            ack: None,
            error: None,
        }
    }

    /// Queue an ack, returning the unsent one it replaced
    pub fn queue_ack(&mut self, command: u8, status: AckStatus) -> Option<PendingAck> {
        self.ack.replace(PendingAck { command, status })
    }

    pub fn take_ack(&mut self) -> Option<PendingAck> {
        self.ack.take()
    }

    /// Queue an error report; messages longer than the capacity are truncated
    pub fn queue_error(&mut self, code: u8, message: &[u8]) -> Result<(), ReportError> {
        if self.error.is_some() {
            return Err(ReportError::Pending);
        }
        let len = message.len().min(ERROR_MESSAGE_CAPACITY);
        let mut stored = Vec::new();
        // len is bounded by the capacity
        let _ = stored.extend_from_slice(&message[..len]);
        self.error = Some(PendingErrorReport {
            code,
            message: stored,
        });
        Ok(())
    }

    pub fn take_error(&mut self) -> Option<PendingErrorReport> {
        self.error.take()
    }

    pub fn has_ack(&self) -> bool {
        self.ack.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ack_wins() {
        let mut queue = ResponseQueue::new();
        assert_eq!(queue.queue_ack(0x01, AckStatus::Ok), None);
        let replaced = queue.queue_ack(0x03, AckStatus::InvalidPayload);
        assert_eq!(
            replaced,
            Some(PendingAck {
                command: 0x01,
                status: AckStatus::Ok
            })
        );
        assert_eq!(
            queue.take_ack(),
            Some(PendingAck {
                command: 0x03,
                status: AckStatus::InvalidPayload
            })
        );
        assert_eq!(queue.take_ack(), None);
    }

    #[test]
    fn test_error_report_refused_while_pending() {
        let mut queue = ResponseQueue::new();
        queue.queue_error(1, b"first").unwrap();
        assert_eq!(queue.queue_error(2, b"second"), Err(ReportError::Pending));

        let report = queue.take_error().unwrap();
        assert_eq!(report.code, 1);
        assert_eq!(report.message.as_slice(), b"first");
        assert!(queue.queue_error(2, b"second").is_ok());
    }

    #[test]
    fn test_error_message_truncated_to_capacity() {
        let mut queue = ResponseQueue::new();
        let long = [b'x'; ERROR_MESSAGE_CAPACITY + 20];
        queue.queue_error(7, &long).unwrap();
        assert_eq!(
            queue.take_error().unwrap().message.len(),
            ERROR_MESSAGE_CAPACITY
        );
    }
}
