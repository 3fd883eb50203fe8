//! Reader Loop
//!
//! The only reader of the bridge socket. Reads frames in arrival order,
//! matches each to its pending entry by correlation ID, decodes and delivers.

use std::io::{ErrorKind, Read};

use crate::error::LightifyError;
use crate::network::pending::PendingTable;
use crate::protocol::{decode_response, read_frame, CommandCode, MessageHeader};

/// Why the reader loop stopped
#[derive(Debug)]
pub enum ReaderExit {
    /// Peer closed the stream (or it was shut down locally)
    Closed,

    /// Transport failure or unrecoverable framing error
    Failed(LightifyError),
}

/// Run until the stream ends or fails, then close the table
///
/// A framing error leaves the stream position unknown, so it is treated
/// like a transport failure: every pending caller is failed with
/// `ConnectionClosed` and later registrations are refused.
pub fn run_reader_loop<R: Read>(mut reader: R, table: &PendingTable) -> ReaderExit {
    let exit = loop {
        match read_frame(&mut reader) {
            Ok((header, body)) => dispatch_frame(table, &header, body),
            Err(LightifyError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Bridge connection closed: {}", e);
                break ReaderExit::Closed;
            }
            Err(e) => {
                tracing::warn!("Error reading frame from bridge: {}", e);
                break ReaderExit::Failed(e);
            }
        }
    };

    let failed = table.close_all();
    if failed > 0 {
        tracing::warn!(failed, "Failed pending requests after connection loss");
    }
    exit
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
    )
}

/// Deliver one frame to its waiting caller, or discard it
pub fn dispatch_frame(table: &PendingTable, header: &MessageHeader, body: Vec<u8>) {
    let correlation_id = header.correlation_id;

    let Some(entry) = table.take(correlation_id) else {
        tracing::debug!(
            len = body.len(),
            command = header.command,
            "Discarding frame: {}",
            LightifyError::UnmatchedCorrelationId(correlation_id)
        );
        return;
    };

    if header.command != entry.command as u8 {
        tracing::debug!(
            correlation_id,
            expected = ?entry.command,
            got = ?CommandCode::from_u8(header.command),
            "Reply command byte does not match request"
        );
    }

    let result = match entry.expected {
        None => Ok(None),
        Some(kind) if body.is_empty() => Err(LightifyError::Decode(format!(
            "{:?} response: reply carried no body",
            kind
        ))),
        Some(kind) => decode_response(kind, &body).map(Some),
    };

    match &result {
        Ok(_) => tracing::trace!(correlation_id, len = body.len(), "Dispatching reply"),
        Err(e) => tracing::warn!(correlation_id, "Failed to decode reply: {}", e),
    }

    if !entry.deliver(result) {
        tracing::debug!(correlation_id, "Caller stopped waiting before delivery");
    }
}
