//! Network Module
//!
//! Request multiplexing over one bridge socket.
//!
//! ## Architecture
//! - Callers share one `BridgeConnection` and call `send` concurrently
//! - Writes are serialized per frame behind a mutex
//! - A single reader thread matches replies to callers by correlation ID

mod connection;
mod pending;
mod reader;

pub use connection::{BridgeConnection, DEFAULT_COLOR_X};
pub use pending::{Delivery, DeliverySlot, PendingEntry, PendingTable, WaitTimedOut};
pub use reader::{dispatch_frame, run_reader_loop, ReaderExit};
