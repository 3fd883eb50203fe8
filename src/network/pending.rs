//! Pending-Request Table
//!
//! Maps correlation IDs to waiting callers. Every operation holds the lock
//! only for the map access itself; delivery into a caller's slot always
//! happens after the lock is released.

use std::collections::HashMap;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::error::{LightifyError, Result};
use crate::protocol::{CommandCode, Response, ResponseKind};

/// What a waiting caller receives: a typed reply, an empty result, or an error
pub type Delivery = Result<Option<Response>>;

/// One in-flight request
#[derive(Debug)]
pub struct PendingEntry {
    pub correlation_id: u32,
    pub command: CommandCode,
    pub expected: Option<ResponseKind>,
    slot: Sender<Delivery>,
}

impl PendingEntry {
    /// Hand the result to the waiting caller
    ///
    /// Consumes the entry, so a second delivery is impossible. Returns false
    /// if the caller has already stopped waiting.
    pub fn deliver(self, result: Delivery) -> bool {
        self.slot.send(result).is_ok()
    }
}

/// Caller side of a pending entry
#[derive(Debug)]
pub struct DeliverySlot {
    correlation_id: u32,
    rx: Receiver<Delivery>,
}

impl DeliverySlot {
    pub fn correlation_id(&self) -> u32 {
        self.correlation_id
    }

    /// Block until the result arrives or `timeout` elapses
    ///
    /// On timeout the slot is still live; the caller decides whether to
    /// withdraw the table entry or keep waiting.
    pub fn wait(&self, timeout: Option<Duration>) -> std::result::Result<Delivery, WaitTimedOut> {
        match timeout {
            Some(limit) => match self.rx.recv_timeout(limit) {
                Ok(result) => Ok(result),
                Err(RecvTimeoutError::Timeout) => Err(WaitTimedOut),
                Err(RecvTimeoutError::Disconnected) => Ok(Err(LightifyError::ConnectionClosed)),
            },
            None => Ok(self.wait_forever()),
        }
    }

    /// Block until the result arrives
    pub fn wait_forever(&self) -> Delivery {
        self.rx.recv().unwrap_or(Err(LightifyError::ConnectionClosed))
    }
}

/// The wait deadline expired before anything was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimedOut;

struct TableState {
    entries: HashMap<u32, PendingEntry>,
    closed: bool,
}

/// Correlation ID → waiting caller
pub struct PendingTable {
    state: Mutex<TableState>,
    max_pending: usize,
}

impl PendingTable {
    pub fn new(max_pending: usize) -> Self {
        Self {
            state: Mutex::new(TableState {
                entries: HashMap::new(),
                closed: false,
            }),
            max_pending,
        }
    }

    /// Register a waiter for `correlation_id`
    ///
    /// Fails once the table has been closed, when the table is full, or if
    /// the ID is already in flight.
    pub fn register(
        &self,
        correlation_id: u32,
        command: CommandCode,
        expected: Option<ResponseKind>,
    ) -> Result<DeliverySlot> {
        let (tx, rx) = channel::bounded(1);

        let mut state = self.state.lock();
        if state.closed {
            return Err(LightifyError::ConnectionClosed);
        }
        if state.entries.len() >= self.max_pending {
            return Err(LightifyError::TooManyPending(self.max_pending));
        }
        if state.entries.contains_key(&correlation_id) {
            return Err(LightifyError::InvalidArgument(format!(
                "correlation id {} is already pending",
                correlation_id
            )));
        }
        state.entries.insert(
            correlation_id,
            PendingEntry {
                correlation_id,
                command,
                expected,
                slot: tx,
            },
        );
        let pending = state.entries.len();
        drop(state);

        tracing::trace!(correlation_id, ?command, pending, "Registered pending request");
        Ok(DeliverySlot { correlation_id, rx })
    }

    /// Remove and return the entry for `correlation_id`, if any
    pub fn take(&self, correlation_id: u32) -> Option<PendingEntry> {
        self.state.lock().entries.remove(&correlation_id)
    }

    /// Withdraw an entry without delivering; true if it was still present
    pub fn cancel(&self, correlation_id: u32) -> bool {
        self.take(correlation_id).is_some()
    }

    /// Close the table and fail every pending entry with `ConnectionClosed`
    ///
    /// Later registrations fail immediately. Returns the number of callers
    /// that were failed.
    pub fn close_all(&self) -> usize {
        let drained: Vec<PendingEntry> = {
            let mut state = self.state.lock();
            state.closed = true;
            state.entries.drain().map(|(_, entry)| entry).collect()
        };

        let failed = drained.len();
        for entry in drained {
            entry.deliver(Err(LightifyError::ConnectionClosed));
        }
        failed
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of in-flight requests
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
