//! Bridge Connection
//!
//! Owns the socket to one bridge. Any number of threads may call `send`
//! concurrently; each gets back only the reply carrying its own
//! correlation ID.

use std::io::{self, BufReader};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{LightifyError, Result};
use crate::network::pending::{DeliverySlot, PendingTable, WaitTimedOut};
use crate::network::reader::{run_reader_loop, ReaderExit};
use crate::protocol::{
    build_frame, encode_request, write_frame, GroupDetails, GroupId, GroupRecord, LightDetails,
    LightId, LightRecord, Request, Response, Rgb,
};

/// Default `x` byte sent with color changes
pub const DEFAULT_COLOR_X: u8 = 0xff;

/// A live connection to one bridge
pub struct BridgeConnection {
    /// Write half, locked for the duration of one frame
    writer: Mutex<TcpStream>,

    /// Handle used only to shut the socket down
    control: TcpStream,

    /// In-flight requests, shared with the reader thread
    table: Arc<PendingTable>,

    /// Next correlation ID
    next_id: AtomicU32,

    reader: Mutex<Option<JoinHandle<ReaderExit>>>,

    config: Config,

    /// Peer address for logging
    peer_addr: String,
}

impl BridgeConnection {
    /// Connect to the bridge at `addr` with default settings
    pub fn connect(addr: impl Into<String>) -> Result<Self> {
        Self::open(Config::builder().bridge_addr(addr).build())
    }

    /// Connect using a full config
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let stream = dial(&config)?;
        Self::from_stream(stream, config)
    }

    /// Take over an established stream and start the reader thread
    pub fn from_stream(stream: TcpStream, config: Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;
        let control = stream.try_clone()?;

        let table = Arc::new(PendingTable::new(config.max_pending));
        let reader_table = Arc::clone(&table);
        let reader = thread::Builder::new()
            .name("lightify-reader".to_string())
            .spawn(move || run_reader_loop(BufReader::new(read_stream), &reader_table))?;

        tracing::info!("Connected to bridge at {}", peer_addr);

        Ok(Self {
            writer: Mutex::new(stream),
            control,
            table,
            next_id: AtomicU32::new(1),
            reader: Mutex::new(Some(reader)),
            config,
            peer_addr,
        })
    }

    /// Send a request and block until its reply is delivered
    ///
    /// Returns `Ok(None)` for fire-and-forget commands once the bridge has
    /// acknowledged them.
    pub fn send(&self, request: &Request) -> Result<Option<Response>> {
        let command = request.command();
        let body = encode_request(request);
        let correlation_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = build_frame(command as u8, correlation_id, &body)?;

        // Registered before the write so a fast reply always finds its entry
        let slot = self
            .table
            .register(correlation_id, command, request.response_kind())?;

        if let Err(e) = self.write_frame(&frame) {
            self.table.cancel(correlation_id);
            tracing::warn!(correlation_id, "Write to {} failed: {}", self.peer_addr, e);
            self.shutdown();
            return Err(e);
        }

        tracing::trace!(correlation_id, ?command, len = body.len(), "Sent request");
        self.await_delivery(slot)
    }

    fn write_frame(&self, frame: &[u8]) -> Result<()> {
        write_frame(&mut *self.writer.lock(), frame)
    }

    fn await_delivery(&self, slot: DeliverySlot) -> Result<Option<Response>> {
        let timeout = self.config.response_timeout();
        match slot.wait(timeout) {
            Ok(delivery) => delivery,
            Err(WaitTimedOut) => {
                let correlation_id = slot.correlation_id();
                if self.table.cancel(correlation_id) {
                    tracing::debug!(correlation_id, "Reply deadline expired");
                    Err(LightifyError::Timeout {
                        correlation_id,
                        waited_ms: self.config.response_timeout_ms,
                    })
                } else {
                    // Reader already took the entry; its delivery is imminent
                    slot.wait_forever()
                }
            }
        }
    }

    // =========================================================================
    // Typed operations
    // =========================================================================

    /// List every light with full details
    pub fn list_lights(&self) -> Result<Vec<LightRecord>> {
        match self.send(&Request::ListAllLights { all_details: 1 })? {
            Some(Response::LightList(list)) => Ok(list.lights),
            other => Err(unexpected("light list", other)),
        }
    }

    /// List every group
    pub fn list_groups(&self) -> Result<Vec<GroupRecord>> {
        match self.send(&Request::ListAllGroups { u1: 1, u2: 0 })? {
            Some(Response::GroupList(list)) => Ok(list.groups),
            other => Err(unexpected("group list", other)),
        }
    }

    pub fn light_details(&self, id: LightId) -> Result<LightDetails> {
        match self.send(&Request::LightDetails { id })? {
            Some(Response::LightDetails(details)) => Ok(details),
            other => Err(unexpected("light details", other)),
        }
    }

    pub fn group_details(&self, id: GroupId) -> Result<GroupDetails> {
        match self.send(&Request::GroupDetails { id })? {
            Some(Response::GroupDetails(details)) => Ok(details),
            other => Err(unexpected("group details", other)),
        }
    }

    pub fn set_on_off(&self, id: LightId, on: bool) -> Result<()> {
        self.send(&Request::LightOnOff { id, on: u8::from(on) })
            .map(drop)
    }

    pub fn set_brightness(&self, id: LightId, bri: u8, time: u16) -> Result<()> {
        self.send(&Request::LightBrightness { id, bri, time }).map(drop)
    }

    pub fn set_temperature(&self, id: LightId, temp: u16, time: u16) -> Result<()> {
        self.send(&Request::LightTemperature { id, temp, time }).map(drop)
    }

    /// Set an RGB color with the default `x` byte
    pub fn set_color(&self, id: LightId, color: Rgb, time: u16) -> Result<()> {
        self.set_color_with_x(id, color, DEFAULT_COLOR_X, time)
    }

    pub fn set_color_with_x(&self, id: LightId, color: Rgb, x: u8, time: u16) -> Result<()> {
        self.send(&Request::LightColor { id, color, x, time }).map(drop)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the connection and wait for the reader thread to stop
    ///
    /// Pending callers are failed with `ConnectionClosed`. Idempotent.
    pub fn close(&self) {
        self.shutdown();

        let handle = self.reader.lock().take();
        if let Some(handle) = handle {
            match handle.join() {
                Ok(ReaderExit::Closed) => tracing::debug!("Reader for {} stopped", self.peer_addr),
                Ok(ReaderExit::Failed(e)) => {
                    tracing::debug!("Reader for {} stopped after error: {}", self.peer_addr, e)
                }
                Err(_) => tracing::error!("Reader thread for {} panicked", self.peer_addr),
            }
        }
        self.table.close_all();
    }

    fn shutdown(&self) {
        self.table.close_all();
        if let Err(e) = self.control.shutdown(Shutdown::Both) {
            if e.kind() != io::ErrorKind::NotConnected {
                tracing::debug!("Socket shutdown for {} failed: {}", self.peer_addr, e);
            }
        }
    }

    /// True once the connection has been closed or lost
    pub fn is_closed(&self) -> bool {
        self.table.is_closed()
    }

    /// Number of requests awaiting a reply
    pub fn pending_count(&self) -> usize {
        self.table.len()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for BridgeConnection {
    fn drop(&mut self) {
        self.close();
    }
}

fn unexpected(wanted: &str, got: Option<Response>) -> LightifyError {
    let got = match got {
        Some(response) => format!("{:?}", response.kind()),
        None => "empty reply".to_string(),
    };
    LightifyError::UnexpectedResponse(format!("expected {}, got {}", wanted, got))
}

fn dial(config: &Config) -> Result<TcpStream> {
    let connect_err = |source: io::Error| LightifyError::Connect {
        addr: config.bridge_addr.clone(),
        source,
    };

    let Some(timeout) = config.connect_timeout() else {
        return TcpStream::connect(&config.bridge_addr).map_err(connect_err);
    };

    let mut last_err = None;
    for addr in config.bridge_addr.to_socket_addrs().map_err(connect_err)? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to no socket addresses")
    })))
}
