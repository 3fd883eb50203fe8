//! # Lightify
//!
//! Client for the binary TCP protocol spoken by Lightify home-lighting
//! bridges:
//! - Fixed-layout little-endian framing with per-command bodies
//! - Typed decoding of light/group lists and details
//! - Many concurrent callers multiplexed over one connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Callers (many threads)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ send(request)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  BridgeConnection                            │
//! │     assign correlation id → register → write frame           │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │  PendingTable   │◄───────────────│   Reader Loop   │
//!   │    (Mutex)      │  take(id)      │  (one thread)   │
//!   └─────────────────┘                └────────┬────────┘
//!                                               │
//!                                               ▼
//!                                       ┌─────────────┐
//!                                       │ Wire Codec  │
//!                                       └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LightifyError, Result};
pub use config::Config;
pub use network::BridgeConnection;
pub use protocol::{GroupId, LightId, Name16, Request, Response, Rgb};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
