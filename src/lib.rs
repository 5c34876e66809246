//! # RouterOS API client
//!
//! A synchronous client for the RouterOS API sentence protocol:
//! - Length-prefixed word framing over a plain TCP stream
//! - Reply parsing into flat pairs and grouped records
//! - Challenge-response login
//! - One-shot calls/queries and cancellable streaming replies
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                                │
//! │        (connect / call / query / listen / close)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Query /   │          │   Reply     │
//!   │ Call words  │          │   Parser    │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │             Word Codec              │
//!   │     (length prefix + raw bytes)     │
//!   └─────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use routeros::{Client, Query, Pair, PairOp};
//!
//! # fn main() -> routeros::Result<()> {
//! let mut client = Client::new("192.168.88.1:8728")?;
//! client.connect("admin", "secret")?;
//!
//! let query = Query::new()
//!     .proplist(["name", "type"])
//!     .filter(Pair::filter(PairOp::Eq, "type", "ether"));
//! let reply = client.query("/interface/print", &query)?;
//! for row in &reply.sub_pairs {
//!     println!("{:?}", row);
//! }
//!
//! client.close()?;
//! # Ok(())
//! # }
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

pub use error::{RouterOsError, Result};
pub use config::Config;
pub use network::{Client, ReplyStream, StopHandle};
pub use protocol::{Pair, PairOp, Query, Record, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
