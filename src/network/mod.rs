//! Network Module
//!
//! TCP connection handling and the public client.
//!
//! ## Architecture
//! - One blocking TCP connection per client
//! - One in-flight command at a time
//! - Streaming replies are pulled through `ReplyStream`

mod connection;
mod client;
mod stream;

pub use connection::Connection;
pub use client::Client;
pub use stream::{ReplyStream, StopHandle};
