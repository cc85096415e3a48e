//! Network Module
//!
//! TCP transport and the connected client.
//!
//! ## Architecture
//! - Reader thread: blocking line reads off the socket
//! - Driver thread: owns the [`Session`], processes lines and client
//!   operations one at a time over channels
//!
//! Confining the session to one thread keeps the pipeline free of locks:
//! every queue and state-machine operation happens on the driver.
//!
//! [`Session`]: crate::client::Session

mod client;

pub use client::QueryClient;
