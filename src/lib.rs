//! # queryline
//!
//! A client for line-based server-query control protocols:
//! - escaping codec for the restricted wire alphabet
//! - record parser (wire line → structured, typed records)
//! - command serializer (name + flags + parameters → canonical wire line)
//! - single-in-flight command pipeline over one TCP connection
//! - asynchronous notification events alongside synchronous replies
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Caller                               │
//! │        send() / request() / pending() / events()             │
//! └──────────────────────────┬───────────────────────────────────┘
//!                            │ ops channel
//! ┌──────────────────────────▼───────────────────────────────────┐
//! │                    Driver Thread                             │
//! │   Session: greeting skip → classify line → dispatch          │
//! │   ┌─────────────────┐     ┌──────────────────────┐           │
//! │   │  Pipeline Queue │────▶│  In-flight (0 or 1)  │           │
//! │   └─────────────────┘     └──────────┬───────────┘           │
//! └───────────▲──────────────────────────┼───────────────────────┘
//!     lines   │                          │ command line + \n
//! ┌───────────┴──────────┐    ┌──────────▼───────────┐
//! │    Reader Thread     │    │      TCP write       │
//! └───────────▲──────────┘    └──────────┬───────────┘
//!             └────────── server ◀───────┘
//! ```
//!
//! Replies carry no request IDs; correlation is guaranteed by keeping at
//! most one command on the wire and by the server answering in order,
//! each reply ending in an `error ...` terminator line.
//!
//! ## Example
//!
//! ```no_run
//! use queryline::{Config, QueryClient};
//! use queryline::protocol::Command;
//!
//! # fn main() -> queryline::Result<()> {
//! let client = QueryClient::connect(&Config::builder().host("127.0.0.1").build())?;
//! let outcome = client.request(Command::new("use").param("sid", 1))?;
//! assert!(outcome.is_ok());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{QueryError, Result};
pub use config::Config;
pub use client::{CommandOutcome, Event};
pub use network::QueryClient;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of queryline
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
