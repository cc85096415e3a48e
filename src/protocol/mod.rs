//! Protocol Module
//!
//! Defines the wire protocol for the server-query connection.
//!
//! ## Protocol Format (line-based, text-framed)
//!
//! Every frame is one newline-terminated text line. After connecting, the
//! server sends two greeting lines which are discarded unparsed. From then
//! on, incoming lines are one of:
//!
//! ```text
//! error id=0 msg=ok                          terminator (ends a command)
//! notifycliententerview clid=5 ...           notification (async event)
//! virtualserver_name=eu1 ... | ...           data (reply to the command)
//! ```
//!
//! Outgoing command lines are built from a name, option flags, and
//! key=value parameters:
//!
//! ```text
//! clientkick -reasonid clid=1|clid=2
//! ```
//!
//! ### Escaping
//!
//! Nine characters are reserved on the wire and escaped inside every key
//! and value token:
//!
//! | Character        | Escape |
//! |------------------|--------|
//! | backslash        | `\\`   |
//! | slash            | `\/`   |
//! | pipe             | `\p`   |
//! | newline          | `\n`   |
//! | carriage return  | `\r`   |
//! | tab              | `\t`   |
//! | vertical tab     | `\v`   |
//! | form feed        | `\f`   |
//! | space            | `\s`   |
//!
//! ### Records
//!
//! A reply line splits on `|` into records (one entity per record) and on
//! spaces into `key=value` tokens. A line with a single record parses to a
//! bare [`Record`]; a multi-record line parses to a list. Callers rely on
//! that shape to tell "one entity" replies from "list" replies.

mod codec;
mod command;
mod parser;
mod record;

pub use codec::{escape, unescape};
pub use command::{Command, ParamValue, Parameters};
pub use parser::parse_reply;
pub use record::{Record, Reply, Value};
