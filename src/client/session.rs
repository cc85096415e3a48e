//! Protocol session state machine
//!
//! Classifies incoming lines and drives the pipeline queue.
//!
//! ## Line classification (once `Ready`)
//!
//! - `error ...`: terminator. Finalizes the in-flight command, invokes
//!   its callback, promotes the next command.
//! - `notify...`: notification. Emitted on the event channel; never
//!   touches the pipeline.
//! - anything else: data line for the in-flight command; with nothing in
//!   flight, stray lines are ignored (the protocol tolerates them).
//!
//! The session is generic over its write half so the full state machine
//! runs against an in-memory buffer in tests. It owns no thread and takes
//! no locks; the driver thread in [`crate::network`] confines it.

use std::io::Write;

use crossbeam::channel::Sender;

use crate::error::Result;
use crate::protocol::{parse_reply, Command, Record, Reply, Value};

use super::queue::{InFlight, PipelineQueue, Queued, ReplyCallback};

/// Greeting-skip progress
///
/// The server opens with two lines (a product banner and a welcome
/// notice), both discarded unparsed. Transitions run forward only, once
/// per received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Waiting for the first greeting line
    AwaitingBanner,
    /// Waiting for the second greeting line
    AwaitingGreeting,
    /// Greeting consumed; commands flow
    Ready,
}

/// The result of one command, delivered to its callback
#[derive(Debug)]
pub struct CommandOutcome {
    /// Parsed terminator record when the command failed (`id` nonzero)
    pub error: Option<Record>,
    /// Accumulated reply: the last data line received before the terminator
    pub reply: Option<Reply>,
    /// Raw text of that data line
    pub raw: Option<String>,
}

impl CommandOutcome {
    /// True when the terminator carried `id=0`
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The reply records, empty when the command produced no data line
    pub fn records(&self) -> &[Record] {
        self.reply.as_ref().map(Reply::records).unwrap_or(&[])
    }
}

/// Outbound events, independent of any command
#[derive(Debug)]
pub enum Event {
    /// A notification line: `name` is the token after the `notify` prefix,
    /// `payload` the parsed remainder (event-name token included)
    Notification {
        name: String,
        payload: Option<Reply>,
    },
    /// Transport fault, not tied to any specific command
    TransportError(crate::error::QueryError),
    /// Connection closed; carries the commands still pending (their
    /// callbacks never run)
    Closed { pending: Vec<Command> },
}

/// Protocol state machine over a write half
pub struct Session<W: Write> {
    status: SessionStatus,
    queue: PipelineQueue,
    transport: W,
    events: Sender<Event>,
}

impl<W: Write> Session<W> {
    /// Create a session awaiting the server greeting
    pub fn new(transport: W, events: Sender<Event>) -> Self {
        Self {
            status: SessionStatus::AwaitingBanner,
            queue: PipelineQueue::new(),
            transport,
            events,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Enqueue a command; writes it immediately when the pipeline is idle
    pub fn submit<F>(&mut self, command: Command, callback: F) -> Result<()>
    where
        F: FnOnce(CommandOutcome) + Send + 'static,
    {
        self.submit_boxed(command, Some(Box::new(callback)))
    }

    pub(crate) fn submit_boxed(
        &mut self,
        command: Command,
        callback: Option<ReplyCallback>,
    ) -> Result<()> {
        let wire = command.to_wire();
        tracing::debug!(command = command.name(), "queueing command");
        self.queue.push(Queued {
            command,
            wire,
            callback,
        });
        self.drive()
    }

    /// Snapshot of pending commands (the in-flight one excluded)
    pub fn pending(&self) -> Vec<Command> {
        self.queue.pending()
    }

    /// Discard all pending commands, returning them
    ///
    /// Discarded callbacks never run. A command already in flight is
    /// unaffected and will still complete normally.
    pub fn clear_pending(&mut self) -> Vec<Command> {
        self.queue.drain()
    }

    /// Process one line received from the transport
    pub fn receive_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();

        match self.status {
            SessionStatus::AwaitingBanner => {
                tracing::trace!(line, "discarding greeting banner");
                self.status = SessionStatus::AwaitingGreeting;
                return Ok(());
            }
            SessionStatus::AwaitingGreeting => {
                tracing::trace!(line, "discarding greeting notice");
                self.status = SessionStatus::Ready;
                tracing::debug!("session ready");
                return self.drive();
            }
            SessionStatus::Ready => {}
        }

        if let Some(remainder) = line.strip_prefix("error") {
            self.finalize(remainder.trim())
        } else if let Some(remainder) = line.strip_prefix("notify") {
            self.notify(remainder);
            Ok(())
        } else if let Some(flight) = self.queue.in_flight_mut() {
            flight.reply = parse_reply(line);
            flight.raw = Some(line.to_string());
            Ok(())
        } else {
            tracing::trace!(line, "ignoring stray line");
            Ok(())
        }
    }

    /// Handle a terminator line: attach the error, fire the callback,
    /// advance the pipeline
    fn finalize(&mut self, remainder: &str) -> Result<()> {
        let record = match parse_reply(remainder) {
            Some(Reply::One(record)) => record,
            Some(Reply::Many(records)) => records.into_iter().next().unwrap_or_default(),
            None => Record::new(),
        };
        let error = if record.get("id").is_some_and(Value::is_zero) {
            None
        } else {
            Some(record)
        };

        let Some(flight) = self.queue.finish() else {
            tracing::trace!("ignoring terminator with no command in flight");
            return Ok(());
        };

        let InFlight {
            command,
            callback,
            reply,
            raw,
        } = flight;
        tracing::debug!(
            command = command.name(),
            ok = error.is_none(),
            "command complete"
        );

        let outcome = CommandOutcome { error, reply, raw };
        if let Some(callback) = callback {
            callback(outcome);
        }

        self.drive()
    }

    /// Emit a notification event; the pipeline is untouched
    fn notify(&mut self, remainder: &str) {
        let name = remainder.split(' ').next().unwrap_or_default().to_string();
        let payload = parse_reply(remainder);
        tracing::debug!(event = %name, "notification");
        let _ = self.events.send(Event::Notification { name, payload });
    }

    /// Promote the next pending command and write it, if the pipeline is
    /// ready and idle
    fn drive(&mut self) -> Result<()> {
        if self.status != SessionStatus::Ready {
            return Ok(());
        }
        if let Some(wire) = self.queue.promote() {
            tracing::trace!(line = %wire, "writing command");
            self.transport.write_all(wire.as_bytes())?;
            self.transport.write_all(b"\n")?;
            self.transport.flush()?;
        }
        Ok(())
    }
}
