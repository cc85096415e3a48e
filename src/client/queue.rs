//! Pipeline queue
//!
//! Pending commands plus the single in-flight slot.
//!
//! The protocol has no request IDs: correlation is purely positional, so
//! at most one command may be on the wire at a time. A command moves from
//! the deque into the in-flight slot exactly once (the moment its wire
//! text is written) and leaves the slot exactly once, on its terminator
//! line.

use std::collections::VecDeque;

use crate::protocol::{Command, Reply};

use super::session::CommandOutcome;

/// Completion callback invoked with the command's outcome
pub(crate) type ReplyCallback = Box<dyn FnOnce(CommandOutcome) + Send + 'static>;

/// A command waiting in the queue
pub(crate) struct Queued {
    pub command: Command,
    pub wire: String,
    pub callback: Option<ReplyCallback>,
}

/// The command currently on the wire, accumulating its reply
pub(crate) struct InFlight {
    pub command: Command,
    pub callback: Option<ReplyCallback>,
    /// Last data line parsed (each new data line overwrites the previous)
    pub reply: Option<Reply>,
    /// Raw text of that data line
    pub raw: Option<String>,
}

/// FIFO of pending commands + single in-flight slot
#[derive(Default)]
pub(crate) struct PipelineQueue {
    pending: VecDeque<Queued>,
    in_flight: Option<InFlight>,
}

impl PipelineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command to the tail
    pub fn push(&mut self, queued: Queued) {
        self.pending.push_back(queued);
    }

    /// Promote the head to in-flight, returning its wire text
    ///
    /// Returns `None` when a command is already in flight or nothing is
    /// pending. The caller must write the returned line to the transport:
    /// promotion is the one moment a command is written.
    pub fn promote(&mut self) -> Option<String> {
        if self.in_flight.is_some() {
            return None;
        }
        let queued = self.pending.pop_front()?;
        let wire = queued.wire;
        self.in_flight = Some(InFlight {
            command: queued.command,
            callback: queued.callback,
            reply: None,
            raw: None,
        });
        Some(wire)
    }

    /// Take the in-flight command out of its slot for finalization
    pub fn finish(&mut self) -> Option<InFlight> {
        self.in_flight.take()
    }

    /// The in-flight command, for reply accumulation
    pub fn in_flight_mut(&mut self) -> Option<&mut InFlight> {
        self.in_flight.as_mut()
    }

    /// Snapshot of pending commands, not including the in-flight one
    pub fn pending(&self) -> Vec<Command> {
        self.pending.iter().map(|q| q.command.clone()).collect()
    }

    /// Empty the pending deque, returning the discarded commands
    ///
    /// Their callbacks are dropped uninvoked. The in-flight command is
    /// unaffected and will still complete normally.
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).map(|q| q.command).collect()
    }
}
