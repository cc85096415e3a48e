//! Connected query client
//!
//! Owns the TCP stream and the two worker threads; exposes the public
//! send/request/pending surface. All pipeline state lives on the driver
//! thread, reached through channels, so callbacks may call back into the
//! client freely.

use std::io::{BufRead, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::client::{CommandOutcome, Event, ReplyCallback, Session};
use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::protocol::Command;

/// Operations posted to the driver thread
enum Op {
    Submit {
        command: Command,
        callback: Option<ReplyCallback>,
    },
    Pending(Sender<Vec<Command>>),
    Clear(Sender<Vec<Command>>),
}

/// A connected server-query client
///
/// Commands are queued and written one at a time; replies correlate to
/// commands purely by order (the protocol has no request IDs). Server
/// notifications, transport faults, and the final close arrive on the
/// [`events`](QueryClient::events) channel.
pub struct QueryClient {
    ops: Sender<Op>,
    events: Receiver<Event>,
    stream: TcpStream,
    peer_addr: String,
    reader: Option<JoinHandle<()>>,
    driver: Option<JoinHandle<()>>,
}

impl QueryClient {
    /// Connect and start the reader and driver threads
    ///
    /// The connection is usable immediately: commands submitted before the
    /// server greeting completes are queued and written once it does.
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config.addr();
        let stream = Self::open_stream(config, &addr)?;
        stream.set_nodelay(config.nodelay)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.clone());
        tracing::debug!("connected to {}", peer_addr);

        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        let (line_tx, line_rx) = channel::unbounded::<String>();
        let (op_tx, op_rx) = channel::unbounded::<Op>();
        let (event_tx, event_rx) = channel::unbounded::<Event>();

        let reader_events = event_tx.clone();
        let reader = thread::Builder::new()
            .name("queryline-reader".to_string())
            .spawn(move || read_loop(read_stream, line_tx, reader_events))?;

        let session = Session::new(BufWriter::new(write_stream), event_tx.clone());
        let driver = thread::Builder::new()
            .name("queryline-driver".to_string())
            .spawn(move || drive_loop(session, line_rx, op_rx, event_tx))?;

        Ok(Self {
            ops: op_tx,
            events: event_rx,
            stream,
            peer_addr,
            reader: Some(reader),
            driver: Some(driver),
        })
    }

    fn open_stream(config: &Config, addr: &str) -> Result<TcpStream> {
        if config.connect_timeout_ms == 0 {
            return Ok(TcpStream::connect(addr)?);
        }
        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let mut last_err: Option<std::io::Error> = None;
        for sock_addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&sock_addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.map(QueryError::Io).unwrap_or_else(|| {
            QueryError::Connection(format!("address resolved to nothing: {addr}"))
        }))
    }

    /// Enqueue a command; the callback fires with its outcome
    ///
    /// The callback runs on the driver thread and may itself call `send`.
    pub fn send<F>(&self, command: Command, callback: F) -> Result<()>
    where
        F: FnOnce(CommandOutcome) + Send + 'static,
    {
        self.submit(command, Some(Box::new(callback)))
    }

    /// Enqueue a command and block until its outcome arrives
    pub fn request(&self, command: Command) -> Result<CommandOutcome> {
        let (tx, rx) = channel::bounded(1);
        self.send(command, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        rx.recv()
            .map_err(|_| QueryError::Connection("connection closed before reply".to_string()))
    }

    /// Like [`request`](Self::request), but give up waiting after `timeout`
    ///
    /// Returns `Ok(None)` on timeout. This bounds the wait only: the
    /// command stays in flight and keeps the pipeline occupied until its
    /// terminator arrives, since the protocol has no mid-flight abort.
    pub fn request_timeout(
        &self,
        command: Command,
        timeout: Duration,
    ) -> Result<Option<CommandOutcome>> {
        let (tx, rx) = channel::bounded(1);
        self.send(command, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        match rx.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(QueryError::Connection(
                "connection closed before reply".to_string(),
            )),
        }
    }

    /// Snapshot of commands still waiting to be sent
    pub fn pending(&self) -> Result<Vec<Command>> {
        let (tx, rx) = channel::bounded(1);
        self.ops
            .send(Op::Pending(tx))
            .map_err(|_| Self::closed())?;
        rx.recv().map_err(|_| Self::closed())
    }

    /// Discard all pending commands, returning them
    ///
    /// Discarded callbacks never run; a command already in flight still
    /// completes normally.
    pub fn clear_pending(&self) -> Result<Vec<Command>> {
        let (tx, rx) = channel::bounded(1);
        self.ops.send(Op::Clear(tx)).map_err(|_| Self::closed())?;
        rx.recv().map_err(|_| Self::closed())
    }

    /// The outbound event channel: notifications, transport faults, close
    pub fn events(&self) -> Receiver<Event> {
        self.events.clone()
    }

    /// The connected peer address
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Shut the connection down and join the worker threads
    pub fn close(mut self) -> Result<()> {
        tracing::debug!("closing connection to {}", self.peer_addr);
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            if e.kind() != std::io::ErrorKind::NotConnected {
                return Err(e.into());
            }
        }
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.driver.take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn submit(&self, command: Command, callback: Option<ReplyCallback>) -> Result<()> {
        self.ops
            .send(Op::Submit { command, callback })
            .map_err(|_| Self::closed())
    }

    fn closed() -> QueryError {
        QueryError::Connection("client closed".to_string())
    }
}

impl Drop for QueryClient {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Blocking read loop: socket lines → driver channel
///
/// Ends on EOF, a peer reset (both are normal closes), or a read error
/// (reported on the event channel). Dropping the line sender is what tells
/// the driver the transport is gone.
fn read_loop(stream: TcpStream, lines: Sender<String>, events: Sender<Event>) {
    let mut reader = BufReader::new(stream);
    let mut buf = String::new();
    loop {
        buf.clear();
        match reader.read_line(&mut buf) {
            Ok(0) => {
                tracing::debug!("server closed the connection");
                return;
            }
            Ok(_) => {
                if lines.send(buf.trim().to_string()).is_err() {
                    return;
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::ConnectionReset
                    || e.kind() == std::io::ErrorKind::ConnectionAborted =>
            {
                tracing::debug!("connection reset by server");
                return;
            }
            Err(e) => {
                tracing::warn!("read error: {}", e);
                let _ = events.send(Event::TransportError(e.into()));
                return;
            }
        }
    }
}

/// Driver loop: owns the session, serializes lines and client operations
fn drive_loop(
    mut session: Session<BufWriter<TcpStream>>,
    lines: Receiver<String>,
    mut ops: Receiver<Op>,
    events: Sender<Event>,
) {
    loop {
        crossbeam::select! {
            recv(lines) -> line => match line {
                Ok(line) => {
                    if let Err(e) = session.receive_line(&line) {
                        tracing::warn!("transport write failed: {}", e);
                        let _ = events.send(Event::TransportError(e));
                    }
                }
                Err(_) => {
                    // Transport gone: report the unsent queue and stop.
                    // The in-flight callback, if any, is dropped uninvoked.
                    let pending = session.clear_pending();
                    let _ = events.send(Event::Closed { pending });
                    return;
                }
            },
            recv(ops) -> op => match op {
                Ok(Op::Submit { command, callback }) => {
                    if let Err(e) = session.submit_boxed(command, callback) {
                        tracing::warn!("transport write failed: {}", e);
                        let _ = events.send(Event::TransportError(e));
                    }
                }
                Ok(Op::Pending(reply)) => {
                    let _ = reply.send(session.pending());
                }
                Ok(Op::Clear(reply)) => {
                    let _ = reply.send(session.clear_pending());
                }
                Err(_) => {
                    // Client handle dropped. Keep serving received lines so
                    // the in-flight command can still complete; swap in a
                    // channel that never fires to avoid a busy loop.
                    ops = channel::never();
                }
            },
        }
    }
}
