//! Client Tests
//!
//! End-to-end tests over a real localhost TCP socket, against a scripted
//! server.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::Duration;

use queryline::protocol::Command;
use queryline::{Config, Event, QueryClient};

const WAIT: Duration = Duration::from_secs(5);

/// One server-side exchange: the expected command line and the reply lines
struct Exchange {
    expect: &'static str,
    reply: &'static [&'static str],
}

/// Spawn a scripted server: greeting, optional initial notifications, then
/// one reply per expected command line. With `hold_open` the server then
/// waits for the client to hang up; otherwise it closes the connection.
fn scripted_server(
    notifications: &'static [&'static str],
    script: Vec<Exchange>,
    hold_open: bool,
) -> (Config, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        serve(stream, notifications, script, hold_open);
    });

    let config = Config::builder()
        .host("127.0.0.1")
        .port(port)
        .connect_timeout_ms(5000)
        .build();
    (config, handle)
}

fn serve(stream: TcpStream, notifications: &[&str], script: Vec<Exchange>, hold_open: bool) {
    let mut writer = stream.try_clone().expect("clone");
    let mut reader = BufReader::new(stream);

    writer.write_all(b"TS3\n").expect("greeting");
    writer
        .write_all(b"Welcome to the ServerQuery interface\n")
        .expect("greeting");
    for line in notifications {
        writer.write_all(format!("{line}\n").as_bytes()).expect("notify");
    }

    for exchange in script {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read command");
        assert_eq!(line.trim_end(), exchange.expect, "unexpected command");
        for reply in exchange.reply {
            writer.write_all(format!("{reply}\n").as_bytes()).expect("reply");
        }
    }

    if hold_open {
        // Stay connected until the client hangs up
        let mut line = String::new();
        while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
            line.clear();
        }
    }
    // Dropping both halves closes the connection
}

// =============================================================================
// Request / Reply Tests
// =============================================================================

#[test]
fn test_request_round_trip() {
    let (config, server) = scripted_server(
        &[],
        vec![Exchange {
            expect: "version",
            reply: &[
                "version=3.13.7 build=1655727713 platform=Linux",
                "error id=0 msg=ok",
            ],
        }],
        true,
    );

    let client = QueryClient::connect(&config).expect("connect");
    let outcome = client
        .request_timeout(Command::new("version"), WAIT)
        .expect("request")
        .expect("reply before timeout");

    assert!(outcome.is_ok());
    let record = &outcome.records()[0];
    assert_eq!(record.get_str("platform"), Some("Linux"));
    assert_eq!(record.get_int("build"), Some(1655727713));

    client.close().expect("close");
    server.join().expect("server");
}

#[test]
fn test_command_failure_reaches_the_caller() {
    let (config, server) = scripted_server(
        &[],
        vec![Exchange {
            expect: "login client_login_name=serveradmin client_login_password=wrong",
            reply: &["error id=520 msg=invalid\\sloginname\\sor\\spassword"],
        }],
        true,
    );

    let client = QueryClient::connect(&config).expect("connect");
    let command = Command::new("login")
        .param("client_login_name", "serveradmin")
        .param("client_login_password", "wrong");
    let outcome = client
        .request_timeout(command, WAIT)
        .expect("request")
        .expect("reply before timeout");

    let error = outcome.error.expect("error attached");
    assert_eq!(error.get_int("id"), Some(520));

    client.close().expect("close");
    server.join().expect("server");
}

#[test]
fn test_commands_run_in_order_over_the_wire() {
    let (config, server) = scripted_server(
        &[],
        vec![
            Exchange {
                expect: "use sid=1",
                reply: &["error id=0 msg=ok"],
            },
            Exchange {
                expect: "whoami",
                reply: &["client_id=1 client_nickname=serveradmin", "error id=0 msg=ok"],
            },
        ],
        true,
    );

    let client = QueryClient::connect(&config).expect("connect");

    // Queue both immediately; the pipeline serializes them
    let (tx, rx) = crossbeam::channel::bounded(1);
    client
        .send(Command::new("use").param("sid", 1), move |outcome| {
            let _ = tx.send(outcome.is_ok());
        })
        .expect("send");
    let outcome = client
        .request_timeout(Command::new("whoami"), WAIT)
        .expect("request")
        .expect("reply before timeout");

    assert_eq!(rx.recv_timeout(WAIT), Ok(true));
    assert_eq!(
        outcome.records()[0].get_str("client_nickname"),
        Some("serveradmin")
    );

    client.close().expect("close");
    server.join().expect("server");
}

// =============================================================================
// Notification Tests
// =============================================================================

#[test]
fn test_notifications_arrive_on_the_event_channel() {
    let (config, server) = scripted_server(
        &["notifycliententerview clid=5 client_nickname=Bob"],
        vec![Exchange {
            expect: "whoami",
            reply: &["client_id=1", "error id=0 msg=ok"],
        }],
        true,
    );

    let client = QueryClient::connect(&config).expect("connect");
    let events = client.events();

    // A command round-trip guarantees the notification was processed first
    let outcome = client
        .request_timeout(Command::new("whoami"), WAIT)
        .expect("request")
        .expect("reply before timeout");
    assert!(outcome.is_ok());

    match events.recv_timeout(WAIT).expect("event") {
        Event::Notification { name, payload } => {
            assert_eq!(name, "cliententerview");
            let reply = payload.expect("payload");
            assert_eq!(reply.first().unwrap().get_int("clid"), Some(5));
        }
        other => panic!("expected a notification, got {other:?}"),
    }

    client.close().expect("close");
    server.join().expect("server");
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_server_close_emits_the_close_event() {
    let (config, server) = scripted_server(
        &[],
        vec![Exchange {
            expect: "quit",
            reply: &["error id=0 msg=ok"],
        }],
        false,
    );

    let client = QueryClient::connect(&config).expect("connect");
    let events = client.events();

    let outcome = client
        .request_timeout(Command::new("quit"), WAIT)
        .expect("request")
        .expect("reply before timeout");
    assert!(outcome.is_ok());
    server.join().expect("server");

    // The scripted server hangs up after its last reply
    loop {
        match events.recv_timeout(WAIT).expect("close event") {
            Event::Closed { pending } => {
                assert!(pending.is_empty());
                break;
            }
            Event::Notification { .. } | Event::TransportError(_) => continue,
        }
    }

    // Further sends fail once the driver has stopped
    let mut send_result = Ok(());
    for _ in 0..50 {
        send_result = client.send(Command::new("whoami"), |_| {});
        if send_result.is_err() {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(send_result.is_err());
}

#[test]
fn test_clear_pending_returns_queued_commands() {
    // A server that never replies keeps the first command in flight
    let (config, server) = scripted_server(
        &[],
        vec![Exchange {
            expect: "first",
            reply: &[],
        }],
        true,
    );

    let client = QueryClient::connect(&config).expect("connect");

    client.send(Command::new("first"), |_| {}).expect("send");
    // Wait until the first command is on the wire (pending drains to 2)
    client.send(Command::new("second"), |_| {}).expect("send");
    client.send(Command::new("third"), |_| {}).expect("send");

    let mut pending = client.pending().expect("pending");
    for _ in 0..100 {
        if pending.len() == 2 {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
        pending = client.pending().expect("pending");
    }
    let names: Vec<&str> = pending.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["second", "third"]);

    let discarded = client.clear_pending().expect("clear");
    assert_eq!(discarded.len(), 2);
    assert!(client.pending().expect("pending").is_empty());

    client.close().expect("close");
    server.join().expect("server");
}
