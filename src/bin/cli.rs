//! queryline CLI
//!
//! Interactive shell for a server-query connection: type commands, see
//! parsed records, watch notifications as they arrive.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Parser;
use queryline::protocol::{Command, Record};
use queryline::{Config, Event, QueryClient};
use tracing_subscriber::{fmt, EnvFilter};

/// queryline CLI
#[derive(Parser, Debug)]
#[command(name = "queryline-cli")]
#[command(about = "Interactive shell for line-based server-query protocols")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "localhost:10011")]
    server: String,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// How long to wait for each reply, in seconds
    #[arg(long, default_value = "10")]
    reply_timeout: u64,

    /// One command to run instead of the interactive shell,
    /// e.g. `use sid=1` or `clientkick -reasonid clid=1`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,queryline=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let mut config = match Config::from_addr(&args.server) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    config.connect_timeout_ms = args.connect_timeout_ms;

    let client = match QueryClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };
    tracing::info!("connected to {}", client.peer_addr());

    let reply_timeout = Duration::from_secs(args.reply_timeout);
    let code = if args.command.is_empty() {
        shell(&client, reply_timeout)
    } else {
        one_shot(&client, &args.command.join(" "), reply_timeout)
    };

    if let Err(e) = client.close() {
        tracing::warn!("close failed: {}", e);
    }
    std::process::exit(code);
}

/// Run a single command and print its outcome
fn one_shot(client: &QueryClient, line: &str, reply_timeout: Duration) -> i32 {
    let Some(command) = parse_command(line) else {
        eprintln!("not a command: {line}");
        return 2;
    };
    match client.request_timeout(command, reply_timeout) {
        Ok(Some(outcome)) => {
            print_outcome(&outcome);
            if outcome.is_ok() {
                0
            } else {
                1
            }
        }
        Ok(None) => {
            eprintln!("timed out waiting for a reply");
            1
        }
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

/// Interactive loop: one command per input line
fn shell(client: &QueryClient, reply_timeout: Duration) -> i32 {
    let events = client.events();
    let printer = std::thread::spawn(move || {
        for event in events.iter() {
            match event {
                Event::Notification { name, payload } => {
                    println!("! {name}");
                    if let Some(reply) = payload {
                        for record in reply.records() {
                            print_record(record);
                        }
                    }
                }
                Event::TransportError(e) => eprintln!("! transport error: {e}"),
                Event::Closed { pending } => {
                    eprintln!("! connection closed ({} commands unsent)", pending.len());
                }
            }
        }
    });

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        let Some(command) = parse_command(line) else {
            continue;
        };
        match client.request_timeout(command, reply_timeout) {
            Ok(Some(outcome)) => print_outcome(&outcome),
            Ok(None) => eprintln!("timed out waiting for a reply"),
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        }
    }

    drop(printer);
    0
}

/// Parse an input line into a command
///
/// First token is the command name; `-token` becomes an option flag and
/// `key=value` a string parameter. Anything else is reported and skipped.
fn parse_command(line: &str) -> Option<Command> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    let mut command = Command::new(name);
    for token in tokens {
        if let Some(option) = token.strip_prefix('-') {
            command = command.flag(option);
        } else if let Some((key, value)) = token.split_once('=') {
            command = command.param(key, value);
        } else {
            eprintln!("ignoring token (expected -flag or key=value): {token}");
        }
    }
    Some(command)
}

fn print_outcome(outcome: &queryline::CommandOutcome) {
    for record in outcome.records() {
        print_record(record);
    }
    match &outcome.error {
        None => println!("ok"),
        Some(error) => {
            println!(
                "error id={} msg={}",
                error.get("id").map(|v| v.to_string()).unwrap_or_default(),
                error.get("msg").map(|v| v.to_string()).unwrap_or_default(),
            );
        }
    }
}

fn print_record(record: &Record) {
    let mut fields: Vec<String> = record.iter().map(|(k, v)| format!("{k}={v}")).collect();
    fields.sort();
    println!("  {}", fields.join(" "));
}
