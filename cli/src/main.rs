//! Corral CLI - drives the service boundary from the command line.
//!
//! ```text
//! corral confined '{"data": "hello"}'    one request, then exit
//! corral process '["a","b","c"]'
//! corral status
//! corral greet [path]
//! corral                                 one request per stdin line
//! ```
//!
//! In line mode every line is `<command> [body]` and is handled on its own
//! task, so concurrent lines share the same actor and pool. Responses go to
//! stdout, logs to stderr.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use corral_config::CorralConfig;
use corral_service::{BoundaryError, Service};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Confined,
    Process,
    Status,
    Greet,
}

impl Command {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "confined" => Some(Self::Confined),
            "process" => Some(Self::Process),
            "status" => Some(Self::Status),
            "greet" => Some(Self::Greet),
            _ => None,
        }
    }
}

/// Run one command against the service and render the response body.
async fn dispatch(service: &Service, command: Command, body: &str) -> Result<String, BoundaryError> {
    match command {
        Command::Confined => service.handle_confined(body.as_bytes()).await,
        Command::Process => Ok(service.handle_process(body.as_bytes()).await?.to_string()),
        Command::Status => service.status().await,
        Command::Greet => Ok(service.greet(body.trim())),
    }
}

fn report(outcome: Result<String, BoundaryError>) -> bool {
    match outcome {
        Ok(body) => {
            println!("{body}");
            true
        }
        Err(err) => {
            eprintln!("error {}: {err}", err.status_code());
            false
        }
    }
}

async fn run_once(service: &Service, args: &[String]) -> Result<bool> {
    let Some(command) = Command::parse(&args[0]) else {
        bail!("unknown command `{}`", args[0]);
    };
    let body = args[1..].join(" ");
    Ok(report(dispatch(service, command, &body).await))
}

async fn run_lines(service: Arc<Service>) -> Result<bool> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut inflight = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else { break };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let (name, body) = line.split_once(' ').unwrap_or((line.as_str(), ""));
                let Some(command) = Command::parse(name) else {
                    eprintln!("error 400: unknown command `{name}`");
                    continue;
                };
                let body = body.to_string();
                let service = Arc::clone(&service);
                inflight.spawn(async move { report(dispatch(&service, command, &body).await) });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, finishing in-flight requests");
                break;
            }
        }
    }

    let mut all_ok = true;
    while let Some(done) = inflight.join_next().await {
        all_ok &= done.unwrap_or(false);
    }
    Ok(all_ok)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = CorralConfig::load()
        .context("loading configuration")?
        .unwrap_or_default();
    let service = Arc::new(Service::start(&config));

    let args: Vec<String> = env::args().skip(1).collect();
    let ok = if args.is_empty() {
        run_lines(Arc::clone(&service)).await?
    } else {
        run_once(&service, &args).await?
    };

    match Arc::try_unwrap(service) {
        Ok(service) => {
            let log = service.shutdown().await?;
            tracing::info!(submissions = log.len(), "Service stopped");
        }
        Err(_) => tracing::warn!("Service still referenced at exit; skipping shutdown"),
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
