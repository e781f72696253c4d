use clap::{Parser, Subcommand};
use dynamic_store::{
    copy_computer_name, copy_console_user, copy_local_host_name, copy_location, copy_proxies,
    BackendKind, Session, StoreConfig, StringEncoding,
};
use serde_json::{json, Value as Json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Query platform configuration from the dynamic store
#[derive(Parser, Debug)]
#[command(name = "scquery")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a store configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend to query (auto, system, posix, memory)
    #[arg(long)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Query,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Query {
    /// Computer name and its encoding
    ComputerName,
    /// User logged into the console, with uid and gid
    ConsoleUser,
    /// Local host name
    LocalHostName,
    /// Current network location identifier
    Location,
    /// Internet proxy settings
    Proxies,
    /// Everything above
    All,
}

fn run(query: Query, session: &Session) -> Json {
    match query {
        Query::ComputerName => {
            let mut encoding = StringEncoding::default();
            match copy_computer_name(Some(session), Some(&mut encoding)) {
                Some(name) => json!({ "name": name, "encoding": encoding.to_string() }),
                None => Json::Null,
            }
        }
        Query::ConsoleUser => {
            let (mut uid, mut gid) = (0, 0);
            match copy_console_user(Some(session), Some(&mut uid), Some(&mut gid)) {
                Some(name) => json!({ "name": name, "uid": uid, "gid": gid }),
                None => Json::Null,
            }
        }
        Query::LocalHostName => json!(copy_local_host_name(Some(session))),
        Query::Location => json!(copy_location(Some(session))),
        Query::Proxies => json!(copy_proxies(Some(session))),
        Query::All => json!({
            "computer_name": run(Query::ComputerName, session),
            "console_user": run(Query::ConsoleUser, session),
            "local_host_name": run(Query::LocalHostName, session),
            "location": run(Query::Location, session),
            "proxies": run(Query::Proxies, session),
        }),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path),
        None => StoreConfig::load(),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let session = match Session::open(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: failed to open {:?} session: {}", config.backend, e);
            return ExitCode::FAILURE;
        }
    };

    let output = run(cli.command, &session);
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
