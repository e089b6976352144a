use clap::{Parser, ValueEnum};
use ocinv::config::Config;
use ocinv::discovery::{validate_credentials, Discovery, FailureReport};
use ocinv::error::DiscoveryError;
use ocinv::oci::auth::{Credentials, KeyFile, RsaSigner};
use ocinv::oci::client::ServiceClients;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Resource inventory for Oracle Cloud Infrastructure
#[derive(Parser, Debug)]
#[command(name = "ocinv", version, about, long_about = None)]
struct Args {
    /// Credentials JSON, inline or as a file path
    #[arg(short, long)]
    credentials: String,

    /// Operation to run
    #[arg(short, long, value_enum, default_value = "discover")]
    operation: Operation,

    /// Compartments scanned concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Config file (defaults to <config dir>/ocinv/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Discover,
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return None;
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), e);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}

fn fail(error: &DiscoveryError) -> ExitCode {
    tracing::error!("{}", error);
    print_json(&FailureReport::new(error.to_string()));
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref());
    tracing::info!("ocinv {} starting ({:?})", ocinv::VERSION, args.operation);

    // An explicit path must load; the default location falls back to defaults
    let config = match &args.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return fail(&DiscoveryError::Config(e)),
        },
        None => Config::load(),
    };

    let credentials = match Credentials::load(&args.credentials) {
        Ok(credentials) => credentials,
        Err(e) => return fail(&DiscoveryError::Credentials(e)),
    };
    tracing::info!(
        "Using tenancy {}... in {}",
        credentials.tenancy_hint(),
        credentials.region
    );

    // Held until exit so the key file outlives every request
    let key_file = match KeyFile::materialize(&credentials.private_key) {
        Ok(key_file) => key_file,
        Err(e) => return fail(&DiscoveryError::Credentials(e)),
    };
    let signer = match RsaSigner::from_key_file(credentials.key_id(), key_file.path()) {
        Ok(signer) => Arc::new(signer),
        Err(e) => return fail(&DiscoveryError::Credentials(e)),
    };

    let clients = match ServiceClients::bootstrap(signer, &credentials.region, &config) {
        Ok(clients) => clients,
        Err(e) => return fail(&DiscoveryError::Bootstrap(e)),
    };

    let exit = match args.operation {
        Operation::Validate => {
            let result = validate_credentials(&clients, &credentials.tenancy_id).await;
            print_json(&result);
            ExitCode::SUCCESS
        }
        Operation::Discover => {
            let discovery = Discovery::new(clients, &credentials.tenancy_id, &credentials.region)
                .with_workers(config.effective_workers(args.workers));
            match discovery.run().await {
                Ok(result) => {
                    print_json(&result);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
    };

    drop(key_file);
    exit
}
