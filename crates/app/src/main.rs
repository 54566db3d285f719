mod config;

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use console::Dispatcher;
use services::{Clock, QuizService};
use storage::repository::Storage;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{AppConfig, prepare_sqlite_file};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    db_url: Option<String>,
    config: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => parsed.db_url = Some(require_value(&mut args, "--db")?),
                "--config" => {
                    parsed.config = Some(PathBuf::from(require_value(&mut args, "--config")?));
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz-server [--db <sqlite_url>] [--config <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --config ./quiz.toml (if present)");
    eprintln!("  listens on 0.0.0.0:{}", config::DEFAULT_PORT);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CONFIG, RUST_LOG");
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("quiz_server=info,console=info,services=info,storage=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_tracing()?;

    let config: AppConfig = config::resolve(args.config, args.db_url, |key| std::env::var(key).ok())
        .context("failed to load configuration")?;

    // Open + migrate SQLite before accepting anyone.
    prepare_sqlite_file(&config.db_url)?;
    let storage = Storage::sqlite(&config.db_url)
        .await
        .with_context(|| format!("failed to open database {}", config.db_url))?;
    info!(db_url = %config.db_url, "database ready");

    let quizzes = QuizService::new(Clock::system(), storage.quizzes);
    if config.seed_defaults {
        quizzes
            .ensure_default_quizzes()
            .await
            .context("failed to seed default quizzes")?;
    }

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    let dispatcher = Dispatcher::new(quizzes).with_credits(config.credits);
    console::serve(listener, dispatcher, config.color, shutdown_signal()).await;

    info!("server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
