//! CLI entry point for deepwatch.
//!
//! Watches one or more directory trees and prints every change as it happens,
//! including changes inside directories created after the watch started.
//!
//! # Usage
//!
//! ```bash
//! deepwatch [OPTIONS] <PATH>...
//!
//! # Watch a tree, ignoring editor temp files
//! deepwatch --exclude .tmp --exclude .swp ./src
//!
//! # Only Rust sources, as NDJSON
//! deepwatch --ext rs --json .
//!
//! # Settings from a file, overridden on the command line
//! deepwatch --config deepwatch.json --capacity 1000 /var/data
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use dw_core::{Config, OverflowPolicy};
use dw_watcher::{
    CompositeFilter, ExcludePathFilter, ExtensionFilter, FsEvent, RecursiveWatcher, WatchError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Recursively watch directory trees and print file changes.
///
/// Directories created while watching are picked up automatically.
#[derive(Parser)]
#[command(name = "deepwatch", version, about, long_about = None)]
struct Cli {
    /// Files or directories to watch.
    #[arg(required = true)]
    paths: Vec<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, env = "DEEPWATCH_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Drop events whose path contains this substring (repeatable).
    #[arg(short, long, value_name = "SUBSTR")]
    exclude: Vec<String>,

    /// Only report files with this extension (repeatable).
    #[arg(long, value_name = "EXT")]
    ext: Vec<String>,

    /// Capacity of the event channel.
    #[arg(long, value_name = "N")]
    capacity: Option<usize>,

    /// Drop events instead of waiting when output falls behind.
    #[arg(long)]
    drop_on_overflow: bool,

    /// Print events as newline-delimited JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise uses the
/// configured level, with `notify` held at `warn`. Logs go to stderr so they
/// never mix with event output.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},notify=warn", config.log.level)));

    // Check if colors should be disabled (config or NO_COLOR env var)
    let use_ansi = config.log.ansi && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or if the
/// resulting watch settings are invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config {path}: {e}"))?,
        None => Config::default(),
    };

    if let Some(capacity) = cli.capacity {
        config.watch.event_capacity = capacity;
    }
    if cli.drop_on_overflow {
        config.watch.overflow = OverflowPolicy::DropNewest;
    }
    if cli.verbose {
        config.log.level = "debug".to_owned();
    }
    if cli.no_color {
        config.log.ansi = false;
    }

    config.watch.validate()?;
    Ok(config)
}

/// Builds the event filter from `--ext` and `--exclude`.
///
/// Returns `None` when neither option was given.
fn build_filter(cli: &Cli) -> Option<CompositeFilter> {
    let mut filter = CompositeFilter::new();

    if !cli.ext.is_empty() {
        filter = filter.and(ExtensionFilter::from_owned(cli.ext.clone()));
    }
    if !cli.exclude.is_empty() {
        filter = filter.and(ExcludePathFilter::from_owned(cli.exclude.clone()));
    }

    (!filter.is_empty()).then_some(filter)
}

// =============================================================================
// WATCH LOOP
// =============================================================================

/// Resolves when the process is asked to stop (Ctrl-C, or SIGTERM on Unix).
async fn shutdown_signal() -> color_eyre::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Received Ctrl-C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl-C, shutting down");
    }

    Ok(())
}

/// Watches every path until shutdown and prints events to stdout.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created, a path cannot be
/// watched, or stdout cannot be written.
async fn run(cli: &Cli, config: &Config) -> color_eyre::Result<()> {
    let mut watcher = RecursiveWatcher::new(&config.watch).await?;

    if let Some(filter) = build_filter(cli) {
        watcher.set_filter(filter);
    }

    for path in &cli.paths {
        watcher
            .add(path)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to watch {path}: {e}"))?;
        info!(%path, "Watching");
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            result = &mut shutdown => break result,
            Some(event) = watcher.events.recv() => {
                if let Err(e) = print_event(&event, cli.json) {
                    break Err(e);
                }
            }
            Some(error) = watcher.errors.recv() => report_error(&error),
            else => break Ok(()),
        }
    };

    watcher.close().await?;

    let stats = watcher.stats();
    debug!(
        forwarded = stats.forwarded,
        filtered = stats.filtered,
        dropped_events = stats.dropped_events,
        dropped_errors = stats.dropped_errors,
        registered = stats.registered,
        "Watcher stopped"
    );

    result
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Writes one event to stdout, as `<op> <path>` or as a JSON line.
fn print_event(event: &FsEvent, json: bool) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if json {
        serde_json::to_writer(&mut handle, event)?;
        writeln!(handle)?;
    } else {
        writeln!(handle, "{event}")?;
    }
    handle.flush()?;
    Ok(())
}

/// Logs a runtime watch error. These never stop the watcher.
fn report_error(error: &WatchError) {
    if error.is_not_found() {
        debug!(%error, "Path vanished before it could be watched");
    } else {
        warn!(%error, "Watch error");
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Merge config file and flags
    let config = build_config(&cli)?;

    // 4. Initialize tracing from the merged log settings
    init_tracing(&config);

    // 5. Watch until interrupted
    run(&cli, &config).await
}
