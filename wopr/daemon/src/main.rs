//! WOPR Daemon - LED Pattern Supervision Server
//!
//! Main entry point for the WOPR daemon. It owns the strip, runs the
//! pattern supervisor and hook polling loop, and serves the JSON control
//! protocol over a Unix socket for `woprctl` and any other client.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults
//! wopr-daemon
//!
//! # Custom socket path
//! wopr-daemon --socket-path /tmp/my-wopr.sock
//!
//! # With config file
//! wopr-daemon --config /etc/wopr/wopr.toml
//!
//! # Daemonize (run in background)
//! wopr-daemon --daemonize
//!
//! # Verbose logging
//! RUST_LOG=debug wopr-daemon
//! ```
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: Graceful shutdown

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use wopr_core::{
    builtin_hooks, builtin_patterns, shared_strip, ControlServer, HookRegistry, MemoryStrip,
    PatternRegistry, PatternSupervisor, PersistenceStore, WoprConfig,
};

/// WOPR Daemon - LED pattern supervision server
#[derive(Parser, Debug)]
#[command(name = "wopr-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Unix socket path for control connections
    #[arg(short = 's', long, env = "WOPR_SOCKET", value_name = "PATH")]
    socket_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "WOPR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for persisted startup state
    #[arg(long, env = "WOPR_STATE_DIR", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Run as daemon (fork to background)
    #[arg(short = 'd', long)]
    daemonize: bool,

    /// PID file path (for daemon mode)
    #[arg(long, env = "WOPR_PID_FILE", value_name = "PATH")]
    pid_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "WOPR_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Default PID file path: XDG_RUNTIME_DIR if available, otherwise /tmp/wopr-$UID/
fn default_pid_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("wopr").join("wopr.pid")
    } else {
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/wopr-{uid}/wopr.pid"))
    }
}

/// Write PID file
fn write_pid_file(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create PID directory: {parent:?}"))?;
    }

    let pid = std::process::id();
    let mut file =
        fs::File::create(path).with_context(|| format!("Failed to create PID file: {path:?}"))?;
    writeln!(file, "{pid}")?;

    info!(pid = pid, path = ?path, "PID file created");
    Ok(())
}

/// Remove PID file
fn remove_pid_file(path: &PathBuf) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!(error = %e, path = ?path, "Failed to remove PID file");
        } else {
            info!(path = ?path, "PID file removed");
        }
    }
}

/// Check if another daemon is running by checking PID file
fn check_existing_daemon(pid_path: &PathBuf) -> Result<()> {
    if !pid_path.exists() {
        return Ok(());
    }

    let pid_str = fs::read_to_string(pid_path)
        .with_context(|| format!("Failed to read PID file: {pid_path:?}"))?;

    let pid: i32 = pid_str
        .trim()
        .parse()
        .with_context(|| "Invalid PID in file")?;

    // Signal 0 just checks process existence
    let result = unsafe { libc::kill(pid, 0) };
    if result == 0 {
        anyhow::bail!(
            "Another wopr-daemon is already running (PID: {pid}). \
             Stop it first or remove {pid_path:?} if it's stale."
        );
    }

    warn!(pid = pid, "Removing stale PID file");
    fs::remove_file(pid_path)?;
    Ok(())
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("wopr_daemon={level},wopr_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Daemonize the process (fork to background)
fn daemonize() -> Result<()> {
    use nix::unistd::{fork, setsid, ForkResult};

    match unsafe { fork() } {
        Ok(ForkResult::Parent { .. }) => {
            std::process::exit(0);
        }
        Ok(ForkResult::Child) => {}
        Err(e) => {
            anyhow::bail!("First fork failed: {e}");
        }
    }

    setsid().context("setsid failed")?;

    // Second fork prevents acquiring a controlling terminal
    match unsafe { fork() } {
        Ok(ForkResult::Parent { .. }) => {
            std::process::exit(0);
        }
        Ok(ForkResult::Child) => {}
        Err(e) => {
            anyhow::bail!("Second fork failed: {e}");
        }
    }

    Ok(())
}

/// Build the supervisor and apply the boot sequence: config links and
/// startup patterns first, then the persisted store, then resume the saved
/// pattern or fall back to the startup set.
async fn build_supervisor(config: &WoprConfig) -> Result<PatternSupervisor> {
    let strip = shared_strip(MemoryStrip::new(config.num_leds));
    let patterns = PatternRegistry::new(builtin_patterns());
    let hooks = HookRegistry::new(builtin_hooks());
    let store = PersistenceStore::new(&config.state_dir);

    let mut supervisor = PatternSupervisor::new(strip, patterns, hooks, store)
        .with_stop_timeout(config.stop_timeout())
        .with_alert_capacity(config.alert_capacity);

    for (hook, pattern) in &config.hook_links {
        if let Err(e) = supervisor.link_hook(hook, pattern) {
            warn!(hook = %hook, pattern = %pattern, error = %e, "Skipping configured hook link");
        }
    }
    for pattern in &config.startup_patterns {
        if let Err(e) = supervisor.register_startup_pattern(pattern, None) {
            warn!(pattern = %pattern, error = %e, "Skipping configured startup pattern");
        }
    }

    if let Err(e) = supervisor.restore_persisted_state() {
        warn!(error = %e, "Could not restore persisted startup state");
    }

    match supervisor.restore_last_pattern().await {
        Ok(true) => info!("Resumed saved pattern"),
        Ok(false) => supervisor.start_startup_patterns().await,
        Err(e) => {
            warn!(error = %e, "Could not restore last pattern");
            supervisor.start_startup_patterns().await;
        }
    }

    Ok(supervisor)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("WOPR Daemon starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    let mut config = WoprConfig::load(args.config.as_deref())?;
    if let Some(state_dir) = args.state_dir {
        config.state_dir = state_dir;
    }
    let socket_path = args.socket_path.unwrap_or_else(|| config.socket_path.clone());
    let pid_path = args.pid_file.unwrap_or_else(default_pid_path);

    info!(socket_path = ?socket_path, "Socket path");
    info!(pid_path = ?pid_path, "PID file path");
    info!(state_dir = ?config.state_dir, "State directory");

    check_existing_daemon(&pid_path)?;

    if args.daemonize {
        info!("Daemonizing...");
        daemonize()?;
        info!("Daemonized, new PID: {}", std::process::id());
    }

    write_pid_file(&pid_path)?;

    let shutdown = Arc::new(AtomicBool::new(false));

    let shutdown_clone = Arc::clone(&shutdown);
    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating shutdown");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating shutdown");
            }
        }
        shutdown_clone.store(true, Ordering::SeqCst);
    });

    let supervisor = Arc::new(Mutex::new(build_supervisor(&config).await?));

    // Hook polling ticks until shutdown; each tick grabs the supervisor
    // lock, so control requests and polling never overlap.
    let poll_supervisor = Arc::clone(&supervisor);
    let poll_shutdown = Arc::clone(&shutdown);
    let poll_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.poll_interval());
        loop {
            ticker.tick().await;
            if poll_shutdown.load(Ordering::SeqCst) {
                break;
            }
            poll_supervisor.lock().await.poll_hooks().await;
        }
    });

    let server = ControlServer::new(socket_path.clone());
    let result = server.run(Arc::clone(&supervisor), Arc::clone(&shutdown)).await;

    info!("Shutting down...");
    shutdown.store(true, Ordering::SeqCst);
    if let Err(e) = poll_handle.await {
        warn!(error = %e, "Hook polling task failed");
    }
    supervisor.lock().await.shutdown().await;
    remove_pid_file(&pid_path);

    if socket_path.exists() {
        if let Err(e) = fs::remove_file(&socket_path) {
            warn!(error = %e, "Failed to remove socket file");
        }
    }

    match result {
        Ok(()) => {
            info!("WOPR daemon stopped cleanly");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Daemon stopped with error");
            Err(e)
        }
    }
}
