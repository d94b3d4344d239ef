//! Unix socket control server.
//!
//! Connections are handled serially: one JSON request is read until the peer
//! half-closes, dispatched under the supervisor lock, answered, and the
//! socket closed. Failing to bind is the one fatal error; everything after
//! that is logged and survived.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::control::dispatch;
use crate::protocol::{Request, Response};
use crate::supervisor::PatternSupervisor;

/// How long a client gets to send its request and half-close.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Control server bound to a Unix socket path.
pub struct ControlServer {
    socket_path: PathBuf,
}

impl ControlServer {
    /// Server for the given socket path; nothing is bound until [`Self::run`].
    #[must_use]
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Create the socket directory and remove a stale socket file.
    fn prepare_socket(&self) -> Result<()> {
        if let Some(parent) = self.socket_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create socket directory: {parent:?}"))?;
                info!(path = ?parent, "Created socket directory");
            }
        }
        if self.socket_path.exists() {
            fs::remove_file(&self.socket_path)
                .with_context(|| format!("Failed to remove stale socket: {:?}", self.socket_path))?;
            debug!(path = ?self.socket_path, "Removed stale socket");
        }
        Ok(())
    }

    /// Accept and serve control connections until `shutdown` is set, either
    /// externally (signal) or by a `shutdown` action.
    pub async fn run(
        &self,
        supervisor: Arc<Mutex<PatternSupervisor>>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        self.prepare_socket()?;

        let listener = UnixListener::bind(&self.socket_path)
            .with_context(|| format!("Failed to bind to {:?}", self.socket_path))?;

        info!(path = ?self.socket_path, "Listening for control connections");

        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o666);
            fs::set_permissions(&self.socket_path, perms)?;
        }

        loop {
            if shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested, stopping accept loop");
                break;
            }

            // Accept with timeout so the shutdown flag is re-checked.
            let accept_result =
                tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;

            let stream = match accept_result {
                Ok(Ok((stream, _addr))) => stream,
                Ok(Err(err)) => {
                    error!(error = %err, "Accept failed");
                    continue;
                }
                Err(_) => continue,
            };

            if let Err(err) = handle_connection(stream, &supervisor, &shutdown).await {
                warn!(error = %err, "Control connection failed");
            }
        }

        if let Err(err) = fs::remove_file(&self.socket_path) {
            debug!(error = %err, "Could not remove socket on exit");
        }
        Ok(())
    }

    /// Path this server binds to.
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

async fn handle_connection(
    mut stream: UnixStream,
    supervisor: &Arc<Mutex<PatternSupervisor>>,
    shutdown: &Arc<AtomicBool>,
) -> Result<()> {
    let mut raw = Vec::new();
    tokio::time::timeout(REQUEST_TIMEOUT, stream.read_to_end(&mut raw))
        .await
        .context("Timed out reading request")?
        .context("Failed to read request")?;

    let response = match serde_json::from_slice::<Request>(&raw) {
        Ok(request) => {
            debug!(action = %request.action, "Dispatching control request");
            let mut guard = supervisor.lock().await;
            let outcome = dispatch(&mut guard, &request).await;
            drop(guard);
            if outcome.shutdown {
                shutdown.store(true, Ordering::SeqCst);
            }
            outcome.response
        }
        Err(err) => Response::err(format!("malformed request: {err}")),
    };

    let body = serde_json::to_vec(&response).context("Failed to encode response")?;
    stream
        .write_all(&body)
        .await
        .context("Failed to write response")?;
    stream
        .shutdown()
        .await
        .context("Failed to close connection")?;
    Ok(())
}
