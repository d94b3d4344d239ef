//! Control protocol client helper.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::protocol::{Request, Response};

/// Send one request to a control socket and wait for the response.
///
/// Writes the JSON body, half-closes so the server sees end of request,
/// then reads until the server closes.
pub async fn send_request(socket_path: &Path, request: &Request) -> Result<Response> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .with_context(|| format!("Failed to connect to {socket_path:?}"))?;

    let body = serde_json::to_vec(request).context("Failed to encode request")?;
    stream
        .write_all(&body)
        .await
        .context("Failed to send request")?;
    stream
        .shutdown()
        .await
        .context("Failed to half-close connection")?;

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .context("Failed to read response")?;

    serde_json::from_slice(&raw).context("Malformed response from daemon")
}
