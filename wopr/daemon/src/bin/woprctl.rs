//! woprctl - command line client for the WOPR daemon
//!
//! Sends a single control action over the daemon's Unix socket and prints
//! the response.
//!
//! # Usage
//!
//! ```bash
//! woprctl list_patterns
//! woprctl start_pattern name="Knight Rider"
//! woprctl link_hook_to_pattern hook_event_name=cpu_over_50 pattern_name="Loading Bar"
//! woprctl status
//! woprctl shutdown
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;

use wopr_core::{client, Request, WoprConfig};

/// Command line client for the WOPR daemon
#[derive(Parser, Debug)]
#[command(name = "woprctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Unix socket path of the daemon
    #[arg(short = 's', long, env = "WOPR_SOCKET", value_name = "PATH")]
    socket_path: Option<PathBuf>,

    /// Action to perform, e.g. `status` or `start_pattern`
    action: String,

    /// Action parameters as key=value pairs
    #[arg(value_name = "KEY=VALUE")]
    params: Vec<String>,
}

/// Split one `key=value` argument.
fn parse_key_val(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("invalid parameter '{raw}', expected KEY=VALUE"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let socket_path = match args.socket_path {
        Some(path) => path,
        None => WoprConfig::load(None)?.socket_path,
    };

    let mut request = Request::new(&args.action);
    for raw in &args.params {
        let (key, value) = parse_key_val(raw)?;
        request = request.with_param(key, value);
    }

    let response = client::send_request(&socket_path, &request).await?;

    if response.ok {
        match response.result {
            Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            None => println!("ok"),
        }
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "error: {}",
            response.error.as_deref().unwrap_or("unknown failure")
        );
        Ok(ExitCode::FAILURE)
    }
}
