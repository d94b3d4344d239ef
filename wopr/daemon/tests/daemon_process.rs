//! Spawns the actual daemon binary and drives it through its control socket
//! with the client helper.

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::TempDir;

use wopr_core::{client, Request};

struct Daemon {
    child: Child,
    socket_path: PathBuf,
    _dir: TempDir,
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_daemon() -> Daemon {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("wopr.sock");

    let child = Command::new(env!("CARGO_BIN_EXE_wopr-daemon"))
        .arg("--socket-path")
        .arg(&socket_path)
        .arg("--state-dir")
        .arg(dir.path().join("state"))
        .arg("--pid-file")
        .arg(dir.path().join("wopr.pid"))
        .arg("--log-level")
        .arg("warn")
        .spawn()
        .expect("daemon binary spawns");

    let deadline = Instant::now() + Duration::from_secs(5);
    while !socket_path.exists() {
        assert!(Instant::now() < deadline, "daemon never bound its socket");
        std::thread::sleep(Duration::from_millis(20));
    }

    Daemon {
        child,
        socket_path,
        _dir: dir,
    }
}

#[tokio::test]
async fn daemon_serves_requests_and_exits_on_shutdown() {
    let mut daemon = spawn_daemon();

    let status = client::send_request(&daemon.socket_path, &Request::new("status"))
        .await
        .unwrap();
    assert!(status.ok);
    assert_eq!(status.result, Some(json!({"current_pattern": null})));

    let started = client::send_request(
        &daemon.socket_path,
        &Request::new("start_pattern").with_param("name", "Knight Rider"),
    )
    .await
    .unwrap();
    assert!(started.ok);

    let status = client::send_request(&daemon.socket_path, &Request::new("status"))
        .await
        .unwrap();
    assert_eq!(
        status.result,
        Some(json!({"current_pattern": "Knight Rider"}))
    );

    let response = client::send_request(&daemon.socket_path, &Request::new("shutdown"))
        .await
        .unwrap();
    assert_eq!(response.result, Some(json!("shutting_down")));

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(exit) = daemon.child.try_wait().unwrap() {
            assert!(exit.success(), "daemon exited with {exit}");
            break;
        }
        assert!(Instant::now() < deadline, "daemon did not exit on shutdown");
        std::thread::sleep(Duration::from_millis(20));
    }
}
