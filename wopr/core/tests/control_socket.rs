//! End-to-end control socket tests: a real server task, a real Unix socket,
//! and the client helper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Mutex;

use wopr_core::{
    builtin_hooks, builtin_patterns, client, shared_strip, ControlServer, HookRegistry,
    MemoryStrip, PatternRegistry, PatternSupervisor, PersistenceStore, Request,
};

struct Harness {
    _dir: TempDir,
    socket_path: std::path::PathBuf,
    shutdown: Arc<AtomicBool>,
    server: tokio::task::JoinHandle<anyhow::Result<()>>,
}

async fn start_daemon() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("wopr.sock");

    let supervisor = PatternSupervisor::new(
        shared_strip(MemoryStrip::new(8)),
        PatternRegistry::new(builtin_patterns()),
        HookRegistry::new(builtin_hooks()),
        PersistenceStore::new(dir.path().join("state")),
    );
    let supervisor = Arc::new(Mutex::new(supervisor));
    let shutdown = Arc::new(AtomicBool::new(false));

    let server_shutdown = Arc::clone(&shutdown);
    let server_socket = socket_path.clone();
    let server = tokio::spawn(async move {
        ControlServer::new(server_socket)
            .run(supervisor, server_shutdown)
            .await
    });

    // Wait for the socket to appear.
    for _ in 0..50 {
        if socket_path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(socket_path.exists(), "server never bound its socket");

    Harness {
        _dir: dir,
        socket_path,
        shutdown,
        server,
    }
}

impl Harness {
    async fn call(&self, request: Request) -> wopr_core::Response {
        client::send_request(&self.socket_path, &request)
            .await
            .expect("request round trip")
    }

    async fn finish(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.server.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn status_and_pattern_lifecycle_over_the_socket() {
    let daemon = start_daemon().await;

    let patterns = daemon.call(Request::new("list_patterns")).await;
    assert!(patterns.ok);
    let names: Vec<String> = serde_json::from_value(patterns.result.unwrap()).unwrap();
    assert!(names.contains(&"Knight Rider".to_string()));

    let started = daemon
        .call(Request::new("start_pattern").with_param("name", "Knight Rider"))
        .await;
    assert!(started.ok);
    assert_eq!(started.result, Some(json!("started")));

    let status = daemon.call(Request::new("status")).await;
    assert_eq!(
        status.result,
        Some(json!({"current_pattern": "Knight Rider"}))
    );

    let stopped = daemon.call(Request::new("stop_pattern")).await;
    assert!(stopped.ok);

    let status = daemon.call(Request::new("status")).await;
    assert_eq!(status.result, Some(json!({"current_pattern": null})));

    daemon.finish().await;
}

#[tokio::test]
async fn bad_requests_get_structured_errors_not_disconnects() {
    let daemon = start_daemon().await;

    let unknown = daemon.call(Request::new("frobnicate")).await;
    assert!(!unknown.ok);
    assert_eq!(unknown.error.as_deref(), Some("unknown action frobnicate"));

    let missing = daemon.call(Request::new("start_pattern")).await;
    assert!(!missing.ok);
    assert_eq!(missing.error.as_deref(), Some("missing name"));

    // The server is still alive and serving.
    let status = daemon.call(Request::new("status")).await;
    assert!(status.ok);

    daemon.finish().await;
}

#[tokio::test]
async fn shutdown_action_stops_the_server_after_responding() {
    let daemon = start_daemon().await;

    let response = daemon.call(Request::new("shutdown")).await;
    assert!(response.ok);
    assert_eq!(response.result, Some(json!("shutting_down")));

    daemon.server.await.unwrap().unwrap();
    assert!(!daemon.socket_path.exists());
}

#[tokio::test]
async fn links_persist_across_a_daemon_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("state");

    let build = |state_dir: std::path::PathBuf| {
        PatternSupervisor::new(
            shared_strip(MemoryStrip::new(8)),
            PatternRegistry::new(builtin_patterns()),
            HookRegistry::new(builtin_hooks()),
            PersistenceStore::new(state_dir),
        )
    };

    {
        let mut supervisor = build(state_dir.clone());
        supervisor
            .add_persistent_link("cpu_over_50", "Loading Bar")
            .unwrap();
    }

    let mut restarted = build(state_dir);
    restarted.restore_persisted_state().unwrap();
    let links = restarted.persistent_links().unwrap();
    assert_eq!(
        links.get("cpu_over_50").map(String::as_str),
        Some("Loading Bar")
    );
    assert_eq!(
        restarted.hook_pattern_links()["cpu_over_50"].as_deref(),
        Some("Loading Bar")
    );
}
