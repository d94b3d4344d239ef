//! Control action dispatch.
//!
//! Pure translation from a [`Request`] to a supervisor call; the socket
//! transport lives in [`crate::server`]. Every failure path becomes a
//! structured error response, so a bad request can never take the server
//! down.

use serde_json::{json, Value};

use crate::protocol::{Request, Response};
use crate::supervisor::PatternSupervisor;

/// Outcome of dispatching one request.
#[derive(Debug)]
pub struct Dispatch {
    /// Response to send back to the client.
    pub response: Response,
    /// Whether the server should close after responding.
    pub shutdown: bool,
}

impl Dispatch {
    fn reply(response: Response) -> Self {
        Self {
            response,
            shutdown: false,
        }
    }
}

fn string_param<'a>(request: &'a Request, key: &str) -> Option<&'a str> {
    request.params.get(key).and_then(Value::as_str)
}

fn outcome(result: Result<Value, crate::error::SupervisorError>) -> Response {
    match result {
        Ok(value) => Response::ok(value),
        Err(err) => Response::err(err.to_string()),
    }
}

/// Dispatch one control request onto the supervisor.
pub async fn dispatch(supervisor: &mut PatternSupervisor, request: &Request) -> Dispatch {
    let response = match request.action.as_str() {
        "list_patterns" => Response::ok(json!(supervisor.load_patterns())),
        "list_hooks" => Response::ok(json!(supervisor.load_hooks())),

        "start_pattern" => match string_param(request, "name") {
            Some(name) => outcome(
                supervisor
                    .start_pattern(name)
                    .await
                    .map(|()| json!("started")),
            ),
            None => Response::err("missing name"),
        },
        "stop_pattern" => outcome(supervisor.stop_pattern().await.map(|()| json!("stopped"))),
        "stop_all" => outcome(supervisor.stop_pattern().await.map(|()| json!("stopped_all"))),

        "status" => Response::ok(json!({ "current_pattern": supervisor.current_pattern() })),

        "save_pattern" => match string_param(request, "name") {
            Some(name) => outcome(supervisor.save_pattern(name).map(|()| json!("saved"))),
            None => Response::err("missing name"),
        },

        "register_startup" => match string_param(request, "name") {
            Some(name) => {
                let linked_hook = string_param(request, "linked_hook");
                outcome(
                    supervisor
                        .register_startup_pattern(name, linked_hook)
                        .map(|()| json!("registered")),
                )
            }
            None => Response::err("missing name"),
        },
        "unregister_startup" => match string_param(request, "name") {
            Some(name) => {
                supervisor.unregister_startup_pattern(name);
                Response::ok(json!("unregistered"))
            }
            None => Response::err("missing name"),
        },
        "list_startup" => Response::ok(json!({
            "startup_patterns": supervisor.startup_pattern_list(),
            "startup_links": supervisor.startup_links(),
        })),

        "list_hook_pattern_links" => Response::ok(json!(supervisor.hook_pattern_links())),

        "link_hook_to_pattern" => {
            match (
                string_param(request, "hook_event_name"),
                string_param(request, "pattern_name"),
            ) {
                (Some(hook), Some(pattern)) => outcome(
                    supervisor
                        .link_hook(hook, pattern)
                        .map(|()| json!(format!("linked {hook} to {pattern}"))),
                ),
                _ => Response::err("missing hook_event_name or pattern_name"),
            }
        }
        "unlink_hook" => match string_param(request, "hook_event_name") {
            Some(hook) => outcome(supervisor.unlink_hook(hook).map(|()| json!("unlinked"))),
            None => Response::err("missing hook_event_name"),
        },

        "trigger_test_hook" => outcome(
            supervisor
                .trigger_test_hook()
                .map(|()| json!("test hook triggered")),
        ),

        "add_persistent_link" => {
            match (
                string_param(request, "hook_event_name"),
                string_param(request, "pattern_name"),
            ) {
                (Some(hook), Some(pattern)) => outcome(
                    supervisor
                        .add_persistent_link(hook, pattern)
                        .map(|()| json!(format!("linked {hook} to {pattern}"))),
                ),
                _ => Response::err("missing hook_event_name or pattern_name"),
            }
        }
        "remove_persistent_link" => match string_param(request, "hook_event_name") {
            Some(hook) => outcome(
                supervisor
                    .remove_persistent_link(hook)
                    .map(|()| json!("unlinked")),
            ),
            None => Response::err("missing hook_event_name"),
        },
        "list_persistent_links" => outcome(supervisor.persistent_links().map(|links| json!(links))),

        "add_pattern_to_startup" => match string_param(request, "pattern_name") {
            Some(pattern) => outcome(
                supervisor
                    .add_startup_pattern(pattern)
                    .map(|()| json!("added")),
            ),
            None => Response::err("missing pattern_name"),
        },
        "remove_pattern_from_startup" => match string_param(request, "pattern_name") {
            Some(pattern) => outcome(
                supervisor
                    .remove_startup_pattern(pattern)
                    .map(|()| json!("removed")),
            ),
            None => Response::err("missing pattern_name"),
        },
        "list_startup_patterns" => outcome(
            supervisor
                .persisted_startup_patterns()
                .map(|patterns| json!(patterns)),
        ),

        "shutdown" => {
            supervisor.shutdown().await;
            return Dispatch {
                response: Response::ok(json!("shutting_down")),
                shutdown: true,
            };
        }

        other => Response::err(format!("unknown action {other}")),
    };
    Dispatch::reply(response)
}
