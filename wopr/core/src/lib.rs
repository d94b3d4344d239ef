//! WOPR Core - LED Pattern Supervision
//!
//! This crate provides the pattern lifecycle supervisor for the WOPR LED
//! daemon, independent of any particular strip hardware or transport. It
//! can drive a real strip, a test double, or run headless behind the
//! control socket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Control Clients                        │
//! │        woprctl / scripts / anything speaking JSON         │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ Request / Response
//! ┌──────────────────────────┼───────────────────────────────┐
//! │                   ControlServer (Unix socket)             │
//! │  ┌───────────────────────┴────────────────────────────┐  │
//! │  │                 PatternSupervisor                   │  │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────────────┐  │  │
//! │  │  │ Pattern  │  │   Hook   │  │ PersistenceStore │  │  │
//! │  │  │ Registry │  │ Registry │  │  (startup.json)  │  │  │
//! │  │  └────┬─────┘  └────┬─────┘  └──────────────────┘  │  │
//! │  │       │             │                               │  │
//! │  │  running task ◄─ AlertChannel ◄─ hook polling tick  │  │
//! │  └───────┼────────────────────────────────────────────┘  │
//! └──────────┼───────────────────────────────────────────────┘
//!            ▼
//!       LedStrip (hardware or MemoryStrip)
//! ```
//!
//! # Key Types
//!
//! - [`PatternSupervisor`]: owns the one running pattern and all registries
//! - [`Pattern`]: the animation contract, cancellable and alert-aware
//! - [`Hook`]: an edge-triggered system condition probe
//! - [`AlertMessage`]: hook-to-pattern notification with severity and color
//! - [`ControlServer`]: serial JSON request/response over a Unix socket
//! - [`PersistenceStore`]: startup links and the restart resume marker

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod hooks;
pub mod pattern;
pub mod patterns;
pub mod protocol;
pub mod server;
pub mod store;
pub mod strip;
pub mod supervisor;

pub use alert::{
    alert_channel, AlertLevel, AlertMessage, AlertReceiver, AlertSender, DEFAULT_ALERT_CAPACITY,
};
pub use config::{ConfigError, WoprConfig};
pub use control::{dispatch, Dispatch};
pub use error::SupervisorError;
pub use hooks::{builtin_hooks, Hook, HookAction, HookError, HookRegistry, TEST_HOOK_EVENT};
pub use pattern::{builtin_patterns, Pattern, PatternFactory, PatternRegistry};
pub use protocol::{Request, Response};
pub use server::ControlServer;
pub use store::{PersistenceStore, StartupConfig, StoreError};
pub use strip::{shared_strip, LedStrip, MemoryStrip, Rgb, SharedStrip};
pub use supervisor::{
    PatternSupervisor, SupervisorState, DEFAULT_POLL_INTERVAL, DEFAULT_STOP_TIMEOUT,
};
