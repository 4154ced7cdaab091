// src/exec/mod.rs

//! Process launch layer.
//!
//! - [`request`] holds the immutable [`LaunchRequest`] and its builder.
//! - [`backend`] defines the [`LaunchBackend`] seam the retry orchestrator
//!   depends on.
//! - [`launcher`] is the real backend: spawns the child with
//!   `tokio::process::Command`, wires stdio per [`StdioMode`](crate::types::StdioMode)
//!   and filters piped stderr.

pub mod backend;
pub mod launcher;
pub mod request;

pub use backend::{LaunchBackend, LaunchFuture};
pub use launcher::{ProcessLauncher, exit_code, forward_stdin};
pub use request::{CWD_FLAG, LaunchRequest, LaunchRequestBuilder};
