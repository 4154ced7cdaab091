// src/engine/mod.rs

//! Retry orchestration.
//!
//! - [`orchestrator`] runs the first attempt and, when the child died because
//!   it could not open the inherited display, exactly one more attempt under
//!   a virtual display.
//! - [`detector`] is the per-attempt stderr watcher for that signature.
//! - [`report`] carries the user-facing advisory printed before a retry.

pub mod detector;
pub mod orchestrator;
pub mod report;

pub use detector::BrokenDisplayDetector;
pub use orchestrator::{
    AttemptState, DEFAULT_LOGGING_ENV, LaunchSettings, Orchestrator, RetryDecision,
};
pub use report::{ConsoleReporter, Reporter, broken_display_message};
