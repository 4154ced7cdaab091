// src/exec/backend.rs

//! Pluggable launch backend.
//!
//! The retry orchestrator talks to a `LaunchBackend` instead of spawning
//! processes itself, so tests can swap in a scripted fake while production
//! uses [`ProcessLauncher`](super::ProcessLauncher).

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::request::LaunchRequest;
use crate::filter::StderrClassifier;

/// Boxed future returned by [`LaunchBackend::launch`].
pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>>;

/// Runs one launch attempt to completion.
pub trait LaunchBackend: Send {
    /// Start the child described by `request` and resolve with its exit code.
    ///
    /// `classifier`, when given, sees every piped stderr chunk that is not
    /// known garbage and decides whether it reaches the parent's stderr. It
    /// is borrowed for this attempt only.
    ///
    /// Fails only when the child could not be started (or a fatal stdin
    /// error occurred); a non-zero exit is still `Ok`.
    ///
    /// A detached request resolves with `0` as soon as the child started.
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest,
        classifier: Option<&'a mut (dyn StderrClassifier + 'a)>,
    ) -> LaunchFuture<'a>;

    /// Resolve once the child of the last detached launch has exited, with
    /// its exit code. Resolves with `0` at once when there is none.
    fn wait_detached(&mut self) -> LaunchFuture<'_>;
}
