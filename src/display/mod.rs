// src/display/mod.rs

//! Virtual display lifecycle.
//!
//! The orchestrator only needs two operations, acquire and release, so the
//! manager sits behind [`VirtualDisplay`]. [`XvfbDisplay`] is the production
//! implementation; tests use a counting fake.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub mod xvfb;

pub use xvfb::{XvfbDisplay, XvfbSettings};

/// Boxed future returned by [`VirtualDisplay`] operations.
pub type DisplayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A running virtual display the child can be pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHandle {
    /// Value for the child's `DISPLAY`, e.g. `":99"`.
    pub display: String,
}

pub trait VirtualDisplay: Send {
    /// Start the display server (or reuse the running one).
    fn acquire(&mut self) -> DisplayFuture<'_, DisplayHandle>;

    /// Stop the display server. Releasing an idle manager is a no-op.
    fn release(&mut self) -> DisplayFuture<'_, ()>;
}
