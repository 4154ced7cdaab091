// src/engine/report.rs

//! User-facing advisories.

use std::io::Write;

/// Receives the one-time notice emitted right before a retry.
pub trait Reporter: Send {
    /// The inherited display was rejected; a virtual display is about to be
    /// started and the child relaunched. `display` is the rejected value.
    fn broken_display_advisory(&mut self, display: Option<&str>);
}

/// Writes advisories to the parent's stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn broken_display_advisory(&mut self, display: Option<&str>) {
        let message = broken_display_message(display);
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
        let _ = stderr.flush();
    }
}

/// Text of the broken-display advisory.
pub fn broken_display_message(display: Option<&str>) -> String {
    let display = display.unwrap_or("<unset>");
    format!(
        "The application failed to start because it could not open the display.\n\
         \n\
         This is usually caused by a misconfigured DISPLAY environment variable.\n\
         \n\
         DISPLAY was set to: \"{display}\"\n\
         \n\
         A virtual display will be started and the application launched again.\n"
    )
}
