// src/engine/detector.rs

use crate::filter::{StderrClassifier, StderrVerdict, is_broken_display};

/// Watches one attempt's stderr for the broken-display signature.
///
/// Owned by a single attempt and queried once it has finished. Unless
/// detailed child logging is on, every chunk it sees is suppressed, whether
/// or not it matched.
#[derive(Debug, Clone, Default)]
pub struct BrokenDisplayDetector {
    observed: bool,
    echo: bool,
}

impl BrokenDisplayDetector {
    pub fn new(detailed_child_logging: bool) -> Self {
        Self {
            observed: false,
            echo: detailed_child_logging,
        }
    }

    /// Whether any chunk so far carried the signature.
    pub fn observed(&self) -> bool {
        self.observed
    }
}

impl StderrClassifier for BrokenDisplayDetector {
    fn classify(&mut self, chunk: &str) -> StderrVerdict {
        if is_broken_display(chunk) {
            self.observed = true;
        }

        if self.echo {
            StderrVerdict::Keep
        } else {
            StderrVerdict::Suppress
        }
    }
}
