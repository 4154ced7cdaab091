// src/filter.rs

//! Stderr classification.
//!
//! Two independent pieces compose here:
//! - [`is_garbage_line`]: a fixed list of known-benign warnings that are
//!   always dropped (X library init chatter, macOS version warnings, renderer
//!   worker labels).
//! - [`StderrClassifier`]: a per-attempt hook that can suppress whatever the
//!   garbage filter let through.
//!
//! Matching runs on raw chunks, which may be partial lines, so patterns are
//! prefix or substring based and never anchored to a line end.

use std::sync::LazyLock;

use regex::RegexSet;

static GARBAGE_WARNINGS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // Xlib / libudev complaints while a virtual display starts up.
        r"^(?:Xlib|libudev)",
        // macOS High Sierra compatibility warning.
        r"\*\*\* WARNING",
        // Chromium renderer worker thread labels.
        r"\.RenderWorker-",
    ])
    .expect("invalid garbage warning pattern")
});

const BROKEN_DISPLAY_SIGNATURE: &str = "Gtk: cannot open display";

/// True when the chunk matches a known-benign warning and can be discarded.
pub fn is_garbage_line(text: &str) -> bool {
    GARBAGE_WARNINGS.is_match(text)
}

/// True when the chunk says GTK refused the display it was pointed at.
pub fn is_broken_display(text: &str) -> bool {
    text.contains(BROKEN_DISPLAY_SIGNATURE)
}

/// What to do with one stderr chunk that survived the garbage filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrVerdict {
    Keep,
    Suppress,
}

/// Per-attempt stderr hook.
pub trait StderrClassifier: Send {
    fn classify(&mut self, chunk: &str) -> StderrVerdict;
}

impl<F> StderrClassifier for F
where
    F: FnMut(&str) -> StderrVerdict + Send,
{
    fn classify(&mut self, chunk: &str) -> StderrVerdict {
        self(chunk)
    }
}

/// Full decision for one chunk: garbage first, then the optional classifier.
pub fn should_forward(chunk: &str, classifier: Option<&mut (dyn StderrClassifier + '_)>) -> bool {
    if is_garbage_line(chunk) {
        return false;
    }

    match classifier {
        Some(c) => c.classify(chunk) == StderrVerdict::Keep,
        None => true,
    }
}
