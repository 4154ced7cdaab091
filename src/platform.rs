// src/platform.rs

//! Platform policy: pure decisions about displays and stdio wiring.
//!
//! Nothing in here touches the real process environment except
//! [`EnvSnapshot::capture`] / [`PlatformPolicy::detect`]; every decision is a
//! function of an explicit `(HostOs, EnvSnapshot)` pair so it can be tested
//! for any host from any host.

use std::collections::BTreeMap;

use crate::types::{HostOs, StdioMode};

/// Name of the X display variable.
pub const DISPLAY_VAR: &str = "DISPLAY";

/// When set, the child runs as a plain node process and never opens a window.
pub const RUN_AS_NODE_VAR: &str = "ELECTRON_RUN_AS_NODE";

/// Owned copy of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Snapshot the current process environment (non-UTF-8 entries skipped).
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Builder-style insert, mostly for tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A `DISPLAY` that is set but cannot possibly point at a server.
fn display_is_known_bad(env: &EnvSnapshot) -> bool {
    matches!(env.get(DISPLAY_VAR), Some(d) if d.trim().is_empty())
}

/// Whether the child must be started under a virtual display from the outset.
pub fn requires_virtual_display(os: HostOs, env: &EnvSnapshot) -> bool {
    if env.contains(RUN_AS_NODE_VAR) || !os.is_linux_family() {
        return false;
    }

    !env.contains(DISPLAY_VAR) || display_is_known_bad(env)
}

/// Linux host that already has a `DISPLAY` set, which may or may not work.
pub fn is_possible_linux_with_incorrect_display(os: HostOs, env: &EnvSnapshot) -> bool {
    os.is_linux_family() && matches!(env.get(DISPLAY_VAR), Some(d) if !d.trim().is_empty())
}

/// Pick the stdio wiring for the child.
///
/// Streams are only piped when the platform cannot inherit descriptors
/// reliably, or when the child is expected to print display noise that has
/// to be filtered. Otherwise inheriting keeps interactive input working.
pub fn resolve_stdio_mode(os: HostOs, needs_virtual_display: bool, env: &EnvSnapshot) -> StdioMode {
    if os == HostOs::Windows {
        return StdioMode::AllPiped;
    }

    let needs_stderr_piped = os == HostOs::MacOs
        || (os.is_linux_family() && needs_virtual_display)
        || is_possible_linux_with_incorrect_display(os, env);

    if needs_stderr_piped {
        StdioMode::InheritAllButStderrPipedToFilter
    } else {
        StdioMode::InheritAll
    }
}

/// `(HostOs, EnvSnapshot)` bundled so callers do not have to thread both.
#[derive(Debug, Clone)]
pub struct PlatformPolicy {
    pub os: HostOs,
    pub env: EnvSnapshot,
}

impl PlatformPolicy {
    pub fn new(os: HostOs, env: EnvSnapshot) -> Self {
        Self { os, env }
    }

    /// Policy for the running process.
    pub fn detect() -> Self {
        Self::new(HostOs::current(), EnvSnapshot::capture())
    }

    pub fn requires_virtual_display(&self) -> bool {
        requires_virtual_display(self.os, &self.env)
    }

    pub fn is_possible_linux_with_incorrect_display(&self) -> bool {
        is_possible_linux_with_incorrect_display(self.os, &self.env)
    }

    pub fn stdio_mode(&self, needs_virtual_display: bool) -> StdioMode {
        resolve_stdio_mode(self.os, needs_virtual_display, &self.env)
    }

    /// The current `DISPLAY`, if any.
    pub fn display(&self) -> Option<&str> {
        self.env.get(DISPLAY_VAR)
    }
}
