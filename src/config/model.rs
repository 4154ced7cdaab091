// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::display::XvfbSettings;
use crate::engine::{DEFAULT_LOGGING_ENV, LaunchSettings};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [launch]
/// binary = "/opt/app/app"
/// detached = false
///
/// [child]
/// detailed_logging = false
/// logging_env = "ELECTRON_ENABLE_LOGGING"
///
/// [child.env]
/// FORCE_COLOR = "1"
///
/// [display]
/// command = "Xvfb"
/// args = ["-screen", "0", "1280x1024x24"]
/// display_number = 99
/// startup_timeout_ms = 5000
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub launch: LaunchSection,

    #[serde(default)]
    pub child: ChildSection,

    #[serde(default)]
    pub display: DisplaySection,
}

/// `[launch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSection {
    /// Executable to run. Overridden by `GUILAUNCH_RUN_BINARY` and `--binary`.
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// Do not wait for the child to exit.
    #[serde(default)]
    pub detached: bool,
}

/// `[child]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildSection {
    /// Echo the child's stderr on the first attempt (normally swallowed
    /// while looking for display failures).
    #[serde(default)]
    pub detailed_logging: bool,

    /// Variable set to `true` in the child while watching for display
    /// failures.
    #[serde(default = "default_logging_env")]
    pub logging_env: String,

    /// Overrides merged on top of the parent environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_logging_env() -> String {
    DEFAULT_LOGGING_ENV.to_string()
}

impl Default for ChildSection {
    fn default() -> Self {
        Self {
            detailed_logging: false,
            logging_env: default_logging_env(),
            env: BTreeMap::new(),
        }
    }
}

/// `[display]` section: how to start the virtual display server.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySection {
    #[serde(default = "default_display_command")]
    pub command: String,

    #[serde(default = "default_display_args")]
    pub args: Vec<String>,

    #[serde(default = "default_display_number")]
    pub display_number: u32,

    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
}

fn default_display_command() -> String {
    XvfbSettings::default().command
}

fn default_display_args() -> Vec<String> {
    XvfbSettings::default().args
}

fn default_display_number() -> u32 {
    XvfbSettings::default().display_number
}

fn default_startup_timeout_ms() -> u64 {
    5000
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            command: default_display_command(),
            args: default_display_args(),
            display_number: default_display_number(),
            startup_timeout_ms: default_startup_timeout_ms(),
        }
    }
}

/// Validated configuration. Obtain one through `ConfigFile::try_from`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub launch: LaunchSection,
    pub child: ChildSection,
    pub display: DisplaySection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        launch: LaunchSection,
        child: ChildSection,
        display: DisplaySection,
    ) -> Self {
        Self {
            launch,
            child,
            display,
        }
    }

    pub fn xvfb_settings(&self) -> XvfbSettings {
        XvfbSettings {
            command: self.display.command.clone(),
            args: self.display.args.clone(),
            display_number: self.display.display_number,
            startup_timeout: Duration::from_millis(self.display.startup_timeout_ms),
        }
    }

    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            detailed_child_logging: self.child.detailed_logging,
            logging_env: self.child.logging_env.clone(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            LaunchSection::default(),
            ChildSection::default(),
            DisplaySection::default(),
        )
    }
}
