// src/exec/request.rs

//! What to launch and how.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::platform::EnvSnapshot;
use crate::types::StdioMode;

/// Argument marking the directory the launcher was invoked from. Also tells
/// the child it was started through the launcher.
pub const CWD_FLAG: &str = "--cwd";

/// A fully resolved launch.
///
/// Built once per attempt and never mutated afterwards; use
/// [`LaunchRequest::with_env`] to derive the request for a later attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    executable: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    detached: bool,
    stdio: StdioMode,
}

impl LaunchRequest {
    pub fn builder(executable: impl Into<PathBuf>) -> LaunchRequestBuilder {
        LaunchRequestBuilder::new(executable)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments including the trailing working-directory marker.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The exact environment handed to the child.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn detached(&self) -> bool {
        self.detached
    }

    pub fn stdio(&self) -> StdioMode {
        self.stdio
    }

    /// Copy of this request with extra environment entries layered on top.
    pub fn with_env<I, K, V>(&self, overrides: I) -> LaunchRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut next = self.clone();
        for (k, v) in overrides {
            next.env.insert(k.into(), v.into());
        }
        next
    }
}

/// Builder for [`LaunchRequest`].
#[derive(Debug, Clone)]
pub struct LaunchRequestBuilder {
    executable: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
    detached: bool,
    stdio: StdioMode,
}

impl LaunchRequestBuilder {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            detached: false,
            stdio: StdioMode::InheritAll,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Directory appended as `--cwd <dir>` after all other arguments.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Start from a full environment snapshot (usually the parent's).
    pub fn base_env(mut self, env: &EnvSnapshot) -> Self {
        for (k, v) in env.iter() {
            self.env.insert(k.clone(), v.clone());
        }
        self
    }

    /// Set one variable; a later call for the same key wins.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    pub fn detached(mut self, detached: bool) -> Self {
        self.detached = detached;
        self
    }

    pub fn stdio(mut self, mode: StdioMode) -> Self {
        self.stdio = mode;
        self
    }

    pub fn build(self) -> LaunchRequest {
        let mut args = self.args;
        if let Some(cwd) = self.cwd {
            args.push(CWD_FLAG.to_string());
            args.push(cwd.to_string_lossy().into_owned());
        }

        LaunchRequest {
            executable: self.executable,
            args,
            env: self.env,
            detached: self.detached,
            stdio: self.stdio,
        }
    }
}
