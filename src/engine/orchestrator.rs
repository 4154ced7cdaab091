// src/engine/orchestrator.rs

//! Launch with at most one retry under a virtual display.
//!
//! ```text
//!   needs virtual display? ──yes──────────────────────────┐
//!          │ no                                           ▼
//!   FirstAttempt ──exit != 0 && signature seen──► RetryingUnderVirtualDisplay
//!          │ otherwise                                    │
//!          ▼                                              ▼
//!     first exit code                         acquire → launch → release
//! ```

use tracing::{debug, info, warn};

use crate::display::VirtualDisplay;
use crate::engine::detector::BrokenDisplayDetector;
use crate::engine::report::Reporter;
use crate::errors::{GuilaunchError, Result};
use crate::exec::{LaunchBackend, LaunchRequest, LaunchRequestBuilder};
use crate::filter::StderrClassifier;
use crate::platform::{DISPLAY_VAR, PlatformPolicy};

/// Default variable that turns on the child's own diagnostic output.
pub const DEFAULT_LOGGING_ENV: &str = "ELECTRON_ENABLE_LOGGING";

/// Explicit switches for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    /// Echo the child's stderr during the first attempt instead of
    /// swallowing it while watching for the broken-display signature.
    pub detailed_child_logging: bool,
    /// Set to `true` in the child environment on a display-watching attempt.
    pub logging_env: String,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            detailed_child_logging: false,
            logging_env: DEFAULT_LOGGING_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    FirstAttempt,
    RetryingUnderVirtualDisplay,
}

/// What to do once the first attempt finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Finish(i32),
    RetryUnderVirtualDisplay,
}

impl RetryDecision {
    pub fn after_attempt(exit_code: i32, broken_display_observed: bool) -> Self {
        if exit_code != 0 && broken_display_observed {
            RetryDecision::RetryUnderVirtualDisplay
        } else {
            RetryDecision::Finish(exit_code)
        }
    }
}

/// Drives one invocation: a single attempt, or an attempt plus one retry.
pub struct Orchestrator<L, D, R> {
    launcher: L,
    display: D,
    reporter: R,
    policy: PlatformPolicy,
    settings: LaunchSettings,
    state: AttemptState,
}

impl<L, D, R> Orchestrator<L, D, R>
where
    L: LaunchBackend,
    D: VirtualDisplay,
    R: Reporter,
{
    pub fn new(
        launcher: L,
        display: D,
        reporter: R,
        policy: PlatformPolicy,
        settings: LaunchSettings,
    ) -> Self {
        Self {
            launcher,
            display,
            reporter,
            policy,
            settings,
            state: AttemptState::FirstAttempt,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Resolve stdio for `base`, launch, and retry once if the inherited
    /// display turned out to be unusable.
    ///
    /// Any launch failure comes back as [`GuilaunchError::Unexpected`] and is
    /// never retried.
    pub async fn run(&mut self, base: LaunchRequestBuilder) -> Result<i32> {
        let needs_virtual_display = self.policy.requires_virtual_display();
        debug!(needs_virtual_display, "needs to start own virtual display?");

        let request = base
            .stdio(self.policy.stdio_mode(needs_virtual_display))
            .build();

        let result = if needs_virtual_display {
            self.spawn_in_virtual_display(&request).await
        } else {
            self.first_attempt(&request).await
        };

        result.map_err(GuilaunchError::unexpected)
    }

    async fn first_attempt(&mut self, request: &LaunchRequest) -> Result<i32> {
        let linux_with_display_env = self.policy.is_possible_linux_with_incorrect_display();
        debug!(
            retry_on_display_problem = linux_with_display_env,
            "spawning first attempt"
        );

        if !linux_with_display_env {
            return self.launcher.launch(request.clone(), None).await;
        }

        let mut watched = request.with_env([(self.settings.logging_env.as_str(), "true")]);
        if let Some(current) = self.policy.display() {
            debug!(display = current, "passing DISPLAY through explicitly");
            watched = watched.with_env([(DISPLAY_VAR, current)]);
        }

        let mut detector = BrokenDisplayDetector::new(self.settings.detailed_child_logging);
        let classifier: &mut dyn StderrClassifier = &mut detector;
        let code = self.launcher.launch(watched, Some(classifier)).await?;

        match RetryDecision::after_attempt(code, detector.observed()) {
            RetryDecision::Finish(code) => Ok(code),
            RetryDecision::RetryUnderVirtualDisplay => {
                warn!(
                    exit_code = code,
                    "child could not open the display; retrying under a virtual display"
                );
                let rejected = self.policy.display();
                self.reporter.broken_display_advisory(rejected);
                self.spawn_in_virtual_display(request).await
            }
        }
    }

    /// Acquire a display, launch once under it, and release the display no
    /// matter how the launch ended.
    ///
    /// A detached child still draws on the display after `launch` returned,
    /// so the display is only released once that child has exited.
    async fn spawn_in_virtual_display(&mut self, request: &LaunchRequest) -> Result<i32> {
        self.state = AttemptState::RetryingUnderVirtualDisplay;

        let result = match self.display.acquire().await {
            Ok(handle) => {
                info!(display = %handle.display, "launching under virtual display");
                let request = request.with_env([(DISPLAY_VAR, handle.display.as_str())]);
                let detached = request.detached();
                let launched = self.launcher.launch(request, None).await;

                if detached && launched.is_ok() {
                    info!("holding the virtual display until the detached child exits");
                    match self.launcher.wait_detached().await {
                        Ok(code) => debug!(exit_code = code, "detached child done with display"),
                        Err(err) => warn!(error = %err, "waiting on detached child failed"),
                    }
                }

                launched
            }
            Err(err) => Err(err),
        };

        if let Err(err) = self.display.release().await {
            warn!(error = %err, "failed to release virtual display");
        }

        result
    }
}
