use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use guilaunch::display::{DisplayFuture, DisplayHandle, VirtualDisplay};
use guilaunch::engine::Reporter;
use guilaunch::errors::GuilaunchError;
use guilaunch::exec::{LaunchBackend, LaunchFuture, LaunchRequest};
use guilaunch::filter::{StderrClassifier, should_forward};

/// One scripted launch: stderr chunks to replay, then an outcome.
#[derive(Debug, Clone)]
pub struct ScriptedAttempt {
    stderr: Vec<String>,
    /// `Err` simulates a child that could not be started.
    outcome: Result<i32, String>,
}

impl ScriptedAttempt {
    pub fn exit(code: i32) -> Self {
        Self {
            stderr: Vec::new(),
            outcome: Ok(code),
        }
    }

    pub fn spawn_failure(message: &str) -> Self {
        Self {
            stderr: Vec::new(),
            outcome: Err(message.to_string()),
        }
    }

    pub fn stderr(mut self, chunk: &str) -> Self {
        self.stderr.push(chunk.to_string());
        self
    }
}

/// A fake launch backend that:
/// - records every request it was given
/// - replays scripted stderr chunks through the same filter + classifier
///   path the real launcher uses, recording what would reach the parent
/// - resolves with the scripted outcome (exit 0 once the script runs out).
#[derive(Debug, Default)]
pub struct FakeLauncher {
    script: VecDeque<ScriptedAttempt>,
    requests: Arc<Mutex<Vec<LaunchRequest>>>,
    forwarded: Arc<Mutex<Vec<String>>>,
    detached_waits: usize,
}

impl FakeLauncher {
    pub fn new(script: impl IntoIterator<Item = ScriptedAttempt>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn launches(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Stderr chunks that made it to the "parent", in order.
    pub fn forwarded_stderr(&self) -> Vec<String> {
        self.forwarded.lock().unwrap().clone()
    }

    /// How often the orchestrator waited on a detached child.
    pub fn detached_waits(&self) -> usize {
        self.detached_waits
    }
}

impl LaunchBackend for FakeLauncher {
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest,
        classifier: Option<&'a mut (dyn StderrClassifier + 'a)>,
    ) -> LaunchFuture<'a> {
        let requests = Arc::clone(&self.requests);
        let forwarded = Arc::clone(&self.forwarded);
        let attempt = self
            .script
            .pop_front()
            .unwrap_or_else(|| ScriptedAttempt::exit(0));

        Box::pin(async move {
            let mut classifier = classifier;
            requests.lock().unwrap().push(request.clone());

            match attempt.outcome {
                Ok(code) => {
                    for chunk in attempt.stderr {
                        if should_forward(&chunk, classifier.as_deref_mut()) {
                            forwarded.lock().unwrap().push(chunk);
                        }
                    }
                    Ok(code)
                }
                Err(message) => Err(GuilaunchError::SpawnFailed {
                    executable: request.executable().to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, message),
                }),
            }
        })
    }

    fn wait_detached(&mut self) -> LaunchFuture<'_> {
        self.detached_waits += 1;
        Box::pin(async { Ok(0) })
    }
}

/// Counting virtual display.
#[derive(Debug, Clone)]
pub struct FakeDisplay {
    pub display: String,
    pub acquired: usize,
    pub released: usize,
    pub fail_acquire: bool,
    pub fail_release: bool,
}

impl Default for FakeDisplay {
    fn default() -> Self {
        Self {
            display: ":42".to_string(),
            acquired: 0,
            released: 0,
            fail_acquire: false,
            fail_release: false,
        }
    }
}

impl FakeDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_acquire() -> Self {
        Self {
            fail_acquire: true,
            ..Self::default()
        }
    }

    pub fn failing_release() -> Self {
        Self {
            fail_release: true,
            ..Self::default()
        }
    }
}

impl VirtualDisplay for FakeDisplay {
    fn acquire(&mut self) -> DisplayFuture<'_, DisplayHandle> {
        Box::pin(async move {
            self.acquired += 1;
            if self.fail_acquire {
                return Err(GuilaunchError::DisplayFailed(
                    "fake display refused to start".to_string(),
                ));
            }
            Ok(DisplayHandle {
                display: self.display.clone(),
            })
        })
    }

    fn release(&mut self) -> DisplayFuture<'_, ()> {
        Box::pin(async move {
            self.released += 1;
            if self.fail_release {
                return Err(GuilaunchError::DisplayFailed(
                    "fake display refused to stop".to_string(),
                ));
            }
            Ok(())
        })
    }
}

/// Records every advisory instead of printing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub advisories: Vec<Option<String>>,
}

impl Reporter for RecordingReporter {
    fn broken_display_advisory(&mut self, display: Option<&str>) {
        self.advisories.push(display.map(str::to_string));
    }
}
