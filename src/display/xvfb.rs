// src/display/xvfb.rs

//! `Xvfb` backed virtual display.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::display::{DisplayFuture, DisplayHandle, VirtualDisplay};
use crate::errors::{GuilaunchError, Result};
use crate::exec::exit_code;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How many display numbers past the configured one to try before giving up.
const DISPLAY_SEARCH_SPAN: u32 = 100;

/// Settings for starting `Xvfb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XvfbSettings {
    pub command: String,
    pub args: Vec<String>,
    /// First display number to try (`:99` by default).
    pub display_number: u32,
    pub startup_timeout: Duration,
}

impl Default for XvfbSettings {
    fn default() -> Self {
        Self {
            command: "Xvfb".to_string(),
            args: vec![
                "-screen".to_string(),
                "0".to_string(),
                "1280x1024x24".to_string(),
            ],
            display_number: 99,
            startup_timeout: Duration::from_secs(5),
        }
    }
}

struct RunningServer {
    child: Child,
    display: String,
}

/// Starts a private `Xvfb` server on [`acquire`](VirtualDisplay::acquire)
/// and kills it on [`release`](VirtualDisplay::release).
pub struct XvfbDisplay {
    settings: XvfbSettings,
    server: Option<RunningServer>,
}

impl XvfbDisplay {
    pub fn new(settings: XvfbSettings) -> Self {
        Self {
            settings,
            server: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    async fn start(&mut self) -> Result<DisplayHandle> {
        if let Some(server) = &self.server {
            debug!(display = %server.display, "virtual display already running");
            return Ok(DisplayHandle {
                display: server.display.clone(),
            });
        }

        let number = free_display_number(self.settings.display_number).ok_or_else(|| {
            GuilaunchError::DisplayFailed(format!(
                "no free display number in :{}..:{}",
                self.settings.display_number,
                self.settings.display_number.saturating_add(DISPLAY_SEARCH_SPAN)
            ))
        })?;
        let name = format!(":{number}");

        info!(command = %self.settings.command, display = %name, "starting virtual display");

        let mut child = Command::new(&self.settings.command)
            .arg(&name)
            .args(&self.settings.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                GuilaunchError::DisplayFailed(format!(
                    "could not start '{}': {err}",
                    self.settings.command
                ))
            })?;

        wait_until_ready(&mut child, number, self.settings.startup_timeout).await?;

        info!(display = %name, "virtual display ready");
        self.server = Some(RunningServer {
            child,
            display: name.clone(),
        });
        Ok(DisplayHandle { display: name })
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(mut server) = self.server.take() else {
            return Ok(());
        };

        if let Ok(Some(status)) = server.child.try_wait() {
            warn!(
                display = %server.display,
                exit_code = exit_code(status),
                "virtual display had already exited"
            );
            return Ok(());
        }

        info!(display = %server.display, "stopping virtual display");
        server.child.kill().await.map_err(|err| {
            GuilaunchError::DisplayFailed(format!(
                "could not stop display {}: {err}",
                server.display
            ))
        })
    }
}

impl VirtualDisplay for XvfbDisplay {
    fn acquire(&mut self) -> DisplayFuture<'_, DisplayHandle> {
        Box::pin(self.start())
    }

    fn release(&mut self) -> DisplayFuture<'_, ()> {
        Box::pin(self.stop())
    }
}

fn socket_path(number: u32) -> PathBuf {
    PathBuf::from(format!("/tmp/.X11-unix/X{number}"))
}

fn lock_path(number: u32) -> PathBuf {
    PathBuf::from(format!("/tmp/.X{number}-lock"))
}

/// First display number at or after `start` with no lock file or socket.
fn free_display_number(start: u32) -> Option<u32> {
    (start..=start.saturating_add(DISPLAY_SEARCH_SPAN))
        .find(|&n| !lock_path(n).exists() && !socket_path(n).exists())
}

/// Poll until the server's socket shows up, the server dies, or time runs out.
async fn wait_until_ready(child: &mut Child, number: u32, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let socket = socket_path(number);

    loop {
        if let Some(status) = child.try_wait()? {
            return Err(GuilaunchError::DisplayFailed(format!(
                "virtual display :{number} exited during startup (code {})",
                exit_code(status)
            )));
        }

        if socket.exists() {
            return Ok(());
        }

        if Instant::now() >= deadline {
            let _ = child.kill().await;
            return Err(GuilaunchError::DisplayFailed(format!(
                "virtual display :{number} did not come up within {}ms",
                timeout.as_millis()
            )));
        }

        sleep(POLL_INTERVAL).await;
    }
}
