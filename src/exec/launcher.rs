// src/exec/launcher.rs

//! Real process launcher built on `tokio::process::Command`.

use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::errors::{GuilaunchError, Result};
use crate::exec::backend::{LaunchBackend, LaunchFuture};
use crate::exec::request::LaunchRequest;
use crate::filter::{StderrClassifier, should_forward};

const STDERR_CHUNK: usize = 8 * 1024;

type Sink = Box<dyn AsyncWrite + Send + Unpin>;

/// Spawns the child and pipes whatever the stdio mode asks for.
///
/// Forwarded output goes to the parent's stdout/stderr by default; tests can
/// capture it with [`ProcessLauncher::with_outputs`].
pub struct ProcessLauncher {
    stdout: Sink,
    stderr: Sink,
    forward_parent_stdin: bool,
    /// Child of the most recent detached launch, until someone waits on it.
    detached: Option<Child>,
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::with_outputs(tokio::io::stdout(), tokio::io::stderr())
    }

    pub fn with_outputs<O, E>(stdout: O, stderr: E) -> Self
    where
        O: AsyncWrite + Send + Unpin + 'static,
        E: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            forward_parent_stdin: true,
            detached: None,
        }
    }

    /// Close a piped child stdin right away instead of feeding it the
    /// parent's stdin. For non-interactive runs.
    pub fn without_stdin(mut self) -> Self {
        self.forward_parent_stdin = false;
        self
    }

    /// Run one attempt. See [`LaunchBackend::launch`].
    pub async fn run(
        &mut self,
        request: &LaunchRequest,
        classifier: Option<&mut (dyn StderrClassifier + '_)>,
    ) -> Result<i32> {
        info!(
            executable = %request.executable().display(),
            args = ?request.args(),
            mode = %request.stdio(),
            detached = request.detached(),
            "spawning child process"
        );

        let mut child = build_command(request)
            .spawn()
            .map_err(|source| GuilaunchError::SpawnFailed {
                executable: request.executable().to_path_buf(),
                source,
            })?;

        debug!(pid = ?child.id(), "child process started");

        if request.detached() {
            debug!(pid = ?child.id(), "detaching from child process");
            self.detached = Some(child);
            return Ok(0);
        }

        let child_stdin = child.stdin.take().filter(|_| self.forward_parent_stdin);
        let stdin_pump = child_stdin.map(|stdin| {
            tokio::spawn(async move {
                let mut parent = tokio::io::stdin();
                let mut stdin = stdin;
                forward_stdin(&mut parent, &mut stdin).await
            })
        });
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, _, _) = tokio::join!(
            wait_for_exit(&mut child, stdin_pump),
            pump_stdout(stdout, &mut self.stdout),
            pump_stderr(stderr, &mut self.stderr, classifier),
        );
        let status = status?;
        let code = exit_code(status);

        info!(exit_code = code, success = status.success(), "child process exited");
        Ok(code)
    }

    /// Wait for the child of the last detached launch to exit.
    ///
    /// Returns `0` right away when there is no such child.
    pub async fn wait_detached(&mut self) -> Result<i32> {
        let Some(mut child) = self.detached.take() else {
            return Ok(0);
        };

        let code = exit_code(child.wait().await?);
        debug!(exit_code = code, "detached child exited");
        Ok(code)
    }
}

impl LaunchBackend for ProcessLauncher {
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest,
        classifier: Option<&'a mut (dyn StderrClassifier + 'a)>,
    ) -> LaunchFuture<'a> {
        Box::pin(async move { self.run(&request, classifier).await })
    }

    fn wait_detached(&mut self) -> LaunchFuture<'_> {
        Box::pin(ProcessLauncher::wait_detached(self))
    }
}

fn build_command(request: &LaunchRequest) -> Command {
    let mode = request.stdio();
    let wire = |piped: bool| if piped { Stdio::piped() } else { Stdio::inherit() };

    let mut cmd = Command::new(request.executable());
    cmd.args(request.args()).env_clear().envs(request.env());

    if request.detached() {
        // Nothing may be piped: the reading end would go away with us and the
        // child's next write would kill it with SIGPIPE.
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Own process group so terminal signals aimed at us skip the child.
        #[cfg(unix)]
        cmd.process_group(0);
        #[cfg(windows)]
        cmd.creation_flags(0x0000_0008); // DETACHED_PROCESS
    } else {
        cmd.stdin(wire(mode.pipes_stdin()))
            .stdout(wire(mode.pipes_stdout()))
            .stderr(wire(mode.pipes_stderr()))
            .kill_on_drop(true);
    }

    cmd
}

/// Copy `reader` into the child's stdin until EOF, then close it.
///
/// A broken pipe means the child stopped reading, which is fine; any other
/// error is returned.
pub async fn forward_stdin<R, W>(reader: &mut R, child_stdin: &mut W) -> io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let copied = match tokio::io::copy(reader, child_stdin).await {
        Ok(_) => child_stdin.shutdown().await,
        Err(err) => Err(err),
    };

    match copied {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("child closed its stdin early; ignoring broken pipe");
            Ok(())
        }
        other => other,
    }
}

async fn wait_for_exit(
    child: &mut Child,
    stdin_pump: Option<JoinHandle<io::Result<()>>>,
) -> Result<ExitStatus> {
    let Some(mut pump) = stdin_pump else {
        return Ok(child.wait().await?);
    };

    let status = tokio::select! {
        status = child.wait() => status?,
        joined = &mut pump => {
            stdin_outcome(joined)?;
            child.wait().await?
        }
    };

    // Parent stdin may never reach EOF; stop reading once the child is gone.
    pump.abort();
    Ok(status)
}

fn stdin_outcome(joined: std::result::Result<io::Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(GuilaunchError::StdinFailed(err)),
        Err(err) if err.is_cancelled() => Ok(()),
        Err(err) => Err(GuilaunchError::StdinFailed(io::Error::other(err))),
    }
}

async fn pump_stdout(stdout: Option<ChildStdout>, sink: &mut Sink) {
    let Some(mut stdout) = stdout else {
        return;
    };

    let copied = match tokio::io::copy(&mut stdout, sink).await {
        Ok(_) => sink.flush().await,
        Err(err) => Err(err),
    };

    if let Err(err) = copied {
        warn!(error = %err, "forwarding child stdout failed; discarding the rest");
        let _ = tokio::io::copy(&mut stdout, &mut tokio::io::sink()).await;
    }
}

/// Read stderr chunk by chunk, in arrival order, forwarding what survives the
/// garbage filter and the classifier.
async fn pump_stderr(
    stderr: Option<ChildStderr>,
    sink: &mut Sink,
    mut classifier: Option<&mut (dyn StderrClassifier + '_)>,
) {
    let Some(mut stderr) = stderr else {
        return;
    };

    let mut buf = vec![0u8; STDERR_CHUNK];
    let mut sink_ok = true;

    loop {
        let n = match stderr.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                warn!(error = %err, "reading child stderr failed");
                break;
            }
        };

        let chunk = String::from_utf8_lossy(&buf[..n]);
        if !should_forward(&chunk, classifier.as_deref_mut()) {
            debug!(bytes = n, "suppressed child stderr chunk");
            continue;
        }

        if sink_ok {
            if let Err(err) = write_chunk(sink, &buf[..n]).await {
                warn!(error = %err, "forwarding child stderr failed");
                sink_ok = false;
            }
        }
    }
}

async fn write_chunk(sink: &mut Sink, bytes: &[u8]) -> io::Result<()> {
    sink.write_all(bytes).await?;
    sink.flush().await
}

/// Exit code, or `128 + signal` for a child killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

