// src/lib.rs

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod filter;
pub mod logging;
pub mod platform;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::display::XvfbDisplay;
use crate::engine::{ConsoleReporter, LaunchSettings, Orchestrator};
use crate::errors::GuilaunchError;
use crate::exec::{LaunchRequestBuilder, ProcessLauncher};
use crate::platform::{EnvSnapshot, PlatformPolicy};

/// Overrides the executable path (relative paths resolve against the cwd).
pub const RUN_BINARY_ENV: &str = "GUILAUNCH_RUN_BINARY";

/// `1` / `true` turns on detailed child logging.
pub const CHILD_LOG_ENV: &str = "GUILAUNCH_CHILD_LOG";

/// High-level entry point used by `main.rs`. Returns the exit code to use.
///
/// This wires together:
/// - config loading
/// - platform policy for the current process
/// - the real launcher, `Xvfb` display manager and console reporter
/// - the retry orchestrator
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(&args.config)?;
    let policy = PlatformPolicy::detect();
    let cwd = std::env::current_dir()?;

    let executable = resolve_executable(args.binary.as_deref(), &policy.env, &cfg, &cwd)?;
    let settings = LaunchSettings {
        detailed_child_logging: child_logging_enabled(args.child_logging, &policy.env, &cfg),
        ..cfg.launch_settings()
    };
    let detached = args.detached || cfg.launch.detached;

    let base = base_request(&executable, &args.args, &cwd, &policy.env, &cfg, detached);

    if args.dry_run {
        print_dry_run(&policy, base, &settings);
        return Ok(0);
    }

    info!(executable = %executable.display(), "launching");

    let mut orchestrator = Orchestrator::new(
        ProcessLauncher::new(),
        XvfbDisplay::new(cfg.xvfb_settings()),
        ConsoleReporter,
        policy,
        settings,
    );
    let code = orchestrator.run(base).await?;

    debug!(exit_code = code, "launcher finished");
    Ok(code)
}

/// Pick the executable: `--binary`, then `GUILAUNCH_RUN_BINARY`, then
/// `[launch].binary`.
pub fn resolve_executable(
    cli_binary: Option<&Path>,
    env: &EnvSnapshot,
    cfg: &ConfigFile,
    cwd: &Path,
) -> errors::Result<PathBuf> {
    let chosen = cli_binary
        .map(Path::to_path_buf)
        .or_else(|| {
            env.get(RUN_BINARY_ENV)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| cfg.launch.binary.clone())
        .ok_or_else(|| {
            GuilaunchError::ConfigError(format!(
                "no executable given; pass --binary, set {RUN_BINARY_ENV}, or set [launch].binary"
            ))
        })?;

    if chosen.is_absolute() {
        Ok(chosen)
    } else {
        Ok(cwd.join(chosen))
    }
}

/// Whether the child's stderr should be echoed on a display-watching attempt.
pub fn child_logging_enabled(cli_flag: bool, env: &EnvSnapshot, cfg: &ConfigFile) -> bool {
    let from_env = env
        .get(CHILD_LOG_ENV)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    cli_flag || from_env || cfg.child.detailed_logging
}

/// The request every attempt derives from: parent environment with config
/// overrides on top, and the working-directory marker appended.
pub fn base_request(
    executable: &Path,
    args: &[String],
    cwd: &Path,
    env: &EnvSnapshot,
    cfg: &ConfigFile,
    detached: bool,
) -> LaunchRequestBuilder {
    LaunchRequestBuilder::new(executable)
        .args(args.iter().cloned())
        .cwd(cwd)
        .base_env(env)
        .envs(cfg.child.env.clone())
        .detached(detached)
}

fn print_dry_run(policy: &PlatformPolicy, base: LaunchRequestBuilder, settings: &LaunchSettings) {
    let needs_virtual_display = policy.requires_virtual_display();
    let request = base.stdio(policy.stdio_mode(needs_virtual_display)).build();

    println!("guilaunch dry-run");
    println!("  host os = {:?}", policy.os);
    println!("  DISPLAY = {}", policy.display().unwrap_or("<unset>"));
    println!("  needs virtual display = {needs_virtual_display}");
    println!(
        "  retry on display problem = {}",
        !needs_virtual_display && policy.is_possible_linux_with_incorrect_display()
    );
    println!("  stdio = {}", request.stdio());
    println!("  detailed child logging = {}", settings.detailed_child_logging);
    println!();
    println!("executable: {}", request.executable().display());
    println!("args: {:?}", request.args());
    println!("detached: {}", request.detached());

    debug!("dry-run complete (no execution)");
}
