// tests/cli_args.rs

use clap::Parser;

use guilaunch::cli::{CliArgs, LogLevel};
use guilaunch::config::default_config_path;
use guilaunch::engine::broken_display_message;
use guilaunch::logging::parse_level_str;

#[test]
fn trailing_arguments_are_passed_through() {
    let args = CliArgs::try_parse_from([
        "guilaunch",
        "--binary",
        "/opt/app/app",
        "--detached",
        "--",
        "--run-project",
        "demo",
    ])
    .unwrap();

    assert_eq!(args.binary.as_deref(), Some(std::path::Path::new("/opt/app/app")));
    assert!(args.detached);
    assert!(!args.child_logging);
    assert_eq!(args.args, vec!["--run-project", "demo"]);
    assert_eq!(args.config, default_config_path());
    assert_eq!(args.config, std::path::PathBuf::from("Guilaunch.toml"));
}

#[test]
fn config_path_can_be_overridden() {
    let args = CliArgs::try_parse_from(["guilaunch", "--config", "/etc/guilaunch.toml"]).unwrap();

    assert_eq!(args.config, std::path::PathBuf::from("/etc/guilaunch.toml"));
}

#[test]
fn log_level_flag_is_parsed() {
    let args = CliArgs::try_parse_from(["guilaunch", "--log-level", "debug", "--dry-run"]).unwrap();

    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
}

#[test]
fn env_level_names_are_lenient() {
    assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
}

#[test]
fn advisory_names_the_rejected_display() {
    let message = broken_display_message(Some(":0"));
    assert!(message.contains("DISPLAY was set to: \":0\""));
    assert!(message.contains("virtual display"));

    assert!(broken_display_message(None).contains("<unset>"));
}
