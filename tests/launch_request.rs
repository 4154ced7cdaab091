// tests/launch_request.rs

use std::path::Path;

use guilaunch::exec::{CWD_FLAG, LaunchRequest};
use guilaunch::platform::EnvSnapshot;
use guilaunch::types::StdioMode;

#[test]
fn cwd_marker_is_appended_after_all_arguments() {
    let request = LaunchRequest::builder("/opt/app/app")
        .cwd("/work/project")
        .arg("--run-project")
        .args(["a", "b"])
        .build();

    assert_eq!(
        request.args(),
        &["--run-project", "a", "b", CWD_FLAG, "/work/project"]
    );
    assert_eq!(request.executable(), Path::new("/opt/app/app"));
}

#[test]
fn no_cwd_means_no_marker() {
    let request = LaunchRequest::builder("app").arg("x").build();
    assert_eq!(request.args(), &["x"]);
}

#[test]
fn env_last_write_wins() {
    let base = EnvSnapshot::default().with("FOO", "parent").with("KEEP", "yes");
    let request = LaunchRequest::builder("app")
        .base_env(&base)
        .envs([("FOO", "override")])
        .env("BAR", "1")
        .env("BAR", "2")
        .build();

    assert_eq!(request.env_var("FOO"), Some("override"));
    assert_eq!(request.env_var("KEEP"), Some("yes"));
    assert_eq!(request.env_var("BAR"), Some("2"));
    assert_eq!(request.env().len(), 3);
}

#[test]
fn with_env_derives_a_new_request_without_touching_the_original() {
    let original = LaunchRequest::builder("app")
        .env("DISPLAY", ":0")
        .stdio(StdioMode::InheritAllButStderrPipedToFilter)
        .detached(true)
        .build();

    let retried = original.with_env([("DISPLAY", ":99")]);

    assert_eq!(original.env_var("DISPLAY"), Some(":0"));
    assert_eq!(retried.env_var("DISPLAY"), Some(":99"));
    assert_eq!(retried.stdio(), original.stdio());
    assert!(retried.detached());
    assert_eq!(retried.args(), original.args());
}

#[test]
fn defaults_are_attached_and_inherit_all() {
    let request = LaunchRequest::builder("app").build();
    assert!(!request.detached());
    assert_eq!(request.stdio(), StdioMode::InheritAll);
    assert!(request.env().is_empty());
}
