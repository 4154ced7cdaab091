// tests/xvfb_display.rs

#![cfg(unix)]

use std::time::Duration;

use guilaunch::display::{VirtualDisplay, XvfbDisplay, XvfbSettings};
use guilaunch::errors::GuilaunchError;
use guilaunch_test_utils::{init_tracing, with_timeout};

fn settings(command: &str, args: &[&str]) -> XvfbSettings {
    XvfbSettings {
        command: command.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        display_number: 4321,
        startup_timeout: Duration::from_millis(300),
    }
}

#[tokio::test]
async fn releasing_an_idle_display_is_a_noop() {
    init_tracing();
    let mut display = XvfbDisplay::new(XvfbSettings::default());

    with_timeout(display.release()).await.unwrap();
    assert!(!display.is_running());
}

#[tokio::test]
async fn missing_server_binary_is_a_display_error() {
    init_tracing();
    let mut display = XvfbDisplay::new(settings("/definitely/not/Xvfb", &[]));

    let result = with_timeout(display.acquire()).await;

    assert!(matches!(result, Err(GuilaunchError::DisplayFailed(_))));
    assert!(!display.is_running());
}

#[tokio::test]
async fn server_dying_during_startup_is_a_display_error() {
    init_tracing();
    // `false :4321` exits right away without creating a socket.
    let mut display = XvfbDisplay::new(settings("false", &[]));

    let result = with_timeout(display.acquire()).await;

    match result {
        Err(GuilaunchError::DisplayFailed(msg)) => assert!(msg.contains("exited during startup")),
        other => panic!("expected DisplayFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn server_that_never_becomes_ready_times_out() {
    init_tracing();
    // `yes :4321` runs until killed but never creates the X socket.
    let mut display = XvfbDisplay::new(settings("yes", &[]));

    let result = with_timeout(display.acquire()).await;

    match result {
        Err(GuilaunchError::DisplayFailed(msg)) => assert!(msg.contains("did not come up")),
        other => panic!("expected DisplayFailed, got {other:?}"),
    }
    assert!(!display.is_running());
}
