// tests/platform_policy.rs

use proptest::prelude::*;

use guilaunch::platform::{
    DISPLAY_VAR, EnvSnapshot, PlatformPolicy, RUN_AS_NODE_VAR,
    is_possible_linux_with_incorrect_display, requires_virtual_display, resolve_stdio_mode,
};
use guilaunch::types::{HostOs, StdioMode};

fn env_with_display(display: &str) -> EnvSnapshot {
    EnvSnapshot::default().with(DISPLAY_VAR, display)
}

#[test]
fn linux_without_display_requires_virtual_display() {
    assert!(requires_virtual_display(HostOs::Linux, &EnvSnapshot::default()));
    assert!(requires_virtual_display(HostOs::OtherUnix, &EnvSnapshot::default()));
}

#[test]
fn linux_with_blank_display_requires_virtual_display() {
    assert!(requires_virtual_display(HostOs::Linux, &env_with_display("")));
    assert!(requires_virtual_display(HostOs::Linux, &env_with_display("   ")));
}

#[test]
fn linux_with_display_does_not_require_virtual_display() {
    assert!(!requires_virtual_display(HostOs::Linux, &env_with_display(":0")));
}

#[test]
fn run_as_node_never_requires_virtual_display() {
    let env = EnvSnapshot::default().with(RUN_AS_NODE_VAR, "1");
    assert!(!requires_virtual_display(HostOs::Linux, &env));
}

#[test]
fn macos_and_windows_never_require_virtual_display() {
    assert!(!requires_virtual_display(HostOs::MacOs, &EnvSnapshot::default()));
    assert!(!requires_virtual_display(HostOs::Windows, &EnvSnapshot::default()));
}

#[test]
fn possible_incorrect_display_only_on_linux_with_display() {
    assert!(is_possible_linux_with_incorrect_display(HostOs::Linux, &env_with_display(":0")));
    assert!(!is_possible_linux_with_incorrect_display(HostOs::Linux, &EnvSnapshot::default()));
    assert!(!is_possible_linux_with_incorrect_display(HostOs::Linux, &env_with_display("")));
    assert!(!is_possible_linux_with_incorrect_display(HostOs::MacOs, &env_with_display(":0")));
}

#[test]
fn windows_pipes_everything() {
    assert_eq!(
        resolve_stdio_mode(HostOs::Windows, false, &EnvSnapshot::default()),
        StdioMode::AllPiped
    );
    assert_eq!(
        resolve_stdio_mode(HostOs::Windows, true, &env_with_display(":0")),
        StdioMode::AllPiped
    );
}

#[test]
fn macos_pipes_stderr_for_filtering() {
    assert_eq!(
        resolve_stdio_mode(HostOs::MacOs, false, &EnvSnapshot::default()),
        StdioMode::InheritAllButStderrPipedToFilter
    );
}

#[test]
fn linux_needing_virtual_display_pipes_stderr() {
    assert_eq!(
        resolve_stdio_mode(HostOs::Linux, true, &EnvSnapshot::default()),
        StdioMode::InheritAllButStderrPipedToFilter
    );
}

#[test]
fn linux_with_possibly_incorrect_display_pipes_stderr() {
    assert_eq!(
        resolve_stdio_mode(HostOs::Linux, false, &env_with_display(":0")),
        StdioMode::InheritAllButStderrPipedToFilter
    );
}

#[test]
fn plain_linux_inherits_everything() {
    // Not needing a virtual display and no DISPLAY set only happens when the
    // child runs as node, but the wiring rule still applies.
    let env = EnvSnapshot::default().with(RUN_AS_NODE_VAR, "1");
    assert_eq!(
        resolve_stdio_mode(HostOs::Linux, false, &env),
        StdioMode::InheritAll
    );
}

#[test]
fn stdio_mode_pipe_flags() {
    assert!(StdioMode::AllPiped.pipes_stdin());
    assert!(StdioMode::AllPiped.pipes_stdout());
    assert!(StdioMode::AllPiped.pipes_stderr());

    let filtered = StdioMode::InheritAllButStderrPipedToFilter;
    assert!(!filtered.pipes_stdin());
    assert!(!filtered.pipes_stdout());
    assert!(filtered.pipes_stderr());

    assert!(!StdioMode::InheritAll.pipes_stderr());
}

#[test]
fn host_os_parsing_accepts_node_style_names() {
    assert_eq!("darwin".parse::<HostOs>(), Ok(HostOs::MacOs));
    assert_eq!("win32".parse::<HostOs>(), Ok(HostOs::Windows));
    assert_eq!("linux".parse::<HostOs>(), Ok(HostOs::Linux));
    assert_eq!("freebsd".parse::<HostOs>(), Ok(HostOs::OtherUnix));
    assert_eq!("illumos".parse::<HostOs>(), Ok(HostOs::OtherUnix));
    assert!("".parse::<HostOs>().is_err());
}

#[test]
fn hosts_without_x_never_need_a_virtual_display() {
    for name in ["ios", "android", "wasi"] {
        let os: HostOs = name.parse().unwrap();
        assert_eq!(os, HostOs::Other, "{name}");
        assert!(!os.is_linux_family());
        assert!(!requires_virtual_display(os, &EnvSnapshot::default()));
        assert_eq!(
            resolve_stdio_mode(os, false, &EnvSnapshot::default()),
            StdioMode::InheritAll
        );
    }
}

#[test]
fn policy_bundle_matches_free_functions() {
    let policy = PlatformPolicy::new(HostOs::Linux, env_with_display(":1"));
    assert!(!policy.requires_virtual_display());
    assert!(policy.is_possible_linux_with_incorrect_display());
    assert_eq!(policy.display(), Some(":1"));
    assert_eq!(
        policy.stdio_mode(false),
        resolve_stdio_mode(HostOs::Linux, false, &policy.env)
    );
}

fn host_os_strategy() -> impl Strategy<Value = HostOs> {
    prop_oneof![
        Just(HostOs::Linux),
        Just(HostOs::MacOs),
        Just(HostOs::Windows),
        Just(HostOs::OtherUnix),
        Just(HostOs::Other),
    ]
}

proptest! {
    #[test]
    fn stdio_mode_is_a_pure_function(
        os in host_os_strategy(),
        needs in any::<bool>(),
        display in proptest::option::of("[:0-9.a-z]{0,6}"),
    ) {
        let env = match &display {
            Some(d) => env_with_display(d),
            None => EnvSnapshot::default(),
        };
        let first = resolve_stdio_mode(os, needs, &env);
        let second = resolve_stdio_mode(os, needs, &env.clone());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn virtual_display_implies_linux_family(
        os in host_os_strategy(),
        display in proptest::option::of("[:0-9 ]{0,4}"),
    ) {
        let env = match &display {
            Some(d) => env_with_display(d),
            None => EnvSnapshot::default(),
        };
        if requires_virtual_display(os, &env) {
            prop_assert!(os.is_linux_family());
        }
    }
}
