//! Ready-made platform policies for orchestrator tests.

use guilaunch::platform::{DISPLAY_VAR, EnvSnapshot, PlatformPolicy};
use guilaunch::types::HostOs;

/// Linux with a `DISPLAY` that may or may not work: first attempt watches
/// for the broken-display signature.
pub fn linux_with_display(display: &str) -> PlatformPolicy {
    PlatformPolicy::new(
        HostOs::Linux,
        EnvSnapshot::default().with(DISPLAY_VAR, display),
    )
}

/// Linux without any display: the virtual display is mandatory.
pub fn linux_headless() -> PlatformPolicy {
    PlatformPolicy::new(HostOs::Linux, EnvSnapshot::default())
}

/// macOS: never needs a virtual display, never watches for the signature.
pub fn macos() -> PlatformPolicy {
    PlatformPolicy::new(HostOs::MacOs, EnvSnapshot::default())
}

pub fn windows() -> PlatformPolicy {
    PlatformPolicy::new(HostOs::Windows, EnvSnapshot::default())
}
