use std::fmt;
use std::str::FromStr;

/// Host operating system family, as far as launch policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
    /// BSDs and illumos/Solaris. Treated like Linux for display purposes
    /// since these also rely on an X server.
    OtherUnix,
    /// Hosts without an X server (iOS, Android, WASI, ...).
    Other,
}

impl HostOs {
    /// The OS this binary was compiled for.
    pub fn current() -> Self {
        // `consts::OS` is never empty, so parsing cannot fail.
        std::env::consts::OS.parse().unwrap_or(HostOs::Other)
    }

    /// Linux and friends: hosts where a GUI needs an X display.
    pub fn is_linux_family(self) -> bool {
        matches!(self, HostOs::Linux | HostOs::OtherUnix)
    }
}

impl FromStr for HostOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Ok(HostOs::Linux),
            "macos" | "darwin" => Ok(HostOs::MacOs),
            "windows" | "win32" => Ok(HostOs::Windows),
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris" | "illumos" => {
                Ok(HostOs::OtherUnix)
            }
            "" => Err("empty host OS identifier".to_string()),
            _ => Ok(HostOs::Other),
        }
    }
}

/// How the child's three standard streams are connected to the parent.
///
/// - `AllPiped`: every stream goes through the parent.
/// - `InheritAllButStderrPipedToFilter`: stdin/stdout are inherited, stderr is
///   piped so it can be filtered.
/// - `InheritAll`: the child gets the parent's descriptors directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    AllPiped,
    InheritAllButStderrPipedToFilter,
    InheritAll,
}

impl StdioMode {
    pub fn pipes_stdin(self) -> bool {
        matches!(self, StdioMode::AllPiped)
    }

    pub fn pipes_stdout(self) -> bool {
        matches!(self, StdioMode::AllPiped)
    }

    pub fn pipes_stderr(self) -> bool {
        !matches!(self, StdioMode::InheritAll)
    }
}

impl fmt::Display for StdioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StdioMode::AllPiped => "pipe",
            StdioMode::InheritAllButStderrPipedToFilter => "inherit,inherit,pipe",
            StdioMode::InheritAll => "inherit",
        };
        f.write_str(s)
    }
}
