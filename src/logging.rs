use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Log verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter directive for this verbosity. `AIRWAVES_LOG` only applies at
    /// normal verbosity; the flags win over it.
    fn directive(self, env_override: Option<String>) -> String {
        match self {
            Self::Quiet => "off".to_string(),
            Self::Verbose => "airwaves=debug,warn".to_string(),
            Self::Normal => env_override
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| "warn".to_string()),
        }
    }
}

/// Installs the stderr tracing subscriber. Call once per process.
pub fn init(verbosity: Verbosity) {
    let directive = verbosity.directive(std::env::var("AIRWAVES_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .try_init();
}
