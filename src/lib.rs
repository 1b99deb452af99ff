//! Thin async clients for LLM text/chat completion providers and the Radio
//! Browser station directory, plus the `airwaves`/`airask` command-line tools.

pub mod commands;
pub mod config;
pub mod llm;
pub mod logging;
pub mod radio;

/// Version string shown by `--version`, including build metadata.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit: ",
    env!("AIRWAVES_COMMIT"),
    ", built: ",
    env!("AIRWAVES_BUILT_AT"),
    ")"
);
