use clap::{Args, Subcommand};

use crate::config::{self, Settings};
use crate::llm::Provider;

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum ConfigSubcommand {
    /// Validate the profile file.
    Check {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Print the profile file location.
    Path,
    /// Show the provider settings resolved from the environment.
    Show,
}

pub fn run(args: ConfigArgs, settings: &Settings) -> Result<(), String> {
    match args.command {
        ConfigSubcommand::Check { profile } => {
            let path = config::validate_config(profile.as_deref())?;
            println!("config OK: {}", path.display());
        }
        ConfigSubcommand::Path => {
            println!("{}", config::config_path()?.display());
        }
        ConfigSubcommand::Show => {
            for line in settings_lines(settings) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// One line per provider plus the directory base. Keys are reported as
/// present or missing, never printed.
fn settings_lines(settings: &Settings) -> Vec<String> {
    let mut lines: Vec<String> = Provider::ALL
        .iter()
        .map(|provider| {
            let provider_settings = settings.provider(*provider);
            let key = if provider_settings.has_api_key() {
                "set"
            } else {
                "missing"
            };
            format!(
                "{}: model={} api_base={} {}={key}",
                provider.as_str(),
                provider_settings.model,
                provider_settings.api_base,
                provider.api_key_env()
            )
        })
        .collect();
    lines.push(format!("radio-browser: api_base={}", settings.radio.api_base));
    lines
}
