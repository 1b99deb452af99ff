use std::env;
use std::io::{self, IsTerminal, Read};

use clap::Args;
use serde_json::json;
use tracing::debug;

use crate::commands::{OutputMode, print_json};
use crate::config::{self, ProfileConfig, Settings};
use crate::llm::{LlmClient, Provider};
use crate::logging::{self, Verbosity};

#[derive(Debug, Args, Clone, Default)]
pub struct AskArgs {
    /// Prompt text. Read from stdin when omitted.
    pub prompt: Option<String>,
    /// Provider to query: gemini, arli or openai.
    #[arg(long)]
    pub provider: Option<String>,
    /// Model override for the selected provider.
    #[arg(long)]
    pub model: Option<String>,
    /// Profile name from the config file.
    #[arg(long)]
    pub profile: Option<String>,
    /// Print the request that would be sent and exit without calling the API.
    #[arg(long)]
    pub dry_run: bool,
    /// Shorthand for `--output json`.
    #[arg(long)]
    pub json: bool,
    /// Output format: text or json.
    #[arg(long)]
    pub output: Option<String>,
    /// Log request details to stderr.
    #[arg(long)]
    pub verbose: bool,
    /// Suppress all logging; fatal errors are still printed.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug)]
struct ResolvedAsk {
    provider: Provider,
    model: Option<String>,
    output: OutputMode,
}

pub async fn run(args: AskArgs, settings: &Settings) -> Result<(), String> {
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let profile = match args.profile.as_deref() {
        Some(name) => {
            let profile = config::load_profile(name)?;
            config::validate_profile(name, &profile)?;
            profile
        }
        None => ProfileConfig::default(),
    };
    let resolved = resolve(&args, &profile, env::var("AIRWAVES_PROVIDER").ok())?;
    let prompt = read_prompt(args.prompt.as_deref())?;

    let mut settings = settings.clone();
    if let Some(model) = resolved.model.as_deref() {
        settings.provider_mut(resolved.provider).model = model.to_string();
    }
    let client = LlmClient::new(resolved.provider, &settings);
    let api_key_present = settings.provider(resolved.provider).has_api_key();

    debug!(
        provider = resolved.provider.as_str(),
        model = client.model(),
        api_key_present,
        prompt_chars = prompt.chars().count(),
        "Resolved ask request"
    );

    if args.dry_run {
        return print_json(&json!({
            "dry_run": true,
            "provider": resolved.provider.as_str(),
            "model": client.model(),
            "endpoint": client.endpoint(),
            "output": resolved.output.as_str(),
            "api_key_present": api_key_present,
            "body": client.request_body(&prompt),
        }));
    }

    let content = client.ask(&prompt).await.map_err(|err| err.to_string())?;

    match resolved.output {
        OutputMode::Text => {
            println!("{content}");
            Ok(())
        }
        OutputMode::Json => print_json(&json!({
            "provider": resolved.provider.as_str(),
            "model": client.model(),
            "content": content,
        })),
    }
}

/// Precedence: command-line flag, then environment, then profile.
fn resolve(
    args: &AskArgs,
    profile: &ProfileConfig,
    env_provider: Option<String>,
) -> Result<ResolvedAsk, String> {
    let env_provider = env_provider.filter(|value| !value.trim().is_empty());
    let (source, raw) = if let Some(value) = args.provider.as_deref() {
        ("--provider", value.to_string())
    } else if let Some(value) = env_provider {
        ("AIRWAVES_PROVIDER", value)
    } else if let Some(value) = profile.provider.as_deref() {
        ("profile provider", value.to_string())
    } else {
        return Err(format!(
            "No provider selected. Use --provider or set AIRWAVES_PROVIDER ({}).",
            Provider::supported_values()
        ));
    };
    let provider = raw.parse::<Provider>().map_err(|_| {
        format!(
            "Invalid {source} '{raw}'. Supported values: {}.",
            Provider::supported_values()
        )
    })?;

    let output = if args.json {
        OutputMode::Json
    } else if let Some(value) = args.output.as_deref().or(profile.output.as_deref()) {
        OutputMode::parse(value)
            .ok_or_else(|| format!("Invalid output '{value}'. Supported values: text, json."))?
    } else {
        OutputMode::Text
    };

    let model = args
        .model
        .clone()
        .or_else(|| profile.model.clone())
        .filter(|model| !model.trim().is_empty());

    Ok(ResolvedAsk {
        provider,
        model,
        output,
    })
}

fn read_prompt(argument: Option<&str>) -> Result<String, String> {
    if let Some(prompt) = argument {
        return Ok(prompt.to_string());
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err("No prompt provided. Pass it as an argument or pipe it via stdin.".to_string());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|err| format!("Failed to read prompt from stdin: {err}"))?;
    let prompt = buffer.trim_end_matches(['\r', '\n']).to_string();
    if prompt.trim().is_empty() {
        return Err("No prompt provided. Pass it as an argument or pipe it via stdin.".to_string());
    }
    Ok(prompt)
}
