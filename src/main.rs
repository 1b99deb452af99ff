use std::io;
use std::process;

use airwaves::VERSION;
use airwaves::commands::ask::{self, AskArgs};
use airwaves::commands::config::{self, ConfigArgs};
use airwaves::commands::stations::{self, StationsArgs};
use airwaves::config::Settings;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};

const ROOT_HELP_EXAMPLES: &str = "Examples:\n  airwaves ask --provider openai \"Say hello!\"\n  echo \"Say hello!\" | airwaves ask --provider gemini\n  airwaves stations --city Berlin --limit 5\n  airwaves stations --by topvote --limit 5\n  airwaves config check\n  airwaves completion bash > ~/.local/share/bash-completion/completions/airwaves";

const ASK_HELP_EXAMPLES: &str = "Examples:\n  airwaves ask --provider arli \"Say hello!\"\n  echo \"Say hello!\" | airwaves ask --provider openai --model gpt-4.1-mini\n  airwaves ask --provider gemini --dry-run --json \"Explain FM radio\"";

const STATIONS_HELP_EXAMPLES: &str = "Examples:\n  airwaves stations --city Berlin --limit 5\n  airwaves stations --tag jazz\n  airwaves stations --by topvote --limit 5 --json";

#[derive(Debug, Parser)]
#[command(
    name = "airwaves",
    about = "LLM provider and radio directory tools",
    version = VERSION,
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(
        about = "Ask a question to an LLM provider",
        version = VERSION,
        after_help = ASK_HELP_EXAMPLES
    )]
    Ask(AskArgs),
    #[command(about = "Search the Radio Browser station directory", after_help = STATIONS_HELP_EXAMPLES)]
    Stations(StationsArgs),
    #[command(about = "Inspect local config")]
    Config(ConfigArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

fn print_completion(shell: CompletionShell) {
    let mut cmd = Cli::command();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, "airwaves", &mut io::stdout()),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, "airwaves", &mut io::stdout()),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, "airwaves", &mut io::stdout()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let settings = Settings::from_env();

    let result = match cli.command {
        Commands::Ask(args) => ask::run(args, &settings).await,
        Commands::Stations(args) => stations::run(args, &settings).await,
        Commands::Config(args) => config::run(args, &settings),
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
