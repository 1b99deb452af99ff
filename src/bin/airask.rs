use std::process;

use airwaves::VERSION;
use airwaves::commands::ask::{self, AskArgs};
use airwaves::config::Settings;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "airask",
    about = "Ask a question to an LLM provider",
    version = VERSION
)]
struct Cli {
    #[command(flatten)]
    ask: AskArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let settings = Settings::from_env();

    if let Err(err) = ask::run(cli.ask, &settings).await {
        eprintln!("{err}");
        process::exit(1);
    }
}
