use clap::{Parser, Subcommand};
use log::error;
use recipe_finder::{ApiResponse, Provider, RecipeError, RecipeFinder};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "recipe-finder", version, about = "Find a recipe for any dish")]
struct Cli {
    /// LLM provider used when a dish has to be generated
    #[arg(long, value_parser = parse_provider, global = true)]
    provider: Option<Provider>,

    /// Model name for the provider
    #[arg(long, global = true)]
    model: Option<String>,

    /// Timeout in seconds for each external call
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Never fall back to generating recipes
    #[arg(long, global = true)]
    no_generation: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search local recipes, generating one when nothing matches
    Search { term: String },
    /// Show a recipe by id; generated ids need the original dish name
    Show {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Browse TheMealDB (English dish names)
    Browse {
        #[arg(default_value = "")]
        term: String,
    },
}

fn parse_provider(value: &str) -> Result<Provider, String> {
    match value.to_lowercase().as_str() {
        "google" | "gemini" => Ok(Provider::Google),
        "openai" => Ok(Provider::OpenAI),
        "anthropic" => Ok(Provider::Anthropic),
        other => Err(format!("unknown provider '{}'", other)),
    }
}

fn respond<T: Serialize>(result: Result<T, RecipeError>) -> ExitCode {
    let response: ApiResponse<T> = result.into();
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = RecipeFinder::builder();
    if let Some(provider) = cli.provider {
        builder = builder.provider(provider);
    }
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if cli.no_generation {
        builder = builder.without_generation();
    }

    let finder = match builder.build() {
        Ok(finder) => finder,
        Err(e) => {
            error!("{}", e);
            return respond::<()>(Err(e));
        }
    };

    match cli.command {
        Command::Search { term } => respond(finder.search(&term).await),
        Command::Show { id, name } => respond(finder.detail(&id, name.as_deref()).await),
        Command::Browse { term } => respond(finder.browse(&term).await),
    }
}
