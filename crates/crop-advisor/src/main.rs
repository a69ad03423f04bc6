//! CLI entry point for the crop variety advisor.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use crop_advisor::{AdvisorConfig, AppContext, Choices};
use dotenv::dotenv;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[cfg(feature = "chat")]
use crop_advisor::chat::{ChatProvider, GeminiProvider, OpenRouterProvider, ask_inline};
#[cfg(feature = "chat")]
use std::env;

/// Hosted model used by `ask`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProvider {
    /// OpenRouter (reads OPENROUTER_API_KEY)
    Openrouter,
    /// Google Gemini (reads GEMINI_API_KEY)
    Gemini,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Crop variety recommendations from historical advisory tables",
    long_about = "Recommends wheat, maize and rice varieties for a state, district, \
                  sowing season and irrigation status.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENROUTER_API_KEY    API key for OpenRouter (used by `ask`)\n  \
                  GEMINI_API_KEY        API key for Gemini (used by `ask --provider gemini`)\n\n\
                  EXAMPLES:\n  \
                  # List the states that have wheat data\n  \
                  crop-advisor states Wheat\n\n  \
                  # Get a recommendation\n  \
                  crop-advisor recommend Wheat Punjab Ludhiana Rabi Irrigated\n\n  \
                  # Use tables from another directory and print JSON\n  \
                  crop-advisor --data-dir ./tables --json describe"
)]
struct Args {
    /// JSON configuration file (overrides --data-dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the default crop tables
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and results)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable text
    ///
    /// Disables all logs so stdout only contains the JSON document.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the loaded crops
    Crops,
    /// List the states for a crop
    States { crop: String },
    /// List the districts of a state
    Districts { crop: String, state: String },
    /// List the sowing seasons of a district
    Seasons {
        crop: String,
        state: String,
        district: String,
    },
    /// List the irrigation statuses for a season
    Irrigations {
        crop: String,
        state: String,
        district: String,
        season: String,
    },
    /// Recommend a variety for a full selection
    Recommend {
        crop: String,
        state: String,
        district: String,
        season: String,
        irrigation: String,
    },
    /// Ask the hosted model a free-text question
    Ask {
        /// Provider to send the question to
        #[arg(short, long, value_enum, default_value = "openrouter")]
        provider: CliProvider,

        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Summarize every loaded crop
    Describe,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // API keys may live in a .env file
    dotenv().ok();

    if let Command::Ask { provider, question } = &args.command {
        return run_ask(*provider, &question.join(" "), args.json);
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AdvisorConfig::from_file(path)?
        }
        None => AdvisorConfig::with_data_dir(&args.data_dir),
    };
    debug!("Configured crops: {:?}", config.datasets);

    let ctx = AppContext::load(&config)?;
    for failure in ctx.failures() {
        warn!(
            "{} is unavailable [{}]: {}",
            failure.crop, failure.code, failure.message
        );
    }

    match &args.command {
        Command::Crops => {
            let crops = ctx.crops();
            emit(args.json, &crops, || crops.join("\n"))
        }
        Command::States { crop } => print_choices(args.json, ctx.get_states(crop)),
        Command::Districts { crop, state } => {
            print_choices(args.json, ctx.get_districts(crop, state))
        }
        Command::Seasons {
            crop,
            state,
            district,
        } => print_choices(args.json, ctx.get_seasons(crop, state, district)),
        Command::Irrigations {
            crop,
            state,
            district,
            season,
        } => print_choices(args.json, ctx.get_irrigations(crop, state, district, season)),
        Command::Recommend {
            crop,
            state,
            district,
            season,
            irrigation,
        } => {
            let outcome = ctx.recommend(crop, state, district, season, irrigation);
            emit(args.json, &outcome, || outcome.to_string())
        }
        Command::Describe => {
            let report = DescribeReport {
                crops: ctx.summaries(),
                failures: ctx.failures().to_vec(),
            };
            emit(args.json, &report, || report.to_text())
        }
        Command::Ask { .. } => Ok(()),
    }
}

#[derive(Serialize)]
struct DescribeReport {
    crops: Vec<crop_advisor::CropSummary>,
    failures: Vec<crop_advisor::LoadFailure>,
}

impl DescribeReport {
    fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for summary in &self.crops {
            let ds = &summary.dataset;
            lines.push(format!(
                "{}: {} rows, {} states, {} districts, {} seasons, {} irrigation statuses, \
                 {} varieties, {} trees",
                ds.crop,
                ds.rows,
                ds.states,
                ds.districts,
                ds.seasons,
                ds.irrigations,
                ds.varieties,
                summary.trees
            ));
        }
        for failure in &self.failures {
            lines.push(format!("{}: unavailable ({})", failure.crop, failure.message));
        }
        lines.join("\n")
    }
}

fn print_choices(json: bool, choices: Choices) -> Result<()> {
    emit(json, &choices, || choices.labels().join("\n"))
}

/// Print `value` as JSON or as the text produced by `text`.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

#[cfg(feature = "chat")]
fn run_ask(provider: CliProvider, question: &str, json: bool) -> Result<()> {
    let provider: Box<dyn ChatProvider> = match provider {
        CliProvider::Openrouter => {
            Box::new(OpenRouterProvider::new(api_key("OPENROUTER_API_KEY")?)?)
        }
        CliProvider::Gemini => Box::new(GeminiProvider::new(api_key("GEMINI_API_KEY")?)?),
    };
    info!(
        "Asking {} ({})",
        provider.name(),
        provider.model().unwrap_or("default model")
    );

    let answer = ask_inline(provider.as_ref(), question);
    emit(json, &serde_json::json!({ "answer": answer }), || answer.clone())
}

#[cfg(feature = "chat")]
fn api_key(var: &str) -> Result<String> {
    env::var(var).map_err(|_| anyhow!("{} is not set", var))
}

#[cfg(not(feature = "chat"))]
fn run_ask(_provider: CliProvider, _question: &str, _json: bool) -> Result<()> {
    Err(anyhow!(
        "Chat support is not compiled in. Rebuild with the `chat` feature."
    ))
}
