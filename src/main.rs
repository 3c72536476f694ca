//! MarketScout - Main CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use marketscout::{
    cli::{Args, Commands, Verbosity},
    config::{Config, API_KEY_ENV, KNOWN_MODELS},
    export::write_report,
    pipeline::{Pipeline, PipelineState},
    repl::{DisplayManager, InputHandler, ReplSession, SessionController},
};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, checked before `RUST_LOG`
const LOG_ENV: &str = "MARKETSCOUT_LOG";

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    args.apply_overrides(&mut config);
    if !config.is_known_model() {
        tracing::warn!(
            model = %config.llm.model,
            known = ?KNOWN_MODELS,
            "model is not one of the tested models"
        );
    }
    Ok(config)
}

/// Ask for the API key on the terminal when none is configured
fn prompt_api_key() -> Option<String> {
    let mut editor = rustyline::DefaultEditor::new().ok()?;
    let key = editor
        .readline(&format!("{} ", "Please enter your OpenAI API key:".yellow()))
        .ok()?;
    let key = key.trim().to_string();
    (!key.is_empty()).then_some(key)
}

fn show_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("********".to_string());
    }
    println!("{}", toml::to_string_pretty(&shown).context("Failed to serialize config")?);
    println!(
        "{} {}",
        "API key source:".dimmed(),
        if std::env::var(API_KEY_ENV).is_ok() {
            API_KEY_ENV
        } else if config.llm.api_key.is_some() {
            "config file"
        } else {
            "not set"
        }
    );
    Ok(())
}

/// Run all three stages for one industry
async fn run_once(args: &Args, pipeline: &Pipeline, industry: &str) -> Result<()> {
    let display = if args.verbosity().show_progress() {
        DisplayManager::new()
    } else {
        DisplayManager::quiet()
    };
    let mut state = PipelineState::new();

    let spinner = display.start_spinner("Validating...");
    let validation = pipeline.validate(&mut state, industry).await;
    spinner.finish_and_clear();
    let validation = validation?;
    display.show_validation(&validation);
    if !validation.payload.valid {
        bail!("'{}' was not recognised as an industry", industry.trim());
    }

    let spinner = display.start_spinner("Searching Wikipedia...");
    let retrieval = pipeline.retrieve(&mut state).await;
    spinner.finish_and_clear();
    let retrieval = retrieval?;
    display.show_retrieval(&retrieval);
    if retrieval.payload.documents.is_empty() {
        bail!("No relevant Wikipedia pages were found for '{}'", validation.payload.name);
    }

    let spinner = display.start_spinner("Generating report...");
    let report = pipeline.generate(&mut state).await;
    spinner.finish_and_clear();
    let report = report?;
    display.show_report(&report);

    if !args.no_save {
        let path = write_report(&args.output_dir, &validation.payload.name, &report.payload)?;
        display.show_success(&format!("Report saved to {}", path.display()));
    }

    Ok(())
}

async fn run_interactive(args: &Args, config: &Config) -> Result<()> {
    let api_key = config.resolve_api_key().or_else(prompt_api_key);
    if api_key.is_none() {
        tracing::warn!("no API key configured; every step will fail until one is set");
    }
    let pipeline = Pipeline::from_config(config, api_key.as_deref())?;

    let display = DisplayManager::new();
    display.show_banner(env!("CARGO_PKG_VERSION"), &config.llm.model);

    let input = match Config::config_path() {
        Ok(path) => InputHandler::with_history(path.with_file_name("history"))?,
        Err(_) => InputHandler::new()?,
    };
    let controller = SessionController::new(pipeline, display, args.output_dir.clone());

    ReplSession::new(input, controller).run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    init_logging(args.verbosity());
    let config = load_config(&args)?;

    match (&args.command, &args.industry) {
        (Some(Commands::Config), _) => show_config(&config),
        (Some(Commands::Start), _) => run_interactive(&args, &config).await,
        (None, Some(industry)) => {
            let api_key = config.resolve_api_key();
            let pipeline = Pipeline::from_config(&config, api_key.as_deref())?;
            run_once(&args, &pipeline, industry).await
        }
        (None, None) => bail!("Industry required"),
    }
}
