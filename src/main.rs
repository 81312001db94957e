//! @ai:module:intent CLI for the idea evaluation service
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use idea_evaluator::{
    charts::renderer_from_config,
    config::{AppConfig, Credentials},
    delivery::MockMailer,
    pipeline::{create_pipeline, EvaluationOutcome, EvaluationPipeline, PipelineSettings},
    server::{start_server, AppState},
    validation::{validate_submission, IdeaSubmission},
    MockCompletionClient, PipelineError,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "idea-evaluator")]
#[command(about = "Evaluate business ideas and deliver illustrated reports by email")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind, overrides server.bind
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Evaluate a single idea from a file
    Evaluate {
        /// Recipient of the report
        #[arg(short, long)]
        email: String,

        /// File containing the idea description
        #[arg(short, long)]
        idea_file: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use canned completions and skip email delivery
        #[arg(long)]
        dry_run: bool,

        /// Write the report HTML here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check an idea description against the submission rules
    Validate {
        /// File containing the idea description
        #[arg(short, long)]
        idea_file: PathBuf,

        /// Email address to check alongside the idea
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "idea-evaluator.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("idea_evaluator=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config, bind).await,
        Commands::Evaluate {
            email,
            idea_file,
            config,
            dry_run,
            output,
        } => {
            evaluate(EvaluateArgs {
                email,
                idea_file,
                config,
                dry_run,
                output,
            })
            .await
        }
        Commands::Validate { idea_file, email } => validate(idea_file, email),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Start the API with production collaborators
/// @ai:effects network, env, fs:read
async fn serve(config_path: Option<PathBuf>, bind: Option<String>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let credentials = Credentials::from_env(&config.delivery)?;
    let pipeline = create_pipeline(&config, &credentials)?;

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}'"))?;

    let state = AppState::new(pipeline, config.server.expose_error_details);
    start_server(addr, state).await
}

struct EvaluateArgs {
    email: String,
    idea_file: PathBuf,
    config: Option<PathBuf>,
    dry_run: bool,
    output: Option<PathBuf>,
}

/// @ai:intent Run one evaluation from the command line
/// @ai:effects network, env, fs:read, fs:write
async fn evaluate(args: EvaluateArgs) -> Result<()> {
    let config = load_or_default_config(args.config)?;
    let submission = IdeaSubmission {
        email: args.email,
        idea_text: read_idea(&args.idea_file)?,
    };

    let outcome = if args.dry_run {
        tracing::info!("Running in dry-run mode");
        let pipeline = EvaluationPipeline::new(
            Arc::new(MockCompletionClient::sample()),
            Arc::new(MockMailer::new()),
            renderer_from_config(&config.charts),
            PipelineSettings::from(&config),
        );
        pipeline.evaluate(&submission).await
    } else {
        let credentials = Credentials::from_env(&config.delivery)?;
        let pipeline = create_pipeline(&config, &credentials)?;
        pipeline.evaluate(&submission).await
    };

    let outcome = outcome.map_err(report_failure)?;

    let output = match (args.output, args.dry_run) {
        (Some(path), _) => Some(path),
        (None, true) => Some(PathBuf::from("report.html")),
        (None, false) => None,
    };
    if let Some(path) = output {
        std::fs::write(&path, outcome.report.html())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    print_summary(&outcome, args.dry_run);
    Ok(())
}

fn report_failure(err: PipelineError) -> anyhow::Error {
    if let PipelineError::Validation(errors) = &err {
        for (field, message) in errors.fields() {
            eprintln!("  {field}: {message}");
        }
    }
    anyhow::anyhow!("{} ({})", err.user_message(), err)
}

fn print_summary(outcome: &EvaluationOutcome, dry_run: bool) {
    println!("\n=== Evaluation Summary ===");
    println!("Request:        {}", outcome.request_id);
    println!("Charts:         {}", outcome.report.image_count());
    println!(
        "Metrics:        {}",
        if outcome.used_fallback_metrics {
            "fallback"
        } else {
            "generated"
        }
    );
    println!("Elapsed:        {:.1}s", outcome.elapsed.as_secs_f64());
    if dry_run {
        println!("Delivery:       skipped (dry run)");
    } else {
        println!("Delivery id:    {}", outcome.receipt.id);
    }
}

/// @ai:intent Print validation results for an idea file
/// @ai:effects fs:read
fn validate(idea_file: PathBuf, email: Option<String>) -> Result<()> {
    let idea = read_idea(&idea_file)?;
    let errors = validate_submission(email.as_deref().unwrap_or_default(), &idea);

    let problems: Vec<_> = errors
        .fields()
        .filter(|(field, _)| email.is_some() || *field != "email")
        .collect();

    if problems.is_empty() {
        println!("Idea passes validation");
        return Ok(());
    }

    println!("Idea failed validation:");
    for (field, message) in &problems {
        println!("  - {field}: {message}");
    }
    anyhow::bail!("{} validation error(s)", problems.len())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = AppConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load(&p),
        None => {
            let default_path = PathBuf::from("idea-evaluator.toml");

            if default_path.exists() {
                AppConfig::load(&default_path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn read_idea(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
