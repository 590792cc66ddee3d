//! CLI entrypoint for llm-council
//!
//! This is the binary that wires together all layers using dependency
//! injection. Config conversion logic is centralized here.

mod output;
mod progress;

use anyhow::{Result, bail};
use clap::Parser;
use council_application::{
    BehaviorConfig, DeliberateInput, DeliberateUseCase, DeliberationLogger, LlmProvider,
    NoDeliberationLogger, NoProgress,
};
use council_domain::{ModelId, OutputMode, Role, Severity, Task};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlDeliberationLogger, OpenRouterProvider,
};
use progress::ConsoleProgress;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "llm-council",
    version,
    about = "Multi-model deliberation: parallel answers, pairwise peer review, ranked synthesis"
)]
struct Cli {
    /// The task to put before the council
    task: Option<String>,

    /// Model id for one anonymous seat (repeatable; seats are named seat1, seat2, ...)
    #[arg(short, long = "model")]
    model: Vec<String>,

    /// Preset seat bound to a model: "<preset>=<model-id>" (repeatable;
    /// presets: advocate, critic, synthesizer, pragmatist, researcher)
    #[arg(long = "preset")]
    preset: Vec<String>,

    /// Chairman model for the synthesis
    #[arg(long)]
    chairman: Option<String>,

    /// Output mode: perspectives, synthesis, or both
    #[arg(long)]
    output_mode: Option<String>,

    /// Primary aggregation method: borda, bradley_terry, or elo
    #[arg(long)]
    aggregation: Option<String>,

    /// Skip the peer-review stage (and all aggregation)
    #[arg(long)]
    no_review: bool,

    /// Show real role names to judges instead of anonymous labels
    #[arg(long)]
    no_anonymize: bool,

    /// Restrict judges to these role names (repeatable)
    #[arg(long = "reviewer")]
    reviewer: Vec<String>,

    /// Overall deliberation deadline in seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Print the result as JSON instead of the console report
    #[arg(long)]
    json: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// Print config file locations and exit
    #[arg(long)]
    show_config: bool,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log directory override
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Disable file logging
    #[arg(long)]
    no_log_file: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// UTC timestamps with millisecond precision for both log layers.
struct UtcMillis;

impl tracing_subscriber::fmt::time::FormatTime for UtcMillis {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Handles kept alive for the duration of the run.
struct Telemetry {
    /// Flushes the non-blocking file writer when dropped.
    _guard: Option<WorkerGuard>,
    /// Where the deliberation transcript goes, when file logging is on.
    transcript_path: Option<PathBuf>,
}

/// Pick and create the log directory, or `None` when file logging is off
/// or the directory cannot be created. `--log-dir` wins over the OS data
/// directory, which wins over a dot-directory in the working tree.
fn log_directory(cli: &Cli) -> Option<PathBuf> {
    if cli.no_log_file {
        return None;
    }
    let dir = cli
        .log_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join("llm-council").join("logs")))
        .unwrap_or_else(|| Path::new(".llm-council").join("logs"));
    match std::fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            eprintln!("Warning: file logging disabled ({}): {}", dir.display(), e);
            None
        }
    }
}

/// Set up tracing: a stderr layer honoring `RUST_LOG` (falling back to the
/// `-v` count) and, when a log directory is available, a verbose file
/// layer. Each run writes a `<run-id>.log` operation log next to its
/// `<run-id>.deliberation.jsonl` transcript.
fn init_telemetry(cli: &Cli) -> Telemetry {
    let fallback = ["warn", "info", "debug", "trace"][cli.verbose.min(3) as usize];
    let console = fmt::layer()
        .with_timer(UtcMillis)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        );

    let Some(dir) = log_directory(cli) else {
        tracing_subscriber::registry().with(console).init();
        return Telemetry {
            _guard: None,
            transcript_path: None,
        };
    };

    let run_id = format!(
        "council-{}-{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%SZ"),
        std::process::id()
    );
    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &dir,
        format!("{run_id}.log"),
    ));
    let file = fmt::layer()
        .with_timer(UtcMillis)
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new(if cli.verbose >= 3 { "trace" } else { "debug" }));

    tracing_subscriber::registry().with(console).with(file).init();
    info!("Operation log: {}", dir.join(format!("{run_id}.log")).display());

    Telemetry {
        _guard: Some(guard),
        transcript_path: Some(dir.join(format!("{run_id}.deliberation.jsonl"))),
    }
}

/// Build the council seats from CLI flags, falling back to the config file.
fn build_roles(cli: &Cli, config: &FileConfig) -> Result<Vec<Role>> {
    if cli.model.is_empty() && cli.preset.is_empty() {
        return config
            .council
            .to_roles()
            .map_err(|e| anyhow::anyhow!("invalid role in config file: {e}"));
    }

    let mut roles = Vec::new();
    for (i, model) in cli.model.iter().enumerate() {
        let Some(model) = ModelId::try_new(model.clone()) else {
            bail!("empty model id in --model");
        };
        roles.push(Role::new(format!("seat{}", i + 1), model));
    }
    for entry in &cli.preset {
        let Some((preset, model)) = entry.split_once('=') else {
            bail!("--preset expects '<preset>=<model-id>', got '{entry}'");
        };
        let Some(model) = ModelId::try_new(model) else {
            bail!("empty model id in --preset '{entry}'");
        };
        let Some(role) = Role::preset(preset, model) else {
            bail!(
                "unknown preset '{preset}' (expected advocate, critic, synthesizer, pragmatist, or researcher)"
            );
        };
        roles.push(role);
    }
    Ok(roles)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration (respecting --no-config)
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}", e);
            ConfigLoader::load_defaults()
        })
    };

    let config_issues = config.validate();
    for issue in &config_issues {
        match issue.severity {
            Severity::Warning => eprintln!("Warning: {}", issue.message),
            Severity::Error => eprintln!("Error: {}", issue.message),
        }
    }
    if config_issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("Invalid configuration");
    }

    let telemetry = init_telemetry(&cli);

    let transcript: Arc<dyn DeliberationLogger> = match &telemetry.transcript_path {
        Some(path) => match JsonlDeliberationLogger::new(path) {
            Some(logger) => {
                info!("Transcript: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoDeliberationLogger),
        },
        None => Arc::new(NoDeliberationLogger),
    };

    // === Build the deliberation input ===

    let Some(task_text) = cli.task.clone() else {
        bail!("No task given. Usage: llm-council \"<question>\" -m <model> -m <model> --chairman <model>");
    };
    let Some(task) = Task::try_new(task_text) else {
        bail!("Task cannot be empty");
    };

    let roles = build_roles(&cli, &config)?;
    if roles.len() < 2 {
        bail!(
            "A council needs at least two seats; configure [[council.roles]] or pass -m/--preset twice"
        );
    }

    let mut options = config.council.to_options();
    if let Some(chairman) = &cli.chairman {
        let Some(chairman) = ModelId::try_new(chairman.clone()) else {
            bail!("empty --chairman model id");
        };
        options.chairman_model = Some(chairman);
    }
    if let Some(mode) = &cli.output_mode {
        options.output_mode = mode
            .parse::<OutputMode>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(method) = &cli.aggregation {
        options.aggregation = method
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if cli.no_review {
        options.review = false;
    }
    if cli.no_anonymize {
        options.anonymize = false;
    }
    if !cli.reviewer.is_empty() {
        options.reviewers = Some(cli.reviewer.clone());
    }

    // === Dependency injection ===

    let api_key = std::env::var(&config.provider.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        bail!(
            "{} is not set; the gateway needs a bearer token",
            config.provider.api_key_env
        );
    }

    let provider: Arc<dyn LlmProvider> = Arc::new(OpenRouterProvider::with_options(
        api_key,
        config.provider.base_url.clone(),
        Duration::from_secs(config.provider.timeout_secs),
        config.provider.max_in_flight,
    ));

    if !provider.health_check().await {
        eprintln!(
            "Warning: gateway health check failed ({}); continuing anyway",
            config.provider.base_url
        );
    }

    let deadline = cli.deadline_secs.unwrap_or(config.council.deadline_secs);

    // Ctrl+C cancels every in-flight provider call
    let cancellation = CancellationToken::new();
    let shutdown_token = cancellation.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                eprintln!("\nInterrupted. Returning partial results...");
                shutdown_token.cancel();
            }
            Err(e) => {
                eprintln!("Failed to listen for Ctrl+C signal: {}", e);
            }
        }
    });

    if !cli.quiet && !cli.json {
        println!();
        println!("Task: {}", task);
        println!(
            "Seats: {}",
            roles
                .iter()
                .map(|r| format!("{} ({})", r.name, r.model))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if let Some(chairman) = &options.chairman_model {
            println!("Chairman: {}", chairman);
        }
        println!();
    }

    let output_mode = options.output_mode;
    let input = DeliberateInput::new(task, roles).with_options(options);
    let use_case = DeliberateUseCase::new(provider.clone())
        .with_behavior(BehaviorConfig::from_deadline_seconds(Some(deadline)))
        .with_cancellation(cancellation)
        .with_logger(transcript);

    let result = if cli.quiet || cli.json {
        use_case.execute_with_progress(input, &NoProgress).await
    } else {
        let console = ConsoleProgress::new();
        use_case.execute_with_progress(input, &console).await
    };

    provider.close().await;

    match result {
        Ok(output) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                output::print_report(&output, output_mode);
            }
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            println!("\nDeliberation cancelled before any usable output.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
