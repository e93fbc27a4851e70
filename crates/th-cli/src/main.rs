//! Trail Herald CLI
//!
//! Command-line interface for Trail Herald, a cloud infrastructure
//! change notifier: it reads a change event, applies the notification
//! filter, and posts a chat message to the configured webhook.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod validator;

use config::AppConfig;
use th_notify::{ChangeHandler, DeliveryOutcome, HandlerConfig, HandlerResponse, LogNotifier};
use th_observability::event_span;
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "trail-herald")]
#[command(version)]
#[command(about = "Cloud infrastructure change notifications to chat", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Process a change event from a JSON file
    Send {
        /// Event file to read ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Log the notification instead of delivering it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },

    /// Process a built-in sample event
    Test {
        /// Event type (run-instances, delete-user, unknown)
        #[arg(short, long, default_value = "run-instances")]
        event_type: String,

        /// Log the notification instead of delivering it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    th_observability::init_logging_with_config(th_observability::LoggingConfig {
        level: log_level,
        json_format: cli.format == OutputFormat::Json,
        ..Default::default()
    });

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });
    config.apply_env_overrides();

    match cli.command {
        Commands::Send { file, dry_run } => cmd_send(config, &file, dry_run, cli.format).await,
        Commands::Validate { config: cfg_path } => {
            cmd_validate(cfg_path.unwrap_or(config_path)).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format).await,
        Commands::Test {
            event_type,
            dry_run,
        } => cmd_test(config, &event_type, dry_run, cli.format).await,
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "trail-herald", "trail-herald") {
        dirs.config_dir().join("config.yaml")
    } else {
        PathBuf::from("config/default.yaml")
    }
}

fn build_handler(config: &AppConfig, dry_run: bool) -> ChangeHandler {
    if dry_run {
        ChangeHandler::with_notifier(
            config.notify_domain.clone(),
            Arc::new(LogNotifier::new("dry-run")),
        )
    } else {
        ChangeHandler::new(HandlerConfig {
            notify_domain: config.notify_domain.clone(),
            webhook_url: config.webhook_url.clone(),
        })
    }
}

fn read_event(file: &PathBuf) -> Result<serde_json::Value> {
    let contents = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read event file: {}", file.display()))?
    };

    serde_json::from_str(&contents).context("Event file is not valid JSON")
}

fn print_response(response: &HandlerResponse, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        let outcome = match response.outcome {
            DeliveryOutcome::Delivered => "delivered".green(),
            DeliveryOutcome::Skipped => "skipped".yellow(),
            DeliveryOutcome::NotConfigured => "not configured".yellow(),
            DeliveryOutcome::Failed => "failed".red(),
        };
        println!("Status: {}", response.status_code);
        println!("Outcome: {}", outcome);
        println!("{}", response.body);
    }

    if response.status_code != 200 {
        std::process::exit(1);
    }
    Ok(())
}

async fn cmd_send(
    config: AppConfig,
    file: &PathBuf,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let event = read_event(file)?;
    let event_name = event
        .get("detail")
        .and_then(|d| d.get("eventName"))
        .and_then(|n| n.as_str())
        .unwrap_or("UnknownEvent");
    let span = event_span!(event_name);
    let _guard = span.enter();

    let handler = build_handler(&config, dry_run);
    let response = handler.handle(&event).await;
    print_response(&response, format)
}

async fn cmd_validate(config_path: PathBuf) -> Result<()> {
    println!(
        "Validating configuration: {}",
        config_path.display().to_string().cyan()
    );

    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("{}: {}", "Configuration file error".red().bold(), e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    let validation_result = ConfigValidator::validate(&config);
    validation_result.print();

    println!();
    println!("{}", "Configuration Summary".bold());
    println!("─────────────────────");
    println!(
        "  Webhook: {}",
        if config.webhook_url.is_empty() {
            "(not configured)".to_string()
        } else {
            config.redact_secrets().webhook_url
        }
    );
    println!("  Notify domain: {}", config.notify_domain);

    if validation_result.has_errors() {
        println!();
        println!(
            "{}",
            "Configuration validation failed. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    } else if validation_result.has_warnings() {
        println!();
        println!(
            "{}",
            "Configuration is valid with warnings. Review the warnings above."
                .yellow()
                .bold()
        );
    } else {
        println!();
        println!("{}", "Configuration is valid.".green().bold());
    }

    Ok(())
}

async fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", "Current Configuration".bold());
        println!("─────────────────────────");
        println!(
            "Webhook: {}",
            if display_config.webhook_url.is_empty() {
                "(not configured)"
            } else {
                &display_config.webhook_url
            }
        );
        println!("Notify domain: {}", display_config.notify_domain);
        println!("Log level: {}", display_config.logging.level);
    }

    Ok(())
}

async fn cmd_test(
    config: AppConfig,
    event_type: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    println!("{}", "Running Test".bold());
    println!("────────────");
    println!("Event Type: {}", event_type.cyan());
    println!("Dry Run: {}", dry_run);

    // Sample actors carry the configured domain so the event passes the
    // notification filter.
    let actor = format!("test-user{}", config.notify_domain);
    let event = match event_type {
        "run-instances" => serde_json::json!({
            "detail": {
                "eventName": "RunInstances",
                "eventSource": "ec2.amazonaws.com",
                "awsRegion": "us-east-1",
                "eventTime": "2024-05-01T12:00:00Z",
                "userIdentity": { "userName": actor },
                "responseElements": {
                    "instancesSet": { "items": [{"instanceId": "i-0123456789abcdef0"}] }
                }
            }
        }),
        "delete-user" => serde_json::json!({
            "detail": {
                "eventName": "DeleteUser",
                "eventSource": "iam.amazonaws.com",
                "awsRegion": "us-east-1",
                "eventTime": "2024-05-01T12:00:00Z",
                "userIdentity": { "userName": actor },
                "responseElements": { "user": { "userName": "departed-user" } }
            }
        }),
        "unknown" => serde_json::json!({
            "detail": {
                "eventName": "SomethingNovel",
                "eventSource": "example.amazonaws.com",
                "awsRegion": "us-east-1",
                "eventTime": "2024-05-01T12:00:00Z",
                "userIdentity": { "userName": actor }
            }
        }),
        _ => {
            println!("{}: Unknown event type: {}", "Error".red(), event_type);
            return Ok(());
        }
    };

    println!();
    let handler = build_handler(&config, dry_run);
    let response = handler.handle(&event).await;
    print_response(&response, format)
}
