//! fuzzylab
//!
//! Command-line interface for the fuzzy scenarios: serve the HTTP API,
//! evaluate a single payload, or inspect the built profiles.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::debug;

use fuzzylab::analysis::{self, EdgePolicy};
use fuzzylab::config::{AppConfig, LogLevel};
use fuzzylab::domains::{self, Domain};
use fuzzylab::server::run_server;

#[derive(Parser)]
#[command(name = "fuzzylab")]
#[command(version = env!("FUZZYLAB_VERSION"))]
#[command(long_version = concat!(env!("FUZZYLAB_VERSION"), " (", env!("FUZZYLAB_TARGET"), ")"))]
#[command(about = "Mamdani fuzzy inference for comfort, air quality, light and plant care", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the standard search paths)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Evaluate one payload and print the JSON report
    Eval {
        /// comfort, air-quality, light-comfort or plant-care
        domain: String,

        /// Input values as key=value, e.g. temperature=23
        #[arg(value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Plant type for plant-care (succulent, cactus, fern, orchid)
        #[arg(long)]
        plant_type: Option<String>,

        /// Also print the per-term rule activations
        #[arg(long)]
        explain: bool,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the profiles with their variables and rules
    Profiles {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a default configuration file
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Config = cli.command {
        print!("{}", AppConfig::default_config_content());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            config.apply_env_overrides();
            config.validate().context("Invalid configuration")?;
            config
        }
        None => AppConfig::load().context("Failed to load configuration")?,
    };

    if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    } else if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.general.log_level.tracing_level())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port } => serve(config, host, port),
        Command::Eval {
            domain,
            values,
            plant_type,
            explain,
            compact,
        } => eval(&config, &domain, &values, plant_type, explain, compact),
        Command::Profiles { json } => profiles(json),
        Command::Config => Ok(()),
    }
}

fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate().context("Invalid server configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(run_server(config)).context("Server error")
}

/// `key=value` pairs as a JSON object; numeric values become numbers
fn parse_values(values: &[String]) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    for pair in values {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{}'", pair))?;
        let value = match raw.trim().parse::<f64>() {
            Ok(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .with_context(|| format!("'{}' is not a finite number", raw))?,
            Err(_) => Value::String(raw.to_string()),
        };
        payload.insert(key.trim().to_string(), value);
    }
    Ok(payload)
}

fn eval(
    config: &AppConfig,
    domain: &str,
    values: &[String],
    plant_type: Option<String>,
    explain: bool,
    compact: bool,
) -> Result<()> {
    let domain: Domain = domain.parse()?;
    let mut payload = parse_values(values)?;
    if let Some(plant_type) = plant_type {
        payload.insert("plant_type".to_string(), Value::String(plant_type));
    }
    let payload = Value::Object(payload);
    let edges = EdgePolicy::from(&config.engine);
    debug!(%domain, payload = %payload, "evaluating");

    let report = analysis::analyse(domain, &payload, &edges)?;
    let output = if explain {
        let activations = analysis::explain(domain, &payload, &edges)?;
        serde_json::json!({ "report": report, "activations": activations })
    } else {
        report
    };

    let text = if compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", text);
    Ok(())
}

fn profiles(json: bool) -> Result<()> {
    let mut summaries = Vec::new();
    for domain in Domain::ALL {
        let profile = domains::get_profile(domain)?;
        summaries.push(profile.describe());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        println!("{} ({} rules)", summary.name, summary.rule_count);
        for var in summary.inputs.iter().chain(&summary.outputs) {
            let terms: Vec<String> = var
                .terms
                .iter()
                .map(|(name, [a, b, c])| format!("{}({}, {}, {})", name, a, b, c))
                .collect();
            println!(
                "  {:<6} {:<18} [{}, {}]  {}",
                var.role,
                var.name,
                var.min,
                var.max,
                terms.join(" ")
            );
        }
        for rule in &summary.rules {
            println!("    {}", rule);
        }
        println!();
    }
    Ok(())
}
