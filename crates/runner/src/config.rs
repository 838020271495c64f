//! Runner configuration: command-line flags with `DELAYED_*` env fallbacks

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use delayed_core::domain::{JobArguments, DEFAULT_QUEUE};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per record
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "delayed-runner")]
#[command(about = "In-process runner for delayed jobs", long_about = None)]
#[command(version)]
pub struct RunnerConfig {
    /// Queue this runner's worker serves
    #[arg(long, env = "DELAYED_QUEUE", default_value = DEFAULT_QUEUE)]
    pub queue: String,

    /// Submit a clever_utility job with these arguments (JSON array, repeatable)
    #[arg(long = "enqueue", value_name = "JSON_ARRAY")]
    pub enqueue: Vec<String>,

    /// Hold start-up jobs back this many milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<i64>,

    /// Exit once the queue has nothing queued or running
    #[arg(long)]
    pub drain: bool,

    /// Log output format
    #[arg(long, env = "DELAYED_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Seconds to wait for an in-flight job after shutdown is requested
    #[arg(long, env = "DELAYED_SHUTDOWN_GRACE_SECS", default_value_t = 20)]
    pub shutdown_grace_secs: u64,
}

impl RunnerConfig {
    /// Parse every `--enqueue` value, failing on the first bad one
    pub fn startup_arguments(&self) -> Result<Vec<JobArguments>> {
        self.enqueue.iter().map(|raw| parse_arguments(raw)).collect()
    }
}

/// Parse one JSON array into job arguments
pub fn parse_arguments(raw: &str) -> Result<JobArguments> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)
        .with_context(|| format!("--enqueue expects a JSON array, got: {raw}"))?;
    Ok(JobArguments::new(values))
}
