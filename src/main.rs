//! Fraudgate entrypoint. Reads one transaction per line (JSON) on stdin and
//! emits one scoring response per line on stdout; `--alerts` lists persisted
//! fraud alerts instead.

use fraudgate::config::EngineConfig;
use fraudgate::decision::Severity;
use fraudgate::logging::StructuredLogger;
use fraudgate::pipeline::{ScoreRequest, ScoringPipeline};
use fraudgate::store::{AlertFilter, AlertStatus};
use fraudgate::EngineError;
use std::io::BufRead;
use tracing::info;

fn alert_filter_from_args(args: &[String]) -> AlertFilter {
    let mut filter = AlertFilter::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--severity" => filter.severity = it.next().and_then(|v| Severity::parse(v)),
            "--status" => filter.status = it.next().and_then(|v| AlertStatus::parse(v)),
            "--limit" => filter.limit = it.next().and_then(|v| v.parse().ok()),
            _ => {}
        }
    }
    filter
}

fn main() -> Result<(), EngineError> {
    let config_path = std::env::var("FRAUDGATE_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %config_path.display(), "fraudgate starting");

    let pipeline = ScoringPipeline::from_config(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--alerts") {
        let alerts = pipeline.list_alerts(&alert_filter_from_args(&args))?;
        for alert in alerts {
            if let Ok(line) = serde_json::to_string(&alert) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) if !l.trim().is_empty() => l,
            Ok(_) => continue,
            Err(_) => break,
        };
        let request: ScoreRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                println!(
                    "{}",
                    serde_json::json!({ "success": false, "error": format!("malformed request: {e}") })
                );
                continue;
            }
        };
        match pipeline.score(&request) {
            Ok(response) => {
                if let Ok(out) = serde_json::to_string(&response) {
                    println!("{out}");
                }
            }
            Err(EngineError::InvalidInput(msg)) => {
                println!(
                    "{}",
                    serde_json::json!({ "success": false, "error": msg })
                );
            }
            // Model failure is not per-request recoverable.
            Err(e) => return Err(e),
        }
    }

    info!("fraudgate stopping");
    Ok(())
}
