//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `form_notifier` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! A failed run is logged and still exits with status 0, so a scheduler
//! simply tries again on its next tick.

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use form_notifier::initialization::init_logger_with;
use form_notifier::{run_check, Config, Credentials};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let credentials = Credentials::load(&config.config_dir);
    log::debug!("Credentials: {:?}", credentials);

    match run_check(&config, &credentials).await {
        Ok(report) => {
            println!(
                "✅ {} entr{} in export, {} new, {} pushed{} in {:.1}s",
                report.total_records,
                if report.total_records == 1 { "y" } else { "ies" },
                report.new_records,
                report.notified,
                if report.dry_run { " (dry run)" } else { "" },
                report.elapsed_seconds
            );
            if let Some(max_id) = report.saved_max_id {
                println!("Checkpoint saved at {} in {}", max_id, config.state_file.display());
            }
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
        }
    }

    Ok(())
}
