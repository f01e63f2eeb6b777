//! Deletes every generated PDF from the configured output directory.
//!
//! Records in the database are left alone.

use backend::config::AppConfig;
use backend::output::OutputDir;
use env_logger::Env;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = OutputDir::new(&config.output_dir);
    match output.purge_pdfs() {
        Ok(report) => {
            info!(
                "PDF cleanup completed: {} deleted, {} failed",
                report.deleted.len(),
                report.failed.len()
            );
            if report.failed.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Could not read {}: {}", output.path().display(), e);
            ExitCode::FAILURE
        }
    }
}
