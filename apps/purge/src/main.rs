//! relprune purge runtime.
//!
//! Prunes App Center releases of one version label, keeping the newest ones.

#![forbid(unsafe_code)]

mod config;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use relprune_application::PurgeService;
use relprune_core::AppResult;
use relprune_infrastructure::{AppCenterEndpoint, HttpAppCenterReleaseHost, build_http_client};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::PurgeConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let failure = match run().await {
        Ok(failure_message) => failure_message,
        Err(error) => Some(error.to_string()),
    };

    match failure {
        Some(message) => {
            report_failure(message.as_str());
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

async fn run() -> AppResult<Option<String>> {
    let config = PurgeConfig::load()?;
    config.log_effective();

    let endpoint =
        AppCenterEndpoint::new(config.api_base_url.as_str(), &config.org_name, &config.app_name)?;
    let http_client = build_http_client(config.http_timeout)?;
    let release_host = Arc::new(HttpAppCenterReleaseHost::new(
        http_client,
        endpoint,
        config.api_token.clone(),
    ));

    info!(
        org_name = %config.org_name,
        app_name = %config.app_name,
        app_version = %config.app_version,
        "relprune started"
    );

    let report = PurgeService::new(release_host, config.rate_budget)
        .run(&config.purge_request())
        .await?;

    Ok(report.failure_message())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Logs the terminal failure and, inside GitHub Actions, raises it as a
/// workflow error annotation.
fn report_failure(message: &str) {
    error!("{message}");

    if env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true") {
        println!("::error::{}", escape_workflow_data(message));
    }
}

fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
