use std::env;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use relprune_application::{PurgeRequest, RateBudgetConfig};
use relprune_core::{AppError, AppResult, NonEmptyString};
use relprune_domain::RetentionPolicy;
use relprune_infrastructure::APP_CENTER_API_BASE_URL;
use tracing::info;

const SETTING_PREFIX: &str = "RELPRUNE_";
const ACTION_INPUT_PREFIX: &str = "INPUT_";

/// Effective settings of one purge run.
#[derive(Clone)]
pub struct PurgeConfig {
    pub org_name: NonEmptyString,
    pub app_name: NonEmptyString,
    pub app_version: NonEmptyString,
    pub api_token: NonEmptyString,
    pub retention: RetentionPolicy,
    pub dry_run: bool,
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub rate_budget: RateBudgetConfig,
}

impl PurgeConfig {
    /// Reads settings from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, trying `RELPRUNE_<NAME>` and then the
    /// GitHub Actions input form `INPUT_<NAME>`.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Settings { lookup };

        let org_name = settings.required("ORG_NAME")?;
        let app_name = settings.required("APP_NAME")?;
        let app_version = settings.required("APP_VERSION")?;
        let api_token = settings.required("API_KEY")?;
        let to_keep = settings.parse("TO_KEEP", 0_i64)?;
        let retention = RetentionPolicy::from_signed(to_keep)?;
        let dry_run = match settings.optional("DRY_RUN") {
            Some(value) => parse_action_bool("DRY_RUN", value.as_str())?,
            None => false,
        };
        let api_base_url = settings
            .optional("API_BASE_URL")
            .unwrap_or_else(|| APP_CENTER_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let http_timeout_secs = settings.parse("HTTP_TIMEOUT_SECS", 30_u64)?;
        let delete_burst = settings.parse("DELETE_BURST", 1_u32)?;
        let delete_interval_ms = settings.parse("DELETE_INTERVAL_MS", 250_u64)?;
        let delete_max_pending = settings.parse("DELETE_MAX_PENDING", 1000_usize)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let rate_budget = RateBudgetConfig::new(
            delete_burst,
            Duration::from_millis(delete_interval_ms),
            delete_max_pending,
        )?;

        Ok(Self {
            org_name,
            app_name,
            app_version,
            api_token,
            retention,
            dry_run,
            api_base_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            rate_budget,
        })
    }

    /// Builds the purge request described by these settings.
    #[must_use]
    pub fn purge_request(&self) -> PurgeRequest {
        PurgeRequest {
            target_version: self.app_version.clone(),
            retention: self.retention,
            dry_run: self.dry_run,
        }
    }

    /// Logs the effective settings with the API token redacted.
    pub fn log_effective(&self) {
        info!(
            org_name = %self.org_name,
            app_name = %self.app_name,
            app_version = %self.app_version,
            to_keep = self.retention.to_keep(),
            dry_run = self.dry_run,
            api_base_url = %self.api_base_url,
            api_token = "<redacted>",
            http_timeout_secs = self.http_timeout.as_secs(),
            delete_burst = self.rate_budget.capacity,
            delete_interval_ms = u64::try_from(self.rate_budget.refill_interval.as_millis())
                .unwrap_or(u64::MAX),
            delete_max_pending = self.rate_budget.max_pending,
            "relprune configuration"
        );
    }
}

impl Debug for PurgeConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PurgeConfig")
            .field("org_name", &self.org_name)
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("api_token", &"<redacted>")
            .field("retention", &self.retention)
            .field("dry_run", &self.dry_run)
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout", &self.http_timeout)
            .field("rate_budget", &self.rate_budget)
            .finish()
    }
}

struct Settings<F> {
    lookup: F,
}

impl<F> Settings<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        [SETTING_PREFIX, ACTION_INPUT_PREFIX]
            .iter()
            .filter_map(|prefix| (self.lookup)(format!("{prefix}{name}").as_str()))
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> AppResult<NonEmptyString> {
        let value = self.optional(name).ok_or_else(|| {
            AppError::Validation(format!(
                "{name} is required (set {SETTING_PREFIX}{name} or {ACTION_INPUT_PREFIX}{name})"
            ))
        })?;
        NonEmptyString::new(value)
    }

    fn parse<T>(&self, name: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(name) {
            Some(value) => value.parse::<T>().map_err(|error| {
                AppError::Validation(format!("invalid {name} value '{value}': {error}"))
            }),
            None => Ok(default),
        }
    }
}

/// Accepts the YAML 1.2 core schema booleans used by GitHub Actions inputs.
fn parse_action_bool(name: &str, value: &str) -> AppResult<bool> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be one of true|True|TRUE|false|False|FALSE, got '{value}'"
        ))),
    }
}
