use std::time::Duration;

use async_trait::async_trait;
use relprune_application::ReleaseHost;
use relprune_core::{AppError, AppResult, NonEmptyString};
use relprune_domain::{Release, ReleaseId};
use reqwest::header;
use tracing::debug;

use crate::AppCenterEndpoint;

const API_TOKEN_HEADER: &str = "X-API-Token";

/// Builds the shared HTTP client used for release host calls.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("relprune/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
}

/// HTTP-based release host backed by the App Center REST API.
pub struct HttpAppCenterReleaseHost {
    http_client: reqwest::Client,
    endpoint: AppCenterEndpoint,
    api_token: NonEmptyString,
}

impl HttpAppCenterReleaseHost {
    /// Creates a release host for one application endpoint.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        endpoint: AppCenterEndpoint,
        api_token: NonEmptyString,
    ) -> Self {
        Self {
            http_client,
            endpoint,
            api_token,
        }
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header(API_TOKEN_HEADER, self.api_token.as_str())
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = builder.send().await.map_err(|error| {
            AppError::connection(format!("release host request failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl ReleaseHost for HttpAppCenterReleaseHost {
    async fn list_releases(&self) -> AppResult<Vec<Release>> {
        let url = self.endpoint.releases_url().clone();
        debug!(url = %url, "listing releases");

        let response = self.send(self.request(reqwest::Method::GET, url)).await?;
        let body = response.bytes().await.map_err(|error| {
            AppError::connection(format!("failed to read release listing body: {error}"))
        })?;

        serde_json::from_slice::<Vec<Release>>(&body).map_err(|error| {
            AppError::MalformedResponse(format!(
                "release listing is not a release collection: {error}"
            ))
        })
    }

    async fn delete_release(&self, release_id: &ReleaseId) -> AppResult<()> {
        let url = self.endpoint.release_url(release_id);
        self.send(self.request(reqwest::Method::DELETE, url))
            .await
            .map(|_| ())
    }
}
