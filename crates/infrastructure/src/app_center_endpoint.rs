use relprune_core::{AppError, AppResult, NonEmptyString};
use relprune_domain::ReleaseId;
use url::Url;

/// Public App Center API root.
pub const APP_CENTER_API_BASE_URL: &str = "https://api.appcenter.ms";

/// Release collection URL of one App Center application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCenterEndpoint {
    releases_url: Url,
}

impl AppCenterEndpoint {
    /// Builds `{api_base_url}/v0.1/apps/{org_name}/{app_name}/releases`.
    ///
    /// Organization and application names are percent-encoded as path
    /// segments.
    pub fn new(
        api_base_url: &str,
        org_name: &NonEmptyString,
        app_name: &NonEmptyString,
    ) -> AppResult<Self> {
        let mut releases_url = Url::parse(api_base_url).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{api_base_url}': {error}"))
        })?;

        releases_url
            .path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "API base URL '{api_base_url}' cannot carry a path"
                ))
            })?
            .pop_if_empty()
            .extend([
                "v0.1",
                "apps",
                org_name.as_str(),
                app_name.as_str(),
                "releases",
            ]);

        Ok(Self { releases_url })
    }

    /// Returns the release listing URL.
    #[must_use]
    pub fn releases_url(&self) -> &Url {
        &self.releases_url
    }

    /// Returns the URL addressing one release.
    #[must_use]
    pub fn release_url(&self, release_id: &ReleaseId) -> Url {
        let mut release_url = self.releases_url.clone();
        if let Ok(mut segments) = release_url.path_segments_mut() {
            segments.push(release_id.as_str());
        }

        release_url
    }
}
