use std::sync::Arc;

use relprune_core::{AppResult, NonEmptyString};
use relprune_domain::{Release, ReleaseId, first_ordering_violation, matching_releases};
use tracing::{debug, warn};

use crate::ReleaseHost;

/// Lists releases of one application and narrows them to a version label.
#[derive(Clone)]
pub struct ReleaseLister {
    release_host: Arc<dyn ReleaseHost>,
}

impl ReleaseLister {
    /// Creates a lister over the given release host.
    #[must_use]
    pub fn new(release_host: Arc<dyn ReleaseHost>) -> Self {
        Self { release_host }
    }

    /// Returns ids of releases labelled exactly `target_version`, in host order.
    ///
    /// Host order is assumed newest-first. When every matching release carries
    /// an upload timestamp and the listing contradicts that assumption, a
    /// warning is logged; the order itself is never changed.
    pub async fn list_matching_releases(
        &self,
        target_version: &NonEmptyString,
    ) -> AppResult<Vec<ReleaseId>> {
        let releases = self.release_host.list_releases().await?;
        let listed = releases.len();
        let matching = matching_releases(releases, target_version.as_str());

        if let Some(position) = first_ordering_violation(&matching) {
            warn!(
                target_version = %target_version,
                position,
                "release listing is not newest-first; retention assumes host order"
            );
        }

        let release_ids = matching
            .iter()
            .map(Release::id)
            .cloned()
            .collect::<Vec<_>>();
        debug!(
            target_version = %target_version,
            listed,
            matching = release_ids.len(),
            "listed releases"
        );

        Ok(release_ids)
    }
}
