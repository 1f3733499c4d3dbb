use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use relprune_core::{AppError, AppResult};
use relprune_domain::{Release, ReleaseId};

use crate::ReleaseHost;

/// In-process release host with scripted failures.
#[derive(Default)]
pub(crate) struct FakeReleaseHost {
    pub(crate) releases: Vec<Release>,
    pub(crate) list_error: Option<AppError>,
    pub(crate) failing_deletes: HashSet<ReleaseId>,
    pub(crate) list_calls: Mutex<usize>,
    pub(crate) deleted: Mutex<Vec<ReleaseId>>,
    pub(crate) delete_attempts: Mutex<usize>,
}

impl FakeReleaseHost {
    pub(crate) fn with_versions(entries: &[(&str, &str)]) -> Self {
        Self {
            releases: entries
                .iter()
                .map(|(id, version)| Release::new(*id, *version))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_on(mut self, release_ids: &[&str]) -> Self {
        self.failing_deletes = release_ids.iter().copied().map(ReleaseId::from).collect();
        self
    }
}

#[async_trait]
impl ReleaseHost for FakeReleaseHost {
    async fn list_releases(&self) -> AppResult<Vec<Release>> {
        *self.list_calls.lock().await += 1;
        match &self.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.releases.clone()),
        }
    }

    async fn delete_release(&self, release_id: &ReleaseId) -> AppResult<()> {
        *self.delete_attempts.lock().await += 1;
        if self.failing_deletes.contains(release_id) {
            return Err(AppError::http_status(500, "Internal Server Error"));
        }

        self.deleted.lock().await.push(release_id.clone());
        Ok(())
    }
}

pub(crate) fn ids(values: &[&str]) -> Vec<ReleaseId> {
    values.iter().copied().map(ReleaseId::from).collect()
}
