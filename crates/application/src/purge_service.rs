use std::sync::Arc;

use futures::stream::{self, StreamExt};
use relprune_core::{AppResult, NonEmptyString};
use relprune_domain::{
    DeleteOutcome, PurgeSummary, ReleaseId, RetentionDecision, RetentionPolicy,
    format_release_ids,
};
use tracing::{debug, info, warn};

use crate::{RateBudget, RateBudgetConfig, ReleaseHost, ReleaseLister};

/// Parameters of one purge run.
#[derive(Debug, Clone)]
pub struct PurgeRequest {
    /// Version label whose releases are pruned.
    pub target_version: NonEmptyString,
    /// Number of newest matching releases to keep.
    pub retention: RetentionPolicy,
    /// Simulate deletes without calling the host.
    pub dry_run: bool,
}

/// Aggregate result of a purge run.
#[derive(Debug, Clone)]
pub struct PurgeReport {
    decision: RetentionDecision,
    outcomes: Vec<DeleteOutcome>,
    summary: PurgeSummary,
    dry_run: bool,
}

impl PurgeReport {
    fn without_deletes(decision: RetentionDecision, dry_run: bool) -> Self {
        Self {
            decision,
            outcomes: Vec::new(),
            summary: PurgeSummary::default(),
            dry_run,
        }
    }

    /// Returns the retention decision taken for the run.
    #[must_use]
    pub fn decision(&self) -> &RetentionDecision {
        &self.decision
    }

    /// Returns per-release outcomes in purge set order.
    #[must_use]
    pub fn outcomes(&self) -> &[DeleteOutcome] {
        self.outcomes.as_slice()
    }

    /// Returns the succeeded/failed partition.
    #[must_use]
    pub fn summary(&self) -> &PurgeSummary {
        &self.summary
    }

    /// Returns whether deletes were simulated.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the per-id result lines reported after real deletes.
    ///
    /// Dry runs report nothing here; every simulated delete succeeds.
    #[must_use]
    pub fn deletion_messages(&self) -> Vec<String> {
        if self.dry_run {
            return Vec::new();
        }

        let mut messages = Vec::new();
        if !self.summary.succeeded().is_empty() {
            messages.push(format!(
                "Successfully deleted releases: {}",
                format_release_ids(self.summary.succeeded())
            ));
        }
        if !self.summary.failed().is_empty() {
            messages.push(format!(
                "Failed to delete releases: {}",
                format_release_ids(self.summary.failed())
            ));
        }

        messages
    }

    /// Returns the terminal failure message when real deletes failed.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        self.summary
            .run_failed(self.dry_run)
            .then(|| format!("Failed to delete {} releases", self.summary.failed().len()))
    }
}

/// Lists matching releases, applies retention and deletes the surplus.
#[derive(Clone)]
pub struct PurgeService {
    release_lister: ReleaseLister,
    release_host: Arc<dyn ReleaseHost>,
    rate_budget_config: RateBudgetConfig,
}

impl PurgeService {
    /// Creates a purge service.
    #[must_use]
    pub fn new(release_host: Arc<dyn ReleaseHost>, rate_budget_config: RateBudgetConfig) -> Self {
        Self {
            release_lister: ReleaseLister::new(release_host.clone()),
            release_host,
            rate_budget_config,
        }
    }

    /// Runs one purge.
    ///
    /// Listing failures abort the run before any delete. Individual delete
    /// failures are captured in the report; check
    /// [`PurgeReport::failure_message`] for the run verdict.
    pub async fn run(&self, request: &PurgeRequest) -> AppResult<PurgeReport> {
        let candidates = self
            .release_lister
            .list_matching_releases(&request.target_version)
            .await?;

        let decision = RetentionDecision::decide(&candidates, request.retention);
        if let Some(message) = decision.message() {
            info!("{message}");
        }
        if !matches!(decision, RetentionDecision::Purge { .. }) {
            return Ok(PurgeReport::without_deletes(decision, request.dry_run));
        }

        let purge_set = decision.purge_set();
        debug!("Release IDs to purge: {}", format_release_ids(purge_set));

        let budget = RateBudget::new(self.rate_budget_config);
        let outcomes = self.purge_all(purge_set, request.dry_run, &budget).await;
        let summary = PurgeSummary::summarize(&outcomes);

        if !request.dry_run {
            for outcome in &outcomes {
                debug!(
                    release_id = %outcome.release_id(),
                    succeeded = outcome.is_success(),
                    "Delete result"
                );
            }
        }

        let report = PurgeReport {
            decision,
            outcomes,
            summary,
            dry_run: request.dry_run,
        };
        for message in report.deletion_messages() {
            info!("{message}");
        }
        info!("Action complete");

        Ok(report)
    }

    /// Deletes every id under `budget`, settling all outcomes.
    ///
    /// Deletes run concurrently once admitted by the budget. At most
    /// `budget.max_pending()` deletes are in flight, so none is turned away
    /// by a full wait queue. Outcomes are returned in `release_ids` order
    /// regardless of completion order.
    pub async fn purge_all(
        &self,
        release_ids: &[ReleaseId],
        dry_run: bool,
        budget: &RateBudget,
    ) -> Vec<DeleteOutcome> {
        stream::iter(
            release_ids
                .iter()
                .map(|release_id| self.purge_one(release_id, dry_run, budget)),
        )
        .buffered(budget.max_pending().max(1))
        .collect()
        .await
    }

    async fn purge_one(
        &self,
        release_id: &ReleaseId,
        dry_run: bool,
        budget: &RateBudget,
    ) -> DeleteOutcome {
        if let Err(error) = budget.acquire().await {
            warn!(release_id = %release_id, error = %error, "release delete was not admitted");
            return DeleteOutcome::Failed {
                release_id: release_id.clone(),
                error,
            };
        }

        if dry_run {
            debug!("Dry run, not purging releaseId={release_id}");
            return DeleteOutcome::Succeeded(release_id.clone());
        }

        debug!("Purging releaseId={release_id}");
        match self.release_host.delete_release(release_id).await {
            Ok(()) => DeleteOutcome::Succeeded(release_id.clone()),
            Err(error) => {
                warn!(release_id = %release_id, error = %error, "release delete failed");
                DeleteOutcome::Failed {
                    release_id: release_id.clone(),
                    error,
                }
            }
        }
    }
}
