use relprune_core::AppError;

use crate::release::ReleaseId;

/// Result of one delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The release was deleted, or the delete was simulated.
    Succeeded(ReleaseId),
    /// The delete did not go through.
    Failed {
        /// Release that could not be deleted.
        release_id: ReleaseId,
        /// Failure detail.
        error: AppError,
    },
}

impl DeleteOutcome {
    /// Returns the release the outcome refers to.
    #[must_use]
    pub fn release_id(&self) -> &ReleaseId {
        match self {
            Self::Succeeded(release_id) | Self::Failed { release_id, .. } => release_id,
        }
    }

    /// Returns true for a successful or simulated delete.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Succeeded and failed ids partitioned from a batch of delete outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    succeeded: Vec<ReleaseId>,
    failed: Vec<ReleaseId>,
}

impl PurgeSummary {
    /// Partitions outcomes, preserving encounter order within each side.
    #[must_use]
    pub fn summarize(outcomes: &[DeleteOutcome]) -> Self {
        let (succeeded, failed): (Vec<_>, Vec<_>) =
            outcomes.iter().partition(|outcome| outcome.is_success());

        Self {
            succeeded: succeeded
                .into_iter()
                .map(|outcome| outcome.release_id().clone())
                .collect(),
            failed: failed
                .into_iter()
                .map(|outcome| outcome.release_id().clone())
                .collect(),
        }
    }

    /// Returns ids whose delete succeeded.
    #[must_use]
    pub fn succeeded(&self) -> &[ReleaseId] {
        self.succeeded.as_slice()
    }

    /// Returns ids whose delete failed.
    #[must_use]
    pub fn failed(&self) -> &[ReleaseId] {
        self.failed.as_slice()
    }

    /// A run fails only for real deletes that did not go through.
    #[must_use]
    pub fn run_failed(&self, dry_run: bool) -> bool {
        !dry_run && !self.failed.is_empty()
    }
}
