//! Retention policy and purge set selection.
//!
//! Candidates are expected newest-first, as listed by the release host. The
//! first `to_keep` entries survive; everything after them is purged.

use relprune_core::{AppError, AppResult};

use crate::release::ReleaseId;

/// Number of newest matching releases to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    to_keep: usize,
}

impl RetentionPolicy {
    /// Creates a retention policy keeping `to_keep` releases.
    #[must_use]
    pub fn new(to_keep: usize) -> Self {
        Self { to_keep }
    }

    /// Creates a retention policy from a signed input, rejecting negatives.
    pub fn from_signed(to_keep: i64) -> AppResult<Self> {
        usize::try_from(to_keep).map(Self::new).map_err(|_| {
            AppError::Validation(format!(
                "to_keep must be a non-negative integer, got {to_keep}"
            ))
        })
    }

    /// Returns the retention count.
    #[must_use]
    pub fn to_keep(&self) -> usize {
        self.to_keep
    }
}

/// Outcome of applying a retention policy to a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionDecision {
    /// No release matched the target version.
    NothingToPurge,
    /// Fewer matching releases exist than the policy keeps.
    FloorNotReached {
        /// Matching release count.
        rows: usize,
        /// Retention count.
        to_keep: usize,
    },
    /// Releases past the retention floor are to be deleted.
    Purge {
        /// Release ids to delete, in candidate order.
        release_ids: Vec<ReleaseId>,
        /// Set when the policy keeps nothing.
        full_purge: bool,
    },
}

impl RetentionDecision {
    /// Applies `policy` to newest-first `candidates`.
    #[must_use]
    pub fn decide(candidates: &[ReleaseId], policy: RetentionPolicy) -> Self {
        if candidates.is_empty() {
            return Self::NothingToPurge;
        }

        if candidates.len() < policy.to_keep() {
            return Self::FloorNotReached {
                rows: candidates.len(),
                to_keep: policy.to_keep(),
            };
        }

        Self::Purge {
            release_ids: select_purge_set(candidates, policy.to_keep()),
            full_purge: policy.to_keep() == 0,
        }
    }

    /// Returns the informational line reported for the decision, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NothingToPurge => Some("No releases to purge".to_owned()),
            Self::FloorNotReached { rows, to_keep } => Some(format!(
                "Minimum \"toKeep\" rows already exist, rows={rows}, toKeep={to_keep}"
            )),
            Self::Purge {
                full_purge: true, ..
            } => Some("All rows will be purged!".to_owned()),
            Self::Purge { .. } => None,
        }
    }

    /// Returns the ids selected for deletion; empty for the no-op variants.
    #[must_use]
    pub fn purge_set(&self) -> &[ReleaseId] {
        match self {
            Self::Purge { release_ids, .. } => release_ids.as_slice(),
            Self::NothingToPurge | Self::FloorNotReached { .. } => &[],
        }
    }
}

/// Drops the first `to_keep` candidates and returns the rest in order.
#[must_use]
pub fn select_purge_set(candidates: &[ReleaseId], to_keep: usize) -> Vec<ReleaseId> {
    candidates.iter().skip(to_keep).cloned().collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ids(values: &[&str]) -> Vec<ReleaseId> {
        values.iter().copied().map(ReleaseId::from).collect()
    }

    #[test]
    fn negative_retention_is_rejected() {
        assert!(matches!(
            RetentionPolicy::from_signed(-1),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            RetentionPolicy::from_signed(3).ok(),
            Some(RetentionPolicy::new(3))
        );
    }

    #[test]
    fn empty_candidates_mean_nothing_to_purge() {
        let decision = RetentionDecision::decide(&[], RetentionPolicy::new(2));
        assert_eq!(decision, RetentionDecision::NothingToPurge);
        assert!(decision.purge_set().is_empty());
    }

    #[test]
    fn keeps_newest_and_purges_the_tail() {
        let candidates = ids(&["r1", "r2", "r3", "r4", "r5"]);
        let decision = RetentionDecision::decide(&candidates, RetentionPolicy::new(3));
        assert_eq!(
            decision,
            RetentionDecision::Purge {
                release_ids: ids(&["r4", "r5"]),
                full_purge: false,
            }
        );
    }

    #[test]
    fn floor_not_reached_purges_nothing() {
        let candidates = ids(&["r1", "r2"]);
        let decision = RetentionDecision::decide(&candidates, RetentionPolicy::new(5));
        assert_eq!(
            decision,
            RetentionDecision::FloorNotReached {
                rows: 2,
                to_keep: 5,
            }
        );
    }

    #[test]
    fn zero_retention_is_a_full_purge() {
        let candidates = ids(&["r1", "r2"]);
        let decision = RetentionDecision::decide(&candidates, RetentionPolicy::default());
        assert_eq!(
            decision,
            RetentionDecision::Purge {
                release_ids: candidates,
                full_purge: true,
            }
        );
    }

    #[test]
    fn decisions_report_their_message() {
        assert_eq!(
            RetentionDecision::NothingToPurge.message().as_deref(),
            Some("No releases to purge")
        );
        assert_eq!(
            RetentionDecision::FloorNotReached {
                rows: 2,
                to_keep: 5,
            }
            .message()
            .as_deref(),
            Some("Minimum \"toKeep\" rows already exist, rows=2, toKeep=5")
        );
        assert_eq!(
            RetentionDecision::decide(&ids(&["r1"]), RetentionPolicy::default())
                .message()
                .as_deref(),
            Some("All rows will be purged!")
        );
        assert_eq!(
            RetentionDecision::decide(&ids(&["r1", "r2"]), RetentionPolicy::new(1)).message(),
            None
        );
    }

    #[test]
    fn exactly_at_floor_yields_empty_purge() {
        let candidates = ids(&["r1", "r2", "r3"]);
        let decision = RetentionDecision::decide(&candidates, RetentionPolicy::new(3));
        assert!(matches!(decision, RetentionDecision::Purge { .. }));
        assert!(decision.purge_set().is_empty());
    }

    proptest! {
        #[test]
        fn purge_set_is_the_suffix_after_kept(
            values in proptest::collection::vec("[a-z0-9]{1,6}", 0..40),
            to_keep in 0_usize..50,
        ) {
            let candidates = values.iter().map(|value| ReleaseId::new(value.as_str())).collect::<Vec<_>>();
            let purge = select_purge_set(&candidates, to_keep);

            prop_assert_eq!(purge.len(), candidates.len().saturating_sub(to_keep));
            prop_assert_eq!(purge.as_slice(), &candidates[to_keep.min(candidates.len())..]);
        }

        #[test]
        fn empty_candidates_never_purge(to_keep in 0_usize..1000) {
            prop_assert!(select_purge_set(&[], to_keep).is_empty());
        }

        #[test]
        fn zero_retention_returns_input(
            values in proptest::collection::vec("[a-z0-9]{1,6}", 0..40),
        ) {
            let candidates = values.iter().map(|value| ReleaseId::new(value.as_str())).collect::<Vec<_>>();
            prop_assert_eq!(select_purge_set(&candidates, 0), candidates);
        }

        #[test]
        fn decision_purge_set_matches_selection(
            count in 0_usize..30,
            to_keep in 0_usize..40,
        ) {
            let candidates = (0..count as u64).map(ReleaseId::from).collect::<Vec<_>>();
            let decision = RetentionDecision::decide(&candidates, RetentionPolicy::new(to_keep));
            let expected = select_purge_set(&candidates, to_keep);
            prop_assert_eq!(decision.purge_set(), expected.as_slice());
        }
    }
}
