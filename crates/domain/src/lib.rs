//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod outcome;
mod release;
mod retention;

pub use outcome::{DeleteOutcome, PurgeSummary};
pub use release::{
    Release, ReleaseId, first_ordering_violation, format_release_ids, matching_releases,
};
pub use retention::{RetentionDecision, RetentionPolicy, select_purge_set};
