//! Application services and ports.

#![forbid(unsafe_code)]

mod purge_service;
mod rate_budget;
mod release_host_ports;
mod release_lister;

#[cfg(test)]
mod test_support;

pub use purge_service::{PurgeReport, PurgeRequest, PurgeService};
pub use rate_budget::{RateBudget, RateBudgetConfig};
pub use release_host_ports::ReleaseHost;
pub use release_lister::ReleaseLister;
