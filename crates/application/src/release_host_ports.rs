use async_trait::async_trait;
use relprune_core::AppResult;
use relprune_domain::{Release, ReleaseId};

/// Port for the release hosting API of one application.
///
/// Implementations are bound to a single organization and application at
/// construction.
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Lists every release of the application in host order (newest first).
    ///
    /// Fails with `AppError::Transport` on network or status failures and with
    /// `AppError::MalformedResponse` when the payload is not a release list.
    async fn list_releases(&self) -> AppResult<Vec<Release>>;

    /// Deletes one release.
    async fn delete_release(&self, release_id: &ReleaseId) -> AppResult<()>;
}
