use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    SettingsRecord, SubmissionId, SubmissionRecord, UserId, UserRecord, UserStatus, Verdict,
};

/// Result of the atomic submission append: the stored row plus the owner as
/// credited and re-ranked by the same action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerCommit {
    pub submission: SubmissionRecord,
    pub owner: UserRecord,
}

/// Result of resolving a submission. `owner` reflects any points debit the
/// store applied as part of the transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationCommit {
    pub submission: SubmissionRecord,
    pub owner: UserRecord,
}

/// Storage abstraction over the user and submission tables.
///
/// Implementations are expected to back each method with a single
/// transaction. In particular `append_submission` must insert the row,
/// credit `points_earned` to the owner, and refresh the stored rank via
/// [`super::scoring::rank_for`] as one atomic action, and
/// `resolve_submission` must apply the status transition (and the optional
/// points debit) the same way.
pub trait RewardsStore: Send + Sync {
    fn insert_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;
    fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;
    fn set_user_status(&self, id: &UserId, status: UserStatus) -> Result<UserRecord, StoreError>;

    /// Inserts a pending submission and credits its owner atomically.
    /// Fails with `NotFound` when the owner does not exist.
    fn append_submission(&self, record: SubmissionRecord) -> Result<LedgerCommit, StoreError>;

    /// Moves a submission out of `pending`, stamping the reviewer and
    /// timestamp. Fails with `NotFound` for unknown ids and `Conflict` when
    /// the submission has already been resolved. When `reclaim_points` is
    /// set and the verdict is a rejection, the owner is debited the
    /// submission's `points_earned` (saturating at zero) and re-ranked
    /// within the same action.
    fn resolve_submission(
        &self,
        id: &SubmissionId,
        verdict: Verdict,
        reviewer: UserId,
        resolved_at: DateTime<Utc>,
        reclaim_points: bool,
    ) -> Result<VerificationCommit, StoreError>;

    /// All submissions owned by `owner`, newest first.
    fn submissions_for(&self, owner: &UserId) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Every submission on the platform, newest first.
    fn all_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError>;
}

/// Storage for the singleton admin settings record.
pub trait SettingsStore: Send + Sync {
    fn fetch_settings(&self) -> Result<Option<SettingsRecord>, StoreError>;
    fn save_settings(&self, settings: SettingsRecord) -> Result<SettingsRecord, StoreError>;
}

/// Error enumeration for datastore failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Reference to externally stored binary content. The ledger keeps the
/// reference only; bytes never enter the datastore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub url: String,
    pub content_type: String,
}

/// Opaque binary storage for submission photos, avatars, and logos.
pub trait BlobStore: Send + Sync {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<BlobRef, BlobError>;
}

/// Blob storage failure.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob storage unavailable: {0}")]
    Unavailable(String),
}
