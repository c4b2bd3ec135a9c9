//! Points and ranking ledger for citizen plastic-waste submissions.
//!
//! Everything privileged routes through the [`access::AccessGate`] before it
//! reaches a service; user point totals change only inside the store actions
//! issued by the [`ledger::SubmissionLedger`] and, under the reclaim policy,
//! the [`verification::VerificationDesk`].

pub mod access;
pub mod analytics;
pub mod directory;
pub mod domain;
pub mod ledger;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod settings;
pub mod verification;

#[cfg(test)]
mod tests;

pub use access::{AccessError, AccessGate, Authenticator, Operation};
pub use analytics::{AnalyticsError, AnalyticsService, AnalyticsSnapshot, PlasticTypeBreakdown};
pub use directory::{DirectoryError, UserDirectory};
pub use domain::{
    PlasticType, Principal, PublicSettings, RankTier, Role, SettingsRecord, SubmissionId,
    SubmissionOverview, SubmissionRecord, SubmissionStatus, UserId, UserRecord, UserStatus,
    UserSummary, Verdict,
};
pub use ledger::{LedgerError, SubmissionIntake, SubmissionLedger};
pub use repository::{
    BlobError, BlobRef, BlobStore, LedgerCommit, RewardsStore, SettingsStore, StoreError,
    VerificationCommit,
};
pub use router::{bearer_token, rewards_router, RewardsStack};
pub use scoring::{multiplier_for, points_for, rank_for, RewardPolicy};
pub use settings::{SettingsDesk, SettingsError, SettingsPatch};
pub use verification::{VerificationDesk, VerificationError};
