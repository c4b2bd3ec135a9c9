use std::sync::Arc;

use chrono::Utc;

use super::access::{AccessError, AccessGate, Authenticator, Operation};
use super::domain::{SubmissionId, Verdict};
use super::repository::{RewardsStore, StoreError, VerificationCommit};
use super::scoring::RewardPolicy;

/// Review queue for pending submissions. A submission leaves `pending`
/// exactly once; the reviewer and timestamp are stamped on that transition
/// and the record is immutable afterwards.
pub struct VerificationDesk<A, S> {
    gate: Arc<AccessGate<A, S>>,
    store: Arc<S>,
    policy: RewardPolicy,
}

impl<A, S> VerificationDesk<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + 'static,
{
    pub fn new(gate: Arc<AccessGate<A, S>>, store: Arc<S>, policy: RewardPolicy) -> Self {
        Self {
            gate,
            store,
            policy,
        }
    }

    /// Confirm or reject a pending submission. Whether rejection debits the
    /// points it granted is governed by [`RewardPolicy::reclaim_rejected`];
    /// the default keeps them.
    pub fn resolve(
        &self,
        credential: Option<&str>,
        submission_id: &SubmissionId,
        verdict_label: &str,
    ) -> Result<VerificationCommit, VerificationError> {
        let reviewer = self
            .gate
            .authorize(credential, Operation::ResolveSubmission)?;

        let verdict = Verdict::from_label(verdict_label).ok_or_else(|| {
            VerificationError::Validation(format!(
                "status must be 'verified' or 'rejected', got '{verdict_label}'"
            ))
        })?;

        let reclaim = self.policy.reclaim_rejected && verdict == Verdict::Rejected;

        match self
            .store
            .resolve_submission(submission_id, verdict, reviewer.id, Utc::now(), reclaim)
        {
            Ok(commit) => Ok(commit),
            Err(StoreError::NotFound) => Err(VerificationError::NotFound),
            Err(StoreError::Conflict) => Err(VerificationError::AlreadyResolved),
            Err(other) => Err(VerificationError::Store(other)),
        }
    }
}

/// Error raised by the verification desk.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid verdict: {0}")]
    Validation(String),
    #[error("submission not found")]
    NotFound,
    #[error("submission has already been resolved")]
    AlreadyResolved,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(StoreError),
}
