use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::access::{AccessError, AccessGate, Authenticator, Operation};
use super::domain::{
    PlasticType, SubmissionId, SubmissionOverview, SubmissionRecord, SubmissionStatus, UserId,
};
use super::repository::{LedgerCommit, RewardsStore, StoreError};
use super::scoring;

/// Intake payload for a new waste submission. Required fields arrive as
/// options so that absence surfaces as a validation error rather than a
/// transport-level rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionIntake {
    #[serde(default)]
    pub plastic_type: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

struct ValidIntake {
    plastic_type: PlasticType,
    weight_kg: f64,
    quantity: u32,
    location: String,
    description: Option<String>,
    photo: Option<String>,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

/// The only entry point through which user points change. Creating a
/// submission scores it, persists it pending, and credits the owner in one
/// store action; nothing else on the platform touches the point total.
pub struct SubmissionLedger<A, S> {
    gate: Arc<AccessGate<A, S>>,
    store: Arc<S>,
}

impl<A, S> SubmissionLedger<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + 'static,
{
    pub fn new(gate: Arc<AccessGate<A, S>>, store: Arc<S>) -> Self {
        Self { gate, store }
    }

    /// Record a new submission for the authenticated owner. Points are
    /// granted immediately and are not contingent on later verification.
    pub fn submit(
        &self,
        credential: Option<&str>,
        intake: SubmissionIntake,
    ) -> Result<LedgerCommit, LedgerError> {
        let owner = self
            .gate
            .authorize(credential, Operation::CreateSubmission)?;

        let intake = validate_intake(intake)?;

        let points_earned =
            scoring::points_for(intake.plastic_type, intake.weight_kg, intake.quantity);

        let record = SubmissionRecord {
            id: next_submission_id(),
            owner: owner.id,
            plastic_type: intake.plastic_type,
            weight_kg: intake.weight_kg,
            quantity: intake.quantity,
            location: intake.location,
            description: intake.description,
            photo: intake.photo,
            points_earned,
            status: SubmissionStatus::Pending,
            verified_by: None,
            verified_at: None,
            created_at: Utc::now(),
        };

        let commit = self.store.append_submission(record)?;
        Ok(commit)
    }

    /// The caller's own submissions, newest first.
    pub fn own_submissions(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, LedgerError> {
        let owner = self
            .gate
            .authorize(credential, Operation::ListOwnSubmissions)?;
        let submissions = self.store.submissions_for(&owner.id)?;
        Ok(submissions)
    }

    /// Every submission on the platform joined with its owner, newest
    /// first. Administrators only.
    pub fn all_submissions(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<SubmissionOverview>, LedgerError> {
        self.gate
            .authorize(credential, Operation::ListAllSubmissions)?;

        let owners: HashMap<UserId, _> = self
            .store
            .list_users()?
            .into_iter()
            .map(|user| (user.id.clone(), user.summary()))
            .collect();

        let overviews = self
            .store
            .all_submissions()?
            .into_iter()
            .map(|submission| {
                let owner_summary = owners.get(&submission.owner).cloned();
                SubmissionOverview {
                    submission,
                    owner_summary,
                }
            })
            .collect();

        Ok(overviews)
    }
}

fn validate_intake(intake: SubmissionIntake) -> Result<ValidIntake, LedgerError> {
    let missing = |field: &str| LedgerError::Validation(format!("{field} is required"));

    let plastic_type = intake
        .plastic_type
        .as_deref()
        .filter(|label| !label.trim().is_empty())
        .map(PlasticType::from_label)
        .ok_or_else(|| missing("plastic_type"))?;
    let weight_kg = intake.weight_kg.ok_or_else(|| missing("weight_kg"))?;
    let quantity = intake.quantity.ok_or_else(|| missing("quantity"))?;
    let location = intake
        .location
        .map(|location| location.trim().to_string())
        .filter(|location| !location.is_empty())
        .ok_or_else(|| missing("location"))?;

    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(LedgerError::Validation(
            "weight_kg must be a positive number of kilograms".to_string(),
        ));
    }
    if quantity == 0 {
        return Err(LedgerError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    Ok(ValidIntake {
        plastic_type,
        weight_kg,
        quantity,
        location,
        description: intake.description,
        photo: intake.photo,
    })
}

/// Error raised by the submission ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid submission: {0}")]
    Validation(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
