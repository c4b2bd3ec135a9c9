use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::access::{AccessError, AccessGate, Authenticator, Operation};
use super::domain::PlasticType;
use super::repository::{RewardsStore, StoreError};

/// Platform-wide rollups for the admin dashboard. Every figure is computed
/// fresh from the store on each call; nothing is cached or maintained
/// incrementally.
pub struct AnalyticsService<A, S> {
    gate: Arc<AccessGate<A, S>>,
    store: Arc<S>,
}

/// One dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_users: u64,
    pub total_submissions: u64,
    pub total_points_distributed: u64,
    pub submissions_by_type: Vec<PlasticTypeBreakdown>,
}

/// Aggregate line for one plastic category. Categories without submissions
/// do not appear at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlasticTypeBreakdown {
    pub plastic_type: PlasticType,
    pub total_weight_kg: f64,
    pub submission_count: u64,
}

impl<A, S> AnalyticsService<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + 'static,
{
    pub fn new(gate: Arc<AccessGate<A, S>>, store: Arc<S>) -> Self {
        Self { gate, store }
    }

    pub fn report(&self, credential: Option<&str>) -> Result<AnalyticsSnapshot, AnalyticsError> {
        self.gate.authorize(credential, Operation::ViewAnalytics)?;

        let users = self.store.list_users()?;
        let submissions = self.store.all_submissions()?;

        let total_points_distributed = users.iter().map(|user| user.points).sum();

        let mut by_type: BTreeMap<PlasticType, (f64, u64)> = BTreeMap::new();
        for submission in &submissions {
            let entry = by_type.entry(submission.plastic_type).or_insert((0.0, 0));
            entry.0 += submission.weight_kg;
            entry.1 += 1;
        }

        let submissions_by_type = by_type
            .into_iter()
            .map(
                |(plastic_type, (total_weight_kg, submission_count))| PlasticTypeBreakdown {
                    plastic_type,
                    total_weight_kg,
                    submission_count,
                },
            )
            .collect();

        Ok(AnalyticsSnapshot {
            total_users: users.len() as u64,
            total_submissions: submissions.len() as u64,
            total_points_distributed,
            submissions_by_type,
        })
    }

    /// Render every submission as CSV for offline reporting, newest first.
    pub fn export_submissions_csv(
        &self,
        credential: Option<&str>,
    ) -> Result<String, AnalyticsError> {
        self.gate
            .authorize(credential, Operation::ExportSubmissions)?;

        let submissions = self.store.all_submissions()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "submission_id",
            "owner_id",
            "plastic_type",
            "weight_kg",
            "quantity",
            "points_earned",
            "status",
            "created_at",
        ])?;

        for submission in &submissions {
            let weight = submission.weight_kg.to_string();
            let quantity = submission.quantity.to_string();
            let points = submission.points_earned.to_string();
            let created = submission.created_at.to_rfc3339();
            writer.write_record([
                submission.id.0.as_str(),
                submission.owner.0.as_str(),
                submission.plastic_type.label(),
                weight.as_str(),
                quantity.as_str(),
                points.as_str(),
                submission.status.label(),
                created.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| AnalyticsError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| AnalyticsError::Export(err.to_string()))
    }
}

/// Error raised by the analytics service.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to render export: {0}")]
    Export(String),
}

impl From<csv::Error> for AnalyticsError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value.to_string())
    }
}
