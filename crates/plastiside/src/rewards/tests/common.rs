use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::rewards::access::{AccessError, Authenticator};
use crate::rewards::domain::{
    Principal, Role, SettingsRecord, SubmissionId, SubmissionRecord, SubmissionStatus, UserId,
    UserRecord, UserStatus, Verdict,
};
use crate::rewards::ledger::SubmissionIntake;
use crate::rewards::repository::{
    LedgerCommit, RewardsStore, SettingsStore, StoreError, VerificationCommit,
};
use crate::rewards::router::RewardsStack;
use crate::rewards::scoring::{rank_for, RewardPolicy};

pub(super) const CITIZEN_TOKEN: &str = "citizen-token";
pub(super) const BUYER_TOKEN: &str = "buyer-token";
pub(super) const COLLECTOR_TOKEN: &str = "collector-token";
pub(super) const ADMIN_TOKEN: &str = "admin-token";
pub(super) const SUSPENDED_TOKEN: &str = "suspended-token";
pub(super) const GHOST_TOKEN: &str = "ghost-token";

pub(super) fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid seed time")
}

fn user(id: &str, role: Role, status: UserStatus, points: u64) -> UserRecord {
    UserRecord {
        id: UserId(id.to_string()),
        email: format!("{id}@example.org"),
        first_name: "Test".to_string(),
        last_name: id.to_string(),
        role,
        status,
        points,
        rank: rank_for(points),
        business_name: match role {
            Role::Collector => Some("Harbor Collection Co".to_string()),
            _ => None,
        },
        avatar: None,
        created_at: seeded_at(),
    }
}

pub(super) fn citizen() -> UserRecord {
    user("user-citizen", Role::Citizen, UserStatus::Active, 0)
}

pub(super) fn buyer() -> UserRecord {
    user("user-buyer", Role::Buyer, UserStatus::Active, 0)
}

pub(super) fn collector() -> UserRecord {
    user("user-collector", Role::Collector, UserStatus::Active, 0)
}

pub(super) fn admin() -> UserRecord {
    user("user-admin", Role::Admin, UserStatus::Active, 0)
}

pub(super) fn suspended_citizen() -> UserRecord {
    user("user-suspended", Role::Citizen, UserStatus::Suspended, 120)
}

pub(super) fn hdpe_intake() -> SubmissionIntake {
    SubmissionIntake {
        plastic_type: Some("HDPE".to_string()),
        weight_kg: Some(3.0),
        quantity: Some(2),
        location: Some("Center A".to_string()),
        description: None,
        photo: None,
    }
}

pub(super) fn pet_intake() -> SubmissionIntake {
    SubmissionIntake {
        plastic_type: Some("PET".to_string()),
        weight_kg: Some(2.0),
        quantity: Some(5),
        location: Some("Harbor drop-off".to_string()),
        description: Some("clean bottles".to_string()),
        photo: Some("/uploads/1-bottles.jpg".to_string()),
    }
}

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, UserRecord>,
    submissions: Vec<SubmissionRecord>,
    settings: Option<SettingsRecord>,
}

/// Single-mutex store over both tables, which makes the append-and-credit
/// and resolve-and-debit contracts trivially atomic.
#[derive(Default)]
pub(super) struct MemoryStore {
    state: Mutex<StoreState>,
}

impl RewardsStore for MemoryStore {
    fn insert_user(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.users.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.users.get(id).cloned())
    }

    fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut users: Vec<_> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(users)
    }

    fn set_user_status(&self, id: &UserId, status: UserStatus) -> Result<UserRecord, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let user = state.users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.status = status;
        Ok(user.clone())
    }

    fn append_submission(&self, record: SubmissionRecord) -> Result<LedgerCommit, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let owner = state
            .users
            .get_mut(&record.owner)
            .ok_or(StoreError::NotFound)?;
        owner.points += record.points_earned;
        owner.rank = rank_for(owner.points);
        let owner = owner.clone();
        state.submissions.push(record.clone());
        Ok(LedgerCommit {
            submission: record,
            owner,
        })
    }

    fn resolve_submission(
        &self,
        id: &SubmissionId,
        verdict: Verdict,
        reviewer: UserId,
        resolved_at: DateTime<Utc>,
        reclaim_points: bool,
    ) -> Result<VerificationCommit, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let position = state
            .submissions
            .iter()
            .position(|submission| submission.id == *id)
            .ok_or(StoreError::NotFound)?;
        if state.submissions[position].status != SubmissionStatus::Pending {
            return Err(StoreError::Conflict);
        }

        {
            let submission = &mut state.submissions[position];
            submission.status = verdict.status();
            submission.verified_by = Some(reviewer);
            submission.verified_at = Some(resolved_at);
        }
        let submission = state.submissions[position].clone();

        let owner = state
            .users
            .get_mut(&submission.owner)
            .ok_or(StoreError::NotFound)?;
        if reclaim_points {
            owner.points = owner.points.saturating_sub(submission.points_earned);
            owner.rank = rank_for(owner.points);
        }

        Ok(VerificationCommit {
            submission,
            owner: owner.clone(),
        })
    }

    fn submissions_for(&self, owner: &UserId) -> Result<Vec<SubmissionRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .submissions
            .iter()
            .rev()
            .filter(|submission| submission.owner == *owner)
            .cloned()
            .collect())
    }

    fn all_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.submissions.iter().rev().cloned().collect())
    }
}

impl SettingsStore for MemoryStore {
    fn fetch_settings(&self) -> Result<Option<SettingsRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.settings.clone())
    }

    fn save_settings(&self, settings: SettingsRecord) -> Result<SettingsRecord, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.settings = Some(settings.clone());
        Ok(settings)
    }
}

/// Store that is permanently offline, for internal-error mapping tests.
pub(super) struct UnavailableStore;

impl RewardsStore for UnavailableStore {
    fn insert_user(&self, _user: UserRecord) -> Result<UserRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_user(&self, _id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_user_status(&self, _id: &UserId, _status: UserStatus) -> Result<UserRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append_submission(&self, _record: SubmissionRecord) -> Result<LedgerCommit, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn resolve_submission(
        &self,
        _id: &SubmissionId,
        _verdict: Verdict,
        _reviewer: UserId,
        _resolved_at: DateTime<Utc>,
        _reclaim_points: bool,
    ) -> Result<VerificationCommit, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn submissions_for(&self, _owner: &UserId) -> Result<Vec<SubmissionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all_submissions(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

impl SettingsStore for UnavailableStore {
    fn fetch_settings(&self) -> Result<Option<SettingsRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn save_settings(&self, _settings: SettingsRecord) -> Result<SettingsRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Token-table authenticator standing in for the JWT boundary.
#[derive(Default)]
pub(super) struct StaticAuth {
    principals: HashMap<String, Principal>,
}

impl StaticAuth {
    pub(super) fn with_token(mut self, token: &str, id: &str, role: Role) -> Self {
        self.principals.insert(
            token.to_string(),
            Principal {
                id: UserId(id.to_string()),
                role,
            },
        );
        self
    }
}

impl Authenticator for StaticAuth {
    fn authenticate(&self, credential: &str) -> Result<Principal, AccessError> {
        self.principals
            .get(credential)
            .cloned()
            .ok_or(AccessError::Unauthenticated)
    }
}

pub(super) fn standard_auth() -> StaticAuth {
    StaticAuth::default()
        .with_token(CITIZEN_TOKEN, "user-citizen", Role::Citizen)
        .with_token(BUYER_TOKEN, "user-buyer", Role::Buyer)
        .with_token(COLLECTOR_TOKEN, "user-collector", Role::Collector)
        .with_token(ADMIN_TOKEN, "user-admin", Role::Admin)
        .with_token(SUSPENDED_TOKEN, "user-suspended", Role::Citizen)
        .with_token(GHOST_TOKEN, "user-ghost", Role::Citizen)
}

pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    for user in [citizen(), buyer(), collector(), admin(), suspended_citizen()] {
        store.insert_user(user).expect("seed user");
    }
    store
}

pub(super) fn build_stack(
    policy: RewardPolicy,
) -> (Arc<RewardsStack<StaticAuth, MemoryStore>>, Arc<MemoryStore>) {
    let store = seeded_store();
    let stack = Arc::new(RewardsStack::new(
        Arc::new(standard_auth()),
        store.clone(),
        policy,
    ));
    (stack, store)
}

pub(super) fn default_stack() -> (Arc<RewardsStack<StaticAuth, MemoryStore>>, Arc<MemoryStore>) {
    build_stack(RewardPolicy::default())
}
