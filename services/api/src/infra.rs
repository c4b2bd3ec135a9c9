use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use plastiside::rewards::{
    rank_for, AccessError, Authenticator, BlobError, BlobRef, BlobStore, LedgerCommit, Principal,
    RewardsStore, Role, SettingsRecord, SettingsStore, StoreError, SubmissionId, SubmissionRecord,
    SubmissionStatus, UserId, UserRecord, UserStatus, Verdict, VerificationCommit,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, UserRecord>,
    submissions: Vec<SubmissionRecord>,
    settings: Option<SettingsRecord>,
}

/// Process-local datastore. One mutex spans both tables, which keeps the
/// append-and-credit and resolve-and-debit store contracts atomic; a
/// SQL-backed implementation would use one transaction per method instead.
#[derive(Default)]
pub(crate) struct InMemoryRewardsStore {
    state: Mutex<StoreState>,
}

impl RewardsStore for InMemoryRewardsStore {
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

impl SettingsStore for InMemoryRewardsStore {
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

/// Token-table authenticator standing in for the upstream credential
/// verifier. The stored role still decides what each principal may do.
#[derive(Default)]
pub(crate) struct StaticTokenAuthenticator {
    principals: HashMap<String, Principal>,
}

impl StaticTokenAuthenticator {
    pub(crate) fn with_token(mut self, token: &str, user_id: &str, role: Role) -> Self {
        self.principals.insert(
            token.to_string(),
            Principal {
                id: UserId(user_id.to_string()),
                role,
            },
        );
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, credential: &str) -> Result<Principal, AccessError> {
        self.principals
            .get(credential)
            .cloned()
            .ok_or(AccessError::Unauthenticated)
    }
}

/// Keeps uploaded photo and logo bytes in memory and hands out stable refs.
#[derive(Default)]
pub(crate) struct InMemoryBlobStore {
    objects: Mutex<Vec<StoredBlob>>,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredBlob {
    pub(crate) url: String,
    pub(crate) content_type: String,
    pub(crate) size: usize,
}

impl InMemoryBlobStore {
    pub(crate) fn objects(&self) -> Vec<StoredBlob> {
        self.objects.lock().expect("blob mutex poisoned").clone()
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl BlobStore for InMemoryBlobStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<BlobRef, BlobError> {
        let mut objects = self.objects.lock().expect("blob mutex poisoned");
        let content_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let url = format!(
            "/uploads/{}-{}",
            objects.len() + 1,
            sanitize_file_name(name)
        );
        objects.push(StoredBlob {
            url: url.clone(),
            content_type: content_type.clone(),
            size: bytes.len(),
        });
        Ok(BlobRef { url, content_type })
    }
}

pub(crate) const CITIZEN_TOKEN: &str = "citizen-token";
pub(crate) const BUYER_TOKEN: &str = "buyer-token";
pub(crate) const COLLECTOR_TOKEN: &str = "collector-token";
pub(crate) const ADMIN_TOKEN: &str = "admin-token";

pub(crate) fn demo_authenticator() -> StaticTokenAuthenticator {
    StaticTokenAuthenticator::default()
        .with_token(CITIZEN_TOKEN, "user-citizen", Role::Citizen)
        .with_token(BUYER_TOKEN, "user-buyer", Role::Buyer)
        .with_token(COLLECTOR_TOKEN, "user-collector", Role::Collector)
        .with_token(ADMIN_TOKEN, "user-admin", Role::Admin)
}

fn demo_user(
    id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
    business_name: Option<&str>,
) -> UserRecord {
    UserRecord {
        id: UserId(id.to_string()),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
        status: UserStatus::Active,
        points: 0,
        rank: rank_for(0),
        business_name: business_name.map(str::to_string),
        avatar: None,
        created_at: Utc::now(),
    }
}

/// Seeds the well-known accounts used by `serve` outside production and by
/// the CLI demo.
pub(crate) fn seed_demo_users(store: &InMemoryRewardsStore) -> Result<(), StoreError> {
    let users = [
        demo_user(
            "user-citizen",
            "amina@example.org",
            "Amina",
            "Diallo",
            Role::Citizen,
            None,
        ),
        demo_user(
            "user-buyer",
            "ravi@example.org",
            "Ravi",
            "Patel",
            Role::Buyer,
            None,
        ),
        demo_user(
            "user-collector",
            "lena@example.org",
            "Lena",
            "Fischer",
            Role::Collector,
            Some("Harborside Collection"),
        ),
        demo_user(
            "user-admin",
            "sofia@example.org",
            "Sofia",
            "Marques",
            Role::Admin,
            None,
        ),
    ];
    for user in users {
        store.insert_user(user)?;
    }
    Ok(())
}
