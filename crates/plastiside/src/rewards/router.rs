use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::access::{AccessError, AccessGate, Authenticator};
use super::analytics::{AnalyticsError, AnalyticsService};
use super::directory::{DirectoryError, UserDirectory};
use super::domain::{SubmissionId, UserId};
use super::ledger::{LedgerError, SubmissionIntake, SubmissionLedger};
use super::repository::{RewardsStore, SettingsStore};
use super::scoring::RewardPolicy;
use super::settings::{SettingsDesk, SettingsError, SettingsPatch};
use super::verification::{VerificationDesk, VerificationError};

/// All domain services wired over one authenticator and one datastore.
pub struct RewardsStack<A, S> {
    pub gate: Arc<AccessGate<A, S>>,
    pub ledger: SubmissionLedger<A, S>,
    pub verification: VerificationDesk<A, S>,
    pub analytics: AnalyticsService<A, S>,
    pub directory: UserDirectory<A, S>,
    pub settings: SettingsDesk<A, S>,
}

impl<A, S> RewardsStack<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    pub fn new(authenticator: Arc<A>, store: Arc<S>, policy: RewardPolicy) -> Self {
        let gate = Arc::new(AccessGate::new(authenticator, store.clone()));
        Self {
            gate: gate.clone(),
            ledger: SubmissionLedger::new(gate.clone(), store.clone()),
            verification: VerificationDesk::new(gate.clone(), store.clone(), policy),
            analytics: AnalyticsService::new(gate.clone(), store.clone()),
            directory: UserDirectory::new(gate.clone(), store.clone()),
            settings: SettingsDesk::new(gate, store),
        }
    }
}

/// Router builder exposing the rewards platform endpoints.
pub fn rewards_router<A, S>(stack: Arc<RewardsStack<A, S>>) -> Router
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/submissions",
            post(submit_handler::<A, S>).get(own_submissions_handler::<A, S>),
        )
        .route(
            "/api/v1/submissions/all",
            get(all_submissions_handler::<A, S>),
        )
        .route("/api/v1/submissions/verify", put(verify_handler::<A, S>))
        .route("/api/v1/admin/analytics", get(analytics_handler::<A, S>))
        .route(
            "/api/v1/admin/analytics/export",
            get(export_handler::<A, S>),
        )
        .route("/api/v1/admin/users", get(list_users_handler::<A, S>))
        .route(
            "/api/v1/admin/users/status",
            put(user_status_handler::<A, S>),
        )
        .route(
            "/api/v1/admin/settings",
            get(settings_handler::<A, S>).put(update_settings_handler::<A, S>),
        )
        .route(
            "/api/v1/settings/public",
            get(public_settings_handler::<A, S>),
        )
        .with_state(stack)
}

/// Extracts the bearer credential, if any, from the request headers.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    #[serde(default)]
    submission_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserStatusRequest {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

async fn submit_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
    Json(intake): Json<SubmissionIntake>,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.ledger.submit(bearer_token(&headers), intake) {
        Ok(commit) => (StatusCode::CREATED, Json(commit)).into_response(),
        Err(err) => ledger_failure(err),
    }
}

async fn own_submissions_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.ledger.own_submissions(bearer_token(&headers)) {
        Ok(submissions) => (StatusCode::OK, Json(submissions)).into_response(),
        Err(err) => ledger_failure(err),
    }
}

async fn all_submissions_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.ledger.all_submissions(bearer_token(&headers)) {
        Ok(overviews) => (StatusCode::OK, Json(overviews)).into_response(),
        Err(err) => ledger_failure(err),
    }
}

async fn verify_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
    Json(request): Json<VerifyRequest>,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    let (submission_id, status) = match (request.submission_id, request.status) {
        (Some(submission_id), Some(status)) => (SubmissionId(submission_id), status),
        _ => {
            return failure(
                StatusCode::BAD_REQUEST,
                "submission_id and status are required",
            )
        }
    };

    match stack
        .verification
        .resolve(bearer_token(&headers), &submission_id, &status)
    {
        Ok(commit) => (StatusCode::OK, Json(commit)).into_response(),
        Err(err) => verification_failure(err),
    }
}

async fn analytics_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.analytics.report(bearer_token(&headers)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => analytics_failure(err),
    }
}

async fn export_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack
        .analytics
        .export_submissions_csv(bearer_token(&headers))
    {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(err) => analytics_failure(err),
    }
}

async fn list_users_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.directory.list_users(bearer_token(&headers)) {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => directory_failure(err),
    }
}

async fn user_status_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
    Json(request): Json<UserStatusRequest>,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    let (user_id, status) = match (request.user_id, request.status) {
        (Some(user_id), Some(status)) => (UserId(user_id), status),
        _ => return failure(StatusCode::BAD_REQUEST, "user_id and status are required"),
    };

    match stack
        .directory
        .set_status(bearer_token(&headers), &user_id, &status)
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => directory_failure(err),
    }
}

async fn settings_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.settings.fetch(bearer_token(&headers)) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(err) => settings_failure(err),
    }
}

async fn update_settings_handler<A, S>(
    State(stack): State<Arc<RewardsStack<A, S>>>,
    headers: HeaderMap,
    Json(patch): Json<SettingsPatch>,
) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.settings.update(bearer_token(&headers), patch) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(err) => settings_failure(err),
    }
}

async fn public_settings_handler<A, S>(State(stack): State<Arc<RewardsStack<A, S>>>) -> Response
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    match stack.settings.public_view() {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => settings_failure(err),
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn internal_failure(err: &dyn std::error::Error) -> Response {
    tracing::error!(error = %err, "request failed on an internal error");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

fn access_failure(err: AccessError) -> Response {
    match err {
        AccessError::Unauthenticated => failure(StatusCode::UNAUTHORIZED, &err.to_string()),
        AccessError::Forbidden => failure(StatusCode::FORBIDDEN, &err.to_string()),
        AccessError::Store(store) => internal_failure(&store),
    }
}

fn ledger_failure(err: LedgerError) -> Response {
    match err {
        LedgerError::Validation(_) => failure(StatusCode::BAD_REQUEST, &err.to_string()),
        LedgerError::Access(access) => access_failure(access),
        LedgerError::Store(store) => internal_failure(&store),
    }
}

fn verification_failure(err: VerificationError) -> Response {
    match err {
        VerificationError::Validation(_) => failure(StatusCode::BAD_REQUEST, &err.to_string()),
        VerificationError::NotFound => failure(StatusCode::NOT_FOUND, &err.to_string()),
        VerificationError::AlreadyResolved => failure(StatusCode::CONFLICT, &err.to_string()),
        VerificationError::Access(access) => access_failure(access),
        VerificationError::Store(store) => internal_failure(&store),
    }
}

fn analytics_failure(err: AnalyticsError) -> Response {
    match err {
        AnalyticsError::Access(access) => access_failure(access),
        AnalyticsError::Store(store) => internal_failure(&store),
        AnalyticsError::Export(_) => internal_failure(&err),
    }
}

fn directory_failure(err: DirectoryError) -> Response {
    match err {
        DirectoryError::Validation(_) => failure(StatusCode::BAD_REQUEST, &err.to_string()),
        DirectoryError::NotFound => failure(StatusCode::NOT_FOUND, &err.to_string()),
        DirectoryError::Access(access) => access_failure(access),
        DirectoryError::Store(store) => internal_failure(&store),
    }
}

fn settings_failure(err: SettingsError) -> Response {
    match err {
        SettingsError::Access(access) => access_failure(access),
        SettingsError::Store(store) => internal_failure(&store),
    }
}
