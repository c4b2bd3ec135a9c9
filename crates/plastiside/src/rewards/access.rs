use std::sync::Arc;

use super::domain::{Principal, Role, UserStatus};
use super::repository::{RewardsStore, StoreError};

/// Credential resolution boundary. The platform never issues or validates
/// credentials itself; whatever sits behind this trait (JWT verification,
/// session lookup) only has to map a credential to a principal.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Principal, AccessError>;
}

/// Every privileged or mutating operation the platform exposes, with its
/// required roles declared in one table so endpoints cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateSubmission,
    ListOwnSubmissions,
    ListAllSubmissions,
    ResolveSubmission,
    ViewAnalytics,
    ExportSubmissions,
    ListUsers,
    UpdateUserStatus,
    ReadSettings,
    UpdateSettings,
    UploadPhoto,
}

const ANY_ROLE: &[Role] = &[Role::Citizen, Role::Buyer, Role::Collector, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const REVIEWERS: &[Role] = &[Role::Admin, Role::Collector];

impl Operation {
    pub const fn required_roles(self) -> &'static [Role] {
        match self {
            Operation::CreateSubmission
            | Operation::ListOwnSubmissions
            | Operation::UploadPhoto => ANY_ROLE,
            Operation::ResolveSubmission => REVIEWERS,
            Operation::ListAllSubmissions
            | Operation::ViewAnalytics
            | Operation::ExportSubmissions
            | Operation::ListUsers
            | Operation::UpdateUserStatus
            | Operation::ReadSettings
            | Operation::UpdateSettings => ADMIN_ONLY,
        }
    }
}

/// Uniform pre-dispatch check: resolve the principal, require a live
/// account, and match the stored role against the operation's table.
pub struct AccessGate<A, S> {
    authenticator: Arc<A>,
    users: Arc<S>,
}

impl<A, S> AccessGate<A, S>
where
    A: Authenticator,
    S: RewardsStore,
{
    pub fn new(authenticator: Arc<A>, users: Arc<S>) -> Self {
        Self {
            authenticator,
            users,
        }
    }

    /// Returns the acting principal or fails without side effects.
    ///
    /// The stored role is authoritative over whatever the credential
    /// claims, and accounts that are suspended or inactive are turned away
    /// even when the credential itself is valid.
    pub fn authorize(
        &self,
        credential: Option<&str>,
        operation: Operation,
    ) -> Result<Principal, AccessError> {
        let credential = credential.ok_or(AccessError::Unauthenticated)?;
        let claimed = self.authenticator.authenticate(credential)?;

        let user = self
            .users
            .fetch_user(&claimed.id)?
            .ok_or(AccessError::Unauthenticated)?;

        if user.status != UserStatus::Active {
            return Err(AccessError::Forbidden);
        }

        if !operation.required_roles().contains(&user.role) {
            return Err(AccessError::Forbidden);
        }

        Ok(Principal {
            id: user.id,
            role: user.role,
        })
    }
}

/// Access failure taxonomy surfaced by the gate.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}
