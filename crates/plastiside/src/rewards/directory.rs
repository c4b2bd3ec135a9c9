use std::sync::Arc;

use super::access::{AccessError, AccessGate, Authenticator, Operation};
use super::domain::{UserId, UserStatus, UserSummary};
use super::repository::{RewardsStore, StoreError};

/// Administrative view over the user base. Accounts are never deleted;
/// suspension and reactivation happen here.
pub struct UserDirectory<A, S> {
    gate: Arc<AccessGate<A, S>>,
    store: Arc<S>,
}

impl<A, S> UserDirectory<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + 'static,
{
    pub fn new(gate: Arc<AccessGate<A, S>>, store: Arc<S>) -> Self {
        Self { gate, store }
    }

    pub fn list_users(&self, credential: Option<&str>) -> Result<Vec<UserSummary>, DirectoryError> {
        self.gate.authorize(credential, Operation::ListUsers)?;
        let users = self.store.list_users()?;
        Ok(users.iter().map(|user| user.summary()).collect())
    }

    pub fn set_status(
        &self,
        credential: Option<&str>,
        user_id: &UserId,
        status_label: &str,
    ) -> Result<UserSummary, DirectoryError> {
        self.gate.authorize(credential, Operation::UpdateUserStatus)?;

        let status = UserStatus::from_label(status_label).ok_or_else(|| {
            DirectoryError::Validation(format!(
                "status must be 'active', 'suspended', or 'inactive', got '{status_label}'"
            ))
        })?;

        match self.store.set_user_status(user_id, status) {
            Ok(user) => Ok(user.summary()),
            Err(StoreError::NotFound) => Err(DirectoryError::NotFound),
            Err(other) => Err(DirectoryError::Store(other)),
        }
    }
}

/// Error raised by the user directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("invalid status: {0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
