use std::sync::Arc;

use serde::Deserialize;

use super::access::{AccessError, AccessGate, Authenticator, Operation};
use super::domain::{PublicSettings, SettingsRecord};
use super::repository::{RewardsStore, SettingsStore, StoreError};

/// Field-wise update for the settings singleton; `None` keeps the current
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub footer_team: Option<serde_json::Value>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Admin-managed branding record. The singleton is created from defaults
/// on first read.
pub struct SettingsDesk<A, S> {
    gate: Arc<AccessGate<A, S>>,
    store: Arc<S>,
}

impl<A, S> SettingsDesk<A, S>
where
    A: Authenticator + 'static,
    S: RewardsStore + SettingsStore + 'static,
{
    pub fn new(gate: Arc<AccessGate<A, S>>, store: Arc<S>) -> Self {
        Self { gate, store }
    }

    pub fn fetch(&self, credential: Option<&str>) -> Result<SettingsRecord, SettingsError> {
        self.gate.authorize(credential, Operation::ReadSettings)?;
        self.fetch_or_default()
    }

    pub fn update(
        &self,
        credential: Option<&str>,
        patch: SettingsPatch,
    ) -> Result<SettingsRecord, SettingsError> {
        self.gate.authorize(credential, Operation::UpdateSettings)?;

        let mut settings = self.fetch_or_default()?;
        if let Some(company_name) = patch.company_name {
            settings.company_name = company_name;
        }
        if let Some(primary_color) = patch.primary_color {
            settings.primary_color = primary_color;
        }
        if let Some(secondary_color) = patch.secondary_color {
            settings.secondary_color = secondary_color;
        }
        if let Some(footer_team) = patch.footer_team {
            settings.footer_team = Some(footer_team);
        }
        if let Some(logo_url) = patch.logo_url {
            settings.logo_url = Some(logo_url);
        }

        let saved = self.store.save_settings(settings)?;
        Ok(saved)
    }

    /// Branding subset for unauthenticated pages.
    pub fn public_view(&self) -> Result<PublicSettings, SettingsError> {
        Ok(self.fetch_or_default()?.public_view())
    }

    fn fetch_or_default(&self) -> Result<SettingsRecord, SettingsError> {
        match self.store.fetch_settings()? {
            Some(settings) => Ok(settings),
            None => {
                let seeded = self.store.save_settings(SettingsRecord::default())?;
                Ok(seeded)
            }
        }
    }
}

/// Error raised by the settings desk.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
