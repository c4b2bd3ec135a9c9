use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for waste submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// The authenticated actor behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

/// Account roles recognized across the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Buyer,
    Collector,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Buyer => "buyer",
            Role::Collector => "collector",
            Role::Admin => "admin",
        }
    }
}

/// Account lifecycle state, mutated only through the admin directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
    Inactive,
}

impl UserStatus {
    pub const fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Inactive => "inactive",
        }
    }

    /// Parses the wire label, e.g. from an admin status-change request.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(UserStatus::Active),
            "suspended" => Some(UserStatus::Suspended),
            "inactive" => Some(UserStatus::Inactive),
            _ => None,
        }
    }
}

/// Rank tier derived from cumulative points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl RankTier {
    pub const fn label(self) -> &'static str {
        match self {
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Platinum => "Platinum",
        }
    }
}

/// Accepted plastic categories. Labels unknown to the platform degrade to
/// `Other` rather than failing intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlasticType {
    Pet,
    Hdpe,
    Pvc,
    Ldpe,
    Pp,
    Ps,
    Other,
}

impl PlasticType {
    pub const fn label(self) -> &'static str {
        match self {
            PlasticType::Pet => "PET",
            PlasticType::Hdpe => "HDPE",
            PlasticType::Pvc => "PVC",
            PlasticType::Ldpe => "LDPE",
            PlasticType::Pp => "PP",
            PlasticType::Ps => "PS",
            PlasticType::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PET" => PlasticType::Pet,
            "HDPE" => PlasticType::Hdpe,
            "PVC" => PlasticType::Pvc,
            "LDPE" => PlasticType::Ldpe,
            "PP" => PlasticType::Pp,
            "PS" => PlasticType::Ps,
            _ => PlasticType::Other,
        }
    }
}

impl Serialize for PlasticType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PlasticType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(PlasticType::from_label(&raw))
    }
}

/// Submission lifecycle. `Pending` is the only state a submission can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Verified,
    Rejected,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Verified => "verified",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

/// Outcome a reviewer can assign to a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Rejected,
}

impl Verdict {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "verified" => Some(Verdict::Verified),
            "rejected" => Some(Verdict::Rejected),
            _ => None,
        }
    }

    pub const fn status(self) -> SubmissionStatus {
        match self {
            Verdict::Verified => SubmissionStatus::Verified,
            Verdict::Rejected => SubmissionStatus::Rejected,
        }
    }
}

/// Persisted user row. Points only ever change through the submission
/// ledger; the stored rank is refreshed inside the same store action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub points: u64,
    pub rank: RankTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Admin-facing projection without credential material.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            status: self.status,
            points: self.points,
            rank: self.rank,
            created_at: self.created_at,
        }
    }
}

/// Sanitized user listing entry exposed to administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub points: u64,
    pub rank: RankTier,
    pub created_at: DateTime<Utc>,
}

/// Persisted submission row. Owner and `points_earned` are fixed at
/// creation; `status`, `verified_by`, and `verified_at` change exactly once,
/// when a reviewer resolves the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub owner: UserId,
    pub plastic_type: PlasticType,
    pub weight_kg: f64,
    pub quantity: u32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub points_earned: u64,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Submission joined with its owner, for the admin review queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOverview {
    #[serde(flatten)]
    pub submission: SubmissionRecord,
    pub owner_summary: Option<UserSummary>,
}

/// Singleton branding/settings record managed by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub company_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_team: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            company_name: "PlastiSide".to_string(),
            primary_color: "#2ECC71".to_string(),
            secondary_color: "#1A73E8".to_string(),
            footer_team: None,
            logo_url: None,
        }
    }
}

/// Branding subset served without authentication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSettings {
    pub company_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl SettingsRecord {
    pub fn public_view(&self) -> PublicSettings {
        PublicSettings {
            company_name: self.company_name.clone(),
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}
