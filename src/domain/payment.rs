use {
    super::error::PaymentError,
    derive_more::Display,
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Payment lifecycle as reported by TrueLayer, mirrored locally.
/// `Other` carries statuses the upstream may add later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Unpaid,
    AuthorizationRequired,
    Authorizing,
    Executed,
    Succeeded,
    Failed,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unpaid => "unpaid",
            Self::AuthorizationRequired => "authorization_required",
            Self::Authorizing => "authorizing",
            Self::Executed => "executed",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Terminal statuses are never rewritten by reconciliation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "unpaid" => Self::Unpaid,
            "authorization_required" => Self::AuthorizationRequired,
            "authorizing" => Self::Authorizing,
            "executed" => Self::Executed,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Positive amount in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(minor_units: i64) -> Result<Self, PaymentError> {
        if minor_units <= 0 {
            return Err(PaymentError::Validation(format!(
                "amount must be positive, got: {minor_units}"
            )));
        }
        Ok(Self(minor_units))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

/// A merchant payment as stored locally. `truelayer_id` stays `None`
/// until the upstream payment has been created and mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub receiver_id: String,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub truelayer_id: Option<String>,
}
