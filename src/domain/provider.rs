use {
    super::error::PaymentError,
    super::payment::PaymentStatus,
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

/// Access token as issued by the upstream auth endpoint.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

/// What the upstream hands back after creating a single-immediate-payment.
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub simp_id: String,
    pub auth_uri: String,
}

/// Payment creation payload. Passed through to TrueLayer verbatim; the
/// front-end fills the beneficiary fields, the adapter only defaults
/// `redirect_uri` when it is left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePaymentRequest {
    pub uuid: String,
    pub amount: i64,
    pub currency: String,
    pub beneficiary_name: String,
    pub beneficiary_reference: String,
    pub beneficiary_sort_code: String,
    pub beneficiary_account_number: String,
    pub remitter_reference: String,
    pub redirect_uri: String,
    pub remitter_provider_id: String,
}

/// The upstream open-banking provider's wire contract. Kept behind a trait
/// so the coordinator can be exercised without network access.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Client-credentials token issuance. Credentials live in the
    /// implementation, not in the call.
    async fn issue_token(&self) -> Result<IssuedToken, PaymentError>;

    async fn create_payment(
        &self,
        token: &str,
        request: &CreatePaymentRequest,
    ) -> Result<CreatedPayment, PaymentError>;

    async fn payment_status(
        &self,
        token: &str,
        simp_id: &str,
    ) -> Result<PaymentStatus, PaymentError>;

    /// Providers list, returned verbatim for pass-through to the front-end.
    async fn list_providers(&self) -> Result<Vec<u8>, PaymentError>;
}
