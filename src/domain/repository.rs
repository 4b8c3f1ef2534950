use {
    super::error::PaymentError,
    super::payment::{Amount, PaymentRecord, PaymentStatus},
    async_trait::async_trait,
    uuid::Uuid,
};

/// Narrow storage seam for payment records. Monotonicity of status
/// transitions is the coordinator's job, not the store's.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Persists a fresh record in `unpaid` state and returns its id.
    async fn insert(&self, receiver_id: &str, amount: Amount) -> Result<Uuid, PaymentError>;

    /// Maps a local record to the upstream payment id. Idempotent for an
    /// identical id; `NotFound` when the record does not exist.
    async fn attach_truelayer(&self, id: Uuid, truelayer_id: &str) -> Result<(), PaymentError>;

    /// Overwrites the status of the record mapped to `truelayer_id`.
    async fn update_status(
        &self,
        truelayer_id: &str,
        status: &PaymentStatus,
    ) -> Result<(), PaymentError>;

    async fn get(&self, id: Uuid) -> Result<PaymentRecord, PaymentError>;

    async fn get_by_truelayer_id(&self, truelayer_id: &str) -> Result<PaymentRecord, PaymentError>;
}
