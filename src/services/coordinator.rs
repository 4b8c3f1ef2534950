use {
    super::token_cache::TokenCache,
    crate::domain::{
        error::PaymentError,
        payment::{Amount, PaymentRecord},
        provider::{CreatePaymentRequest, PaymentProvider},
        repository::PaymentRepository,
    },
    std::sync::Arc,
    uuid::Uuid,
};

/// Orchestrates the payment lifecycle across the local store and the
/// upstream provider. Owns the local↔upstream mapping and the terminal
/// status guard; everything else is delegated.
pub struct PaymentCoordinator {
    repo: Arc<dyn PaymentRepository>,
    provider: Arc<dyn PaymentProvider>,
    tokens: TokenCache,
}

impl PaymentCoordinator {
    pub fn new(repo: Arc<dyn PaymentRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        let tokens = TokenCache::new(provider.clone());
        Self {
            repo,
            provider,
            tokens,
        }
    }

    /// Creates the local record for an upcoming payment. Purely local,
    /// no upstream interaction.
    pub async fn prepare(&self, receiver_id: &str, amount: i64) -> Result<Uuid, PaymentError> {
        let amount = Amount::new(amount)?;
        self.repo.insert(receiver_id, amount).await
    }

    /// Creates the payment upstream and maps it to the local record,
    /// returning the bank-authorization URL the user must be sent to.
    pub async fn request_payment_url(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<String, PaymentError> {
        let local_id = Uuid::parse_str(&request.uuid)
            .map_err(|e| PaymentError::Validation(format!("invalid payment uuid: {e}")))?;

        let token = self.tokens.get_token().await?;
        let created = self.provider.create_payment(&token, request).await?;

        if let Err(err) = self.repo.attach_truelayer(local_id, &created.simp_id).await {
            // The upstream payment now exists without a local mapping and
            // the SIMP contract has no delete to compensate with. The
            // orphan stands; the caller sees the mapping failure.
            tracing::warn!(
                %local_id,
                simp_id = %created.simp_id,
                "upstream payment created but could not be mapped locally"
            );
            return Err(err);
        }

        tracing::info!(%local_id, simp_id = %created.simp_id, "payment mapped to upstream");
        Ok(created.auth_uri)
    }

    /// Called when the bank redirects the user back. Fetches the upstream
    /// status and aligns the local record unless it is already terminal.
    ///
    /// Returns the record as read before the status write; the caller is
    /// redirected to the front-end and re-reads the record anyway.
    pub async fn reconcile_callback(
        &self,
        truelayer_id: &str,
    ) -> Result<PaymentRecord, PaymentError> {
        let token = self.tokens.get_token().await?;
        let status = self.provider.payment_status(&token, truelayer_id).await?;
        let record = self.repo.get_by_truelayer_id(truelayer_id).await?;

        if record.status.is_terminal() {
            if status != record.status {
                tracing::warn!(
                    truelayer_id,
                    stored = %record.status,
                    reported = %status,
                    "upstream reports a different status after terminal, keeping stored"
                );
            }
        } else {
            self.repo.update_status(truelayer_id, &status).await?;
            tracing::info!(truelayer_id, %status, "payment status reconciled");
        }

        Ok(record)
    }

    /// Providers list, passed through verbatim.
    pub async fn list_banks(&self) -> Result<Vec<u8>, PaymentError> {
        self.provider.list_providers().await
    }

    /// Local read by payment uuid; no upstream call.
    pub async fn get_payment(&self, id: Uuid) -> Result<PaymentRecord, PaymentError> {
        self.repo.get(id).await
    }
}
