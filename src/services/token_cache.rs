use {
    crate::domain::{error::PaymentError, provider::PaymentProvider},
    chrono::{DateTime, Duration, Utc},
    std::sync::Arc,
    tokio::sync::Mutex,
};

/// A token is treated as expired this many seconds before its real
/// deadline so it is never sent within its last moments of validity.
const SAFETY_MARGIN_SECS: i64 = 10;

struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Single-slot cache for the upstream access token.
///
/// The slot sits behind an async mutex that is held across the refresh
/// call, so concurrent callers arriving at an expired cache collapse to
/// exactly one `issue_token` round-trip; the rest queue on the lock and
/// pick up the fresh value.
pub struct TokenCache {
    provider: Arc<dyn PaymentProvider>,
    slot: Mutex<Option<Token>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            provider,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached token, refreshing it first when missing or
    /// expired. A failed issuance surfaces the upstream error and leaves
    /// the slot empty for the next caller to retry.
    pub async fn get_token(&self) -> Result<String, PaymentError> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        *slot = None;
        let issued = self.provider.issue_token().await?;
        let usable_for = Duration::seconds(issued.expires_in as i64 - SAFETY_MARGIN_SECS);
        let expires_at = Utc::now() + usable_for;
        tracing::debug!(expires_in = issued.expires_in, "issued new access token");

        let value = issued.access_token.clone();
        *slot = Some(Token {
            value: issued.access_token,
            expires_at,
        });
        Ok(value)
    }
}
