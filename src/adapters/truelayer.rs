use {
    crate::domain::{
        error::PaymentError,
        payment::PaymentStatus,
        provider::{CreatePaymentRequest, CreatedPayment, IssuedToken, PaymentProvider},
    },
    async_trait::async_trait,
    serde::Deserialize,
    std::time::Duration,
};

/// Total budget for any upstream round-trip, connect included.
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

pub const SANDBOX_AUTH_URL: &str = "https://auth.truelayer-sandbox.com";
pub const SANDBOX_PAY_URL: &str = "https://pay-api.truelayer-sandbox.com";

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct CreatePaymentResponse {
    results: Vec<CreatePaymentResult>,
}

#[derive(Deserialize)]
struct CreatePaymentResult {
    simp_id: String,
    auth_uri: String,
}

#[derive(Deserialize)]
struct GetPaymentResponse {
    results: Vec<GetPaymentResult>,
}

#[derive(Deserialize)]
struct GetPaymentResult {
    status: String,
}

/// TrueLayer single-immediate-payments client. One shared `reqwest`
/// client, no in-client retry.
pub struct TrueLayerProvider {
    client: reqwest::Client,
    auth_base: String,
    pay_base: String,
    client_id: String,
    client_secret: String,
}

impl TrueLayerProvider {
    pub fn new(
        auth_base: impl Into<String>,
        pay_base: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("failed to build http client");
        Self {
            client,
            auth_base: auth_base.into(),
            pay_base: pay_base.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn sandbox(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::new(SANDBOX_AUTH_URL, SANDBOX_PAY_URL, client_id, client_secret)
    }
}

#[async_trait]
impl PaymentProvider for TrueLayerProvider {
    async fn issue_token(&self) -> Result<IssuedToken, PaymentError> {
        let form = [
            ("scope", "payments"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .client
            .post(format!("{}/connect/token", self.auth_base))
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Upstream(format!("token request: {e}")))?;

        if !resp.status().is_success() {
            return Err(PaymentError::Upstream(format!(
                "token endpoint responded with {}",
                resp.status()
            )));
        }

        let body: AccessTokenResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::Upstream(format!("token response body: {e}")))?;

        Ok(IssuedToken {
            access_token: body.access_token,
            expires_in: body.expires_in,
        })
    }

    async fn create_payment(
        &self,
        token: &str,
        request: &CreatePaymentRequest,
    ) -> Result<CreatedPayment, PaymentError> {
        let resp = self
            .client
            .post(format!("{}/single-immediate-payments", self.pay_base))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::Upstream(format!("create payment request: {e}")))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "truelayer rejected payment creation");
            return Err(PaymentError::Upstream(format!(
                "truelayer API did not respond with code 200 ({status})"
            )));
        }

        let body: CreatePaymentResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::Upstream(format!("create payment response body: {e}")))?;

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PaymentError::Upstream("create payment returned no results".into()))?;

        Ok(CreatedPayment {
            simp_id: first.simp_id,
            auth_uri: first.auth_uri,
        })
    }

    async fn payment_status(
        &self,
        token: &str,
        simp_id: &str,
    ) -> Result<PaymentStatus, PaymentError> {
        let resp = self
            .client
            .get(format!(
                "{}/single-immediate-payments/{simp_id}",
                self.pay_base
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PaymentError::Upstream(format!("payment status request: {e}")))?;

        if !resp.status().is_success() {
            return Err(PaymentError::Upstream(format!(
                "payment status endpoint responded with {}",
                resp.status()
            )));
        }

        let body: GetPaymentResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::Upstream(format!("payment status response body: {e}")))?;

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PaymentError::Upstream("payment status returned no results".into()))?;

        Ok(PaymentStatus::from(first.status.as_str()))
    }

    async fn list_providers(&self) -> Result<Vec<u8>, PaymentError> {
        let resp = self
            .client
            .get(format!(
                "{}/providers?capability=SingleImmediatePayment",
                self.pay_base
            ))
            .send()
            .await
            .map_err(|e| PaymentError::Upstream(format!("providers request: {e}")))?;

        if !resp.status().is_success() {
            return Err(PaymentError::Upstream(format!(
                "providers endpoint responded with {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| PaymentError::Upstream(format!("providers response body: {e}")))?;

        Ok(bytes.to_vec())
    }
}
