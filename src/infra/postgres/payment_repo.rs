use {
    crate::domain::{
        error::PaymentError,
        payment::{Amount, PaymentRecord, PaymentStatus},
        repository::PaymentRepository,
    },
    async_trait::async_trait,
    sqlx::PgPool,
    uuid::Uuid,
};

type PaymentRow = (Uuid, String, i64, String, String);

/// Single-table Postgres store. Row-level atomicity of the UPDATE
/// statements is all the concurrency control this layer provides.
pub struct PostgresPayments {
    pool: PgPool,
}

impl PostgresPayments {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the payments table if absent. Run once at startup.
    pub async fn ensure_schema(&self) -> Result<(), PaymentError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id UUID PRIMARY KEY,
                receiver_id TEXT NOT NULL,
                amount BIGINT NOT NULL,
                status TEXT NOT NULL DEFAULT 'unpaid',
                truelayer_payment_id TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS payments_truelayer_id_idx \
             ON payments (truelayer_payment_id) WHERE truelayer_payment_id <> ''",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn record_from_row(row: PaymentRow) -> Result<PaymentRecord, PaymentError> {
        let (id, receiver_id, amount, status, truelayer_id) = row;
        Ok(PaymentRecord {
            id,
            receiver_id,
            amount: Amount::new(amount)?,
            status: PaymentStatus::from(status.as_str()),
            truelayer_id: (!truelayer_id.is_empty()).then_some(truelayer_id),
        })
    }
}

#[async_trait]
impl PaymentRepository for PostgresPayments {
    async fn insert(&self, receiver_id: &str, amount: Amount) -> Result<Uuid, PaymentError> {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO payments (id, receiver_id, amount) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(receiver_id)
            .bind(amount.minor_units())
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn attach_truelayer(&self, id: Uuid, truelayer_id: &str) -> Result<(), PaymentError> {
        let result = sqlx::query(
            "UPDATE payments SET truelayer_payment_id = $1, updated_at = now() WHERE id = $2",
        )
        .bind(truelayer_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PaymentError::NotFound(format!("payment {id}")));
        }
        Ok(())
    }

    async fn update_status(
        &self,
        truelayer_id: &str,
        status: &PaymentStatus,
    ) -> Result<(), PaymentError> {
        let result = sqlx::query(
            "UPDATE payments SET status = $1, updated_at = now() WHERE truelayer_payment_id = $2",
        )
        .bind(status.as_str())
        .bind(truelayer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PaymentError::NotFound(format!(
                "payment mapped to truelayer id {truelayer_id}"
            )));
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<PaymentRecord, PaymentError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, receiver_id, amount, status, truelayer_payment_id \
             FROM payments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("payment {id}")))?;

        Self::record_from_row(row)
    }

    async fn get_by_truelayer_id(&self, truelayer_id: &str) -> Result<PaymentRecord, PaymentError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, receiver_id, amount, status, truelayer_payment_id \
             FROM payments WHERE truelayer_payment_id = $1",
        )
        .bind(truelayer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            PaymentError::NotFound(format!("payment mapped to truelayer id {truelayer_id}"))
        })?;

        Self::record_from_row(row)
    }
}
