use {
    crate::domain::{
        error::PaymentError,
        payment::{Amount, PaymentRecord, PaymentStatus},
        repository::PaymentRepository,
    },
    async_trait::async_trait,
    std::collections::HashMap,
    std::sync::{Mutex, MutexGuard},
    uuid::Uuid,
};

/// Map-backed repository. Used by the test suite and for running the
/// backend without a database.
#[derive(Default)]
pub struct InMemoryPayments {
    records: Mutex<HashMap<Uuid, PaymentRecord>>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<Uuid, PaymentRecord>> {
        self.records.lock().expect("payments lock poisoned")
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPayments {
    async fn insert(&self, receiver_id: &str, amount: Amount) -> Result<Uuid, PaymentError> {
        let id = Uuid::now_v7();
        self.records().insert(
            id,
            PaymentRecord {
                id,
                receiver_id: receiver_id.to_string(),
                amount,
                status: PaymentStatus::Unpaid,
                truelayer_id: None,
            },
        );
        Ok(id)
    }

    async fn attach_truelayer(&self, id: Uuid, truelayer_id: &str) -> Result<(), PaymentError> {
        let mut records = self.records();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| PaymentError::NotFound(format!("payment {id}")))?;
        record.truelayer_id = Some(truelayer_id.to_string());
        Ok(())
    }

    async fn update_status(
        &self,
        truelayer_id: &str,
        status: &PaymentStatus,
    ) -> Result<(), PaymentError> {
        let mut records = self.records();
        let record = records
            .values_mut()
            .find(|r| r.truelayer_id.as_deref() == Some(truelayer_id))
            .ok_or_else(|| {
                PaymentError::NotFound(format!("payment mapped to truelayer id {truelayer_id}"))
            })?;
        record.status = status.clone();
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<PaymentRecord, PaymentError> {
        self.records()
            .get(&id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(format!("payment {id}")))
    }

    async fn get_by_truelayer_id(&self, truelayer_id: &str) -> Result<PaymentRecord, PaymentError> {
        self.records()
            .values()
            .find(|r| r.truelayer_id.as_deref() == Some(truelayer_id))
            .cloned()
            .ok_or_else(|| {
                PaymentError::NotFound(format!("payment mapped to truelayer id {truelayer_id}"))
            })
    }
}
