//! In-memory implementation of RecordStore for testing and development

use crate::core::{Invoice, InvoiceInput, RecordStore, VerificationLogEntry, VerifyError, VerifyResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct State {
    invoices: HashMap<i64, Invoice>,
    logs: Vec<VerificationLogEntry>,
    next_invoice_id: i64,
    next_log_id: i64,
}

impl State {
    fn id_for_number(&self, invoice_number: &str) -> Option<i64> {
        self.invoices
            .values()
            .find(|inv| inv.invoice_number == invoice_number)
            .map(|inv| inv.id)
    }
}

/// In-memory record store
///
/// Uses a single RwLock so that the uniqueness check and the insert happen
/// under the same write guard, the same guarantee a UNIQUE index gives.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryRecordStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> VerifyResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|e| VerifyError::StorageUnavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> VerifyResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|e| VerifyError::StorageUnavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_by_number(&self, invoice_number: &str) -> VerifyResult<Option<Invoice>> {
        let state = self.read()?;
        Ok(state
            .invoices
            .values()
            .find(|inv| inv.invoice_number == invoice_number)
            .cloned())
    }

    async fn get(&self, id: i64) -> VerifyResult<Option<Invoice>> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn exists(&self, invoice_number: &str) -> VerifyResult<bool> {
        Ok(self.read()?.id_for_number(invoice_number).is_some())
    }

    async fn create(&self, input: &InvoiceInput) -> VerifyResult<Invoice> {
        let mut state = self.write()?;

        if state.id_for_number(&input.invoice_number).is_some() {
            return Err(VerifyError::ConstraintViolation {
                invoice_number: input.invoice_number.clone(),
            });
        }

        state.next_invoice_id += 1;
        let now = Utc::now();
        let invoice = Invoice {
            id: state.next_invoice_id,
            invoice_number: input.invoice_number.clone(),
            bank_name: input.bank_name.clone(),
            bank_account_number: input.bank_account_number.clone(),
            beneficiary_name: input.beneficiary_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn update(&self, id: i64, input: &InvoiceInput) -> VerifyResult<Option<Invoice>> {
        let mut state = self.write()?;

        if !state.invoices.contains_key(&id) {
            return Ok(None);
        }
        if state
            .id_for_number(&input.invoice_number)
            .is_some_and(|other| other != id)
        {
            return Err(VerifyError::ConstraintViolation {
                invoice_number: input.invoice_number.clone(),
            });
        }

        let Some(invoice) = state.invoices.get_mut(&id) else {
            return Ok(None);
        };
        invoice.invoice_number = input.invoice_number.clone();
        invoice.bank_name = input.bank_name.clone();
        invoice.bank_account_number = input.bank_account_number.clone();
        invoice.beneficiary_name = input.beneficiary_name.clone();
        invoice.updated_at = Utc::now();

        Ok(Some(invoice.clone()))
    }

    async fn delete(&self, id: i64) -> VerifyResult<Option<Invoice>> {
        Ok(self.write()?.invoices.remove(&id))
    }

    async fn list_all(&self) -> VerifyResult<Vec<Invoice>> {
        let state = self.read()?;
        let mut invoices: Vec<Invoice> = state.invoices.values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(invoices)
    }

    async fn append_log(
        &self,
        invoice_number: &str,
        ip_address: &str,
    ) -> VerifyResult<VerificationLogEntry> {
        let mut state = self.write()?;

        state.next_log_id += 1;
        let entry = VerificationLogEntry {
            id: state.next_log_id,
            invoice_number: invoice_number.to_string(),
            ip_address: ip_address.to_string(),
            verified_at: Utc::now(),
        };
        state.logs.push(entry.clone());

        Ok(entry)
    }

    async fn list_logs(&self, limit: u32) -> VerifyResult<Vec<VerificationLogEntry>> {
        // Ids follow append order; the wall clock may not.
        let state = self.read()?;
        Ok(state
            .logs
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
