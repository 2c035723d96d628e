//! Data-access contract for invoices and verification logs

use crate::core::error::VerifyResult;
use crate::core::model::{Invoice, InvoiceInput, VerificationLogEntry};
use async_trait::async_trait;

/// Storage contract used by the route layer
///
/// Every method is a single auto-committing operation. Implementations must
/// enforce `invoice_number` uniqueness themselves: a duplicate `create` (or an
/// `update` onto another invoice's number) fails with
/// [`VerifyError::ConstraintViolation`](crate::core::error::VerifyError::ConstraintViolation)
/// even if the caller checked [`exists`](RecordStore::exists) beforehand.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up an invoice by its number
    async fn get_by_number(&self, invoice_number: &str) -> VerifyResult<Option<Invoice>>;

    /// Look up an invoice by id
    async fn get(&self, id: i64) -> VerifyResult<Option<Invoice>>;

    /// Whether an invoice with this number exists
    async fn exists(&self, invoice_number: &str) -> VerifyResult<bool>;

    /// Insert a new invoice
    async fn create(&self, input: &InvoiceInput) -> VerifyResult<Invoice>;

    /// Replace all fields of an invoice. `None` if the id is unknown.
    async fn update(&self, id: i64, input: &InvoiceInput) -> VerifyResult<Option<Invoice>>;

    /// Remove an invoice, returning it. `None` if the id is unknown.
    async fn delete(&self, id: i64) -> VerifyResult<Option<Invoice>>;

    /// All invoices, most recently created first
    async fn list_all(&self) -> VerifyResult<Vec<Invoice>>;

    /// Record a lookup attempt
    async fn append_log(
        &self,
        invoice_number: &str,
        ip_address: &str,
    ) -> VerifyResult<VerificationLogEntry>;

    /// Most recent lookup attempts first, at most `limit` of them
    async fn list_logs(&self, limit: u32) -> VerifyResult<Vec<VerificationLogEntry>>;
}
