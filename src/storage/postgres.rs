//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresRecordStore`, backed by a PostgreSQL database via
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-verify = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! `invoices` carries a UNIQUE index on `invoice_number`; that index, not any
//! pre-check, is what rejects duplicates. A `BEFORE UPDATE` trigger refreshes
//! `updated_at`. See `migrations/`.

use crate::config::DatabaseConfig;
use crate::core::{Invoice, InvoiceInput, RecordStore, VerificationLogEntry, VerifyError, VerifyResult};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

const INVOICE_COLUMNS: &str = "id, invoice_number, bank_name, bank_account_number, \
                               beneficiary_name, created_at, updated_at";

/// Open a bounded connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> VerifyResult<PgPool> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| VerifyError::Config(crate::config::ConfigError::InvalidValue {
            field: "database.url".to_string(),
            message: "required for the postgres backend".to_string(),
        }))?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| VerifyError::StorageUnavailable {
            message: format!("Failed to connect to PostgreSQL: {}", e),
        })
}

/// Apply the schema in `migrations/` (idempotent)
pub async fn run_migrations(pool: &PgPool) -> VerifyResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| VerifyError::StorageUnavailable {
            message: format!("Failed to run migrations: {}", e),
        })
}

/// Map a sqlx error onto the store taxonomy
///
/// Unique violations (SQLSTATE 23505) become `ConstraintViolation`; every
/// other failure is reported as `StorageUnavailable`.
fn map_err(operation: &str, invoice_number: Option<&str>, err: sqlx::Error) -> VerifyError {
    if let (Some(number), Some(db_err)) = (invoice_number, err.as_database_error()) {
        if db_err.is_unique_violation() {
            return VerifyError::ConstraintViolation {
                invoice_number: number.to_string(),
            };
        }
    }

    VerifyError::StorageUnavailable {
        message: format!("Failed to {}: {}", operation, err),
    }
}

/// Record store backed by PostgreSQL
///
/// # Example
///
/// ```rust,ignore
/// use invoice_verify::storage::postgres::{connect, run_migrations, PostgresRecordStore};
///
/// let pool = connect(&config.database).await?;
/// run_migrations(&pool).await?;
/// let store = PostgresRecordStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn get_by_number(&self, invoice_number: &str) -> VerifyResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = $1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("get invoice by number", None, e))
    }

    async fn get(&self, id: i64) -> VerifyResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("get invoice", None, e))
    }

    async fn exists(&self, invoice_number: &str) -> VerifyResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_number = $1)",
        )
        .bind(invoice_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("check invoice existence", None, e))
    }

    async fn create(&self, input: &InvoiceInput) -> VerifyResult<Invoice> {
        sqlx::query_as::<_, Invoice>(&format!(
            "INSERT INTO invoices (invoice_number, bank_name, bank_account_number, beneficiary_name) \
             VALUES ($1, $2, $3, $4) RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(&input.invoice_number)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.beneficiary_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("create invoice", Some(&input.invoice_number), e))
    }

    async fn update(&self, id: i64, input: &InvoiceInput) -> VerifyResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(&format!(
            "UPDATE invoices \
             SET invoice_number = $1, bank_name = $2, bank_account_number = $3, beneficiary_name = $4 \
             WHERE id = $5 RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(&input.invoice_number)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.beneficiary_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("update invoice", Some(&input.invoice_number), e))
    }

    async fn delete(&self, id: i64) -> VerifyResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(&format!(
            "DELETE FROM invoices WHERE id = $1 RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("delete invoice", None, e))
    }

    async fn list_all(&self) -> VerifyResult<Vec<Invoice>> {
        sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_err("list invoices", None, e))
    }

    async fn append_log(
        &self,
        invoice_number: &str,
        ip_address: &str,
    ) -> VerifyResult<VerificationLogEntry> {
        sqlx::query_as::<_, VerificationLogEntry>(
            "INSERT INTO verification_logs (invoice_number, ip_address) VALUES ($1, $2) \
             RETURNING id, invoice_number, ip_address, verified_at",
        )
        .bind(invoice_number)
        .bind(ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("append verification log", None, e))
    }

    async fn list_logs(&self, limit: u32) -> VerifyResult<Vec<VerificationLogEntry>> {
        sqlx::query_as::<_, VerificationLogEntry>(
            "SELECT id, invoice_number, ip_address, verified_at FROM verification_logs \
             ORDER BY verified_at DESC, id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_err("list verification logs", None, e))
    }
}
