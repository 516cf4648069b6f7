//! Document sequence repository.
//!
//! One row per document type holds the last number handed out. Allocation
//! increments the row inside the caller's transaction: the update takes the
//! row lock, so concurrent callers for the same type queue behind it, and a
//! rolled-back posting gives its number back.

use chrono::Utc;
use paybook_core::ledger::LedgerError;
use paybook_core::ledger::sequence::{DEFAULT_FORMAT, format_document_number};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::ledger_db_error;
use crate::entities::document_sequences;

/// Repository for document number sequences.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    db: DatabaseConnection,
}

impl SequenceRepository {
    /// Creates a new sequence repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Allocates the next number for `document_type` in its own transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the database operation fails.
    pub async fn next_number(&self, document_type: &str) -> Result<String, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_db_error)?;
        let number = Self::next_in(&txn, document_type).await?;
        txn.commit().await.map_err(ledger_db_error)?;
        Ok(number)
    }

    /// Allocates the next number for `document_type` on `conn`.
    ///
    /// The row is created on first use with `prefix = document_type`. Call
    /// this inside a transaction so the increment commits or rolls back with
    /// the document that consumes it.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the database operation fails.
    pub async fn next_in<C>(conn: &C, document_type: &str) -> Result<String, LedgerError>
    where
        C: ConnectionTrait,
    {
        Self::ensure_row(conn, document_type).await?;

        document_sequences::Entity::update_many()
            .col_expr(
                document_sequences::Column::CurrentNumber,
                Expr::col(document_sequences::Column::CurrentNumber).add(1),
            )
            .col_expr(
                document_sequences::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(document_sequences::Column::DocumentType.eq(document_type))
            .exec(conn)
            .await
            .map_err(ledger_db_error)?;

        let row = document_sequences::Entity::find()
            .filter(document_sequences::Column::DocumentType.eq(document_type))
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(ledger_db_error)?
            .ok_or_else(|| {
                LedgerError::Internal(format!("sequence row for {document_type} vanished"))
            })?;

        let number = format_document_number(&row.format, &row.prefix, row.current_number);
        tracing::debug!(document_type, number = %number, "allocated document number");
        Ok(number)
    }

    /// Creates the sequence row for `document_type` without allocating.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the insert fails.
    pub async fn ensure(&self, document_type: &str) -> Result<(), LedgerError> {
        Self::ensure_row(&self.db, document_type).await
    }

    /// Returns the last number handed out for `document_type`, 0 if none.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the query fails.
    pub async fn peek(&self, document_type: &str) -> Result<i64, LedgerError> {
        let row = document_sequences::Entity::find()
            .filter(document_sequences::Column::DocumentType.eq(document_type))
            .one(&self.db)
            .await
            .map_err(ledger_db_error)?;
        Ok(row.map_or(0, |r| r.current_number))
    }

    async fn ensure_row<C>(conn: &C, document_type: &str) -> Result<(), LedgerError>
    where
        C: ConnectionTrait,
    {
        let row = document_sequences::ActiveModel {
            id: Set(Uuid::new_v4()),
            document_type: Set(document_type.to_string()),
            prefix: Set(document_type.to_string()),
            current_number: Set(0),
            format: Set(DEFAULT_FORMAT.to_string()),
            updated_at: Set(Utc::now().into()),
        };

        let inserted = document_sequences::Entity::insert(row)
            .on_conflict(
                OnConflict::column(document_sequences::Column::DocumentType)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(err) => Err(ledger_db_error(err)),
        }
    }
}
