//! Ledger repository: posting, balances, trial balance and reversal.
//!
//! Rules live in `paybook_core::ledger`; this module loads what they need,
//! writes the result and owns the unit of work.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use paybook_core::ledger::{
    AccountActivity, EntryType, LedgerError, LedgerService, PostedEntry, PostingContext,
    PostingRequest, ReversalService, TrialBalance, VOUCHER_DOCUMENT_TYPE,
};
use paybook_shared::config::LedgerConfig;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::account::AccountRepository;
use super::fiscal::FiscalRepository;
use super::ledger_db_error;
use super::sequence::SequenceRepository;
use crate::entities::{accounts, general_ledger, sea_orm_active_enums};

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    voucher_document_type: String,
}

impl LedgerRepository {
    /// Creates a ledger repository numbering vouchers as `VOU`.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            voucher_document_type: VOUCHER_DOCUMENT_TYPE.to_string(),
        }
    }

    /// Creates a ledger repository from configuration.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        Self {
            db,
            voucher_document_type: config.voucher_document_type.clone(),
        }
    }

    /// Document type used to number vouchers.
    #[must_use]
    pub fn voucher_document_type(&self) -> &str {
        &self.voucher_document_type
    }

    // ========== Posting ==========

    /// Posts a balanced voucher in its own transaction.
    ///
    /// Returns the voucher number, allocated from the sequence when the
    /// request does not carry one.
    ///
    /// # Errors
    ///
    /// Returns a validation, account or policy error before anything is
    /// written; nothing persists on any failure.
    pub async fn post(
        &self,
        request: &PostingRequest,
        ctx: &PostingContext,
    ) -> Result<String, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_db_error)?;
        let voucher_number = self.post_in(&txn, request, ctx).await?;
        txn.commit().await.map_err(ledger_db_error)?;
        Ok(voucher_number)
    }

    /// Posts a balanced voucher on `conn`, typically an open transaction.
    ///
    /// Order of work:
    /// 1. Load the fiscal period for the gate date and the referenced accounts
    /// 2. Validate lines, gate the period and check every account
    /// 3. Reject a reused voucher number, or allocate the next unused one
    /// 4. Insert one row per line
    ///
    /// # Errors
    ///
    /// See [`Self::post`].
    pub async fn post_in<C>(
        &self,
        conn: &C,
        request: &PostingRequest,
        ctx: &PostingContext,
    ) -> Result<String, LedgerError>
    where
        C: ConnectionTrait,
    {
        let period =
            FiscalRepository::find_period_on(conn, LedgerService::gate_date(request, ctx)).await?;
        let codes: Vec<&str> = request
            .lines
            .iter()
            .map(|line| line.account_code.as_str())
            .collect();
        let accounts = AccountRepository::resolve_codes(conn, &codes).await?;

        let prepared = LedgerService::prepare(request, ctx, period.as_ref(), |code| {
            accounts.get(code).cloned()
        })
        .inspect_err(|err| {
            tracing::warn!(code = err.error_code(), error = %err, "posting rejected");
        })?;

        let voucher_number = match request
            .voucher_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(number) => {
                if Self::is_used(conn, number).await? {
                    return Err(LedgerError::DuplicateVoucher(number.to_string()));
                }
                number.to_string()
            }
            // Manual vouchers may already hold a number of the sequence.
            None => loop {
                let number = SequenceRepository::next_in(conn, &self.voucher_document_type).await?;
                if !Self::is_used(conn, &number).await? {
                    break number;
                }
                tracing::warn!(
                    voucher_number = %number,
                    "sequence number taken by a manual voucher, skipping"
                );
            },
        };

        let now = Utc::now().fixed_offset();
        let (reference_type, reference_id) = request
            .reference
            .as_ref()
            .map(|r| (r.reference_type.clone(), r.reference_id.clone()))
            .unzip();

        let rows = (1_i32..).zip(&prepared.lines).map(|(line_number, line)| {
            general_ledger::ActiveModel {
                id: Set(Uuid::new_v4()),
                voucher_number: Set(voucher_number.clone()),
                line_number: Set(line_number),
                voucher_date: Set(prepared.voucher_date),
                account_id: Set(line.account_id.into_inner()),
                entry_type: Set(line.entry_type.into()),
                amount: Set(line.amount),
                description: Set(line.description.clone()),
                reference_type: Set(reference_type.clone()),
                reference_id: Set(reference_id.clone()),
                fiscal_period_id: Set(prepared.fiscal_period_id.into_inner()),
                created_by: Set(ctx.posted_by.into_inner()),
                is_closed: Set(false),
                created_at: Set(now),
            }
        });

        general_ledger::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(ledger_db_error)?;

        tracing::info!(
            voucher_number = %voucher_number,
            lines = prepared.lines.len(),
            amount = %prepared.totals.debit,
            reference_type = reference_type.as_deref().unwrap_or("-"),
            reference_id = reference_id.as_deref().unwrap_or("-"),
            "voucher posted"
        );

        Ok(voucher_number)
    }

    async fn is_used<C>(conn: &C, voucher_number: &str) -> Result<bool, LedgerError>
    where
        C: ConnectionTrait,
    {
        let existing = general_ledger::Entity::find()
            .filter(general_ledger::Column::VoucherNumber.eq(voucher_number))
            .one(conn)
            .await
            .map_err(ledger_db_error)?;
        Ok(existing.is_some())
    }

    // ========== Queries ==========

    /// Rows of a voucher in line order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn voucher_entries(
        &self,
        voucher_number: &str,
    ) -> Result<Vec<general_ledger::Model>, LedgerError> {
        Self::voucher_entries_in(&self.db, voucher_number).await
    }

    async fn voucher_entries_in<C>(
        conn: &C,
        voucher_number: &str,
    ) -> Result<Vec<general_ledger::Model>, LedgerError>
    where
        C: ConnectionTrait,
    {
        general_ledger::Entity::find()
            .filter(general_ledger::Column::VoucherNumber.eq(voucher_number))
            .order_by_asc(general_ledger::Column::LineNumber)
            .all(conn)
            .await
            .map_err(ledger_db_error)
    }

    /// Balance of one account over non-closed rows, optionally up to `as_of`.
    ///
    /// Asset and expense accounts return `debit - credit`, all others
    /// `credit - debit`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub async fn account_balance(
        &self,
        code: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, LedgerError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(ledger_db_error)?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;

        let mut query = general_ledger::Entity::find()
            .filter(general_ledger::Column::AccountId.eq(account.id))
            .filter(general_ledger::Column::IsClosed.eq(false));
        if let Some(date) = as_of {
            query = query.filter(general_ledger::Column::VoucherDate.lte(date));
        }
        let rows = query.all(&self.db).await.map_err(ledger_db_error)?;

        let mut activity =
            AccountActivity::new(account.code, account.name, account.account_type.into());
        for row in rows {
            record(&mut activity, row.entry_type, row.amount);
        }
        Ok(activity.balance())
    }

    /// Trial balance over every active account with activity.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<TrialBalance, LedgerError> {
        let active = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(ledger_db_error)?;

        let mut activity: HashMap<Uuid, AccountActivity> = active
            .into_iter()
            .map(|a| (a.id, AccountActivity::new(a.code, a.name, a.account_type.into())))
            .collect();

        let mut query =
            general_ledger::Entity::find().filter(general_ledger::Column::IsClosed.eq(false));
        if let Some(date) = as_of {
            query = query.filter(general_ledger::Column::VoucherDate.lte(date));
        }
        let rows = query.all(&self.db).await.map_err(ledger_db_error)?;

        for row in rows {
            if let Some(account) = activity.get_mut(&row.account_id) {
                record(account, row.entry_type, row.amount);
            }
        }

        let trial = TrialBalance::build(activity.into_values());
        if !trial.is_balanced {
            tracing::warn!(
                total_debits = %trial.total_debits,
                total_credits = %trial.total_credits,
                "trial balance does not balance"
            );
        }
        Ok(trial)
    }

    // ========== Reversal ==========

    /// Reverses a posted voucher by posting its mirror image.
    ///
    /// The original rows are left untouched. The new voucher references
    /// `("general_ledger", voucher_number)` and is dated on the posting date.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` for unknown vouchers, or any posting error.
    pub async fn reverse(
        &self,
        voucher_number: &str,
        description: Option<&str>,
        ctx: &PostingContext,
    ) -> Result<String, LedgerError> {
        let txn = self.db.begin().await.map_err(ledger_db_error)?;

        let rows = Self::voucher_entries_in(&txn, voucher_number).await?;
        let account_ids: Vec<Uuid> = rows.iter().map(|r| r.account_id).collect();
        let codes: HashMap<Uuid, String> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&txn)
            .await
            .map_err(ledger_db_error)?
            .into_iter()
            .map(|a| (a.id, a.code))
            .collect();

        let entries = rows
            .into_iter()
            .map(|row| {
                let account_code = codes.get(&row.account_id).cloned().ok_or_else(|| {
                    LedgerError::Internal(format!("account {} of {voucher_number} missing", row.account_id))
                })?;
                Ok(PostedEntry {
                    line_number: row.line_number,
                    account_code,
                    entry_type: row.entry_type.into(),
                    amount: row.amount,
                    description: row.description,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let request = ReversalService::create_reversing_entries(
            voucher_number,
            &entries,
            description,
            ctx.posting_date,
        )?;
        let reversal = self.post_in(&txn, &request, ctx).await?;
        txn.commit().await.map_err(ledger_db_error)?;

        tracing::info!(original = voucher_number, reversal = %reversal, "voucher reversed");
        Ok(reversal)
    }
}

fn record(activity: &mut AccountActivity, entry_type: sea_orm_active_enums::EntryType, amount: Decimal) {
    match EntryType::from(entry_type) {
        EntryType::Debit => activity.add_debit(amount),
        EntryType::Credit => activity.add_credit(amount),
    }
}
