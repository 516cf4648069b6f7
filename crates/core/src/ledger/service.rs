//! Ledger service for voucher validation and resolution.
//!
//! This module provides the core business logic for validating and resolving
//! vouchers before they are persisted to the database. Storage lookups are
//! passed in, so the same rules run in tests without a database.

use super::account::AccountInfo;
use super::error::LedgerError;
use super::fiscal::{FiscalPeriodInfo, ensure_open, gate_date};
use super::types::{PostingContext, PostingRequest, PreparedVoucher, ResolvedLine};
use super::validation::validate_lines;

/// Ledger service for voucher validation and resolution.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validate and resolve a voucher before persisting.
    ///
    /// Steps, in order:
    /// 1. Validates the lines (count, account code, positive amounts, balance)
    /// 2. Gates on the fiscal period covering the gate date
    /// 3. Resolves every account code and checks it may receive postings
    ///
    /// # Arguments
    ///
    /// * `request` - The voucher to post
    /// * `ctx` - Posting date, poster and policy
    /// * `period` - The fiscal period covering [`Self::gate_date`], if any
    /// * `account_lookup` - Function resolving an account code
    ///
    /// # Errors
    ///
    /// Returns the first `LedgerError` encountered; nothing is resolved past it.
    pub fn prepare<A>(
        request: &PostingRequest,
        ctx: &PostingContext,
        period: Option<&FiscalPeriodInfo>,
        account_lookup: A,
    ) -> Result<PreparedVoucher, LedgerError>
    where
        A: Fn(&str) -> Option<AccountInfo>,
    {
        let totals = validate_lines(&request.lines)?;

        let voucher_date = Self::voucher_date(request, ctx);
        let fiscal_period_id = ensure_open(period, Self::gate_date(request, ctx))?;

        let mut lines = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let account = account_lookup(&line.account_code)
                .ok_or_else(|| LedgerError::AccountNotFound(line.account_code.clone()))?;
            account.ensure_postable(&ctx.policy)?;

            lines.push(ResolvedLine {
                account_id: account.id,
                account_code: line.account_code.clone(),
                entry_type: line.entry_type,
                amount: line.amount,
                description: line.description.clone(),
            });
        }

        Ok(PreparedVoucher {
            voucher_date,
            fiscal_period_id,
            lines,
            totals,
        })
    }

    /// The voucher date written on the rows: the requested one, else the posting date.
    #[must_use]
    pub fn voucher_date(request: &PostingRequest, ctx: &PostingContext) -> chrono::NaiveDate {
        request.voucher_date.unwrap_or(ctx.posting_date)
    }

    /// The date whose fiscal period gates this posting.
    #[must_use]
    pub fn gate_date(request: &PostingRequest, ctx: &PostingContext) -> chrono::NaiveDate {
        gate_date(Self::voucher_date(request, ctx), ctx)
    }
}
