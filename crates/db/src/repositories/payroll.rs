//! Payroll repository: cycle generation, approval, settlement and item upkeep.
//!
//! Every mutation runs in one database transaction and starts by locking the
//! cycle row, so two approvals or two payments on the same cycle never
//! interleave. Ledger postings made along the way share that transaction.

use std::collections::HashMap;

use chrono::Utc;
use paybook_core::ledger::PostingContext;
use paybook_core::payroll::{
    ApprovalChain, ApprovalOutcome, ApprovalState, ApprovalTrailEntry, CycleBuilder, CycleSpec,
    CycleStatus, CycleTotals, ItemAmounts, ItemPaymentState, ItemStatus, PayrollError,
    PayrollPostings, PayrollTransactionType, SettlementScope, SettlementService,
    reconcile_status,
};
use paybook_shared::config::{AppConfig, PayrollAccounts};
use paybook_shared::types::{EmployeeId, PayrollCycleId, PayrollItemId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::employee::EmployeeRepository;
use super::ledger::LedgerRepository;
use super::payroll_db_error;
use crate::entities::{payroll_cycles, payroll_items, payroll_transactions, sea_orm_active_enums};

/// A cycle with its items.
#[derive(Debug, Clone)]
pub struct PayrollCycleDetail {
    /// Cycle header.
    pub cycle: payroll_cycles::Model,
    /// Items, one per employee.
    pub items: Vec<payroll_items::Model>,
}

/// Fields of an item that may be edited. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    /// New base salary.
    pub base_salary: Option<Decimal>,
    /// New allowances total.
    pub allowances: Option<Decimal>,
    /// New deductions total.
    pub deductions: Option<Decimal>,
    /// New notes.
    pub notes: Option<String>,
}

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
    accounts: PayrollAccounts,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ledger: LedgerRepository, accounts: PayrollAccounts) -> Self {
        Self {
            db,
            ledger,
            accounts,
        }
    }

    /// Creates a payroll repository from configuration.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        let ledger = LedgerRepository::from_config(db.clone(), &config.ledger);
        Self::new(db, ledger, config.payroll.accounts.clone())
    }

    // ========== Cycle Builder ==========

    /// Creates a draft cycle with one active item per selected employee.
    ///
    /// # Errors
    ///
    /// Returns a builder error (blank name, inverted period, empty
    /// selection, negative pay) or a database error.
    pub async fn generate(
        &self,
        spec: &CycleSpec,
        initiator: UserId,
    ) -> Result<PayrollCycleDetail, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let profiles = EmployeeRepository::load_profiles(&txn).await?;
        let draft = CycleBuilder::build(spec, &profiles)?;

        let now = Utc::now().fixed_offset();
        let cycle_id = Uuid::new_v4();
        let cycle = payroll_cycles::ActiveModel {
            id: Set(cycle_id),
            name: Set(spec.name.trim().to_string()),
            cycle_type: Set(spec.cycle_type.into()),
            period_start: Set(spec.period_start),
            period_end: Set(spec.period_end),
            payment_date: Set(spec.payment_date),
            status: Set(sea_orm_active_enums::CycleStatus::Draft),
            current_approver_id: Set(None),
            approval_trail: Set(serde_json::Value::Array(Vec::new())),
            total_gross: Set(draft.totals.total_gross),
            total_deductions: Set(draft.totals.total_deductions),
            total_net: Set(draft.totals.total_net),
            created_by: Set(initiator.into_inner()),
            approved_by: Set(None),
            approved_at: Set(None),
            accrual_voucher: Set(None),
            notes: Set(spec.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(payroll_db_error)?;

        let mut items = Vec::with_capacity(draft.items.len());
        for item in &draft.items {
            let model = payroll_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                cycle_id: Set(cycle_id),
                employee_id: Set(item.employee_id.into_inner()),
                base_salary: Set(item.amounts.base_salary),
                allowances: Set(item.amounts.allowances),
                deductions: Set(item.amounts.deductions),
                gross_salary: Set(item.amounts.gross()),
                net_salary: Set(item.amounts.net()),
                status: Set(sea_orm_active_enums::ItemStatus::Active),
                notes: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(payroll_db_error)?;
            items.push(model);
        }

        txn.commit().await.map_err(payroll_db_error)?;

        tracing::info!(
            cycle_id = %cycle_id,
            cycle_type = spec.cycle_type.as_str(),
            items = items.len(),
            total_net = %draft.totals.total_net,
            "payroll cycle created"
        );

        Ok(PayrollCycleDetail { cycle, items })
    }

    // ========== Approval Chain ==========

    /// Records an approval by `ctx.posted_by`.
    ///
    /// When the chain runs out of approvers the cycle becomes `approved` and
    /// its accrual voucher is posted in the same transaction, dated on
    /// `ctx.posting_date`.
    ///
    /// # Errors
    ///
    /// - `NotCurrentApprover` if someone other than the current approver acts
    /// - `InvalidTransition` if the cycle is already approved or paid
    /// - Any ledger error from the accrual posting; the approval is then
    ///   rolled back as well
    pub async fn approve(
        &self,
        cycle_id: PayrollCycleId,
        ctx: &PostingContext,
    ) -> Result<payroll_cycles::Model, PayrollError> {
        let acting = ctx.posted_by;
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let cycle = Self::lock_cycle(&txn, cycle_id).await?;
        let chart = EmployeeRepository::load_org_chart(&txn).await?;
        let mut trail = parse_trail(&cycle.approval_trail)?;

        let state = ApprovalState {
            status: cycle.status.into(),
            created_by: UserId::from_uuid(cycle.created_by),
            current_approver: cycle.current_approver_id.map(UserId::from_uuid),
            trail: trail.clone(),
        };

        let now = Utc::now();
        let outcome = ApprovalChain::approve(&state, acting, &chart, now).inspect_err(|err| {
            tracing::warn!(
                cycle_id = %cycle_id,
                user = %acting,
                code = err.error_code(),
                "approval rejected"
            );
        })?;

        if let Some(entry) = outcome.trail_entry() {
            trail.push(entry.clone());
        }

        let mut active: payroll_cycles::ActiveModel = cycle.clone().into();
        active.status = Set(outcome.new_status().into());
        active.current_approver_id = Set(outcome.current_approver().map(UserId::into_inner));
        active.approval_trail = Set(trail_json(&trail)?);
        active.updated_at = Set(now.fixed_offset());

        if let ApprovalOutcome::Completed {
            approved_by,
            approved_at,
            ..
        } = &outcome
        {
            active.approved_by = Set(Some(approved_by.into_inner()));
            active.approved_at = Set(Some(approved_at.fixed_offset()));

            if let Some(request) =
                PayrollPostings::accrual(cycle_id, &cycle.name, &totals_of(&cycle), &self.accounts)
            {
                let voucher = self.ledger.post_in(&txn, &request, ctx).await?;
                active.accrual_voucher = Set(Some(voucher));
            }
        }

        let updated = active.update(&txn).await.map_err(payroll_db_error)?;
        txn.commit().await.map_err(payroll_db_error)?;

        tracing::info!(
            cycle_id = %cycle_id,
            user = %acting,
            status = outcome.new_status().as_str(),
            next_approver = ?outcome.current_approver(),
            accrual_voucher = ?updated.accrual_voucher,
            "payroll cycle approval recorded"
        );

        Ok(updated)
    }

    // ========== Settlement ==========

    /// Pays every outstanding active item of an approved cycle.
    ///
    /// One voucher (DEBIT payable / CREDIT cash) covers the sum of the
    /// remaining balances; each item gets a payment transaction for its
    /// remaining balance. On-hold items are skipped. Nothing is posted when
    /// nothing is outstanding. Reconciliation runs last.
    ///
    /// # Errors
    ///
    /// `CycleNotApproved` unless the cycle is `approved`, or any ledger error.
    pub async fn process_payment(
        &self,
        cycle_id: PayrollCycleId,
        payment_account: Option<&str>,
        ctx: &PostingContext,
    ) -> Result<payroll_cycles::Model, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let cycle = Self::lock_cycle(&txn, cycle_id).await?;
        SettlementService::ensure_payable(cycle.status.into(), true)?;

        let states = Self::payment_states(&txn, cycle.id).await?;
        let plan = SettlementService::plan_bulk_settlement(&states);

        if plan.is_empty() {
            tracing::info!(cycle_id = %cycle_id, "no outstanding items to settle");
        } else {
            let total = plan.total()?;
            let request = PayrollPostings::settlement(
                SettlementScope::Cycle(cycle_id),
                &cycle.name,
                total,
                &self.accounts,
                payment_account,
            );
            let voucher = self.ledger.post_in(&txn, &request, ctx).await?;

            for payment in &plan.payments {
                Self::record_payment(
                    &txn,
                    payment.item_id,
                    payment.employee_id,
                    payment.amount,
                    &voucher,
                    None,
                    ctx,
                )
                .await?;
            }

            tracing::info!(
                cycle_id = %cycle_id,
                voucher_number = %voucher,
                payments = plan.payments.len(),
                total = %total,
                "payroll cycle settled"
            );
        }

        let cycle = Self::reconcile_in(&txn, cycle).await?;
        txn.commit().await.map_err(payroll_db_error)?;
        Ok(cycle)
    }

    /// Pays part or all of one item's remaining balance.
    ///
    /// Posts its own two-line voucher through the same settlement function
    /// as [`Self::process_payment`], records the transaction, and reconciles.
    ///
    /// # Errors
    ///
    /// - `CycleNotApproved` unless the cycle is `approved` or `paid`
    /// - `NonPositivePayment`, `ItemOnHold` or `Overpayment` for the item
    /// - Any ledger error
    pub async fn pay(
        &self,
        item_id: PayrollItemId,
        amount: Decimal,
        notes: Option<String>,
        payment_account: Option<&str>,
        ctx: &PostingContext,
    ) -> Result<payroll_transactions::Model, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let (cycle, item) = Self::lock_item(&txn, item_id).await?;
        SettlementService::ensure_payable(cycle.status.into(), false)?;

        let paid = Self::paid_totals(&txn, vec![item.id]).await?;
        let state = payment_state(&item, &paid);
        SettlementService::check_item_payment(&state, amount)?;

        let request = PayrollPostings::settlement(
            SettlementScope::Item(item_id),
            &cycle.name,
            amount,
            &self.accounts,
            payment_account,
        );
        let voucher = self.ledger.post_in(&txn, &request, ctx).await?;
        let transaction = Self::record_payment(
            &txn,
            item_id,
            state.employee_id,
            amount,
            &voucher,
            notes,
            ctx,
        )
        .await?;

        Self::reconcile_in(&txn, cycle).await?;
        txn.commit().await.map_err(payroll_db_error)?;

        tracing::info!(
            item_id = %item_id,
            voucher_number = %voucher,
            amount = %amount,
            "payroll item payment recorded"
        );

        Ok(transaction)
    }

    // ========== Item upkeep ==========

    /// Flips an item between `active` and `on_hold`, then reconciles.
    ///
    /// # Errors
    ///
    /// `ItemNotFound` for unknown items, or a database error.
    pub async fn toggle_status(
        &self,
        item_id: PayrollItemId,
    ) -> Result<payroll_items::Model, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let (cycle, item) = Self::lock_item(&txn, item_id).await?;
        let next = ItemStatus::from(item.status).toggled();

        let mut active: payroll_items::ActiveModel = item.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await.map_err(payroll_db_error)?;

        Self::reconcile_in(&txn, cycle).await?;
        txn.commit().await.map_err(payroll_db_error)?;

        tracing::info!(item_id = %item_id, status = ?next, "payroll item status changed");
        Ok(updated)
    }

    /// Edits an item's amounts or notes.
    ///
    /// Gross and net are recomputed, the cycle totals are recomputed from
    /// all of its items, and the cycle is reconciled.
    ///
    /// # Errors
    ///
    /// `NegativeAmount`, `AmountOutOfRange` or `NegativeNetPay` for invalid amounts,
    /// `ItemNotFound` for unknown items.
    pub async fn update_item(
        &self,
        item_id: PayrollItemId,
        update: ItemUpdate,
    ) -> Result<payroll_items::Model, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;

        let (cycle, item) = Self::lock_item(&txn, item_id).await?;

        let amounts = ItemAmounts::new(
            update.base_salary.unwrap_or(item.base_salary),
            update.allowances.unwrap_or(item.allowances),
            update.deductions.unwrap_or(item.deductions),
        );
        amounts.check(EmployeeId::from_uuid(item.employee_id))?;

        let mut active: payroll_items::ActiveModel = item.into();
        active.base_salary = Set(amounts.base_salary);
        active.allowances = Set(amounts.allowances);
        active.deductions = Set(amounts.deductions);
        active.gross_salary = Set(amounts.gross());
        active.net_salary = Set(amounts.net());
        if let Some(notes) = update.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await.map_err(payroll_db_error)?;

        let cycle = Self::recompute_totals(&txn, cycle).await?;
        Self::reconcile_in(&txn, cycle).await?;
        txn.commit().await.map_err(payroll_db_error)?;

        tracing::info!(item_id = %item_id, net_salary = %amounts.net(), "payroll item updated");
        Ok(updated)
    }

    // ========== Reconciliation ==========

    /// Recomputes the derived `paid` status of a cycle.
    ///
    /// # Errors
    ///
    /// `CycleNotFound` for unknown cycles, or a database error.
    pub async fn reconcile(
        &self,
        cycle_id: PayrollCycleId,
    ) -> Result<payroll_cycles::Model, PayrollError> {
        let txn = self.db.begin().await.map_err(payroll_db_error)?;
        let cycle = Self::lock_cycle(&txn, cycle_id).await?;
        let cycle = Self::reconcile_in(&txn, cycle).await?;
        txn.commit().await.map_err(payroll_db_error)?;
        Ok(cycle)
    }

    async fn reconcile_in<C>(
        conn: &C,
        cycle: payroll_cycles::Model,
    ) -> Result<payroll_cycles::Model, PayrollError>
    where
        C: ConnectionTrait,
    {
        let states = Self::payment_states(conn, cycle.id).await?;
        let current = CycleStatus::from(cycle.status);
        let Some(next) = reconcile_status(current, &states) else {
            return Ok(cycle);
        };

        let cycle_id = cycle.id;
        let mut active: payroll_cycles::ActiveModel = cycle.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(conn).await.map_err(payroll_db_error)?;

        tracing::info!(
            cycle_id = %cycle_id,
            from = current.as_str(),
            to = next.as_str(),
            "payroll cycle status reconciled"
        );
        Ok(updated)
    }

    // ========== Queries ==========

    /// Loads a cycle with its items.
    ///
    /// # Errors
    ///
    /// `CycleNotFound` for unknown cycles.
    pub async fn get_cycle(&self, cycle_id: PayrollCycleId) -> Result<PayrollCycleDetail, PayrollError> {
        let cycle = payroll_cycles::Entity::find_by_id(cycle_id.into_inner())
            .one(&self.db)
            .await
            .map_err(payroll_db_error)?
            .ok_or(PayrollError::CycleNotFound(cycle_id))?;

        let items = payroll_items::Entity::find()
            .filter(payroll_items::Column::CycleId.eq(cycle.id))
            .order_by_asc(payroll_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(payroll_db_error)?;

        Ok(PayrollCycleDetail { cycle, items })
    }

    /// Lists the disbursements recorded against an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn item_transactions(
        &self,
        item_id: PayrollItemId,
    ) -> Result<Vec<payroll_transactions::Model>, PayrollError> {
        payroll_transactions::Entity::find()
            .filter(payroll_transactions::Column::PayrollItemId.eq(item_id.into_inner()))
            .order_by_asc(payroll_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(payroll_db_error)
    }

    // ========== Helpers ==========

    async fn lock_cycle<C>(conn: &C, cycle_id: PayrollCycleId) -> Result<payroll_cycles::Model, PayrollError>
    where
        C: ConnectionTrait,
    {
        payroll_cycles::Entity::find_by_id(cycle_id.into_inner())
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(payroll_db_error)?
            .ok_or(PayrollError::CycleNotFound(cycle_id))
    }

    /// Locks the item's cycle, then reads the item under that lock.
    async fn lock_item<C>(
        conn: &C,
        item_id: PayrollItemId,
    ) -> Result<(payroll_cycles::Model, payroll_items::Model), PayrollError>
    where
        C: ConnectionTrait,
    {
        let item = Self::find_item(conn, item_id).await?;
        let cycle = Self::lock_cycle(conn, PayrollCycleId::from_uuid(item.cycle_id)).await?;
        let item = Self::find_item(conn, item_id).await?;
        Ok((cycle, item))
    }

    async fn find_item<C>(conn: &C, item_id: PayrollItemId) -> Result<payroll_items::Model, PayrollError>
    where
        C: ConnectionTrait,
    {
        payroll_items::Entity::find_by_id(item_id.into_inner())
            .one(conn)
            .await
            .map_err(payroll_db_error)?
            .ok_or(PayrollError::ItemNotFound(item_id))
    }

    async fn recompute_totals<C>(
        conn: &C,
        cycle: payroll_cycles::Model,
    ) -> Result<payroll_cycles::Model, PayrollError>
    where
        C: ConnectionTrait,
    {
        let amounts: Vec<ItemAmounts> = payroll_items::Entity::find()
            .filter(payroll_items::Column::CycleId.eq(cycle.id))
            .all(conn)
            .await
            .map_err(payroll_db_error)?
            .into_iter()
            .map(|item| ItemAmounts::new(item.base_salary, item.allowances, item.deductions))
            .collect();
        let totals = CycleTotals::from_items(&amounts)?;

        let mut active: payroll_cycles::ActiveModel = cycle.into();
        active.total_gross = Set(totals.total_gross);
        active.total_deductions = Set(totals.total_deductions);
        active.total_net = Set(totals.total_net);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(conn).await.map_err(payroll_db_error)
    }

    async fn payment_states<C>(conn: &C, cycle_id: Uuid) -> Result<Vec<ItemPaymentState>, PayrollError>
    where
        C: ConnectionTrait,
    {
        let items = payroll_items::Entity::find()
            .filter(payroll_items::Column::CycleId.eq(cycle_id))
            .all(conn)
            .await
            .map_err(payroll_db_error)?;
        let paid = Self::paid_totals(conn, items.iter().map(|i| i.id).collect()).await?;
        Ok(items.iter().map(|item| payment_state(item, &paid)).collect())
    }

    /// Sums `payment` transactions per item. Advances are not counted.
    async fn paid_totals<C>(conn: &C, item_ids: Vec<Uuid>) -> Result<HashMap<Uuid, Decimal>, PayrollError>
    where
        C: ConnectionTrait,
    {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let transactions = payroll_transactions::Entity::find()
            .filter(payroll_transactions::Column::PayrollItemId.is_in(item_ids))
            .filter(
                payroll_transactions::Column::TransactionType
                    .eq(sea_orm_active_enums::PayrollTransactionType::Payment),
            )
            .all(conn)
            .await
            .map_err(payroll_db_error)?;

        let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
        for transaction in transactions {
            *totals.entry(transaction.payroll_item_id).or_default() += transaction.amount;
        }
        Ok(totals)
    }

    async fn record_payment<C>(
        conn: &C,
        item_id: PayrollItemId,
        employee_id: EmployeeId,
        amount: Decimal,
        voucher_number: &str,
        notes: Option<String>,
        ctx: &PostingContext,
    ) -> Result<payroll_transactions::Model, PayrollError>
    where
        C: ConnectionTrait,
    {
        payroll_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            payroll_item_id: Set(item_id.into_inner()),
            employee_id: Set(employee_id.into_inner()),
            amount: Set(amount),
            transaction_type: Set(PayrollTransactionType::Payment.into()),
            transaction_date: Set(ctx.posting_date),
            voucher_number: Set(Some(voucher_number.to_string())),
            notes: Set(notes),
            created_by: Set(ctx.posted_by.into_inner()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(conn)
        .await
        .map_err(payroll_db_error)
    }
}

fn payment_state(item: &payroll_items::Model, paid: &HashMap<Uuid, Decimal>) -> ItemPaymentState {
    ItemPaymentState {
        item_id: PayrollItemId::from_uuid(item.id),
        employee_id: EmployeeId::from_uuid(item.employee_id),
        status: item.status.into(),
        net_salary: item.net_salary,
        paid_total: paid.get(&item.id).copied().unwrap_or_default(),
    }
}

fn totals_of(cycle: &payroll_cycles::Model) -> CycleTotals {
    CycleTotals {
        total_gross: cycle.total_gross,
        total_deductions: cycle.total_deductions,
        total_net: cycle.total_net,
    }
}

fn parse_trail(value: &serde_json::Value) -> Result<Vec<ApprovalTrailEntry>, PayrollError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| PayrollError::Internal(format!("malformed approval trail: {e}")))
}

fn trail_json(trail: &[ApprovalTrailEntry]) -> Result<serde_json::Value, PayrollError> {
    serde_json::to_value(trail)
        .map_err(|e| PayrollError::Internal(format!("cannot encode approval trail: {e}")))
}
