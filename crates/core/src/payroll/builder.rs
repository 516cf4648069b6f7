//! Payroll cycle builder.
//!
//! Selects employees for a cycle and computes each item's amounts. The
//! result is a [`DraftCycle`] the repository persists as-is.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use paybook_shared::types::{EmployeeId, checked_sum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PayrollError;
use super::types::{CycleTotals, CycleType, EmploymentStatus, ItemAmounts};

/// Which employees a cycle covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "employee_ids", rename_all = "snake_case")]
pub enum TargetSelection {
    /// Every active employee. Salary cycles also require active employment.
    All,
    /// Only the listed employees.
    Selected(Vec<EmployeeId>),
    /// Every active employee except the listed ones.
    Excluded(Vec<EmployeeId>),
}

/// Parameters of a new cycle.
#[derive(Debug, Clone)]
pub struct CycleSpec {
    /// Display name.
    pub name: String,
    /// Nature of the cycle.
    pub cycle_type: CycleType,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Planned payment date.
    pub payment_date: Option<NaiveDate>,
    /// Employee selection.
    pub target: TargetSelection,
    /// Cycle-level base amount for non-salary cycles.
    pub default_amount: Option<Decimal>,
    /// Per-employee base amounts for non-salary cycles.
    pub amount_overrides: HashMap<EmployeeId, Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl CycleSpec {
    /// Creates a cycle definition with no amounts or notes.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cycle_type: CycleType,
        period_start: NaiveDate,
        period_end: NaiveDate,
        target: TargetSelection,
    ) -> Self {
        Self {
            name: name.into(),
            cycle_type,
            period_start,
            period_end,
            payment_date: None,
            target,
            default_amount: None,
            amount_overrides: HashMap::new(),
            notes: None,
        }
    }

    /// Sets the cycle-level amount for non-salary cycles.
    #[must_use]
    pub fn with_default_amount(mut self, amount: Decimal) -> Self {
        self.default_amount = Some(amount);
        self
    }

    /// Overrides the amount of one employee for non-salary cycles.
    #[must_use]
    pub fn with_override(mut self, employee: EmployeeId, amount: Decimal) -> Self {
        self.amount_overrides.insert(employee, amount);
        self
    }
}

/// An allowance or deduction line of an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayComponent {
    /// Component name.
    pub name: String,
    /// Amount per cycle.
    pub amount: Decimal,
    /// Inactive components are ignored.
    pub is_active: bool,
}

/// Employee data the builder needs.
#[derive(Debug, Clone)]
pub struct EmployeeProfile {
    /// Employee ID.
    pub id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Base salary per cycle.
    pub base_salary: Decimal,
    /// Record-level active flag.
    pub is_active: bool,
    /// Employment status.
    pub employment_status: EmploymentStatus,
    /// Allowance components.
    pub allowances: Vec<PayComponent>,
    /// Deduction components.
    pub deductions: Vec<PayComponent>,
}

fn active_sum(components: &[PayComponent]) -> Decimal {
    let amounts = components
        .iter()
        .filter(|c| c.is_active)
        .map(|c| c.amount);
    // Saturates so the range check rejects it.
    checked_sum(amounts).unwrap_or(Decimal::MAX)
}

/// One item of a draft cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftItem {
    /// Employee the item pays.
    pub employee_id: EmployeeId,
    /// Computed amounts.
    pub amounts: ItemAmounts,
}

/// A computed cycle ready to persist in `draft` status.
#[derive(Debug, Clone)]
pub struct DraftCycle {
    /// One item per selected employee, in directory order.
    pub items: Vec<DraftItem>,
    /// Sums across items.
    pub totals: CycleTotals,
}

/// Stateless builder for payroll cycles.
pub struct CycleBuilder;

impl CycleBuilder {
    /// Builds a draft cycle from a [`CycleSpec`] and the employee directory.
    ///
    /// # Errors
    ///
    /// - `EmptyName` / `InvalidPeriod` for a malformed cycle definition
    /// - `NoEmployeesSelected` when the selection is empty
    /// - `NegativeAmount` / `AmountOutOfRange` / `NegativeNetPay` for bad amounts
    pub fn build(spec: &CycleSpec, employees: &[EmployeeProfile]) -> Result<DraftCycle, PayrollError> {
        if spec.name.trim().is_empty() {
            return Err(PayrollError::EmptyName);
        }
        if spec.period_end < spec.period_start {
            return Err(PayrollError::InvalidPeriod {
                start: spec.period_start,
                end: spec.period_end,
            });
        }

        let selected = Self::select(spec, employees);
        if selected.is_empty() {
            return Err(PayrollError::NoEmployeesSelected);
        }

        let items = selected
            .into_iter()
            .map(|employee| {
                let amounts = Self::amounts_for(spec, employee);
                amounts.check(employee.id)?;
                Ok(DraftItem {
                    employee_id: employee.id,
                    amounts,
                })
            })
            .collect::<Result<Vec<_>, PayrollError>>()?;

        let totals = CycleTotals::from_items(items.iter().map(|i| &i.amounts))?;
        Ok(DraftCycle { items, totals })
    }

    /// Applies the target selection to the directory.
    #[must_use]
    pub fn select<'a>(spec: &CycleSpec, employees: &'a [EmployeeProfile]) -> Vec<&'a EmployeeProfile> {
        match &spec.target {
            TargetSelection::All => employees
                .iter()
                .filter(|e| e.is_active)
                .filter(|e| {
                    spec.cycle_type != CycleType::Salary
                        || e.employment_status == EmploymentStatus::Active
                })
                .collect(),
            TargetSelection::Selected(ids) => {
                let wanted: HashSet<&EmployeeId> = ids.iter().collect();
                employees.iter().filter(|e| wanted.contains(&e.id)).collect()
            }
            TargetSelection::Excluded(ids) => {
                let blocked: HashSet<&EmployeeId> = ids.iter().collect();
                employees
                    .iter()
                    .filter(|e| e.is_active && !blocked.contains(&e.id))
                    .collect()
            }
        }
    }

    /// Computes the amounts of one employee.
    #[must_use]
    pub fn amounts_for(spec: &CycleSpec, employee: &EmployeeProfile) -> ItemAmounts {
        match spec.cycle_type {
            CycleType::Salary => ItemAmounts::new(
                employee.base_salary,
                active_sum(&employee.allowances),
                active_sum(&employee.deductions),
            ),
            CycleType::Bonus | CycleType::Incentive | CycleType::Other => {
                let base = spec
                    .amount_overrides
                    .get(&employee.id)
                    .copied()
                    .or(spec.default_amount)
                    .unwrap_or(Decimal::ZERO);
                ItemAmounts::new(base, Decimal::ZERO, Decimal::ZERO)
            }
        }
    }
}
