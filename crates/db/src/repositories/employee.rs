//! Employee directory repository.
//!
//! Feeds the cycle builder with pay profiles and the approval chain with an
//! organisation chart keyed by user.

use std::collections::HashMap;

use chrono::Utc;
use paybook_core::payroll::{EmployeeProfile, EmploymentStatus, OrgChart, PayComponent, PayrollError};
use paybook_shared::types::{EmployeeId, UserId, within_amount_range};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::payroll_db_error;
use crate::entities::sea_orm_active_enums::PayComponentKind;
use crate::entities::{employee_pay_components, employees};

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Login used when the employee acts as an approver.
    pub user_id: Option<UserId>,
    /// Display name.
    pub full_name: String,
    /// Direct manager.
    pub manager_id: Option<EmployeeId>,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Employment status.
    pub employment_status: EmploymentStatus,
}

impl CreateEmployeeInput {
    /// Creates input for an active employee without manager or login.
    #[must_use]
    pub fn new(full_name: impl Into<String>, base_salary: Decimal) -> Self {
        Self {
            user_id: None,
            full_name: full_name.into(),
            manager_id: None,
            base_salary,
            employment_status: EmploymentStatus::Active,
        }
    }

    /// Sets the login.
    #[must_use]
    pub const fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the direct manager.
    #[must_use]
    pub const fn reporting_to(mut self, manager_id: EmployeeId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    /// Sets the employment status.
    #[must_use]
    pub const fn with_status(mut self, status: EmploymentStatus) -> Self {
        self.employment_status = status;
        self
    }
}

/// Employee directory repository.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_employee(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, PayrollError> {
        let employee = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id.map(UserId::into_inner)),
            full_name: Set(input.full_name),
            manager_id: Set(input.manager_id.map(EmployeeId::into_inner)),
            base_salary: Set(input.base_salary),
            is_active: Set(true),
            employment_status: Set(input.employment_status.into()),
            created_at: Set(Utc::now().into()),
        };
        employee.insert(&self.db).await.map_err(payroll_db_error)
    }

    /// Activates or deactivates an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist or the update fails.
    pub async fn set_active(
        &self,
        id: EmployeeId,
        is_active: bool,
    ) -> Result<employees::Model, PayrollError> {
        let employee = employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(payroll_db_error)?
            .ok_or_else(|| PayrollError::Internal(format!("employee {id} not found")))?;

        let mut active: employees::ActiveModel = employee.into();
        active.is_active = Set(is_active);
        active.update(&self.db).await.map_err(payroll_db_error)
    }

    /// Adds a recurring allowance.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn add_allowance(
        &self,
        employee_id: EmployeeId,
        name: impl Into<String>,
        amount: Decimal,
    ) -> Result<employee_pay_components::Model, PayrollError> {
        self.add_component(employee_id, PayComponentKind::Allowance, name.into(), amount)
            .await
    }

    /// Adds a recurring deduction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn add_deduction(
        &self,
        employee_id: EmployeeId,
        name: impl Into<String>,
        amount: Decimal,
    ) -> Result<employee_pay_components::Model, PayrollError> {
        self.add_component(employee_id, PayComponentKind::Deduction, name.into(), amount)
            .await
    }

    async fn add_component(
        &self,
        employee_id: EmployeeId,
        kind: PayComponentKind,
        name: String,
        amount: Decimal,
    ) -> Result<employee_pay_components::Model, PayrollError> {
        if amount < Decimal::ZERO {
            return Err(PayrollError::NegativeAmount);
        }
        if !within_amount_range(amount) {
            return Err(PayrollError::AmountOutOfRange);
        }
        let component = employee_pay_components::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id.into_inner()),
            kind: Set(kind),
            name: Set(name),
            amount: Set(amount),
            is_active: Set(true),
        };
        component.insert(&self.db).await.map_err(payroll_db_error)
    }

    /// Loads every employee with their pay components.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn load_profiles<C>(conn: &C) -> Result<Vec<EmployeeProfile>, PayrollError>
    where
        C: ConnectionTrait,
    {
        let employees = employees::Entity::find()
            .order_by_asc(employees::Column::FullName)
            .all(conn)
            .await
            .map_err(payroll_db_error)?;

        let mut components: HashMap<Uuid, Vec<employee_pay_components::Model>> = HashMap::new();
        for component in employee_pay_components::Entity::find()
            .all(conn)
            .await
            .map_err(payroll_db_error)?
        {
            components
                .entry(component.employee_id)
                .or_default()
                .push(component);
        }

        Ok(employees
            .into_iter()
            .map(|employee| {
                let (allowances, deductions): (Vec<_>, Vec<_>) = components
                    .remove(&employee.id)
                    .unwrap_or_default()
                    .into_iter()
                    .partition(|c| c.kind == PayComponentKind::Allowance);

                EmployeeProfile {
                    id: EmployeeId::from_uuid(employee.id),
                    name: employee.full_name,
                    base_salary: employee.base_salary,
                    is_active: employee.is_active,
                    employment_status: employee.employment_status.into(),
                    allowances: allowances.into_iter().map(pay_component).collect(),
                    deductions: deductions.into_iter().map(pay_component).collect(),
                }
            })
            .collect())
    }

    /// Builds the approval organisation chart.
    ///
    /// Every employee with a login becomes a node whose manager is the
    /// manager employee's login. Managers without a login end the chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn load_org_chart<C>(conn: &C) -> Result<OrgChart, PayrollError>
    where
        C: ConnectionTrait,
    {
        let employees = employees::Entity::find()
            .filter(employees::Column::UserId.is_not_null())
            .all(conn)
            .await
            .map_err(payroll_db_error)?;

        let logins: HashMap<Uuid, Uuid> = employees
            .iter()
            .filter_map(|e| e.user_id.map(|user| (e.id, user)))
            .collect();

        let mut chart = OrgChart::new();
        for employee in employees {
            let Some(user) = employee.user_id else {
                continue;
            };
            let manager = employee
                .manager_id
                .and_then(|m| logins.get(&m).copied())
                .map(UserId::from_uuid);
            chart.insert(UserId::from_uuid(user), employee.full_name, manager);
        }
        Ok(chart)
    }
}

fn pay_component(model: employee_pay_components::Model) -> PayComponent {
    PayComponent {
        name: model.name,
        amount: model.amount,
        is_active: model.is_active,
    }
}
