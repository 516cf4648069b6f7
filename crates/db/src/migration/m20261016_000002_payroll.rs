//! Payroll schema: employee directory, cycles, items and disbursements.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    UserId,
    FullName,
    ManagerId,
    BaseSalary,
    IsActive,
    EmploymentStatus,
    CreatedAt,
}

#[derive(Iden)]
enum EmployeePayComponents {
    Table,
    Id,
    EmployeeId,
    Kind,
    Name,
    Amount,
    IsActive,
}

#[derive(Iden)]
enum PayrollCycles {
    Table,
    Id,
    Name,
    CycleType,
    PeriodStart,
    PeriodEnd,
    PaymentDate,
    Status,
    CurrentApproverId,
    ApprovalTrail,
    TotalGross,
    TotalDeductions,
    TotalNet,
    CreatedBy,
    ApprovedBy,
    ApprovedAt,
    AccrualVoucher,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PayrollItems {
    Table,
    Id,
    CycleId,
    EmployeeId,
    BaseSalary,
    Allowances,
    Deductions,
    GrossSalary,
    NetSalary,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PayrollTransactions {
    Table,
    Id,
    PayrollItemId,
    EmployeeId,
    Amount,
    TransactionType,
    TransactionDate,
    VoucherNumber,
    Notes,
    CreatedBy,
    CreatedAt,
}

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).decimal_len(16, 4).not_null().default(0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Employee directory
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::UserId).uuid())
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(ColumnDef::new(Employees::ManagerId).uuid())
                    .col(money(Employees::BaseSalary))
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employees::EmploymentStatus)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employees-manager_id")
                            .from(Employees::Table, Employees::ManagerId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeePayComponents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeePayComponents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeePayComponents::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePayComponents::Kind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeePayComponents::Name)
                            .string()
                            .not_null(),
                    )
                    .col(money(EmployeePayComponents::Amount))
                    .col(
                        ColumnDef::new(EmployeePayComponents::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee_pay_components-employee_id")
                            .from(
                                EmployeePayComponents::Table,
                                EmployeePayComponents::EmployeeId,
                            )
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Cycles and items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PayrollCycles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayrollCycles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PayrollCycles::Name).string().not_null())
                    .col(ColumnDef::new(PayrollCycles::CycleType).string().not_null())
                    .col(ColumnDef::new(PayrollCycles::PeriodStart).date().not_null())
                    .col(ColumnDef::new(PayrollCycles::PeriodEnd).date().not_null())
                    .col(ColumnDef::new(PayrollCycles::PaymentDate).date())
                    .col(
                        ColumnDef::new(PayrollCycles::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(PayrollCycles::CurrentApproverId).uuid())
                    .col(ColumnDef::new(PayrollCycles::ApprovalTrail).json().not_null())
                    .col(money(PayrollCycles::TotalGross))
                    .col(money(PayrollCycles::TotalDeductions))
                    .col(money(PayrollCycles::TotalNet))
                    .col(ColumnDef::new(PayrollCycles::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(PayrollCycles::ApprovedBy).uuid())
                    .col(ColumnDef::new(PayrollCycles::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PayrollCycles::AccrualVoucher).string())
                    .col(ColumnDef::new(PayrollCycles::Notes).string())
                    .col(
                        ColumnDef::new(PayrollCycles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollCycles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayrollItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PayrollItems::CycleId).uuid().not_null())
                    .col(ColumnDef::new(PayrollItems::EmployeeId).uuid().not_null())
                    .col(money(PayrollItems::BaseSalary))
                    .col(money(PayrollItems::Allowances))
                    .col(money(PayrollItems::Deductions))
                    .col(money(PayrollItems::GrossSalary))
                    .col(money(PayrollItems::NetSalary))
                    .col(
                        ColumnDef::new(PayrollItems::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(PayrollItems::Notes).string())
                    .col(
                        ColumnDef::new(PayrollItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payroll_items-cycle_id")
                            .from(PayrollItems::Table, PayrollItems::CycleId)
                            .to(PayrollCycles::Table, PayrollCycles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payroll_items-employee_id")
                            .from(PayrollItems::Table, PayrollItems::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payroll_items-cycle_id-employee_id-unique")
                    .table(PayrollItems::Table)
                    .col(PayrollItems::CycleId)
                    .col(PayrollItems::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Disbursements
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PayrollTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayrollTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::PayrollItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::TransactionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayrollTransactions::VoucherNumber).string())
                    .col(ColumnDef::new(PayrollTransactions::Notes).string())
                    .col(
                        ColumnDef::new(PayrollTransactions::CreatedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payroll_transactions-payroll_item_id")
                            .from(
                                PayrollTransactions::Table,
                                PayrollTransactions::PayrollItemId,
                            )
                            .to(PayrollItems::Table, PayrollItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payroll_transactions-payroll_item_id")
                    .table(PayrollTransactions::Table)
                    .col(PayrollTransactions::PayrollItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayrollTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayrollItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayrollCycles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeePayComponents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}
