//! Ledger schema: chart of accounts, fiscal periods, document sequences and
//! the append-only general ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Code,
    Name,
    AccountType,
    ParentId,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum FiscalPeriods {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    IsLocked,
    IsClosed,
    CreatedAt,
}

#[derive(Iden)]
enum DocumentSequences {
    Table,
    Id,
    DocumentType,
    Prefix,
    CurrentNumber,
    Format,
    UpdatedAt,
}

#[derive(Iden)]
enum GeneralLedger {
    Table,
    Id,
    VoucherNumber,
    LineNumber,
    VoucherDate,
    AccountId,
    EntryType,
    Amount,
    Description,
    ReferenceType,
    ReferenceId,
    FiscalPeriodId,
    CreatedBy,
    IsClosed,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string().not_null())
                    .col(ColumnDef::new(Accounts::ParentId).uuid())
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-parent_id")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-parent_id")
                    .table(Accounts::Table)
                    .col(Accounts::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FiscalPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FiscalPeriods::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FiscalPeriods::Name).string().not_null())
                    .col(ColumnDef::new(FiscalPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(FiscalPeriods::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(FiscalPeriods::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FiscalPeriods::IsClosed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FiscalPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fiscal_periods-dates")
                    .table(FiscalPeriods::Table)
                    .col(FiscalPeriods::StartDate)
                    .col(FiscalPeriods::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentSequences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentSequences::DocumentType)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DocumentSequences::Prefix).string().not_null())
                    .col(
                        ColumnDef::new(DocumentSequences::CurrentNumber)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DocumentSequences::Format).string().not_null())
                    .col(
                        ColumnDef::new(DocumentSequences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeneralLedger::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneralLedger::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneralLedger::VoucherNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneralLedger::LineNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneralLedger::VoucherDate).date().not_null())
                    .col(ColumnDef::new(GeneralLedger::AccountId).uuid().not_null())
                    .col(ColumnDef::new(GeneralLedger::EntryType).string().not_null())
                    .col(
                        ColumnDef::new(GeneralLedger::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneralLedger::Description).string())
                    .col(ColumnDef::new(GeneralLedger::ReferenceType).string())
                    .col(ColumnDef::new(GeneralLedger::ReferenceId).string())
                    .col(
                        ColumnDef::new(GeneralLedger::FiscalPeriodId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneralLedger::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(GeneralLedger::IsClosed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GeneralLedger::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-general_ledger-account_id")
                            .from(GeneralLedger::Table, GeneralLedger::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-general_ledger-fiscal_period_id")
                            .from(GeneralLedger::Table, GeneralLedger::FiscalPeriodId)
                            .to(FiscalPeriods::Table, FiscalPeriods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-general_ledger-voucher-line-unique")
                    .table(GeneralLedger::Table)
                    .col(GeneralLedger::VoucherNumber)
                    .col(GeneralLedger::LineNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-general_ledger-account_id-voucher_date")
                    .table(GeneralLedger::Table)
                    .col(GeneralLedger::AccountId)
                    .col(GeneralLedger::VoucherDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-general_ledger-reference")
                    .table(GeneralLedger::Table)
                    .col(GeneralLedger::ReferenceType)
                    .col(GeneralLedger::ReferenceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneralLedger::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentSequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FiscalPeriods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
