//! Fiscal period repository.
//!
//! Periods are read-only to posting; creation and flag changes exist for
//! seeding and the external period-close process.

use chrono::{Datelike, NaiveDate, Utc};
use paybook_core::ledger::{FiscalPeriodInfo, LedgerError};
use paybook_shared::types::FiscalPeriodId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::ledger_db_error;
use crate::entities::fiscal_periods;

/// Fiscal period repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates one open period.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_period(
        &self,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<fiscal_periods::Model, LedgerError> {
        period_model(name.into(), start_date, end_date)
            .insert(&self.db)
            .await
            .map_err(ledger_db_error)
    }

    /// Creates the twelve monthly periods of a calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is out of range or an insert fails.
    pub async fn create_monthly_periods(
        &self,
        year: i32,
    ) -> Result<Vec<fiscal_periods::Model>, LedgerError> {
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Err(LedgerError::Internal(format!("invalid fiscal year {year}")));
        };

        let txn = self.db.begin().await.map_err(ledger_db_error)?;
        let mut created = Vec::with_capacity(12);
        for (name, period_start, period_end) in monthly_periods(start, end) {
            let model = period_model(name, period_start, period_end)
                .insert(&txn)
                .await
                .map_err(ledger_db_error)?;
            created.push(model);
        }
        txn.commit().await.map_err(ledger_db_error)?;

        tracing::info!(year, periods = created.len(), "created monthly fiscal periods");
        Ok(created)
    }

    /// Sets the lock and close flags of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist or the update fails.
    pub async fn set_flags(
        &self,
        id: FiscalPeriodId,
        is_locked: bool,
        is_closed: bool,
    ) -> Result<fiscal_periods::Model, LedgerError> {
        let period = fiscal_periods::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(ledger_db_error)?
            .ok_or_else(|| LedgerError::Internal(format!("fiscal period {id} not found")))?;

        let mut active: fiscal_periods::ActiveModel = period.into();
        active.is_locked = Set(is_locked);
        active.is_closed = Set(is_closed);
        active.update(&self.db).await.map_err(ledger_db_error)
    }

    /// Finds the period covering `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_period_on<C>(
        conn: &C,
        date: NaiveDate,
    ) -> Result<Option<FiscalPeriodInfo>, LedgerError>
    where
        C: ConnectionTrait,
    {
        let period = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::StartDate.lte(date))
            .filter(fiscal_periods::Column::EndDate.gte(date))
            .order_by_desc(fiscal_periods::Column::StartDate)
            .one(conn)
            .await
            .map_err(ledger_db_error)?;

        Ok(period.map(|p| FiscalPeriodInfo {
            id: FiscalPeriodId::from_uuid(p.id),
            start_date: p.start_date,
            end_date: p.end_date,
            is_locked: p.is_locked,
            is_closed: p.is_closed,
        }))
    }
}

fn period_model(name: String, start_date: NaiveDate, end_date: NaiveDate) -> fiscal_periods::ActiveModel {
    fiscal_periods::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_locked: Set(false),
        is_closed: Set(false),
        created_at: Set(Utc::now().into()),
    }
}

/// Splits `[start_date, end_date]` into calendar months.
fn monthly_periods(start_date: NaiveDate, end_date: NaiveDate) -> Vec<(String, NaiveDate, NaiveDate)> {
    let mut periods = Vec::new();
    let mut current = start_date;

    while current <= end_date {
        let month_end = last_day_of_month(current.year(), current.month()).unwrap_or(end_date);
        let period_end = month_end.min(end_date);

        let name = format!("{} {}", month_name(current.month()), current.year());
        periods.push((name, current, period_end));

        match period_end.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    periods
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month?.pred_opt()
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_monthly_periods_full_year() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

        let periods = monthly_periods(start, end);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].0, "January 2026");
        assert_eq!(periods[1].2, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(periods[11].1, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(periods[11].2, end);
    }

    #[test]
    fn test_monthly_periods_are_contiguous() {
        let start = NaiveDate::from_ymd_opt(2028, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2028, 12, 31).unwrap();

        let periods = monthly_periods(start, end);
        for pair in periods.windows(2) {
            assert_eq!(pair[0].2.succ_opt().unwrap(), pair[1].1);
        }
        assert_eq!(periods[1].2, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[rstest]
    #[case(2026, 12, 31)]
    #[case(2026, 4, 30)]
    #[case(2026, 2, 28)]
    #[case(2028, 2, 29)]
    fn test_last_day_of_month(#[case] year: i32, #[case] month: u32, #[case] day: u32) {
        assert_eq!(
            last_day_of_month(year, month),
            NaiveDate::from_ymd_opt(year, month, day)
        );
    }
}
