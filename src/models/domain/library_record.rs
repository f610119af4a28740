use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Highest accepted daily rate, 10000.00.
pub const MAX_PENALTY_PER_DAY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

/// A book loan. Penalties are derived on read from the dates and the rate; nothing
/// accrued is ever stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibraryRecord {
    pub id: String,
    pub book_name: String,
    pub book_number: String,
    pub issued_by: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub penalty_per_day: Decimal,
    pub is_returned: bool,
    pub returned_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl LibraryRecord {
    pub fn issue(
        book_name: &str,
        book_number: &str,
        issued_by: &str,
        student_id: &str,
        start_date: NaiveDate,
        due_date: NaiveDate,
        penalty_per_day: Decimal,
    ) -> Self {
        LibraryRecord {
            id: Uuid::new_v4().to_string(),
            book_name: book_name.to_string(),
            book_number: book_number.to_string(),
            issued_by: issued_by.to_string(),
            student_id: student_id.to_string(),
            start_date,
            due_date,
            penalty_per_day,
            is_returned: false,
            returned_date: None,
            created_at: Utc::now(),
        }
    }

    /// Whole days past the due date, zero once returned.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_returned {
            return 0;
        }
        (today - self.due_date).num_days().max(0)
    }

    pub fn current_penalty(&self, today: NaiveDate) -> AppResult<Decimal> {
        Decimal::from(self.days_overdue(today))
            .checked_mul(self.penalty_per_day)
            .ok_or_else(|| penalty_overflow(&self.id))
    }

    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        if self.is_returned {
            LoanStatus::Returned
        } else if self.days_overdue(today) > 0 {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }
}

/// Sum of the current penalties of `records`.
pub fn total_penalty<'a>(
    records: impl IntoIterator<Item = &'a LibraryRecord>,
    today: NaiveDate,
) -> AppResult<Decimal> {
    records.into_iter().try_fold(Decimal::ZERO, |total, record| {
        total
            .checked_add(record.current_penalty(today)?)
            .ok_or_else(|| penalty_overflow(&record.id))
    })
}

fn penalty_overflow(record_id: &str) -> AppError {
    AppError::InternalError(format!("Penalty for record {} is out of range", record_id))
}

/// Daily rates are non-negative whole cents up to `MAX_PENALTY_PER_DAY`.
pub fn check_penalty_rate(rate: Decimal) -> AppResult<()> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(AppError::ValidationError(
            "Penalty per day cannot be negative".to_string(),
        ));
    }
    if rate.normalize().scale() > 2 {
        return Err(AppError::ValidationError(
            "Penalty per day has at most two decimal places".to_string(),
        ));
    }
    if rate > MAX_PENALTY_PER_DAY {
        return Err(AppError::ValidationError(format!(
            "Penalty per day cannot exceed {}",
            format_amount(MAX_PENALTY_PER_DAY)
        )));
    }
    Ok(())
}

/// Money rendered at the API boundary.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
