use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    auth::Caller,
    clock::Clock,
    errors::{AppError, AppResult},
    models::domain::library_record::{check_penalty_rate, format_amount, total_penalty},
    models::domain::user::UserRole,
    models::domain::LibraryRecord,
    models::dto::request::IssueBookRequest,
    models::dto::response::{LibraryRecordResponse, PenaltyReadout, StudentLibraryResponse},
    repositories::LibraryRecordRepository,
    services::profile_service::ProfileService,
};

pub struct LibraryService {
    records: Arc<dyn LibraryRecordRepository>,
    profile_service: Arc<ProfileService>,
    clock: Arc<dyn Clock>,
}

impl LibraryService {
    pub fn new(
        records: Arc<dyn LibraryRecordRepository>,
        profile_service: Arc<ProfileService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records,
            profile_service,
            clock,
        }
    }

    pub async fn issue(
        &self,
        caller: &Caller,
        request: IssueBookRequest,
    ) -> AppResult<LibraryRecordResponse> {
        caller.require_faculty()?;

        if request.due_date < request.start_date {
            return Err(AppError::ValidationError(
                "Due date cannot be before the start date".to_string(),
            ));
        }
        let rate = request.penalty_per_day.unwrap_or(Decimal::ZERO);
        check_penalty_rate(rate)?;

        let student_id = request.student_id.trim();
        self.profile_service
            .require_role(student_id, UserRole::Student, "Student")
            .await?;

        let record = LibraryRecord::issue(
            request.book_name.trim(),
            request.book_number.trim(),
            &caller.user_id,
            student_id,
            request.start_date,
            request.due_date,
            rate,
        );
        let record = self.records.create(record).await?;

        log::info!(
            "Book {} issued to {} by {}",
            record.book_number,
            record.student_id,
            caller.username
        );
        LibraryRecordResponse::new(&record, self.clock.today())
    }

    pub async fn list_issued(&self, caller: &Caller) -> AppResult<Vec<LibraryRecordResponse>> {
        caller.require_faculty()?;
        let today = self.clock.today();

        let records = self.records.find_by_issuer(&caller.user_id).await?;
        records
            .iter()
            .map(|r| LibraryRecordResponse::new(r, today))
            .collect()
    }

    pub async fn list_borrowed(&self, caller: &Caller) -> AppResult<StudentLibraryResponse> {
        caller.require_student()?;
        let today = self.clock.today();

        let records = self.records.find_by_student(&caller.user_id).await?;
        let total = total_penalty(&records, today)?;

        Ok(StudentLibraryResponse {
            records: records
                .iter()
                .map(|r| LibraryRecordResponse::new(r, today))
                .collect::<AppResult<_>>()?,
            total_outstanding_penalty: format_amount(total),
        })
    }

    /// Only the issuing faculty may return a record, and only once.
    pub async fn mark_returned(
        &self,
        caller: &Caller,
        record_id: &str,
    ) -> AppResult<LibraryRecordResponse> {
        caller.require_faculty()?;

        let mut record = self
            .records
            .find_by_id(record_id)
            .await?
            .filter(|r| r.issued_by == caller.user_id)
            .ok_or_else(|| AppError::not_found("Library record", record_id))?;

        if record.is_returned {
            return Err(AppError::Conflict("Book is already returned".to_string()));
        }

        let today = self.clock.today();
        if !self.records.mark_returned(&record.id, today).await? {
            // returned by a concurrent request
            return Err(AppError::Conflict("Book is already returned".to_string()));
        }
        record.is_returned = true;
        record.returned_date = Some(today);

        log::info!("Library record {} returned on {}", record.id, today);
        LibraryRecordResponse::new(&record, today)
    }

    /// Admin-only correction that puts returned records back on loan.
    pub async fn unmark_returned(&self, caller: &Caller, record_ids: &[String]) -> AppResult<u64> {
        caller.require_admin()?;

        let updated = self.records.unmark_returned(record_ids).await?;
        log::warn!(
            "Admin {} unmarked {} library records as returned",
            caller.username,
            updated
        );
        Ok(updated)
    }

    /// Live readout for the borrowing student, recomputed on every call.
    pub async fn penalty(&self, caller: &Caller, record_id: &str) -> AppResult<PenaltyReadout> {
        caller.require_student()?;

        let record = self
            .records
            .find_by_id(record_id)
            .await?
            .filter(|r| r.student_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Library record", record_id))?;

        let today = self.clock.today();
        Ok(PenaltyReadout {
            record_id: record.id.clone(),
            days_overdue: record.days_overdue(today),
            current_penalty: format_amount(record.current_penalty(today)?),
            status: record.status(today),
        })
    }
}
