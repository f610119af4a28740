use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::complaint::Urgency;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A leave/permission request from a student to one faculty member.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PermissionRequest {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub heading: String,
    pub description: String,
    pub permission_type: String,
    pub urgency: Urgency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PermissionStatus,
    pub remark: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub amended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PermissionRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        student_id: &str,
        teacher_id: &str,
        heading: &str,
        description: &str,
        permission_type: &str,
        urgency: Urgency,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Self> {
        validate_period(start_date, end_date)?;
        let now = Utc::now();
        Ok(PermissionRequest {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            teacher_id: teacher_id.to_string(),
            heading: heading.to_string(),
            description: description.to_string(),
            permission_type: permission_type.to_string(),
            urgency,
            start_date,
            end_date,
            status: PermissionStatus::Pending,
            remark: None,
            decided_at: None,
            amended: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == PermissionStatus::Pending
    }
}

/// A faculty decision or amendment, written as one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub status: PermissionStatus,
    pub remark: Option<String>,
    pub amended: bool,
    pub at: DateTime<Utc>,
}

impl PermissionRequest {
    pub fn apply(&mut self, decision: &Decision) {
        self.status = decision.status;
        self.remark = decision.remark.clone();
        self.amended = self.amended || decision.amended;
        self.decided_at = Some(decision.at);
        self.updated_at = decision.at;
    }
}

pub fn validate_period(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<()> {
    if end_date < start_date {
        return Err(AppError::ValidationError(
            "End date cannot be before the start date".to_string(),
        ));
    }
    Ok(())
}
