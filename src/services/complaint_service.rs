use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::Caller,
    errors::{AppError, AppResult},
    models::domain::complaint::ComplaintStatus,
    models::domain::user::UserRole,
    models::domain::Complaint,
    models::dto::request::{AmendComplaintRequest, CreateComplaintRequest, EditComplaintRequest},
    repositories::ComplaintRepository,
    services::profile_service::ProfileService,
};

pub struct ComplaintService {
    complaints: Arc<dyn ComplaintRepository>,
    profile_service: Arc<ProfileService>,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        profile_service: Arc<ProfileService>,
    ) -> Self {
        Self {
            complaints,
            profile_service,
        }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateComplaintRequest,
    ) -> AppResult<Complaint> {
        caller.require_student()?;

        let teacher_id = request.teacher_id.trim();
        self.profile_service
            .require_role(teacher_id, UserRole::Faculty, "Teacher")
            .await?;

        let complaint = Complaint::new(
            &caller.user_id,
            teacher_id,
            request.heading.trim(),
            request.description.trim(),
            request.complaint_type.trim(),
            request.urgency,
        );
        let complaint = self.complaints.create(complaint).await?;
        log::info!("Complaint {} filed by {}", complaint.id, caller.username);
        Ok(complaint)
    }

    /// Students see what they filed; faculty see what is addressed to them.
    pub async fn list(&self, caller: &Caller) -> AppResult<Vec<Complaint>> {
        if caller.is_faculty() {
            self.complaints.find_by_teacher(&caller.user_id).await
        } else {
            self.complaints.find_by_student(&caller.user_id).await
        }
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<Complaint> {
        self.complaints
            .find_by_id(id)
            .await?
            .filter(|c| c.student_id == caller.user_id || c.teacher_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Complaint", id))
    }

    pub async fn edit(
        &self,
        caller: &Caller,
        id: &str,
        request: EditComplaintRequest,
    ) -> AppResult<Complaint> {
        let mut complaint = self.owned_pending(caller, id).await?;

        complaint.heading = request.heading.trim().to_string();
        complaint.description = request.description.trim().to_string();
        complaint.complaint_type = request.complaint_type.trim().to_string();
        complaint.urgency = request.urgency;
        complaint.updated_at = Utc::now();

        if !self.complaints.edit_pending(&complaint).await? {
            return Err(no_longer_pending());
        }
        Ok(complaint)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let complaint = self.owned_pending(caller, id).await?;
        if !self.complaints.delete_pending(&complaint.id).await? {
            return Err(no_longer_pending());
        }
        Ok(())
    }

    /// Forward progress by the receiving faculty: pending to viewed or solved, viewed to solved.
    pub async fn update_status(
        &self,
        caller: &Caller,
        id: &str,
        status: ComplaintStatus,
    ) -> AppResult<Complaint> {
        let mut complaint = self.addressed(caller, id).await?;

        if !complaint.status.can_advance_to(status) {
            return Err(AppError::Conflict(format!(
                "Complaint cannot move from {:?} to {:?}; use amend to change a decision",
                complaint.status, status
            )));
        }

        let now = Utc::now();
        if !self
            .complaints
            .set_status(&complaint.id, complaint.status, status, None, now)
            .await?
        {
            return Err(changed_concurrently());
        }
        complaint.status = status;
        complaint.updated_at = now;
        Ok(complaint)
    }

    /// Changes a decision already taken. The reason is kept on the record.
    pub async fn amend(
        &self,
        caller: &Caller,
        id: &str,
        request: AmendComplaintRequest,
    ) -> AppResult<Complaint> {
        let mut complaint = self.addressed(caller, id).await?;

        if complaint.is_pending() {
            return Err(AppError::Conflict(
                "Complaint has no decision to amend yet".to_string(),
            ));
        }
        if request.status == ComplaintStatus::Pending {
            return Err(AppError::ValidationError(
                "A decision cannot be amended back to pending".to_string(),
            ));
        }
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError("A reason is required".to_string()));
        }

        log::info!(
            "Complaint {} amended by {} from {:?} to {:?}",
            complaint.id,
            caller.username,
            complaint.status,
            request.status
        );
        let now = Utc::now();
        if !self
            .complaints
            .set_status(&complaint.id, complaint.status, request.status, Some(reason), now)
            .await?
        {
            return Err(changed_concurrently());
        }
        complaint.status = request.status;
        complaint.amendment_note = Some(reason.to_string());
        complaint.updated_at = now;
        Ok(complaint)
    }

    async fn owned_pending(&self, caller: &Caller, id: &str) -> AppResult<Complaint> {
        caller.require_student()?;
        let complaint = self
            .complaints
            .find_by_id(id)
            .await?
            .filter(|c| c.student_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Complaint", id))?;

        if !complaint.is_pending() {
            return Err(no_longer_pending());
        }
        Ok(complaint)
    }

    async fn addressed(&self, caller: &Caller, id: &str) -> AppResult<Complaint> {
        caller.require_faculty()?;
        self.complaints
            .find_by_id(id)
            .await?
            .filter(|c| c.teacher_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Complaint", id))
    }
}

fn no_longer_pending() -> AppError {
    AppError::Conflict("Complaint can no longer be changed".to_string())
}

fn changed_concurrently() -> AppError {
    AppError::Conflict("Complaint was changed by another request; reload it".to_string())
}
