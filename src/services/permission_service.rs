use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::Caller,
    errors::{AppError, AppResult},
    models::domain::permission_request::{validate_period, Decision, PermissionStatus},
    models::domain::user::UserRole,
    models::domain::PermissionRequest,
    models::dto::request::{
        AmendPermissionRequest, CreatePermissionRequest, EditPermissionRequest,
        PermissionDecisionRequest,
    },
    repositories::PermissionRepository,
    services::profile_service::ProfileService,
};

pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
    profile_service: Arc<ProfileService>,
}

impl PermissionService {
    pub fn new(
        permissions: Arc<dyn PermissionRepository>,
        profile_service: Arc<ProfileService>,
    ) -> Self {
        Self {
            permissions,
            profile_service,
        }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreatePermissionRequest,
    ) -> AppResult<PermissionRequest> {
        caller.require_student()?;

        let teacher_id = request.teacher_id.trim();
        self.profile_service
            .require_role(teacher_id, UserRole::Faculty, "Teacher")
            .await?;

        let permission = PermissionRequest::new(
            &caller.user_id,
            teacher_id,
            request.heading.trim(),
            request.description.trim(),
            request.permission_type.trim(),
            request.urgency,
            request.start_date,
            request.end_date,
        )?;
        let permission = self.permissions.create(permission).await?;
        log::info!("Permission request {} filed by {}", permission.id, caller.username);
        Ok(permission)
    }

    pub async fn list(&self, caller: &Caller) -> AppResult<Vec<PermissionRequest>> {
        if caller.is_faculty() {
            self.permissions.find_by_teacher(&caller.user_id).await
        } else {
            self.permissions.find_by_student(&caller.user_id).await
        }
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<PermissionRequest> {
        self.permissions
            .find_by_id(id)
            .await?
            .filter(|p| p.student_id == caller.user_id || p.teacher_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Permission request", id))
    }

    pub async fn edit(
        &self,
        caller: &Caller,
        id: &str,
        request: EditPermissionRequest,
    ) -> AppResult<PermissionRequest> {
        let mut permission = self.owned_pending(caller, id).await?;
        validate_period(request.start_date, request.end_date)?;

        permission.heading = request.heading.trim().to_string();
        permission.description = request.description.trim().to_string();
        permission.permission_type = request.permission_type.trim().to_string();
        permission.urgency = request.urgency;
        permission.start_date = request.start_date;
        permission.end_date = request.end_date;
        permission.updated_at = Utc::now();

        if !self.permissions.edit_pending(&permission).await? {
            return Err(no_longer_pending());
        }
        Ok(permission)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let permission = self.owned_pending(caller, id).await?;
        if !self.permissions.delete_pending(&permission.id).await? {
            return Err(no_longer_pending());
        }
        Ok(())
    }

    /// The receiving faculty decides once, from pending.
    pub async fn decide(
        &self,
        caller: &Caller,
        id: &str,
        request: PermissionDecisionRequest,
    ) -> AppResult<PermissionRequest> {
        let permission = self.addressed(caller, id).await?;

        if !permission.is_pending() {
            return Err(AppError::Conflict(
                "Request is already decided; use amend to change the decision".to_string(),
            ));
        }
        if request.status == PermissionStatus::Pending {
            return Err(AppError::ValidationError(
                "Decision must be accepted or rejected".to_string(),
            ));
        }

        let decision = Decision {
            status: request.status,
            remark: request.remark.filter(|r| !r.trim().is_empty()),
            amended: false,
            at: Utc::now(),
        };
        self.record(permission, decision).await
    }

    /// Re-decides an already decided request; the reason replaces the remark.
    pub async fn amend(
        &self,
        caller: &Caller,
        id: &str,
        request: AmendPermissionRequest,
    ) -> AppResult<PermissionRequest> {
        let permission = self.addressed(caller, id).await?;

        if permission.is_pending() {
            return Err(AppError::Conflict(
                "Request has no decision to amend yet".to_string(),
            ));
        }
        if request.status == PermissionStatus::Pending {
            return Err(AppError::ValidationError(
                "A decision cannot be amended back to pending".to_string(),
            ));
        }
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError("A reason is required".to_string()));
        }

        log::info!(
            "Permission request {} amended by {} from {:?} to {:?}",
            permission.id,
            caller.username,
            permission.status,
            request.status
        );
        let decision = Decision {
            status: request.status,
            remark: Some(reason.to_string()),
            amended: true,
            at: Utc::now(),
        };
        self.record(permission, decision).await
    }

    async fn record(
        &self,
        mut permission: PermissionRequest,
        decision: Decision,
    ) -> AppResult<PermissionRequest> {
        if !self
            .permissions
            .record_decision(&permission.id, permission.status, &decision)
            .await?
        {
            return Err(AppError::Conflict(
                "Request was changed by another request; reload it".to_string(),
            ));
        }
        permission.apply(&decision);
        Ok(permission)
    }

    async fn owned_pending(&self, caller: &Caller, id: &str) -> AppResult<PermissionRequest> {
        caller.require_student()?;
        let permission = self
            .permissions
            .find_by_id(id)
            .await?
            .filter(|p| p.student_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Permission request", id))?;

        if !permission.is_pending() {
            return Err(no_longer_pending());
        }
        Ok(permission)
    }

    async fn addressed(&self, caller: &Caller, id: &str) -> AppResult<PermissionRequest> {
        caller.require_faculty()?;
        self.permissions
            .find_by_id(id)
            .await?
            .filter(|p| p.teacher_id == caller.user_id)
            .ok_or_else(|| AppError::not_found("Permission request", id))
    }
}

fn no_longer_pending() -> AppError {
    AppError::Conflict("Request can no longer be changed".to_string())
}
