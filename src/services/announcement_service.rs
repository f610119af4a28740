use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::Caller,
    errors::{AppError, AppResult},
    models::domain::announcement::{AnnouncementFilter, TARGET_ALL},
    models::domain::profile::{Branch, Stream},
    models::domain::Announcement,
    models::dto::request::AnnouncementRequest,
    models::dto::response::AnnouncementBoard,
    repositories::AnnouncementRepository,
};

pub struct AnnouncementService {
    announcements: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(announcements: Arc<dyn AnnouncementRepository>) -> Self {
        Self { announcements }
    }

    pub async fn board(&self, filter: &AnnouncementFilter) -> AppResult<AnnouncementBoard> {
        let announcements = self.announcements.find_filtered(filter).await?;
        Ok(AnnouncementBoard::from_ordered(announcements))
    }

    pub async fn get(&self, id: &str) -> AppResult<Announcement> {
        self.announcements
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Announcement", id))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: AnnouncementRequest,
    ) -> AppResult<Announcement> {
        caller.require_faculty()?;

        let mut announcement = Announcement::new(
            request.title.trim(),
            request.body.trim(),
            &caller.user_id,
        );
        apply_request(&mut announcement, request)?;

        let announcement = self.announcements.create(announcement).await?;
        log::info!("Announcement {} posted by {}", announcement.id, caller.username);
        Ok(announcement)
    }

    /// Any faculty member may edit any announcement.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        request: AnnouncementRequest,
    ) -> AppResult<Announcement> {
        caller.require_faculty()?;

        let mut announcement = self.get(id).await?;
        announcement.title = request.title.trim().to_string();
        announcement.body = request.body.trim().to_string();
        apply_request(&mut announcement, request)?;
        announcement.updated_at = Utc::now();

        self.announcements.update(announcement).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        caller.require_faculty()?;

        if !self.announcements.delete(id).await? {
            return Err(AppError::not_found("Announcement", id));
        }
        log::info!("Announcement {} deleted by {}", id, caller.username);
        Ok(())
    }
}

fn apply_request(announcement: &mut Announcement, request: AnnouncementRequest) -> AppResult<()> {
    if announcement.title.is_empty() || announcement.body.is_empty() {
        return Err(AppError::ValidationError(
            "Title and body are required".to_string(),
        ));
    }
    announcement.image_url = request.image_url.filter(|u| !u.trim().is_empty());
    announcement.priority = request.priority;
    announcement.is_pinned = request.is_pinned;
    announcement.target_year = target_value(request.target_year, valid_year, "year")?;
    announcement.target_stream = target_value(request.target_stream, valid_stream, "stream")?;
    announcement.target_branch = target_value(request.target_branch, valid_branch, "branch")?;
    Ok(())
}

/// Missing or blank targets mean everyone.
fn target_value(
    value: Option<String>,
    is_valid: fn(&str) -> bool,
    what: &str,
) -> AppResult<String> {
    let value = value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| TARGET_ALL.to_string());

    if value == TARGET_ALL || is_valid(&value) {
        Ok(value)
    } else {
        Err(AppError::ValidationError(format!(
            "Unknown target {} '{}'",
            what, value
        )))
    }
}

fn valid_year(value: &str) -> bool {
    matches!(value, "1" | "2" | "3" | "4")
}

fn valid_stream(value: &str) -> bool {
    [Stream::Computing, Stream::NonComputing]
        .iter()
        .any(|s| s.code() == value)
}

fn valid_branch(value: &str) -> bool {
    Branch::from_code(value).is_some()
}
