use std::{collections::HashMap, sync::Arc};

use crate::{
    auth::Caller,
    errors::{AppError, AppResult},
    models::domain::{user::UserRole, Profile, User},
    models::dto::request::UpdateProfileRequest,
    models::dto::response::{ProfileResponse, StudentSummary},
    repositories::{ProfileRepository, UserRepository},
};

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { users, profiles }
    }

    /// Loads the user's profile, creating the default student profile when it is missing.
    pub async fn ensure_profile(&self, user_id: &str) -> AppResult<Profile> {
        if let Some(profile) = self.profiles.find_by_user_id(user_id).await? {
            return Ok(profile);
        }

        log::warn!("Profile missing for user {}, creating default", user_id);
        match self.profiles.create(Profile::default_for(user_id)).await {
            Ok(profile) => Ok(profile),
            // a concurrent request created it first
            Err(AppError::Conflict(_)) => self
                .profiles
                .find_by_user_id(user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Profile", user_id)),
            Err(e) => Err(e),
        }
    }

    pub async fn get_profile(&self, caller: &Caller) -> AppResult<ProfileResponse> {
        let user = self.load_user(&caller.user_id).await?;
        let profile = self.ensure_profile(&caller.user_id).await?;
        Ok(ProfileResponse::new(user, profile))
    }

    pub async fn update_profile(
        &self,
        caller: &Caller,
        mut request: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        let mut user = self.load_user(&caller.user_id).await?;
        let mut profile = self.ensure_profile(&caller.user_id).await?;

        if request.first_name.is_some() || request.last_name.is_some() {
            if let Some(first_name) = request.first_name.take() {
                user.first_name = first_name;
            }
            if let Some(last_name) = request.last_name.take() {
                user.last_name = last_name;
            }
            self.users
                .rename(&user.id, &user.first_name, &user.last_name)
                .await?;
        }

        apply_profile_changes(&mut profile, &request);
        let profile = self.profiles.update(profile).await?;

        log::info!("Updated profile for user {}", caller.user_id);
        Ok(ProfileResponse::new(user, profile))
    }

    /// Every student, sorted by username.
    pub async fn list_students(&self, caller: &Caller) -> AppResult<Vec<StudentSummary>> {
        caller.require_faculty()?;

        let profiles = self.profiles.find_by_role(UserRole::Student).await?;
        let ids: Vec<String> = profiles.iter().map(|p| p.user_id.clone()).collect();
        let by_id: HashMap<&str, &Profile> =
            profiles.iter().map(|p| (p.user_id.as_str(), p)).collect();

        let mut users = self.users.find_by_ids(&ids).await?;
        users.sort_by(|a, b| a.username.cmp(&b.username));

        Ok(users
            .iter()
            .map(|u| StudentSummary::new(u, by_id.get(u.id.as_str()).copied()))
            .collect())
    }

    /// Summaries for the given ids, in the order given. Unknown ids are skipped.
    pub async fn summaries(&self, ids: &[String]) -> AppResult<Vec<StudentSummary>> {
        let users = self.users.find_by_ids(ids).await?;
        let users: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = users.get(id.as_str()) {
                let profile = self.profiles.find_by_user_id(id).await?;
                summaries.push(StudentSummary::new(user, profile.as_ref()));
            }
        }
        Ok(summaries)
    }

    /// Fails with a validation error unless `user_id` names a user with `role`.
    pub async fn require_role(&self, user_id: &str, role: UserRole, what: &str) -> AppResult<()> {
        match self.profiles.find_by_user_id(user_id).await? {
            Some(profile) if profile.role == role => Ok(()),
            _ => Err(AppError::ValidationError(format!(
                "{} '{}' is not a registered {}",
                what,
                user_id,
                role.as_str()
            ))),
        }
    }

    pub async fn student_ids(&self) -> AppResult<Vec<String>> {
        let profiles = self.profiles.find_by_role(UserRole::Student).await?;
        Ok(profiles.into_iter().map(|p| p.user_id).collect())
    }

    async fn load_user(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::AuthenticationRequired("Account no longer exists".to_string()))
    }
}

fn apply_profile_changes(profile: &mut Profile, request: &UpdateProfileRequest) {
    set_text(&mut profile.phone, &request.phone);
    set_text(&mut profile.avatar_url, &request.avatar_url);
    set_text(&mut profile.linkedin, &request.linkedin);
    set_text(&mut profile.codechef, &request.codechef);
    set_text(&mut profile.leetcode, &request.leetcode);

    match profile.role {
        UserRole::Student => {
            set_text(&mut profile.roll_no, &request.roll_no);
            if request.year.is_some() {
                profile.year = request.year;
            }
            if request.branch.is_some() {
                profile.branch = request.branch;
            }
        }
        UserRole::Faculty => {
            set_text(&mut profile.teacher_id, &request.teacher_id);
            set_text(&mut profile.department, &request.department);
            if request.experience_years.is_some() {
                profile.experience_years = request.experience_years;
            }
            set_text(&mut profile.subjects_teaching, &request.subjects_teaching);
        }
    }
}

/// Absent leaves the field alone; blank clears it.
fn set_text(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *slot = non_blank(value);
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
