use std::sync::Arc;

use crate::{
    auth::Caller,
    errors::{AppError, AppResult},
    models::domain::resource::Subject,
    models::domain::Resource,
    models::dto::request::UploadResourceRequest,
    models::dto::response::SubjectCount,
    repositories::ResourceRepository,
};

/// Shared study files, browsable by subject. Any signed-in user may upload.
pub struct ResourceService {
    resources: Arc<dyn ResourceRepository>,
}

impl ResourceService {
    pub fn new(resources: Arc<dyn ResourceRepository>) -> Self {
        Self { resources }
    }

    /// Every subject in index order, including those with no uploads yet.
    pub async fn index(&self) -> AppResult<Vec<SubjectCount>> {
        let mut index = Vec::with_capacity(Subject::ALL.len());
        for subject in Subject::ALL {
            index.push(SubjectCount {
                code: subject.code(),
                name: subject.name(),
                count: self.resources.count_by_subject(subject).await?,
            });
        }
        Ok(index)
    }

    pub async fn upload(
        &self,
        caller: &Caller,
        request: UploadResourceRequest,
    ) -> AppResult<Resource> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        let file_url = request.file_url.trim();
        if !is_web_link(file_url) {
            return Err(AppError::ValidationError(
                "File must be an http or https link".to_string(),
            ));
        }

        let resource = Resource::new(
            title,
            request.subject,
            request.description.trim(),
            file_url,
            &caller.user_id,
            &caller.username,
        );
        let resource = self.resources.create(resource).await?;
        log::info!(
            "Resource {} uploaded to {} by {}",
            resource.id,
            resource.subject.code(),
            caller.username
        );
        Ok(resource)
    }

    /// Resources of one subject, newest first. Unknown codes read as not found.
    pub async fn list_subject(&self, code: &str) -> AppResult<Vec<Resource>> {
        let subject = code
            .parse::<Subject>()
            .map_err(|_| AppError::not_found("Subject", code))?;
        self.resources.find_by_subject(subject).await
    }
}

fn is_web_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.len() > scheme.len() && lower.starts_with(scheme))
}
