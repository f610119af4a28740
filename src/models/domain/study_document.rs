use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text extracted from a document a user uploaded for Q&A.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudyDocument {
    pub id: String,
    pub owner_id: String,
    pub filename: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

impl StudyDocument {
    pub fn new(owner_id: &str, filename: &str, content: &str) -> Self {
        StudyDocument {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            filename: filename.to_string(),
            content: content.to_string(),
            uploaded_at: Utc::now(),
        }
    }
}
