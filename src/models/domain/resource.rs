use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Courses the resource library is organised by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Subject {
    #[serde(rename = "OOPS")]
    Oops,
    #[serde(rename = "ADS")]
    Ads,
    #[serde(rename = "DMGT")]
    Dmgt,
    #[serde(rename = "UHV")]
    Uhv,
    #[serde(rename = "AI")]
    Ai,
    Python,
}

impl Subject {
    /// Index order of the library.
    pub const ALL: [Subject; 6] = [
        Subject::Oops,
        Subject::Ads,
        Subject::Dmgt,
        Subject::Uhv,
        Subject::Ai,
        Subject::Python,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Subject::Oops => "OOPS",
            Subject::Ads => "ADS",
            Subject::Dmgt => "DMGT",
            Subject::Uhv => "UHV",
            Subject::Ai => "AI",
            Subject::Python => "Python",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Subject::Oops => "OOPs Through Java",
            Subject::Ads => "Algorithm Design",
            Subject::Dmgt => "Discrete Math & GT",
            Subject::Uhv => "Universal Human Values",
            Subject::Ai => "Artificial Intelligence",
            Subject::Python => "Python Programming",
        }
    }
}

impl FromStr for Subject {
    type Err = ();

    /// Codes are matched without regard to case, so `/resources/python` works.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|s| s.code().eq_ignore_ascii_case(code.trim()))
            .ok_or(())
    }
}

/// A shared study file. `file_url` is an opaque link to wherever the file is hosted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub subject: Subject,
    pub description: String,
    pub file_url: String,
    pub uploaded_by: String,
    pub uploader_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(
        title: &str,
        subject: Subject,
        description: &str,
        file_url: &str,
        uploaded_by: &str,
        uploader_name: &str,
    ) -> Self {
        Resource {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            subject,
            description: description.to_string(),
            file_url: file_url.to_string(),
            uploaded_by: uploaded_by.to_string(),
            uploader_name: uploader_name.to_string(),
            uploaded_at: Utc::now(),
        }
    }
}
