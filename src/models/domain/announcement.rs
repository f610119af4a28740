use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Important => "important",
            Priority::Urgent => "urgent",
        }
    }
}

/// Value of a target column; "all" matches every requested value.
pub const TARGET_ALL: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub author_id: String,
    pub priority: Priority,
    pub is_pinned: bool,
    pub target_year: String,
    pub target_stream: String,
    pub target_branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn new(title: &str, body: &str, author_id: &str) -> Self {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            image_url: None,
            author_id: author_id.to_string(),
            priority: Priority::Normal,
            is_pinned: false,
            target_year: TARGET_ALL.to_string(),
            target_stream: TARGET_ALL.to_string(),
            target_branch: TARGET_ALL.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Query-string filters of the announcement board. Empty values are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AnnouncementFilter {
    pub search: Option<String>,
    pub year: Option<String>,
    pub stream: Option<String>,
    pub branch: Option<String>,
    pub priority: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Audience targets and priorities are stored lowercase.
fn lowered(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_lowercase)
}

impl AnnouncementFilter {
    pub fn search_term(&self) -> Option<&str> {
        non_empty(&self.search)
    }

    pub fn year(&self) -> Option<String> {
        lowered(&self.year)
    }

    pub fn stream(&self) -> Option<String> {
        lowered(&self.stream)
    }

    pub fn branch(&self) -> Option<String> {
        lowered(&self.branch)
    }

    pub fn priority(&self) -> Option<String> {
        lowered(&self.priority)
    }

    /// Conjunction of the text, audience and priority filters.
    pub fn matches(&self, announcement: &Announcement) -> bool {
        let text_ok = self.search_term().map_or(true, |term| {
            let term = term.to_lowercase();
            announcement.title.to_lowercase().contains(&term)
                || announcement.body.to_lowercase().contains(&term)
        });

        text_ok
            && target_matches(&announcement.target_year, self.year().as_deref())
            && target_matches(&announcement.target_stream, self.stream().as_deref())
            && target_matches(&announcement.target_branch, self.branch().as_deref())
            && self
                .priority()
                .map_or(true, |p| announcement.priority.as_str() == p.as_str())
    }
}

fn target_matches(target: &str, requested: Option<&str>) -> bool {
    match requested {
        None => true,
        Some(value) => target == TARGET_ALL || target == value,
    }
}

/// Board ordering: pinned first, newest first.
pub fn board_order(a: &Announcement, b: &Announcement) -> std::cmp::Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
