use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::announcement::Priority;
use crate::models::domain::complaint::{ComplaintStatus, Urgency};
use crate::models::domain::goal::{GoalType, QuestionDraft};
use crate::models::domain::goal_submission::SubmissionStatus;
use crate::models::domain::permission_request::PermissionStatus;
use crate::models::domain::profile::Branch;
use crate::models::domain::resource::Subject;
use crate::models::domain::user::UserRole;

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_.]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(
        length(min = 3, max = 50),
        regex(
            path = *USERNAME_REGEX,
            message = "Username may only contain letters, digits, '_' and '.'"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Absent fields are left unchanged. Fields belonging to the other role are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
    #[validate(length(max = 100))]
    pub codechef: Option<String>,
    #[validate(length(max = 100))]
    pub leetcode: Option<String>,

    #[validate(length(max = 30))]
    pub roll_no: Option<String>,
    #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
    pub year: Option<u8>,
    pub branch: Option<Branch>,

    #[validate(length(max = 30))]
    pub teacher_id: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(range(max = 60))]
    pub experience_years: Option<u32>,
    #[validate(length(max = 500))]
    pub subjects_teaching: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_pinned: bool,
    pub target_year: Option<String>,
    pub target_stream: Option<String>,
    pub target_branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub goal_type: GoalType,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(url)]
    pub resource_link: Option<String>,
    pub resource_file: Option<String>,
    /// Empty means every student currently registered.
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitGoalRequest {
    #[validate(length(max = 5000))]
    pub note: Option<String>,
    pub file_url: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewSubmissionRequest {
    pub status: SubmissionStatus,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueBookRequest {
    #[validate(length(min = 1, message = "Student is required"))]
    pub student_id: String,
    #[validate(length(min = 1, max = 200, message = "Book name is required"))]
    pub book_name: String,
    #[validate(length(min = 1, max = 50, message = "Book number is required"))]
    pub book_number: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub penalty_per_day: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UnmarkReturnedRequest {
    #[validate(length(min = 1, message = "At least one record id is required"))]
    pub record_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComplaintRequest {
    #[validate(length(min = 1, message = "Teacher is required"))]
    pub teacher_id: String,
    #[validate(length(min = 1, max = 200, message = "Heading is required"))]
    pub heading: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub complaint_type: String,
    #[serde(default)]
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditComplaintRequest {
    #[validate(length(min = 1, max = 200, message = "Heading is required"))]
    pub heading: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub complaint_type: String,
    #[serde(default)]
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintStatusRequest {
    pub status: ComplaintStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AmendComplaintRequest {
    pub status: ComplaintStatus,
    #[validate(length(min = 1, max = 1000, message = "A reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(length(min = 1, message = "Teacher is required"))]
    pub teacher_id: String,
    #[validate(length(min = 1, max = 200, message = "Heading is required"))]
    pub heading: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub permission_type: String,
    #[serde(default)]
    pub urgency: Urgency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditPermissionRequest {
    #[validate(length(min = 1, max = 200, message = "Heading is required"))]
    pub heading: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub permission_type: String,
    #[serde(default)]
    pub urgency: Urgency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PermissionDecisionRequest {
    pub status: PermissionStatus,
    #[validate(length(max = 1000))]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AmendPermissionRequest {
    pub status: PermissionStatus,
    #[validate(length(min = 1, max = 1000, message = "A reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub subject: Subject,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(url(message = "File must be a link"))]
    pub file_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssistantRequest {
    #[validate(length(min = 1, max = 4000, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentQuestionRequest {
    #[validate(length(min = 1, max = 2000, message = "Question is required"))]
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadDocumentQuery {
    pub filename: Option<String>,
}
