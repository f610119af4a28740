use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::errors::AppResult;
use crate::models::domain::goal::{GoalStatus, GoalType, QuestionType};
use crate::models::domain::library_record::{format_amount, LoanStatus};
use crate::models::domain::user::UserRole;
use crate::models::domain::{
    Announcement, Goal, GoalSubmission, LibraryRecord, Profile, QuizQuestion, User,
};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            full_name: user.full_name(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserDto,
    pub role: UserRole,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserDto,
    pub profile: Profile,
    pub stream: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<&'static str>,
}

impl ProfileResponse {
    pub fn new(user: User, profile: Profile) -> Self {
        ProfileResponse {
            stream: profile.stream().code(),
            branch_name: profile.branch.map(|b| b.display_name()),
            user: user.into(),
            profile,
        }
    }
}

/// A student as shown in pickers and dashboards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub roll_no: Option<String>,
    pub year: Option<u8>,
    pub branch: Option<String>,
}

impl StudentSummary {
    pub fn new(user: &User, profile: Option<&Profile>) -> Self {
        StudentSummary {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name(),
            roll_no: profile.and_then(|p| p.roll_no.clone()),
            year: profile.and_then(|p| p.year),
            branch: profile.and_then(|p| p.branch).map(|b| b.code().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementBoard {
    pub pinned: Vec<Announcement>,
    pub regular: Vec<Announcement>,
    pub total: usize,
}

impl AnnouncementBoard {
    /// Expects `announcements` already in board order.
    pub fn from_ordered(announcements: Vec<Announcement>) -> Self {
        let total = announcements.len();
        let (pinned, regular) = announcements.into_iter().partition(|a| a.is_pinned);
        AnnouncementBoard {
            pinned,
            regular,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub order: u16,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl QuestionView {
    fn from_question(question: &QuizQuestion, with_answer: bool) -> Self {
        QuestionView {
            id: question.id.clone(),
            order: question.order,
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            correct_answer: if with_answer {
                question.correct_answer.clone()
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub assigned_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<String>>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: GoalStatus,
    pub resource_link: Option<String>,
    pub resource_file: Option<String>,
    pub questions: Vec<QuestionView>,
    pub created_at: DateTime<Utc>,
}

impl GoalResponse {
    /// The owning faculty's view, correct answers included.
    pub fn for_owner(goal: &Goal, today: NaiveDate) -> Self {
        Self::build(goal, today, true)
    }

    /// A student's view: no correct answers, no roster.
    pub fn for_student(goal: &Goal, today: NaiveDate) -> Self {
        Self::build(goal, today, false)
    }

    fn build(goal: &Goal, today: NaiveDate, owner: bool) -> Self {
        GoalResponse {
            id: goal.id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            goal_type: goal.goal_type,
            assigned_by: goal.assigned_by.clone(),
            assigned_to: owner.then(|| goal.assigned_to.clone()),
            start_date: goal.start_date,
            due_date: goal.due_date,
            status: goal.effective_status(today),
            resource_link: goal.resource_link.clone(),
            resource_file: goal.resource_file.clone(),
            questions: goal
                .questions
                .iter()
                .map(|q| QuestionView::from_question(q, owner))
                .collect(),
            created_at: goal.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentGoalResponse {
    #[serde(flatten)]
    pub goal: GoalResponse,
    pub submission: Option<GoalSubmission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GoalDetailResponse {
    Owner(GoalResponse),
    Student(StudentGoalResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedEntry {
    pub student: StudentSummary,
    pub submission: GoalSubmission,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDashboard {
    pub goal: GoalResponse,
    pub submitted: Vec<SubmittedEntry>,
    pub not_submitted: Vec<StudentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryRecordResponse {
    pub id: String,
    pub book_name: String,
    pub book_number: String,
    pub issued_by: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub penalty_per_day: String,
    pub is_returned: bool,
    pub returned_date: Option<NaiveDate>,
    pub days_overdue: i64,
    pub current_penalty: String,
    pub status: LoanStatus,
}

impl LibraryRecordResponse {
    pub fn new(record: &LibraryRecord, today: NaiveDate) -> AppResult<Self> {
        Ok(LibraryRecordResponse {
            id: record.id.clone(),
            book_name: record.book_name.clone(),
            book_number: record.book_number.clone(),
            issued_by: record.issued_by.clone(),
            student_id: record.student_id.clone(),
            start_date: record.start_date,
            due_date: record.due_date,
            penalty_per_day: format_amount(record.penalty_per_day),
            is_returned: record.is_returned,
            returned_date: record.returned_date,
            days_overdue: record.days_overdue(today),
            current_penalty: format_amount(record.current_penalty(today)?),
            status: record.status(today),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StudentLibraryResponse {
    pub records: Vec<LibraryRecordResponse>,
    pub total_outstanding_penalty: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PenaltyReadout {
    pub record_id: String,
    pub days_overdue: i64,
    pub current_penalty: String,
    pub status: LoanStatus,
}

#[derive(Debug, Serialize)]
pub struct UnmarkResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentUploadResponse {
    pub id: String,
    pub filename: String,
    pub words: usize,
    pub passages: usize,
}

/// One row of the resource library index.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SubjectCount {
    pub code: &'static str,
    pub name: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
