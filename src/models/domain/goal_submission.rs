use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Reviewed,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// The statuses a faculty review may set.
    pub fn is_review_outcome(&self) -> bool {
        !matches!(self, SubmissionStatus::Submitted)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub answer: String,
    /// `None` for short-answer questions.
    pub is_correct: Option<bool>,
}

/// At most one per (goal, student).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GoalSubmission {
    pub id: String,
    pub goal_id: String,
    pub student_id: String,
    pub note: Option<String>,
    pub file_url: Option<String>,
    pub quiz_score: Option<u32>,
    pub quiz_total: Option<u32>,
    pub answers: Vec<QuizAnswer>,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl GoalSubmission {
    pub fn new(goal_id: &str, student_id: &str) -> Self {
        GoalSubmission {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.to_string(),
            student_id: student_id.to_string(),
            note: None,
            file_url: None,
            quiz_score: None,
            quiz_total: None,
            answers: Vec::new(),
            status: SubmissionStatus::Submitted,
            feedback: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }
}
