use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Task,
    Quiz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Overdue,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Overdue => "overdue",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Short,
}

pub const OPTION_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub order: u16,
    pub text: String,
    pub question_type: QuestionType,
    /// Option texts in letter order (A first). Empty for short-answer questions.
    pub options: Vec<String>,
    /// Correct option letter, mcq only.
    pub correct_answer: Option<String>,
}

impl QuizQuestion {
    pub fn is_mcq(&self) -> bool {
        self.question_type == QuestionType::Mcq
    }

    /// Case-insensitive comparison against the stored letter; `None` for short answers.
    pub fn grade(&self, answer: &str) -> Option<bool> {
        if !self.is_mcq() {
            return None;
        }
        let correct = self.correct_answer.as_deref().unwrap_or_default();
        Some(answer.trim().to_uppercase() == correct.trim().to_uppercase())
    }
}

/// One question block of the create-goal form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub text: String,
    pub question_type: Option<QuestionType>,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

/// Turns question blocks into questions, stopping at the first blank text.
pub fn collect_questions(drafts: &[QuestionDraft]) -> AppResult<Vec<QuizQuestion>> {
    let mut questions = Vec::new();

    for (index, draft) in drafts.iter().enumerate() {
        let text = draft.text.trim();
        if text.is_empty() {
            break;
        }
        let number = index + 1;
        let question_type = draft.question_type.unwrap_or(QuestionType::Mcq);

        let (options, correct_answer) = match question_type {
            QuestionType::Short => (Vec::new(), None),
            QuestionType::Mcq => {
                if draft.options.len() > OPTION_LETTERS.len() {
                    return Err(AppError::ValidationError(format!(
                        "Question {} has more than {} options",
                        number,
                        OPTION_LETTERS.len()
                    )));
                }
                let options: Vec<String> =
                    draft.options.iter().map(|o| o.trim().to_string()).collect();
                let filled = options.iter().take_while(|o| !o.is_empty()).count();
                if filled < 2 {
                    return Err(AppError::ValidationError(format!(
                        "Question {} needs at least options A and B",
                        number
                    )));
                }
                let letter = draft
                    .correct_answer
                    .as_deref()
                    .map(|l| l.trim().to_uppercase())
                    .filter(|l| OPTION_LETTERS[..filled].contains(&l.as_str()))
                    .ok_or_else(|| {
                        AppError::ValidationError(format!(
                            "Question {} needs a correct answer among its options",
                            number
                        ))
                    })?;
                (options[..filled].to_vec(), Some(letter))
            }
        };

        questions.push(QuizQuestion {
            id: Uuid::new_v4().to_string(),
            order: number as u16,
            text: text.to_string(),
            question_type,
            options,
            correct_answer,
        });
    }

    Ok(questions)
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub assigned_by: String,
    /// Student ids, fixed when the goal is created.
    pub assigned_to: Vec<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: GoalStatus,
    pub resource_link: Option<String>,
    pub resource_file: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        title: &str,
        description: &str,
        goal_type: GoalType,
        assigned_by: &str,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<Self> {
        validate_goal_dates(start_date, due_date)?;
        Ok(Goal {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            goal_type,
            assigned_by: assigned_by.to_string(),
            assigned_to: Vec::new(),
            start_date,
            due_date,
            status: GoalStatus::Active,
            resource_link: None,
            resource_file: None,
            questions: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn is_quiz(&self) -> bool {
        self.goal_type == GoalType::Quiz
    }

    pub fn is_owned_by(&self, faculty_id: &str) -> bool {
        self.assigned_by == faculty_id
    }

    pub fn is_assigned_to(&self, student_id: &str) -> bool {
        self.assigned_to.iter().any(|s| s == student_id)
    }

    /// Stored status with the time-driven active -> overdue step applied.
    pub fn effective_status(&self, today: NaiveDate) -> GoalStatus {
        if self.needs_overdue_transition(today) {
            GoalStatus::Overdue
        } else {
            self.status
        }
    }

    pub fn needs_overdue_transition(&self, today: NaiveDate) -> bool {
        self.status == GoalStatus::Active && today > self.due_date
    }
}

pub fn validate_goal_dates(start_date: NaiveDate, due_date: NaiveDate) -> AppResult<()> {
    if due_date < start_date {
        return Err(AppError::ValidationError(
            "Due date cannot be before the start date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mcq(text: &str, correct: &str) -> QuestionDraft {
        QuestionDraft {
            text: text.to_string(),
            question_type: Some(QuestionType::Mcq),
            options: vec!["one".into(), "two".into(), "three".into(), "four".into()],
            correct_answer: Some(correct.to_string()),
        }
    }

    #[test]
    fn due_date_before_start_is_rejected() {
        let result = Goal::new("t", "d", GoalType::Task, "f-1", date(2024, 1, 10), date(2024, 1, 1));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn same_day_goal_is_allowed() {
        let goal = Goal::new("t", "d", GoalType::Task, "f-1", date(2024, 1, 10), date(2024, 1, 10));
        assert!(goal.is_ok());
    }

    #[test]
    fn active_goal_becomes_overdue_after_due_date() {
        let goal = Goal::new("t", "d", GoalType::Task, "f-1", date(2024, 1, 1), date(2024, 1, 10)).unwrap();

        assert_eq!(goal.effective_status(date(2024, 1, 10)), GoalStatus::Active);
        assert_eq!(goal.effective_status(date(2024, 1, 15)), GoalStatus::Overdue);
        assert!(goal.needs_overdue_transition(date(2024, 1, 15)));
    }

    #[test]
    fn completed_goal_never_becomes_overdue() {
        let mut goal = Goal::new("t", "d", GoalType::Task, "f-1", date(2024, 1, 1), date(2024, 1, 10)).unwrap();
        goal.status = GoalStatus::Completed;

        assert_eq!(goal.effective_status(date(2024, 3, 1)), GoalStatus::Completed);
        assert!(!goal.needs_overdue_transition(date(2024, 3, 1)));
    }

    #[test]
    fn question_collection_stops_at_first_blank_text() {
        let drafts = vec![
            mcq("2 + 2?", "b"),
            QuestionDraft {
                text: "Explain recursion".to_string(),
                question_type: Some(QuestionType::Short),
                ..Default::default()
            },
            QuestionDraft::default(),
            mcq("Never collected", "A"),
        ];

        let questions = collect_questions(&drafts).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].order, 1);
        assert_eq!(questions[0].correct_answer.as_deref(), Some("B"));
        assert_eq!(questions[1].question_type, QuestionType::Short);
        assert!(questions[1].options.is_empty());
        assert!(questions[1].correct_answer.is_none());
    }

    #[test]
    fn mcq_needs_a_correct_letter_among_its_options() {
        let mut draft = mcq("Pick one", "E");
        assert!(collect_questions(&[draft.clone()]).is_err());

        draft.options = vec!["yes".into(), "no".into()];
        draft.correct_answer = Some("C".into());
        assert!(collect_questions(&[draft.clone()]).is_err());

        draft.correct_answer = Some("b".into());
        let questions = collect_questions(&[draft]).unwrap();
        assert_eq!(questions[0].options.len(), 2);
    }

    #[test]
    fn mcq_grading_ignores_case_and_short_answers_are_ungraded() {
        let questions = collect_questions(&[
            mcq("Capital of France?", "C"),
            QuestionDraft {
                text: "Why?".into(),
                question_type: Some(QuestionType::Short),
                ..Default::default()
            },
        ])
        .unwrap();

        assert_eq!(questions[0].grade("c"), Some(true));
        assert_eq!(questions[0].grade(" C "), Some(true));
        assert_eq!(questions[0].grade("a"), Some(false));
        assert_eq!(questions[1].grade("anything"), None);
    }
}
