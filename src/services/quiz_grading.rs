use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::domain::goal_submission::QuizAnswer;
use crate::models::domain::Goal;
use crate::models::dto::request::AnswerInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedQuiz {
    pub answers: Vec<QuizAnswer>,
    /// Correct mcq answers.
    pub score: u32,
    /// Every question, short answers included.
    pub total: u32,
}

/// Grades submitted answers against a quiz goal's questions.
///
/// Produces exactly one answer per question, in question order; unanswered questions
/// are recorded with an empty answer. Answers naming a question the goal does not have
/// are rejected.
pub fn grade_quiz(goal: &Goal, submitted: &[AnswerInput]) -> AppResult<GradedQuiz> {
    let mut by_question: HashMap<&str, &str> = HashMap::new();
    for input in submitted {
        if !goal.questions.iter().any(|q| q.id == input.question_id) {
            return Err(AppError::ValidationError(format!(
                "Question '{}' is not part of this quiz",
                input.question_id
            )));
        }
        by_question.insert(input.question_id.as_str(), input.answer.as_str());
    }

    let mut score = 0;
    let answers: Vec<QuizAnswer> = goal
        .questions
        .iter()
        .map(|question| {
            let answer = by_question
                .get(question.id.as_str())
                .map(|a| a.trim())
                .unwrap_or_default();
            let is_correct = question.grade(answer);
            if is_correct == Some(true) {
                score += 1;
            }
            QuizAnswer {
                question_id: question.id.clone(),
                answer: answer.to_string(),
                is_correct,
            }
        })
        .collect();

    Ok(GradedQuiz {
        total: answers.len() as u32,
        answers,
        score,
    })
}
