use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::goal_submission::SubmissionStatus,
    models::domain::GoalSubmission,
};

#[async_trait]
pub trait GoalSubmissionRepository: Send + Sync {
    /// Fails with `Conflict` when the student already submitted for the goal.
    async fn create(&self, submission: GoalSubmission) -> AppResult<GoalSubmission>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<GoalSubmission>>;
    async fn find_by_goal_and_student(
        &self,
        goal_id: &str,
        student_id: &str,
    ) -> AppResult<Option<GoalSubmission>>;
    async fn find_by_goal(&self, goal_id: &str) -> AppResult<Vec<GoalSubmission>>;
    async fn update_review(
        &self,
        id: &str,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> AppResult<GoalSubmission>;
    async fn delete_by_goal(&self, goal_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoGoalSubmissionRepository {
    collection: Collection<GoalSubmission>,
}

impl MongoGoalSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::GOAL_SUBMISSIONS);
        Self { collection }
    }
}

#[async_trait]
impl GoalSubmissionRepository for MongoGoalSubmissionRepository {
    async fn create(&self, submission: GoalSubmission) -> AppResult<GoalSubmission> {
        match self.collection.insert_one(&submission).await {
            Ok(_) => Ok(submission),
            Err(e) if crate::errors::is_duplicate_key(&e) => Err(AppError::Conflict(
                "You have already submitted this goal".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<GoalSubmission>> {
        let submission = self.collection.find_one(doc! { "id": id }).await?;
        Ok(submission)
    }

    async fn find_by_goal_and_student(
        &self,
        goal_id: &str,
        student_id: &str,
    ) -> AppResult<Option<GoalSubmission>> {
        let submission = self
            .collection
            .find_one(doc! { "goal_id": goal_id, "student_id": student_id })
            .await?;
        Ok(submission)
    }

    async fn find_by_goal(&self, goal_id: &str) -> AppResult<Vec<GoalSubmission>> {
        let cursor = self
            .collection
            .find(doc! { "goal_id": goal_id })
            .sort(doc! { "submitted_at": 1 })
            .await?;
        let submissions: Vec<GoalSubmission> = cursor.try_collect().await?;
        Ok(submissions)
    }

    async fn update_review(
        &self,
        id: &str,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> AppResult<GoalSubmission> {
        let mut submission = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Submission", id))?;

        submission.status = status;
        submission.feedback = feedback;
        submission.reviewed_at = Some(Utc::now());

        self.collection
            .replace_one(doc! { "id": id }, &submission)
            .await?;
        Ok(submission)
    }

    async fn delete_by_goal(&self, goal_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "goal_id": goal_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "goal_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("goal_student_unique".to_string())
                    .build(),
            )
            .build();
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(pair_index).await?;
        self.collection.create_index(id_index).await?;
        log::info!("Created unique index on goal_submissions.(goal_id, student_id)");
        Ok(())
    }
}
