use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::goal::GoalStatus,
    models::domain::Goal,
};

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, goal: Goal) -> AppResult<Goal>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Goal>>;
    async fn find_by_owner(&self, faculty_id: &str) -> AppResult<Vec<Goal>>;
    async fn find_assigned_to(&self, student_id: &str) -> AppResult<Vec<Goal>>;
    /// Flips every active goal assigned to the student whose due date is before `today`.
    async fn mark_overdue_for_student(&self, student_id: &str, today: NaiveDate)
        -> AppResult<u64>;
    /// Conditional on the goal still being active and past due.
    async fn mark_overdue(&self, goal_id: &str, today: NaiveDate) -> AppResult<bool>;
    async fn set_status(&self, goal_id: &str, status: GoalStatus) -> AppResult<()>;
    async fn delete(&self, goal_id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoGoalRepository {
    collection: Collection<Goal>,
}

impl MongoGoalRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::GOALS);
        Self { collection }
    }
}

// NaiveDate serializes as "YYYY-MM-DD", so string comparison orders dates.
fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl GoalRepository for MongoGoalRepository {
    async fn create(&self, goal: Goal) -> AppResult<Goal> {
        self.collection.insert_one(&goal).await?;
        Ok(goal)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Goal>> {
        let goal = self.collection.find_one(doc! { "id": id }).await?;
        Ok(goal)
    }

    async fn find_by_owner(&self, faculty_id: &str) -> AppResult<Vec<Goal>> {
        let cursor = self
            .collection
            .find(doc! { "assigned_by": faculty_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let goals: Vec<Goal> = cursor.try_collect().await?;
        Ok(goals)
    }

    async fn find_assigned_to(&self, student_id: &str) -> AppResult<Vec<Goal>> {
        let cursor = self
            .collection
            .find(doc! { "assigned_to": student_id })
            .sort(doc! { "due_date": 1 })
            .await?;
        let goals: Vec<Goal> = cursor.try_collect().await?;
        Ok(goals)
    }

    async fn mark_overdue_for_student(
        &self,
        student_id: &str,
        today: NaiveDate,
    ) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! {
                    "assigned_to": student_id,
                    "status": GoalStatus::Active.as_str(),
                    "due_date": { "$lt": date_key(today) },
                },
                doc! { "$set": { "status": GoalStatus::Overdue.as_str() } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn mark_overdue(&self, goal_id: &str, today: NaiveDate) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": goal_id,
                    "status": GoalStatus::Active.as_str(),
                    "due_date": { "$lt": date_key(today) },
                },
                doc! { "$set": { "status": GoalStatus::Overdue.as_str() } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn set_status(&self, goal_id: &str, status: GoalStatus) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": goal_id },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Goal", goal_id));
        }
        Ok(())
    }

    async fn delete(&self, goal_id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": goal_id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let owner_index = IndexModel::builder()
            .keys(doc! { "assigned_by": 1, "created_at": -1 })
            .build();
        let assignee_index = IndexModel::builder()
            .keys(doc! { "assigned_to": 1, "status": 1 })
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(owner_index).await?;
        self.collection.create_index(assignee_index).await?;
        log::info!("Created indexes for goals collection");
        Ok(())
    }
}
