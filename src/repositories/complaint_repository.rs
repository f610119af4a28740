use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{complaint::ComplaintStatus, Complaint},
};

/// Every write after creation is conditional on the stored status and
/// reports whether it matched.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn create(&self, complaint: Complaint) -> AppResult<Complaint>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Complaint>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Complaint>>;
    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Complaint>>;
    /// Writes the student-editable fields while the complaint is still pending.
    async fn edit_pending(&self, complaint: &Complaint) -> AppResult<bool>;
    async fn delete_pending(&self, id: &str) -> AppResult<bool>;
    /// Moves `from -> to`; `note` replaces the amendment note when given.
    async fn set_status(
        &self,
        id: &str,
        from: ComplaintStatus,
        to: ComplaintStatus,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoComplaintRepository {
    collection: Collection<Complaint>,
}

impl MongoComplaintRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::COMPLAINTS);
        Self { collection }
    }
}

#[async_trait]
impl ComplaintRepository for MongoComplaintRepository {
    async fn create(&self, complaint: Complaint) -> AppResult<Complaint> {
        self.collection.insert_one(&complaint).await?;
        Ok(complaint)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Complaint>> {
        let complaint = self.collection.find_one(doc! { "id": id }).await?;
        Ok(complaint)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Complaint>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let complaints: Vec<Complaint> = cursor.try_collect().await?;
        Ok(complaints)
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Complaint>> {
        let cursor = self
            .collection
            .find(doc! { "teacher_id": teacher_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let complaints: Vec<Complaint> = cursor.try_collect().await?;
        Ok(complaints)
    }

    async fn edit_pending(&self, complaint: &Complaint) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": &complaint.id, "status": to_bson(&ComplaintStatus::Pending)? },
                doc! { "$set": {
                    "heading": &complaint.heading,
                    "description": &complaint.description,
                    "complaint_type": &complaint.complaint_type,
                    "urgency": to_bson(&complaint.urgency)?,
                    "updated_at": to_bson(&complaint.updated_at)?,
                } },
            )
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete_pending(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "status": to_bson(&ComplaintStatus::Pending)? })
            .await?;
        Ok(result.deleted_count == 1)
    }

    async fn set_status(
        &self,
        id: &str,
        from: ComplaintStatus,
        to: ComplaintStatus,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut changes = doc! { "status": to_bson(&to)?, "updated_at": to_bson(&at)? };
        if let Some(note) = note {
            changes.insert("amendment_note", note);
        }
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "status": to_bson(&from)? },
                doc! { "$set": changes },
            )
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(id_index).await?;
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "student_id": 1 }).build())
            .await?;
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "teacher_id": 1 }).build())
            .await?;
        log::info!("Created indexes for {} collection", collections::COMPLAINTS);
        Ok(())
    }
}
