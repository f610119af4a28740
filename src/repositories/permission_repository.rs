use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{
        permission_request::{Decision, PermissionStatus},
        PermissionRequest,
    },
};

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn create(&self, request: PermissionRequest) -> AppResult<PermissionRequest>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<PermissionRequest>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<PermissionRequest>>;
    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<PermissionRequest>>;
    /// Writes the student-editable fields while the request is still pending.
    async fn edit_pending(&self, request: &PermissionRequest) -> AppResult<bool>;
    async fn delete_pending(&self, id: &str) -> AppResult<bool>;
    /// Applies `decision` only while the stored status is still `from`.
    async fn record_decision(
        &self,
        id: &str,
        from: PermissionStatus,
        decision: &Decision,
    ) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoPermissionRepository {
    collection: Collection<PermissionRequest>,
}

impl MongoPermissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::PERMISSION_REQUESTS);
        Self { collection }
    }
}

#[async_trait]
impl PermissionRepository for MongoPermissionRepository {
    async fn create(&self, request: PermissionRequest) -> AppResult<PermissionRequest> {
        self.collection.insert_one(&request).await?;
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PermissionRequest>> {
        let request = self.collection.find_one(doc! { "id": id }).await?;
        Ok(request)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<PermissionRequest>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let requests: Vec<PermissionRequest> = cursor.try_collect().await?;
        Ok(requests)
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<PermissionRequest>> {
        let cursor = self
            .collection
            .find(doc! { "teacher_id": teacher_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let requests: Vec<PermissionRequest> = cursor.try_collect().await?;
        Ok(requests)
    }

    async fn edit_pending(&self, request: &PermissionRequest) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": &request.id, "status": to_bson(&PermissionStatus::Pending)? },
                doc! { "$set": {
                    "heading": &request.heading,
                    "description": &request.description,
                    "permission_type": &request.permission_type,
                    "urgency": to_bson(&request.urgency)?,
                    "start_date": to_bson(&request.start_date)?,
                    "end_date": to_bson(&request.end_date)?,
                    "updated_at": to_bson(&request.updated_at)?,
                } },
            )
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete_pending(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "status": to_bson(&PermissionStatus::Pending)? })
            .await?;
        Ok(result.deleted_count == 1)
    }

    async fn record_decision(
        &self,
        id: &str,
        from: PermissionStatus,
        decision: &Decision,
    ) -> AppResult<bool> {
        let mut changes = doc! {
            "status": to_bson(&decision.status)?,
            "remark": to_bson(&decision.remark)?,
            "decided_at": to_bson(&decision.at)?,
            "updated_at": to_bson(&decision.at)?,
        };
        if decision.amended {
            changes.insert("amended", true);
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
        log::info!("Created indexes for {} collection", collections::PERMISSION_REQUESTS);
        Ok(())
    }
}
