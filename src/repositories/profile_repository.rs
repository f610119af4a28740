use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{user::UserRole, Profile},
};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fails with `Conflict` when the user already has a profile.
    async fn create(&self, profile: Profile) -> AppResult<Profile>;
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Profile>>;
    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>>;
    async fn update(&self, profile: Profile) -> AppResult<Profile>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoProfileRepository {
    collection: Collection<Profile>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::PROFILES);
        Self { collection }
    }
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn create(&self, profile: Profile) -> AppResult<Profile> {
        self.collection.insert_one(&profile).await?;
        Ok(profile)
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Profile>> {
        let profile = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(profile)
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>> {
        let cursor = self
            .collection
            .find(doc! { "role": role.as_str() })
            .await?;
        let profiles: Vec<Profile> = cursor.try_collect().await?;
        Ok(profiles)
    }

    async fn update(&self, profile: Profile) -> AppResult<Profile> {
        let result = self
            .collection
            .replace_one(doc! { "user_id": &profile.user_id }, &profile)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Profile", &profile.user_id));
        }

        Ok(profile)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(IndexOptions::builder().name("role".to_string()).build())
            .build();

        self.collection.create_index(user_id_index).await?;
        self.collection.create_index(role_index).await?;

        log::info!("Created indexes for profiles collection");
        Ok(())
    }
}
