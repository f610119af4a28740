use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Login identities. `id`, `username` and `email` are each unique.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Users among `ids`, sorted by username. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>>;
    async fn rename(&self, id: &str, first_name: &str, last_name: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(collections::USERS),
        }
    }

    async fn find_one_by(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { field: value }).await?)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection.insert_one(&user).await.map_err(|e| {
            if crate::errors::is_duplicate_key(&e) {
                AppError::Conflict("Username or email is already registered".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.find_one_by("id", id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_one_by("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one_by("email", email).await
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .sort(doc! { "username": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn rename(&self, id: &str, first_name: &str, last_name: &str) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "first_name": first_name, "last_name": last_name } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("User", id));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let unique = |field: &str| {
            IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{}_unique", field))
                        .build(),
                )
                .build()
        };

        self.collection
            .create_indexes([unique("id"), unique("username"), unique("email")])
            .await?;
        log::info!("Ensured unique indexes on {}", collections::USERS);
        Ok(())
    }
}
