use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult};

/// Collection names of the portal database.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFILES: &str = "profiles";
    pub const REFRESH_TOKENS: &str = "refresh_tokens";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const GOALS: &str = "goals";
    pub const GOAL_SUBMISSIONS: &str = "goal_submissions";
    pub const LIBRARY_RECORDS: &str = "library_records";
    pub const COMPLAINTS: &str = "complaints";
    pub const PERMISSION_REQUESTS: &str = "permission_requests";
    pub const STUDY_DOCUMENTS: &str = "study_documents";
    pub const RESOURCES: &str = "resources";
}

const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_SIZE: u32 = 2;
const TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle on one MongoDB database. Cloning shares the connection pool.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        apply_pool_settings(&mut options);

        let client = Client::with_options(options)?;
        let db = Self {
            client,
            db_name: config.mongo_db_name.clone(),
        };
        db.health_check().await?;

        log::info!("Connected to MongoDB database '{}'", db.db_name);
        Ok(db)
    }

    pub fn get_collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.db_name).collection(name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

fn apply_pool_settings(options: &mut ClientOptions) {
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(MAX_POOL_SIZE);
    options.min_pool_size = Some(MIN_POOL_SIZE);
    options.connect_timeout = Some(TIMEOUT);
    options.server_selection_timeout = Some(TIMEOUT);
}
