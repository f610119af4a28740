use std::sync::Arc;

use crate::{
    auth::JwtService,
    clock::{Clock, SystemClock},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AnnouncementRepository, ComplaintRepository, GoalRepository, GoalSubmissionRepository,
        LibraryRecordRepository, MongoAnnouncementRepository, MongoComplaintRepository,
        MongoGoalRepository, MongoGoalSubmissionRepository, MongoLibraryRecordRepository,
        MongoPermissionRepository, MongoProfileRepository, MongoRefreshTokenRepository,
        MongoResourceRepository, MongoStudyDocumentRepository, MongoUserRepository,
        PermissionRepository, ProfileRepository, RefreshTokenRepository, ResourceRepository,
        StudyDocumentRepository, UserRepository,
    },
    services::{
        announcement_service::AnnouncementService,
        assistant_service::AssistantService,
        auth_service::AuthService,
        complaint_service::ComplaintService,
        goal_service::GoalService,
        language_model::{ChatCompletionsClient, LanguageModel},
        library_service::LibraryService,
        permission_service::PermissionService,
        profile_service::ProfileService,
        resource_service::ResourceService,
    },
};

/// Storage behind the services, one repository per collection.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub announcements: Arc<dyn AnnouncementRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub submissions: Arc<dyn GoalSubmissionRepository>,
    pub library_records: Arc<dyn LibraryRecordRepository>,
    pub complaints: Arc<dyn ComplaintRepository>,
    pub permissions: Arc<dyn PermissionRepository>,
    pub study_documents: Arc<dyn StudyDocumentRepository>,
    pub resources: Arc<dyn ResourceRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            profiles: Arc::new(MongoProfileRepository::new(db)),
            refresh_tokens: Arc::new(MongoRefreshTokenRepository::new(db)),
            announcements: Arc::new(MongoAnnouncementRepository::new(db)),
            goals: Arc::new(MongoGoalRepository::new(db)),
            submissions: Arc::new(MongoGoalSubmissionRepository::new(db)),
            library_records: Arc::new(MongoLibraryRecordRepository::new(db)),
            complaints: Arc::new(MongoComplaintRepository::new(db)),
            permissions: Arc::new(MongoPermissionRepository::new(db)),
            study_documents: Arc::new(MongoStudyDocumentRepository::new(db)),
            resources: Arc::new(MongoResourceRepository::new(db)),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.users.ensure_indexes().await?;
        self.profiles.ensure_indexes().await?;
        self.refresh_tokens.ensure_indexes().await?;
        self.announcements.ensure_indexes().await?;
        self.goals.ensure_indexes().await?;
        self.submissions.ensure_indexes().await?;
        self.library_records.ensure_indexes().await?;
        self.complaints.ensure_indexes().await?;
        self.permissions.ensure_indexes().await?;
        self.study_documents.ensure_indexes().await?;
        self.resources.ensure_indexes().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub goal_service: Arc<GoalService>,
    pub library_service: Arc<LibraryService>,
    pub complaint_service: Arc<ComplaintService>,
    pub permission_service: Arc<PermissionService>,
    pub assistant_service: Arc<AssistantService>,
    pub resource_service: Arc<ResourceService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// `None` when running over in-memory repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repositories = Repositories::mongo(&db);
        repositories.ensure_indexes().await?;

        let purged = repositories.refresh_tokens.delete_expired().await?;
        if purged > 0 {
            log::info!("Removed {} expired refresh tokens", purged);
        }

        let model = Arc::new(ChatCompletionsClient::from_config(&config)?);
        if config.llm_api_key.is_none() {
            log::warn!("LLM_API_KEY is not set; the study assistant is disabled");
        }

        let mut state = Self::from_repositories(config, repositories, Arc::new(SystemClock), model);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(
        config: Config,
        repositories: Repositories,
        clock: Arc<dyn Clock>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let config = Arc::new(config);
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_token_expiration_hours,
        ));

        let profile_service = Arc::new(ProfileService::new(
            repositories.users.clone(),
            repositories.profiles.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            repositories.profiles.clone(),
            repositories.refresh_tokens.clone(),
            profile_service.clone(),
            jwt_service.clone(),
            config.clone(),
        ));
        let announcement_service =
            Arc::new(AnnouncementService::new(repositories.announcements.clone()));
        let goal_service = Arc::new(GoalService::new(
            repositories.goals.clone(),
            repositories.submissions.clone(),
            profile_service.clone(),
            clock.clone(),
        ));
        let library_service = Arc::new(LibraryService::new(
            repositories.library_records.clone(),
            profile_service.clone(),
            clock,
        ));
        let complaint_service = Arc::new(ComplaintService::new(
            repositories.complaints.clone(),
            profile_service.clone(),
        ));
        let permission_service = Arc::new(PermissionService::new(
            repositories.permissions.clone(),
            profile_service.clone(),
        ));
        let assistant_service = Arc::new(AssistantService::new(
            model,
            repositories.study_documents.clone(),
        ));
        let resource_service = Arc::new(ResourceService::new(repositories.resources.clone()));

        Self {
            auth_service,
            profile_service,
            announcement_service,
            goal_service,
            library_service,
            complaint_service,
            permission_service,
            assistant_service,
            resource_service,
            jwt_service,
            config,
            db: None,
        }
    }

    /// Readiness: the database answers a ping (always ready without one).
    pub async fn is_ready(&self) -> bool {
        match &self.db {
            Some(db) => db.health_check().await.is_ok(),
            None => true,
        }
    }
}
