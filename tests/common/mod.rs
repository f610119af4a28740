#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use secrecy::SecretString;
use tokio::sync::{Mutex, RwLock};

use campus_portal::{
    app_state::{AppState, Repositories},
    auth::Caller,
    clock::FixedClock,
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{
            announcement::{board_order, AnnouncementFilter},
            complaint::ComplaintStatus,
            goal::GoalStatus,
            goal_submission::SubmissionStatus,
            permission_request::{Decision, PermissionStatus},
            resource::Subject,
            user::UserRole,
            Announcement, Complaint, Goal, GoalSubmission, LibraryRecord, PermissionRequest,
            Profile, RefreshToken, Resource, StudyDocument, User,
        },
        dto::request::SignupRequest,
    },
    repositories::{
        AnnouncementRepository, ComplaintRepository, GoalRepository, GoalSubmissionRepository,
        LibraryRecordRepository, PermissionRepository, ProfileRepository, RefreshTokenRepository,
        ResourceRepository, StudyDocumentRepository, UserRepository,
    },
    services::language_model::{ChatMessage, LanguageModel},
};

type Table<T> = Arc<RwLock<HashMap<String, T>>>;

fn table<T>() -> Table<T> {
    Arc::new(RwLock::new(HashMap::new()))
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self { users: table() }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut found: Vec<User> = ids.iter().filter_map(|id| users.get(id).cloned()).collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        found.dedup_by(|a, b| a.id == b.id);
        Ok(found)
    }

    async fn rename(&self, id: &str, first_name: &str, last_name: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("User", id))?;
        user.first_name = first_name.to_string();
        user.last_name = last_name.to_string();
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: Table<Profile>,
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: Profile) -> AppResult<Profile> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(AppError::Conflict("Profile already exists".to_string()));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().filter(|p| p.role == role).cloned().collect())
    }

    async fn update(&self, profile: Profile) -> AppResult<Profile> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.user_id) {
            return Err(AppError::not_found("Profile", &profile.user_id));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Table<RefreshToken>,
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.tokens.read().await.get(hash).cloned())
    }

    async fn revoke(&self, hash: &str) -> AppResult<bool> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(hash).filter(|t| !t.revoked) {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens.values_mut().filter(|t| t.user_id == user_id && !t.revoked) {
            token.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        let now = Utc::now();
        tokens.retain(|_, t| t.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAnnouncementRepository {
    announcements: Table<Announcement>,
}

#[async_trait]
impl AnnouncementRepository for InMemoryAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> AppResult<Announcement> {
        let mut announcements = self.announcements.write().await;
        announcements.insert(announcement.id.clone(), announcement.clone());
        Ok(announcement)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Announcement>> {
        Ok(self.announcements.read().await.get(id).cloned())
    }

    async fn find_filtered(&self, filter: &AnnouncementFilter) -> AppResult<Vec<Announcement>> {
        let announcements = self.announcements.read().await;
        let mut matching: Vec<Announcement> = announcements
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matching.sort_by(board_order);
        Ok(matching)
    }

    async fn update(&self, announcement: Announcement) -> AppResult<Announcement> {
        let mut announcements = self.announcements.write().await;
        if !announcements.contains_key(&announcement.id) {
            return Err(AppError::not_found("Announcement", &announcement.id));
        }
        announcements.insert(announcement.id.clone(), announcement.clone());
        Ok(announcement)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.announcements.write().await.remove(id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGoalRepository {
    goals: Table<Goal>,
    refuse_deletes: AtomicBool,
}

impl InMemoryGoalRepository {
    /// Makes every later `delete` fail as a lost database connection would.
    pub fn refuse_deletes(&self) {
        self.refuse_deletes.store(true, Ordering::SeqCst);
    }

    pub async fn stored_status(&self, goal_id: &str) -> Option<GoalStatus> {
        self.goals.read().await.get(goal_id).map(|g| g.status)
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoalRepository {
    async fn create(&self, goal: Goal) -> AppResult<Goal> {
        self.goals.write().await.insert(goal.id.clone(), goal.clone());
        Ok(goal)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Goal>> {
        Ok(self.goals.read().await.get(id).cloned())
    }

    async fn find_by_owner(&self, faculty_id: &str) -> AppResult<Vec<Goal>> {
        let goals = self.goals.read().await;
        let mut owned: Vec<Goal> = goals
            .values()
            .filter(|g| g.is_owned_by(faculty_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_assigned_to(&self, student_id: &str) -> AppResult<Vec<Goal>> {
        let goals = self.goals.read().await;
        let mut assigned: Vec<Goal> = goals
            .values()
            .filter(|g| g.is_assigned_to(student_id))
            .cloned()
            .collect();
        assigned.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(assigned)
    }

    async fn mark_overdue_for_student(
        &self,
        student_id: &str,
        today: NaiveDate,
    ) -> AppResult<u64> {
        let mut goals = self.goals.write().await;
        let mut flipped = 0;
        for goal in goals
            .values_mut()
            .filter(|g| g.is_assigned_to(student_id) && g.needs_overdue_transition(today))
        {
            goal.status = GoalStatus::Overdue;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn mark_overdue(&self, goal_id: &str, today: NaiveDate) -> AppResult<bool> {
        let mut goals = self.goals.write().await;
        match goals.get_mut(goal_id) {
            Some(goal) if goal.needs_overdue_transition(today) => {
                goal.status = GoalStatus::Overdue;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status(&self, goal_id: &str, status: GoalStatus) -> AppResult<()> {
        let mut goals = self.goals.write().await;
        let goal = goals
            .get_mut(goal_id)
            .ok_or_else(|| AppError::not_found("Goal", goal_id))?;
        goal.status = status;
        Ok(())
    }

    async fn delete(&self, goal_id: &str) -> AppResult<bool> {
        if self.refuse_deletes.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("goal store unavailable".to_string()));
        }
        Ok(self.goals.write().await.remove(goal_id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGoalSubmissionRepository {
    submissions: Table<GoalSubmission>,
    refuse_cleanup: AtomicBool,
}

impl InMemoryGoalSubmissionRepository {
    pub fn refuse_cleanup(&self) {
        self.refuse_cleanup.store(true, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait]
impl GoalSubmissionRepository for InMemoryGoalSubmissionRepository {
    async fn create(&self, submission: GoalSubmission) -> AppResult<GoalSubmission> {
        let mut submissions = self.submissions.write().await;
        if submissions
            .values()
            .any(|s| s.goal_id == submission.goal_id && s.student_id == submission.student_id)
        {
            return Err(AppError::Conflict(
                "You have already submitted this goal".to_string(),
            ));
        }
        submissions.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<GoalSubmission>> {
        Ok(self.submissions.read().await.get(id).cloned())
    }

    async fn find_by_goal_and_student(
        &self,
        goal_id: &str,
        student_id: &str,
    ) -> AppResult<Option<GoalSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .find(|s| s.goal_id == goal_id && s.student_id == student_id)
            .cloned())
    }

    async fn find_by_goal(&self, goal_id: &str) -> AppResult<Vec<GoalSubmission>> {
        let submissions = self.submissions.read().await;
        let mut found: Vec<GoalSubmission> = submissions
            .values()
            .filter(|s| s.goal_id == goal_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(found)
    }

    async fn update_review(
        &self,
        id: &str,
        status: SubmissionStatus,
        feedback: Option<String>,
    ) -> AppResult<GoalSubmission> {
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Submission", id))?;
        submission.status = status;
        submission.feedback = feedback;
        submission.reviewed_at = Some(Utc::now());
        Ok(submission.clone())
    }

    async fn delete_by_goal(&self, goal_id: &str) -> AppResult<u64> {
        if self.refuse_cleanup.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("submission store unavailable".to_string()));
        }
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|_, s| s.goal_id != goal_id);
        Ok((before - submissions.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLibraryRecordRepository {
    records: Table<LibraryRecord>,
}

#[async_trait]
impl LibraryRecordRepository for InMemoryLibraryRecordRepository {
    async fn create(&self, record: LibraryRecord) -> AppResult<LibraryRecord> {
        self.records.write().await.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<LibraryRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_issuer(&self, faculty_id: &str) -> AppResult<Vec<LibraryRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<LibraryRecord> = records
            .values()
            .filter(|r| r.issued_by == faculty_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<LibraryRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<LibraryRecord> = records
            .values()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_returned(&self, id: &str, returned_on: NaiveDate) -> AppResult<bool> {
        let mut records = self.records.write().await;
        match records.get_mut(id) {
            Some(record) if !record.is_returned => {
                record.is_returned = true;
                record.returned_date = Some(returned_on);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn unmark_returned(&self, ids: &[String]) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut changed = 0;
        for id in ids {
            if let Some(record) = records.get_mut(id).filter(|r| r.is_returned) {
                record.is_returned = false;
                record.returned_date = None;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryComplaintRepository {
    complaints: Table<Complaint>,
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn create(&self, complaint: Complaint) -> AppResult<Complaint> {
        let mut complaints = self.complaints.write().await;
        complaints.insert(complaint.id.clone(), complaint.clone());
        Ok(complaint)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Complaint>> {
        Ok(self.complaints.read().await.get(id).cloned())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Complaint>> {
        let complaints = self.complaints.read().await;
        let mut found: Vec<Complaint> = complaints
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Complaint>> {
        let complaints = self.complaints.read().await;
        let mut found: Vec<Complaint> = complaints
            .values()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn edit_pending(&self, complaint: &Complaint) -> AppResult<bool> {
        let mut complaints = self.complaints.write().await;
        match complaints.get_mut(&complaint.id).filter(|c| c.is_pending()) {
            Some(stored) => {
                stored.heading = complaint.heading.clone();
                stored.description = complaint.description.clone();
                stored.complaint_type = complaint.complaint_type.clone();
                stored.urgency = complaint.urgency;
                stored.updated_at = complaint.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pending(&self, id: &str) -> AppResult<bool> {
        let mut complaints = self.complaints.write().await;
        if complaints.get(id).is_some_and(|c| c.is_pending()) {
            complaints.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn set_status(
        &self,
        id: &str,
        from: ComplaintStatus,
        to: ComplaintStatus,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut complaints = self.complaints.write().await;
        match complaints.get_mut(id).filter(|c| c.status == from) {
            Some(stored) => {
                stored.status = to;
                if let Some(note) = note {
                    stored.amendment_note = Some(note.to_string());
                }
                stored.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPermissionRepository {
    permissions: Table<PermissionRequest>,
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn create(&self, request: PermissionRequest) -> AppResult<PermissionRequest> {
        let mut permissions = self.permissions.write().await;
        permissions.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PermissionRequest>> {
        Ok(self.permissions.read().await.get(id).cloned())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<PermissionRequest>> {
        let permissions = self.permissions.read().await;
        let mut found: Vec<PermissionRequest> = permissions
            .values()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<PermissionRequest>> {
        let permissions = self.permissions.read().await;
        let mut found: Vec<PermissionRequest> = permissions
            .values()
            .filter(|p| p.teacher_id == teacher_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn edit_pending(&self, request: &PermissionRequest) -> AppResult<bool> {
        let mut permissions = self.permissions.write().await;
        match permissions.get_mut(&request.id).filter(|p| p.is_pending()) {
            Some(stored) => {
                stored.heading = request.heading.clone();
                stored.description = request.description.clone();
                stored.permission_type = request.permission_type.clone();
                stored.urgency = request.urgency;
                stored.start_date = request.start_date;
                stored.end_date = request.end_date;
                stored.updated_at = request.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pending(&self, id: &str) -> AppResult<bool> {
        let mut permissions = self.permissions.write().await;
        if permissions.get(id).is_some_and(|p| p.is_pending()) {
            permissions.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn record_decision(
        &self,
        id: &str,
        from: PermissionStatus,
        decision: &Decision,
    ) -> AppResult<bool> {
        let mut permissions = self.permissions.write().await;
        match permissions.get_mut(id).filter(|p| p.status == from) {
            Some(stored) => {
                stored.apply(decision);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStudyDocumentRepository {
    documents: Arc<RwLock<Vec<StudyDocument>>>,
}

#[async_trait]
impl StudyDocumentRepository for InMemoryStudyDocumentRepository {
    async fn create(&self, document: StudyDocument) -> AppResult<StudyDocument> {
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    /// Later pushes win, which also covers equal timestamps.
    async fn find_latest_for_owner(&self, owner_id: &str) -> AppResult<Option<StudyDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().rev().find(|d| d.owner_id == owner_id).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryResourceRepository {
    resources: Arc<RwLock<Vec<Resource>>>,
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn create(&self, resource: Resource) -> AppResult<Resource> {
        self.resources.write().await.push(resource.clone());
        Ok(resource)
    }

    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64> {
        let resources = self.resources.read().await;
        Ok(resources.iter().filter(|r| r.subject == subject).count() as u64)
    }

    /// Later pushes win ties on `uploaded_at`.
    async fn find_by_subject(&self, subject: Subject) -> AppResult<Vec<Resource>> {
        let resources = self.resources.read().await;
        let mut found: Vec<Resource> = resources
            .iter()
            .rev()
            .filter(|r| r.subject == subject)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(found)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Replies with a canned answer and keeps every prompt it was sent.
pub struct ScriptedModel {
    reply: Option<String>,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub async fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.prompts.lock().await.last().cloned()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: Vec<ChatMessage>) -> AppResult<String> {
        self.prompts.lock().await.push(messages);
        self.reply
            .clone()
            .ok_or_else(|| AppError::UpstreamUnavailable("Assistant unavailable".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        app_env: "test".to_string(),
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "campus-portal-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 1,
        refresh_token_expiration_hours: 24,
        admin_usernames: vec!["registrar".to_string()],
        llm_api_base: "http://localhost:9/v1".to_string(),
        llm_api_key: None,
        llm_model: "test-model".to_string(),
        llm_timeout_seconds: 1,
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// An application over in-memory storage with "today" pinned.
pub struct TestPortal {
    pub state: Arc<AppState>,
    pub goals: Arc<InMemoryGoalRepository>,
    pub submissions: Arc<InMemoryGoalSubmissionRepository>,
    pub model: Arc<ScriptedModel>,
}

impl TestPortal {
    pub fn on(today: &str) -> Self {
        Self::with_model(today, ScriptedModel::replying("Here is a short explanation."))
    }

    pub fn with_model(today: &str, model: ScriptedModel) -> Self {
        let goals = Arc::new(InMemoryGoalRepository::default());
        let submissions = Arc::new(InMemoryGoalSubmissionRepository::default());
        let model = Arc::new(model);

        let repositories = Repositories {
            users: Arc::new(InMemoryUserRepository::new()),
            profiles: Arc::new(InMemoryProfileRepository::default()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenRepository::default()),
            announcements: Arc::new(InMemoryAnnouncementRepository::default()),
            goals: goals.clone(),
            submissions: submissions.clone(),
            library_records: Arc::new(InMemoryLibraryRecordRepository::default()),
            complaints: Arc::new(InMemoryComplaintRepository::default()),
            permissions: Arc::new(InMemoryPermissionRepository::default()),
            study_documents: Arc::new(InMemoryStudyDocumentRepository::default()),
            resources: Arc::new(InMemoryResourceRepository::default()),
        };

        let state = AppState::from_repositories(
            test_config(),
            repositories,
            Arc::new(FixedClock(date(today))),
            model.clone(),
        );

        Self {
            state: Arc::new(state),
            goals,
            submissions,
            model,
        }
    }

    /// Signs a user up and returns the caller identity plus its access token.
    pub async fn register(&self, username: &str, role: UserRole) -> (Caller, String) {
        let response = self
            .state
            .auth_service
            .signup(SignupRequest {
                first_name: "Test".to_string(),
                last_name: username.to_string(),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "secret123".to_string(),
                confirm_password: "secret123".to_string(),
                role: Some(role),
            })
            .await
            .expect("signup succeeds");

        let caller = Caller {
            user_id: response.user.id.clone(),
            username: response.user.username.clone(),
            role: response.role,
            is_admin: response.is_admin,
        };
        (caller, response.token)
    }
}
