pub mod announcement_repository;
pub mod complaint_repository;
pub mod goal_repository;
pub mod goal_submission_repository;
pub mod library_record_repository;
pub mod permission_repository;
pub mod profile_repository;
pub mod refresh_token_repository;
pub mod resource_repository;
pub mod study_document_repository;
pub mod user_repository;

pub use announcement_repository::{AnnouncementRepository, MongoAnnouncementRepository};
pub use complaint_repository::{ComplaintRepository, MongoComplaintRepository};
pub use goal_repository::{GoalRepository, MongoGoalRepository};
pub use goal_submission_repository::{GoalSubmissionRepository, MongoGoalSubmissionRepository};
pub use library_record_repository::{LibraryRecordRepository, MongoLibraryRecordRepository};
pub use permission_repository::{MongoPermissionRepository, PermissionRepository};
pub use profile_repository::{MongoProfileRepository, ProfileRepository};
pub use refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository};
pub use resource_repository::{MongoResourceRepository, ResourceRepository};
pub use study_document_repository::{MongoStudyDocumentRepository, StudyDocumentRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
