pub mod announcement;
pub mod complaint;
pub mod goal;
pub mod goal_submission;
pub mod library_record;
pub mod permission_request;
pub mod profile;
pub mod refresh_token;
pub mod resource;
pub mod study_document;
pub mod user;
pub use announcement::Announcement;
pub use complaint::Complaint;
pub use goal::{Goal, QuizQuestion};
pub use goal_submission::GoalSubmission;
pub use library_record::LibraryRecord;
pub use permission_request::PermissionRequest;
pub use profile::Profile;
pub use refresh_token::RefreshToken;
pub use resource::Resource;
pub use study_document::StudyDocument;
pub use user::User;
