pub mod announcement_service;
pub mod assistant_service;
pub mod auth_service;
pub mod complaint_service;
pub mod goal_service;
pub mod language_model;
pub mod library_service;
pub mod passage_ranking;
pub mod permission_service;
pub mod profile_service;
pub mod quiz_grading;
pub mod resource_service;
