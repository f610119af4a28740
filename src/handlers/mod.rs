pub mod announcement_handler;
pub mod assistant_handler;
pub mod auth_handler;
pub mod complaint_handler;
pub mod goal_handler;
pub mod health_handler;
pub mod library_handler;
pub mod permission_handler;
pub mod profile_handler;
pub mod resource_handler;

use actix_web::{error::InternalError, web, HttpResponse, ResponseError};

use crate::{auth::AuthMiddleware, errors::AppError};

fn bad_request(message: String) -> actix_web::Error {
    let err = AppError::ValidationError(message);
    InternalError::from_response(err.to_string(), err.error_response()).into()
}

/// Every route of the portal. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .service(health_handler::health_check)
        .service(health_handler::liveness)
        .service(health_handler::readiness)
        .service(
            web::scope("/api/auth")
                .service(auth_handler::signup)
                .service(auth_handler::login)
                .service(auth_handler::refresh_token)
                .service(auth_handler::logout),
        )
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(profile_handler::get_profile)
                .service(profile_handler::update_profile)
                .service(profile_handler::list_students)
                .service(announcement_handler::list_announcements)
                .service(announcement_handler::create_announcement)
                .service(announcement_handler::get_announcement)
                .service(announcement_handler::update_announcement)
                .service(announcement_handler::delete_announcement)
                .service(goal_handler::list_goals)
                .service(goal_handler::create_goal)
                .service(goal_handler::get_goal)
                .service(goal_handler::submit_goal)
                .service(goal_handler::goal_submissions)
                .service(goal_handler::review_submission)
                .service(goal_handler::complete_goal)
                .service(goal_handler::delete_goal)
                .service(library_handler::list_records)
                .service(library_handler::issue_book)
                .service(library_handler::mark_returned)
                .service(library_handler::penalty)
                .service(library_handler::unmark_returned)
                .service(complaint_handler::list_complaints)
                .service(complaint_handler::create_complaint)
                .service(complaint_handler::get_complaint)
                .service(complaint_handler::edit_complaint)
                .service(complaint_handler::delete_complaint)
                .service(complaint_handler::update_complaint_status)
                .service(complaint_handler::amend_complaint)
                .service(permission_handler::list_permissions)
                .service(permission_handler::create_permission)
                .service(permission_handler::get_permission)
                .service(permission_handler::edit_permission)
                .service(permission_handler::delete_permission)
                .service(permission_handler::decide_permission)
                .service(permission_handler::amend_permission)
                .service(assistant_handler::chat)
                .service(assistant_handler::upload_document)
                .service(assistant_handler::ask_document)
                .service(resource_handler::subject_index)
                .service(resource_handler::upload_resource)
                .service(resource_handler::subject_resources)
                .default_service(web::to(|| async {
                    HttpResponse::NotFound().json(serde_json::json!({
                        "error": "Not found",
                        "code": "NOT_FOUND",
                        "status": 404
                    }))
                })),
        );
}
