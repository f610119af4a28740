use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreateGoalRequest, ReviewSubmissionRequest, SubmitGoalRequest},
    models::dto::response::MessageResponse,
};

/// Faculty get the goals they authored, students the goals assigned to them.
#[get("/goals")]
pub async fn list_goals(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller = auth.0;
    if caller.is_faculty() {
        let goals = state.goal_service.list_for_faculty(&caller).await?;
        Ok(HttpResponse::Ok().json(goals))
    } else {
        let goals = state.goal_service.list_for_student(&caller).await?;
        Ok(HttpResponse::Ok().json(goals))
    }
}

#[post("/goals")]
pub async fn create_goal(
    state: web::Data<AppState>,
    request: web::Json<CreateGoalRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let goal = state.goal_service.create_goal(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(goal))
}

#[get("/goals/{id}")]
pub async fn get_goal(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let goal = state.goal_service.get_goal(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(goal))
}

#[post("/goals/{id}/submit")]
pub async fn submit_goal(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitGoalRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let submission = state.goal_service.submit(&auth.0, &id, request).await?;
    Ok(HttpResponse::Created().json(submission))
}

#[get("/goals/{id}/submissions")]
pub async fn goal_submissions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let dashboard = state
        .goal_service
        .submissions_dashboard(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[post("/goals/{goal_id}/submissions/{submission_id}/review")]
pub async fn review_submission(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<ReviewSubmissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (goal_id, submission_id) = path.into_inner();
    let request = request.into_inner();
    request.validate()?;

    let submission = state
        .goal_service
        .review(&auth.0, &goal_id, &submission_id, request)
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[post("/goals/{id}/complete")]
pub async fn complete_goal(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let goal = state.goal_service.complete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(goal))
}

#[post("/goals/{id}/delete")]
pub async fn delete_goal(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.goal_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Goal deleted".to_string(),
    }))
}
