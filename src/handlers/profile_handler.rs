use actix_web::{get, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::UpdateProfileRequest,
};

#[get("/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = state.profile_service.get_profile(&auth.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    request: web::Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let profile = state.profile_service.update_profile(&auth.0, request).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/students")]
pub async fn list_students(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let students = state.profile_service.list_students(&auth.0).await?;
    Ok(HttpResponse::Ok().json(students))
}
