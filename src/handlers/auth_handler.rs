use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{LoginRequest, RefreshTokenRequest, SignupRequest},
    models::dto::response::MessageResponse,
};

#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state.auth_service.signup(request).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state.auth_service.login(request).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth_service.logout(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
