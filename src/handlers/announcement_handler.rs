use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::domain::announcement::AnnouncementFilter,
    models::dto::request::AnnouncementRequest,
    models::dto::response::MessageResponse,
};

#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<AppState>,
    filter: web::Query<AnnouncementFilter>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let board = state.announcement_service.board(&filter).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[get("/announcements/{id}")]
pub async fn get_announcement(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let announcement = state.announcement_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(announcement))
}

#[post("/announcements")]
pub async fn create_announcement(
    state: web::Data<AppState>,
    request: web::Json<AnnouncementRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let announcement = state.announcement_service.create(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(announcement))
}

#[post("/announcements/{id}/edit")]
pub async fn update_announcement(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AnnouncementRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let announcement = state
        .announcement_service
        .update(&auth.0, &id, request)
        .await?;
    Ok(HttpResponse::Ok().json(announcement))
}

#[post("/announcements/{id}/delete")]
pub async fn delete_announcement(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.announcement_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Announcement deleted".to_string(),
    }))
}
