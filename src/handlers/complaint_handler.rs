use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        AmendComplaintRequest, ComplaintStatusRequest, CreateComplaintRequest,
        EditComplaintRequest,
    },
    models::dto::response::MessageResponse,
};

#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let complaints = state.complaint_service.list(&auth.0).await?;
    Ok(HttpResponse::Ok().json(complaints))
}

#[post("/complaints")]
pub async fn create_complaint(
    state: web::Data<AppState>,
    request: web::Json<CreateComplaintRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let complaint = state.complaint_service.create(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(complaint))
}

#[get("/complaints/{id}")]
pub async fn get_complaint(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let complaint = state.complaint_service.get(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[post("/complaints/{id}/edit")]
pub async fn edit_complaint(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<EditComplaintRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let complaint = state.complaint_service.edit(&auth.0, &id, request).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[post("/complaints/{id}/delete")]
pub async fn delete_complaint(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.complaint_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Complaint deleted".to_string(),
    }))
}

#[post("/complaints/{id}/status")]
pub async fn update_complaint_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ComplaintStatusRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let complaint = state
        .complaint_service
        .update_status(&auth.0, &id, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[post("/complaints/{id}/amend")]
pub async fn amend_complaint(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AmendComplaintRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let complaint = state.complaint_service.amend(&auth.0, &id, request).await?;
    Ok(HttpResponse::Ok().json(complaint))
}
