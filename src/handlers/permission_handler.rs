use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        AmendPermissionRequest, CreatePermissionRequest, EditPermissionRequest,
        PermissionDecisionRequest,
    },
    models::dto::response::MessageResponse,
};

#[get("/permissions")]
pub async fn list_permissions(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let permissions = state.permission_service.list(&auth.0).await?;
    Ok(HttpResponse::Ok().json(permissions))
}

#[post("/permissions")]
pub async fn create_permission(
    state: web::Data<AppState>,
    request: web::Json<CreatePermissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let permission = state.permission_service.create(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(permission))
}

#[get("/permissions/{id}")]
pub async fn get_permission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let permission = state.permission_service.get(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(permission))
}

#[post("/permissions/{id}/edit")]
pub async fn edit_permission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<EditPermissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let permission = state.permission_service.edit(&auth.0, &id, request).await?;
    Ok(HttpResponse::Ok().json(permission))
}

#[post("/permissions/{id}/delete")]
pub async fn delete_permission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.permission_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Permission request deleted".to_string(),
    }))
}

#[post("/permissions/{id}/decide")]
pub async fn decide_permission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<PermissionDecisionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let permission = state.permission_service.decide(&auth.0, &id, request).await?;
    Ok(HttpResponse::Ok().json(permission))
}

#[post("/permissions/{id}/amend")]
pub async fn amend_permission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AmendPermissionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let permission = state.permission_service.amend(&auth.0, &id, request).await?;
    Ok(HttpResponse::Ok().json(permission))
}
