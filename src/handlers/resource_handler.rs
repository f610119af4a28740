use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::UploadResourceRequest,
};

#[get("/resources")]
pub async fn subject_index(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let index = state.resource_service.index().await?;
    Ok(HttpResponse::Ok().json(index))
}

#[post("/resources")]
pub async fn upload_resource(
    state: web::Data<AppState>,
    request: web::Json<UploadResourceRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let resource = state.resource_service.upload(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(resource))
}

#[get("/resources/{subject}")]
pub async fn subject_resources(
    state: web::Data<AppState>,
    subject: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let resources = state.resource_service.list_subject(&subject).await?;
    Ok(HttpResponse::Ok().json(resources))
}
