use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{IssueBookRequest, UnmarkReturnedRequest},
    models::dto::response::UnmarkResponse,
};

/// Faculty get what they issued; students get what they borrowed plus the outstanding total.
#[get("/library")]
pub async fn list_records(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller = auth.0;
    if caller.is_faculty() {
        let records = state.library_service.list_issued(&caller).await?;
        Ok(HttpResponse::Ok().json(records))
    } else {
        let records = state.library_service.list_borrowed(&caller).await?;
        Ok(HttpResponse::Ok().json(records))
    }
}

#[post("/library")]
pub async fn issue_book(
    state: web::Data<AppState>,
    request: web::Json<IssueBookRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let record = state.library_service.issue(&auth.0, request).await?;
    Ok(HttpResponse::Created().json(record))
}

#[post("/library/{id}/return")]
pub async fn mark_returned(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = state.library_service.mark_returned(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[get("/library/{id}/penalty")]
pub async fn penalty(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let readout = state.library_service.penalty(&auth.0, &id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(readout))
}

#[post("/admin/library/unmark")]
pub async fn unmark_returned(
    state: web::Data<AppState>,
    request: web::Json<UnmarkReturnedRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let updated = state
        .library_service
        .unmark_returned(&auth.0, &request.record_ids)
        .await?;
    Ok(HttpResponse::Ok().json(UnmarkResponse { updated }))
}
