use actix_web::{post, web, HttpResponse};
use futures::StreamExt;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::{AppError, AppResult},
    models::dto::request::{AssistantRequest, DocumentQuestionRequest, UploadDocumentQuery},
    models::dto::response::AssistantReply,
    services::assistant_service::MAX_DOCUMENT_BYTES,
};

#[post("/study/assistant")]
pub async fn chat(
    state: web::Data<AppState>,
    request: web::Json<AssistantRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let reply = state
        .assistant_service
        .chat(&auth.0, &request.message, &request.history)
        .await?;
    Ok(HttpResponse::Ok().json(AssistantReply { reply }))
}

/// Raw UTF-8 body; the name comes from `?filename=`.
#[post("/study/documents")]
pub async fn upload_document(
    state: web::Data<AppState>,
    query: web::Query<UploadDocumentQuery>,
    payload: web::Payload,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let body = read_limited(payload, MAX_DOCUMENT_BYTES).await?;

    let uploaded = state
        .assistant_service
        .upload_document(&auth.0, query.filename.as_deref(), &body)
        .await?;
    Ok(HttpResponse::Created().json(uploaded))
}

#[post("/study/documents/ask")]
pub async fn ask_document(
    state: web::Data<AppState>,
    request: web::Json<DocumentQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let reply = state
        .assistant_service
        .ask_document(&auth.0, &request.question, &request.history)
        .await?;
    Ok(HttpResponse::Ok().json(AssistantReply { reply }))
}

async fn read_limited(mut payload: web::Payload, limit: usize) -> AppResult<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| AppError::ValidationError(format!("Could not read upload: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::ValidationError(
                "Document is larger than 1 MiB".to_string(),
            ));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
