use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}

#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    if state.is_ready().await {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ready", "database": "up" }))
    } else {
        log::warn!("Readiness check failed: database unreachable");
        HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "status": "not_ready", "database": "down" }))
    }
}
