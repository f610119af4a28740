use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use campus_portal::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config.validate_for_production();

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = match AppState::new(config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let jwt_service = web::Data::from(state.jwt_service.clone());

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(jwt_service.clone())
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
