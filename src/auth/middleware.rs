use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{Caller, JwtService},
    errors::AppError,
};

/// Guards the `/api` scope: resolves the bearer token to a `Caller` stored in the
/// request extensions, or answers 401 without reaching the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is matched
/// case-insensitively.
fn bearer_token(req: &ServiceRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationRequired("Please log in".to_string()))?;

    match header.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AppError::AuthenticationRequired(
            "Invalid authorization header format".to_string(),
        )),
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Caller, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let claims = jwt.verify_access(bearer_token(req)?).map_err(|e| {
        log::debug!("Access token rejected: {}", e);
        AppError::AuthenticationRequired("Invalid or expired token".to_string())
    })?;
    Ok(Caller::from(&claims))
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let caller = match authenticate(&req) {
                Ok(caller) => caller,
                Err(err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    let response = err.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(caller);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor for the authenticated caller in handlers.
pub struct AuthenticatedUser(pub Caller);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let caller = req
            .extensions()
            .get::<Caller>()
            .cloned()
            .ok_or_else(|| AppError::AuthenticationRequired("Not authenticated".to_string()));

        ready(caller.map(AuthenticatedUser))
    }
}
