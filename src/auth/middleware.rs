use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    web::Data,
};
use serde_json::json;
use tracing::debug;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;

fn deny(req: ServiceRequest, reason: &str) -> Result<ServiceResponse<BoxBody>, Error> {
    debug!(reason, path = %req.path(), "rejected bearer token");
    let resp = HttpResponse::Unauthorized().json(json!({ "error": reason }));
    Ok(req.into_response(resp.map_into_boxed_body()))
}

/// Decodes the bearer token once per request and stashes the resulting
/// [`AuthUser`] in request extensions for the handlers behind this scope.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ErrorInternalServerError("App config missing"))?
        .jwt_secret
        .clone();

    let Some(header) = req.headers().get("Authorization") else {
        return deny(req, "Missing Authorization header");
    };
    let Ok(header) = header.to_str() else {
        return deny(req, "Invalid Authorization header encoding");
    };
    let Some(token) = header.strip_prefix("Bearer ") else {
        return deny(req, "Authorization header must start with Bearer");
    };

    let claims = match verify_token(token, &secret) {
        Ok(claims) => claims,
        Err(detail) => {
            debug!(%detail, "token verification failed");
            return deny(req, "Invalid or expired token");
        }
    };
    let Some(role) = Role::from_id(claims.role) else {
        return deny(req, "Unknown role in token");
    };

    req.extensions_mut().insert(AuthUser {
        employee_id: claims.employee_id,
        email: claims.sub,
        role,
    });

    next.call(req).await
}
