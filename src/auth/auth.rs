use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

use crate::model::role::Role;
use crate::service::access::Caller;

/// Verified caller identity. `auth_middleware` decodes the bearer token once
/// per request and stores this in request extensions; extracting it on a
/// route outside the protected scope yields 401.
#[derive(Clone)]
pub struct AuthUser {
    pub employee_id: u64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing credentials")),
        )
    }
}

impl AuthUser {
    /// Identity handed to the workflow engine.
    pub fn caller(&self) -> Caller {
        Caller {
            employee_id: self.employee_id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}
