use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::role::Role;
use crate::models::{LoginReq, LoginResponse, RegisterReq};
use crate::store::{EmployeeStore, StoreError};

/// Employee registration handler. New accounts start with a zeroed usage
/// counter and the configured annual allotment.
pub async fn register(
    req: web::Json<RegisterReq>,
    store: web::Data<dyn EmployeeStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let email = req.email.trim().to_lowercase();

    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password must not be empty".into(),
        ));
    }
    if req.full_name.trim().is_empty() {
        return Err(ApiError::Validation("full_name must not be empty".into()));
    }
    let role = match req.role_id {
        Some(id) => {
            Role::from_id(id).ok_or_else(|| ApiError::Validation("unknown role_id".into()))?
        }
        None => Role::Employee,
    };

    let hashed =
        hash_password(&req.password).map_err(|e| ApiError::Dependency(format!("hashing: {e}")))?;

    let employee = Employee {
        employee_id: req.employee_id,
        full_name: req.full_name.trim().to_string(),
        position: req.position.trim().to_string(),
        role_id: role.id(),
        email,
        password: hashed,
        enabled: true,
        used_leave_days: 0,
        remaining_leave_days: config.annual_leave_allotment,
        annual_allotment: config.annual_leave_allotment,
        hire_date: req.hire_date,
    };

    match store.insert(employee).await {
        Ok(created) => {
            info!(employee_id = created.employee_id, "employee registered");
            Ok(HttpResponse::Created().json(json!({
                "message": "Employee registered successfully"
            })))
        }
        Err(StoreError::Duplicate) => Ok(HttpResponse::Conflict().json(json!({
            "message": "Employee id or email already taken"
        }))),
        Err(e) => Err(e.into()),
    }
}

#[instrument(
    name = "auth_login",
    skip(store, config, req),
    fields(email = %req.email)
)]
pub async fn login(
    req: web::Json<LoginReq>,
    store: web::Data<dyn EmployeeStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    // 1. basic validation
    if req.email.trim().is_empty() || req.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::Validation(
            "email and password must not be empty".into(),
        ));
    }

    // 2. fetch employee
    debug!("Fetching employee record");
    let email = req.email.trim().to_lowercase();
    let employee = match store.find_by_email(&email).await {
        Ok(Some(e)) => {
            debug!(employee_id = e.employee_id, "Employee found");
            e
        }
        Ok(None) => {
            info!("Invalid credentials: employee not found");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching employee");
            return Err(e.into());
        }
    };

    if !employee.enabled {
        info!("Login rejected: account disabled");
        return Err(ApiError::Unauthorized("Account disabled".into()));
    }

    // 3. verify password
    debug!("Verifying password");
    if let Err(e) = verify_password(&req.password, &employee.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }
    debug!("Password verified");

    let role = employee.role().ok_or_else(|| {
        ApiError::Dependency(format!(
            "employee {} has unknown role_id {}",
            employee.employee_id, employee.role_id
        ))
    })?;

    // 4. issue access token
    debug!("Generating access token");
    let access_token = generate_access_token(
        employee.employee_id,
        employee.email.clone(),
        role.id(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| ApiError::Dependency(format!("token signing: {e}")))?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        expires_in: config.access_token_ttl,
    }))
}
