use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::service::access;
use crate::store::EmployeeStore;

/// Public employee view: the stored record minus the password hash.
#[derive(Serialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1001,
        "full_name": "John Doe",
        "position": "Engineer",
        "role_id": 3,
        "email": "john.doe@company.com",
        "enabled": true,
        "used_leave_days": 3,
        "remaining_leave_days": 17,
        "annual_allotment": 20,
        "hire_date": "2024-01-01"
    })
)]
pub struct EmployeeView {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "Engineer")]
    pub position: String,

    #[schema(example = 3)]
    pub role_id: u8,

    #[schema(example = "john.doe@company.com", format = "email", value_type = String)]
    pub email: String,

    pub enabled: bool,

    #[schema(example = 3)]
    pub used_leave_days: i32,

    #[schema(example = 17)]
    pub remaining_leave_days: i32,

    #[schema(example = 20)]
    pub annual_allotment: i32,

    #[schema(example = "2024-01-01", format = "date", value_type = Option<String>, nullable = true)]
    pub hire_date: Option<NaiveDate>,
}

impl From<Employee> for EmployeeView {
    fn from(e: Employee) -> Self {
        EmployeeView {
            employee_id: e.employee_id,
            full_name: e.full_name,
            position: e.position,
            role_id: e.role_id,
            email: e.email,
            enabled: e.enabled,
            used_leave_days: e.used_leave_days,
            remaining_leave_days: e.remaining_leave_days,
            annual_allotment: e.annual_allotment,
            hire_date: e.hire_date,
        }
    }
}

/// for getting an employee profile with leave balances endpoint
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee id to fetch")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<dyn EmployeeStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    access::require_employee_access(&auth.caller(), employee_id)?;

    let employee = store
        .find_by_employee_id(employee_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Employee".into()))?;

    Ok(HttpResponse::Ok().json(EmployeeView::from(employee)))
}
