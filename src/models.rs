use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "Engineer")]
    pub position: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    pub password: String,

    /// 1 = admin, 2 = HR, 3 = employee. Defaults to employee.
    #[schema(example = 3, nullable = true)]
    pub role_id: Option<u8>,

    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// Seconds until the token expires.
    #[schema(example = 36000)]
    pub expires_in: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub employee_id: u64,
    /// Employee email.
    pub sub: String,
    /// Role id, resolved through `Role::from_id` on every request.
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}
