use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

use crate::api::advisory::{AnalysisResponse, AnalyzeText};
use crate::api::employee::EmployeeView;
use crate::api::leave_request::{CreateLeave, DecideLeave, LeaveFilter};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::models::{LoginReq, LoginResponse, RegisterReq};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## Leave request tracker

This API lets employees submit leave requests and HR/admin staff decide them.

### Key features
- **Leave requests**
  - Submit, list, and view leave requests
  - Approve/reject with an optional decision note; approval debits the balance
- **Employees**
  - Register, log in, and view profiles with leave balances
- **Advisory**
  - Optional free-text analysis of request reasons

### Security
All endpoints under the API prefix require **JWT Bearer authentication**.
Approve and reject are restricted to the **Admin** and **HR** roles.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::list_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::employee::get_employee,

        crate::api::advisory::analyze_text
    ),
    components(
        schemas(
            CreateLeave,
            DecideLeave,
            LeaveFilter,
            LeaveRequest,
            LeaveStatus,
            EmployeeView,
            AnalyzeText,
            AnalysisResponse,
            RegisterReq,
            LoginReq,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Employee", description = "Employee profile APIs"),
        (name = "Advisory", description = "Free-text analysis APIs"),
    )
)]
pub struct ApiDoc;
