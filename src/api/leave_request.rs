use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::service::leave::{LeaveService, SubmitLeave};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-07-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-07-05", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    /// Optional free text, forwarded to the advisory backend when present.
    #[schema(example = "Family vacation", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    /// Optional note recorded with the decision.
    #[schema(example = "Enjoy your trip", nullable = true)]
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by status (PENDING, APPROVED or REJECTED, any case)
    #[schema(example = "PENDING")]
    pub status: Option<String>,
}

fn parse_status(filter: &LeaveFilter) -> Result<Option<LeaveStatus>, ApiError> {
    match filter.status.as_deref() {
        Some(raw) => raw
            .parse::<LeaveStatus>()
            .map(Some)
            .map_err(|_| {
                ApiError::Validation("status must be one of PENDING, APPROVED, REJECTED".into())
            }),
        None => Ok(None),
    }
}

/* =========================
Submit leave request
========================= */
/// Swagger doc for submit_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid dates or not enough leave days remaining"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let input = SubmitLeave {
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: payload.reason,
    };

    let request = svc.submit(&auth.caller(), input).await?;
    Ok(HttpResponse::Created().json(request))
}

/* =========================
Approve leave (HR/Admin)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/approve",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to approve")
    ),
    request_body(
        content = DecideLeave,
        description = "Optional decision note",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave approved, balance debited", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed", body = Object, example = json!({
            "message": "leave request already processed (current status: APPROVED)"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
    body: Option<web::Json<DecideLeave>>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let note = body.and_then(|b| b.into_inner().note);

    let request = svc.approve(&auth.caller(), &leave_id, note).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Reject leave (HR/Admin)
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/reject",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to reject")
    ),
    request_body(
        content = DecideLeave,
        description = "Optional decision note",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave rejected, balance untouched", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
    body: Option<web::Json<DecideLeave>>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let note = body.and_then(|b| b.into_inner().note);

    let request = svc.reject(&auth.caller(), &leave_id, note).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// for getting a leave request's details endpoint
#[utoipa::path(
    get,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let request = svc.get(&auth.caller(), &leave_id).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// for listing leave requests endpoint
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests visible to the caller", body = [LeaveRequest]),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_leaves(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let status = parse_status(&query)?;
    let rows = svc.list(&auth.caller(), status).await?;
    Ok(HttpResponse::Ok().json(rows))
}
