use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::service::leave::LeaveService;

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeText {
    #[schema(example = "Requesting two weeks off for a family wedding abroad")]
    pub text: String,
}

#[derive(Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// for analyzing free text through the advisory backend endpoint
#[utoipa::path(
    post,
    path = "/api/advisory",
    request_body(
        content = AnalyzeText,
        description = "Text to analyze",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Analysis produced", body = AnalysisResponse),
        (status = 400, description = "Empty text"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Advisory"
)]
pub async fn analyze_text(
    auth: AuthUser,
    svc: web::Data<LeaveService>,
    payload: web::Json<AnalyzeText>,
) -> actix_web::Result<impl Responder> {
    info!(employee_id = auth.employee_id, "advisory analysis requested");

    let analysis = svc.analyze(&payload.text).await?;
    Ok(HttpResponse::Ok().json(AnalysisResponse { analysis }))
}
