use std::sync::Arc;
use std::time::Duration;

use actix_web::rt;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::leave_request::{span_days, LeaveRequest, LeaveStatus, LeaveVerdict};
use crate::service::access::{self, Caller};
use crate::service::advisor::{AdvisorError, TextAdvisor};
use crate::store::{BalanceDebit, EmployeeStore, LeaveStore};

/// Marker stored when the advisory backend fails or times out. Inert text,
/// never an error: enrichment must not block a submission.
pub const ADVISORY_UNAVAILABLE: &str = "advisory unavailable";

#[derive(Debug, Clone)]
pub struct SubmitLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Workflow engine for the leave lifecycle. All writes go through the store
/// traits; handlers hold this behind `web::Data`.
pub struct LeaveService {
    employees: Arc<dyn EmployeeStore>,
    leaves: Arc<dyn LeaveStore>,
    advisor: Arc<dyn TextAdvisor>,
    advisor_timeout: Duration,
}

impl LeaveService {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        leaves: Arc<dyn LeaveStore>,
        advisor: Arc<dyn TextAdvisor>,
        advisor_timeout: Duration,
    ) -> Self {
        Self {
            employees,
            leaves,
            advisor,
            advisor_timeout,
        }
    }

    pub async fn submit(
        &self,
        caller: &Caller,
        input: SubmitLeave,
    ) -> Result<LeaveRequest, ApiError> {
        let employee = self
            .employees
            .find_by_employee_id(caller.employee_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Employee".into()))?;
        access::require_submitter(caller, &employee)?;

        if input.start_date > input.end_date {
            return Err(ApiError::Validation(
                "start_date cannot be after end_date".into(),
            ));
        }
        let days = i32::try_from(span_days(input.start_date, input.end_date))
            .map_err(|_| ApiError::Validation("leave span too large".into()))?;
        if days > employee.remaining_leave_days {
            return Err(ApiError::Validation(
                "not enough leave days remaining".into(),
            ));
        }

        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let advisory = self.annotate(reason.as_deref()).await;

        let request = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            employee_id: employee.employee_id,
            start_date: input.start_date,
            end_date: input.end_date,
            requested_days: days,
            status: LeaveStatus::Pending,
            reason,
            advisory,
            decision_note: None,
            created_at: Utc::now(),
            decided_at: None,
        };
        let request = self.leaves.insert(request).await?;
        info!(
            request_id = %request.id,
            employee_id = request.employee_id,
            days = request.requested_days,
            range = %request.date_range_label(),
            "leave request submitted"
        );
        Ok(request)
    }

    pub async fn approve(
        &self,
        caller: &Caller,
        id: &str,
        note: Option<String>,
    ) -> Result<LeaveRequest, ApiError> {
        self.decide(caller, id, LeaveVerdict::Approve, note).await
    }

    pub async fn reject(
        &self,
        caller: &Caller,
        id: &str,
        note: Option<String>,
    ) -> Result<LeaveRequest, ApiError> {
        self.decide(caller, id, LeaveVerdict::Reject, note).await
    }

    async fn decide(
        &self,
        caller: &Caller,
        id: &str,
        verdict: LeaveVerdict,
        note: Option<String>,
    ) -> Result<LeaveRequest, ApiError> {
        access::require_approver(caller)?;

        let request = self
            .leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Leave request".into()))?;
        if request.status != LeaveStatus::Pending {
            return Err(ApiError::AlreadyDecided {
                current: request.status,
            });
        }

        // balance moves only on approval, and by exactly the days recorded
        // at submission
        let debit = match verdict {
            LeaveVerdict::Approve => Some(BalanceDebit {
                employee_id: request.employee_id,
                days: request.requested_days,
            }),
            LeaveVerdict::Reject => None,
        };
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let decided = self.leaves.finalize(id, verdict, note, debit).await?;
        info!(
            request_id = %decided.id,
            employee_id = decided.employee_id,
            status = %decided.status,
            decided_by = caller.employee_id,
            "leave request decided"
        );
        Ok(decided)
    }

    pub async fn list(
        &self,
        caller: &Caller,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, ApiError> {
        if caller.role.is_approver() {
            let rows = match status {
                Some(status) => self.leaves.list_by_status(status).await?,
                None => self.leaves.list_all().await?,
            };
            return Ok(rows);
        }
        let mut rows = self.leaves.list_by_employee(caller.employee_id).await?;
        if let Some(status) = status {
            rows.retain(|r| r.status == status);
        }
        Ok(rows)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<LeaveRequest, ApiError> {
        let request = self
            .leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Leave request".into()))?;
        access::require_request_access(caller, &request)?;
        Ok(request)
    }

    /// Standalone advisory call for the analysis endpoint. Failures come
    /// back as the inert marker, same as during submission.
    pub async fn analyze(&self, text: &str) -> Result<String, ApiError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Validation("text must not be empty".into()));
        }
        Ok(self
            .annotate(Some(trimmed))
            .await
            .unwrap_or_else(|| ADVISORY_UNAVAILABLE.to_string()))
    }

    async fn annotate(&self, reason: Option<&str>) -> Option<String> {
        let text = reason.map(str::trim).filter(|t| !t.is_empty())?;
        match rt::time::timeout(self.advisor_timeout, self.advisor.advise(text)).await {
            Ok(Ok(advisory)) => Some(advisory),
            Ok(Err(AdvisorError::Disabled)) => None,
            Ok(Err(err)) => {
                warn!(error = %err, "advisory enrichment failed");
                Some(ADVISORY_UNAVAILABLE.to_string())
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.advisor_timeout.as_millis() as u64,
                    "advisory enrichment timed out"
                );
                Some(ADVISORY_UNAVAILABLE.to_string())
            }
        }
    }
}
