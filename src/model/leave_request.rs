use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a leave request. PENDING is the only state a request can
/// leave; APPROVED and REJECTED are terminal.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }
}

impl sqlx::Type<sqlx::MySql> for LeaveStatus {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <str as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <str as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for LeaveStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::MySql as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for LeaveStatus {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::MySql>>::decode(value)?;
        Ok(raw.parse::<LeaveStatus>()?)
    }
}

/// Terminal outcome an approver applies to a pending request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveVerdict {
    Approve,
    Reject,
}

impl LeaveVerdict {
    pub fn status(self) -> LeaveStatus {
        match self {
            LeaveVerdict::Approve => LeaveStatus::Approved,
            LeaveVerdict::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "3d9e7f6a-1d2b-4c8e-9f0a-5b6c7d8e9f01",
        "employee_id": 1001,
        "start_date": "2025-07-01",
        "end_date": "2025-07-05",
        "requested_days": 5,
        "status": "PENDING",
        "reason": "Family vacation",
        "advisory": null,
        "decision_note": null,
        "created_at": "2025-06-20T09:15:00Z",
        "decided_at": null
    })
)]
pub struct LeaveRequest {
    #[schema(example = "3d9e7f6a-1d2b-4c8e-9f0a-5b6c7d8e9f01")]
    pub id: String,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2025-07-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2025-07-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    /// Inclusive day count, (end_date - start_date) + 1.
    #[schema(example = 5)]
    pub requested_days: i32,

    #[schema(example = "PENDING")]
    pub status: LeaveStatus,

    #[schema(example = "Family vacation", nullable = true)]
    pub reason: Option<String>,

    /// Text produced by the advisory backend at submission time, if any.
    #[schema(nullable = true)]
    pub advisory: Option<String>,

    /// Free-form note the approver attached when deciding.
    #[schema(nullable = true)]
    pub decision_note: Option<String>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Label used in logs and advisory prompts, e.g. "01.07.2025-05.07.2025".
    pub fn date_range_label(&self) -> String {
        format!(
            "{}-{}",
            self.start_date.format("%d.%m.%Y"),
            self.end_date.format("%d.%m.%Y")
        )
    }
}

/// Inclusive day count of a date span. Callers validate start <= end first.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
