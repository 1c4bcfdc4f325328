pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveVerdict};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// The compare-and-swap found the request already out of PENDING.
    #[error("request already decided ({current})")]
    AlreadyDecided { current: LeaveStatus },

    #[error("record already exists")]
    Duplicate,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23000") => {
                StoreError::Duplicate
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Balance adjustment applied to the owning employee when a request is
/// approved. `days` equals the request's `requested_days`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BalanceDebit {
    pub employee_id: u64,
    pub days: i32,
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fails with `Duplicate` when the employee id or email is taken.
    async fn insert(&self, employee: Employee) -> Result<Employee, StoreError>;
    async fn find_by_employee_id(&self, employee_id: u64) -> Result<Option<Employee>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError>;
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError>;
    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Compare-and-swap finalization. Moves the request out of PENDING only
    /// if it is still PENDING, stamping `decided_at` and applying `debit` to
    /// the owning employee in the same transaction. A concurrent loser gets
    /// `AlreadyDecided` with the status that won.
    async fn finalize(
        &self,
        id: &str,
        verdict: LeaveVerdict,
        note: Option<String>,
        debit: Option<BalanceDebit>,
    ) -> Result<LeaveRequest, StoreError>;
}
