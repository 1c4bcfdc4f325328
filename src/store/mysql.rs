use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveVerdict};
use crate::store::{BalanceDebit, EmployeeStore, LeaveStore, StoreError};

/// MySQL-backed store. Finalization runs inside a transaction so the status
/// swap and the balance debit land together or not at all.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn insert(&self, employee: Employee) -> Result<Employee, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO employees
                (employee_id, full_name, position, role_id, email, password, enabled,
                 used_leave_days, remaining_leave_days, annual_allotment, hire_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.position)
        .bind(employee.role_id)
        .bind(&employee.email)
        .bind(&employee.password)
        .bind(employee.enabled)
        .bind(employee.used_leave_days)
        .bind(employee.remaining_leave_days)
        .bind(employee.annual_allotment)
        .bind(employee.hire_date)
        .execute(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn find_by_employee_id(&self, employee_id: u64) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO leave_requests
                (id, employee_id, start_date, end_date, requested_days, status,
                 reason, advisory, decision_note, created_at, decided_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(request.employee_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.requested_days)
        .bind(request.status)
        .bind(&request.reason)
        .bind(&request.advisory)
        .bind(&request.decision_note)
        .bind(request.created_at)
        .bind(request.decided_at)
        .execute(&self.pool)
        .await?;
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError> {
        let row = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE employee_id = ? ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE status = ? ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn finalize(
        &self,
        id: &str,
        verdict: LeaveVerdict,
        note: Option<String>,
        debit: Option<BalanceDebit>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut tx = self.pool.begin().await?;

        let swapped = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, decision_note = ?, decided_at = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(verdict.status())
        .bind(&note)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if swapped == 0 {
            // zero rows means either no such request or a lost race;
            // a second read tells the two apart
            let current = sqlx::query_scalar::<_, LeaveStatus>(
                "SELECT status FROM leave_requests WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
            tx.rollback().await?;
            return match current {
                Some(status) => Err(StoreError::AlreadyDecided { current: status }),
                None => Err(StoreError::NotFound),
            };
        }

        if let Some(debit) = debit {
            let adjusted = sqlx::query(
                r#"
                UPDATE employees
                SET used_leave_days = used_leave_days + ?,
                    remaining_leave_days = remaining_leave_days - ?
                WHERE employee_id = ?
                "#,
            )
            .bind(debit.days)
            .bind(debit.days)
            .bind(debit.employee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if adjusted == 0 {
                tx.rollback().await?;
                return Err(StoreError::NotFound);
            }
        }

        let request = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }
}
