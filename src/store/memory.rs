use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveVerdict};
use crate::store::{BalanceDebit, EmployeeStore, LeaveStore, StoreError};

#[derive(Default)]
struct Inner {
    employees: HashMap<u64, Employee>,
    leaves: HashMap<String, LeaveRequest>,
    leave_order: Vec<String>,
}

/// Single-process store backing dev mode (no DATABASE_URL) and the test
/// suite. Both tables live under one lock so `finalize` stays atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert(&self, employee: Employee) -> Result<Employee, StoreError> {
        let mut guard = self.lock()?;
        if guard.employees.contains_key(&employee.employee_id) {
            return Err(StoreError::Duplicate);
        }
        if guard.employees.values().any(|e| e.email == employee.email) {
            return Err(StoreError::Duplicate);
        }
        guard
            .employees
            .insert(employee.employee_id, employee.clone());
        Ok(employee)
    }

    async fn find_by_employee_id(&self, employee_id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.lock()?.employees.get(&employee_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .lock()?
            .employees
            .values()
            .find(|e| e.email == email)
            .cloned())
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        let mut guard = self.lock()?;
        if guard.leaves.contains_key(&request.id) {
            return Err(StoreError::Duplicate);
        }
        guard.leave_order.push(request.id.clone());
        guard.leaves.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.lock()?.leaves.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .leave_order
            .iter()
            .rev()
            .filter_map(|id| guard.leaves.get(id).cloned())
            .collect())
    }

    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .leave_order
            .iter()
            .rev()
            .filter_map(|id| guard.leaves.get(id))
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .leave_order
            .iter()
            .rev()
            .filter_map(|id| guard.leaves.get(id))
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn finalize(
        &self,
        id: &str,
        verdict: LeaveVerdict,
        note: Option<String>,
        debit: Option<BalanceDebit>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut guard = self.lock()?;
        match guard.leaves.get(id) {
            None => return Err(StoreError::NotFound),
            Some(r) if r.status != LeaveStatus::Pending => {
                return Err(StoreError::AlreadyDecided { current: r.status });
            }
            Some(_) => {}
        }
        if let Some(debit) = debit {
            let employee = guard
                .employees
                .get_mut(&debit.employee_id)
                .ok_or(StoreError::NotFound)?;
            employee.used_leave_days += debit.days;
            employee.remaining_leave_days -= debit.days;
        }
        let request = guard.leaves.get_mut(id).ok_or(StoreError::NotFound)?;
        request.status = verdict.status();
        request.decision_note = note;
        request.decided_at = Some(Utc::now());
        Ok(request.clone())
    }
}
