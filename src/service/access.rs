use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveRequest;
use crate::model::role::Role;

/// Identity extracted from a verified bearer token. This triple is all the
/// engine ever learns about the caller; token parsing stays in `auth`.
#[derive(Debug, Clone)]
pub struct Caller {
    pub employee_id: u64,
    pub email: String,
    pub role: Role,
}

/// Submission gate: callers act on their own record and the record must
/// still be enabled. Tokens outlive account changes, so the enabled flag is
/// checked against the stored row, not the token.
pub fn require_submitter(caller: &Caller, employee: &Employee) -> Result<(), ApiError> {
    if employee.employee_id != caller.employee_id {
        return Err(ApiError::Forbidden(
            "Cannot submit leave for another employee".into(),
        ));
    }
    if !employee.enabled {
        return Err(ApiError::Forbidden("Employee account is disabled".into()));
    }
    Ok(())
}

/// Decision gate for approve/reject.
pub fn require_approver(caller: &Caller) -> Result<(), ApiError> {
    if caller.role.is_approver() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("HR/Admin only".into()))
    }
}

/// Read gate for a single request: owners see their own, approvers see all.
pub fn require_request_access(caller: &Caller, request: &LeaveRequest) -> Result<(), ApiError> {
    if caller.role.is_approver() || request.employee_id == caller.employee_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Not the owner of this leave request".into(),
        ))
    }
}

/// Read gate for an employee profile, same owner-or-approver rule.
pub fn require_employee_access(caller: &Caller, employee_id: u64) -> Result<(), ApiError> {
    if caller.role.is_approver() || employee_id == caller.employee_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Not allowed to view this employee".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::model::leave_request::LeaveStatus;

    fn caller(employee_id: u64, role: Role) -> Caller {
        Caller {
            employee_id,
            email: format!("e{employee_id}@company.com"),
            role,
        }
    }

    fn employee(employee_id: u64, enabled: bool) -> Employee {
        Employee {
            employee_id,
            full_name: "Jane Roe".into(),
            position: "Analyst".into(),
            role_id: Role::Employee.id(),
            email: format!("e{employee_id}@company.com"),
            password: "hash".into(),
            enabled,
            used_leave_days: 0,
            remaining_leave_days: 20,
            annual_allotment: 20,
            hire_date: None,
        }
    }

    fn request_of(employee_id: u64) -> LeaveRequest {
        LeaveRequest {
            id: "r1".into(),
            employee_id,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            requested_days: 2,
            status: LeaveStatus::Pending,
            reason: None,
            advisory: None,
            decision_note: None,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    #[test]
    fn submitter_must_own_the_record_and_be_enabled() {
        assert!(require_submitter(&caller(1, Role::Employee), &employee(1, true)).is_ok());
        assert!(require_submitter(&caller(1, Role::Employee), &employee(2, true)).is_err());
        assert!(require_submitter(&caller(1, Role::Employee), &employee(1, false)).is_err());
    }

    #[test]
    fn only_approver_roles_pass_the_decision_gate() {
        assert!(require_approver(&caller(1, Role::Admin)).is_ok());
        assert!(require_approver(&caller(1, Role::Hr)).is_ok());
        let err = require_approver(&caller(1, Role::Employee)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn request_access_is_owner_or_approver() {
        assert!(require_request_access(&caller(1, Role::Employee), &request_of(1)).is_ok());
        assert!(require_request_access(&caller(2, Role::Employee), &request_of(1)).is_err());
        assert!(require_request_access(&caller(2, Role::Hr), &request_of(1)).is_ok());
        assert!(require_request_access(&caller(2, Role::Admin), &request_of(1)).is_ok());
    }

    #[test]
    fn employee_profile_access_is_owner_or_approver() {
        assert!(require_employee_access(&caller(1, Role::Employee), 1).is_ok());
        assert!(require_employee_access(&caller(1, Role::Employee), 2).is_err());
        assert!(require_employee_access(&caller(9, Role::Hr), 2).is_ok());
    }
}
