use chrono::NaiveDate;

use crate::model::role::Role;

/// Stored employee record. The password field holds an argon2 hash and the
/// struct is never serialized to the wire as-is; see `api::employee` for the
/// public view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
    pub employee_id: u64,
    pub full_name: String,
    pub position: String,
    pub role_id: u8,
    pub email: String,
    pub password: String,
    pub enabled: bool,
    pub used_leave_days: i32,
    pub remaining_leave_days: i32,
    pub annual_allotment: i32,
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn role(&self) -> Option<Role> {
        Role::from_id(self.role_id)
    }

    /// used + remaining must always equal the allotment fixed at registration.
    pub fn balance_is_conserved(&self) -> bool {
        self.used_leave_days + self.remaining_leave_days == self.annual_allotment
    }
}
