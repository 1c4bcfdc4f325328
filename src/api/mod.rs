pub mod advisory;
pub mod employee;
pub mod leave_request;
