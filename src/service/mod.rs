pub mod access;
pub mod advisor;
pub mod leave;
