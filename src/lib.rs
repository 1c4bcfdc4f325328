//! Leave request tracking service. Employees submit leave requests, HR and
//! admin staff approve or reject them, and approved days are debited from a
//! fixed annual allotment.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
