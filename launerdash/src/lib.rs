//! launerdash: terminal dashboard for the resource monitoring backend.
//!
//! The binary wires these modules together; tests drive them directly.

pub mod adapters;
pub mod api;
pub mod app;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod history;
pub mod logging;
pub mod login;
pub mod poller;
pub mod profiles;
pub mod session;
pub mod types;
pub mod ui;
