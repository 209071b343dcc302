//! Depot Console Library
//!
//! Client-side list views over the depot inventory API: the activity log viewer, the
//! admin user table and the dashboard.

pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use services::{ApiClient, Credential, RecordSource};
pub use utils::{ConsoleError, ConsoleResult};
