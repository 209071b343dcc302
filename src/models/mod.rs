//! Data models

mod log_entry;
mod stats;
pub mod timestamp;
mod user;

pub use log_entry::*;
pub use stats::*;
pub use user::*;
