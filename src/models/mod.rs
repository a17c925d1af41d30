//! Data models mirrored from the hosted backend.
//!
//! Rows deserialize from the backend's column names and serialize to the
//! dashboard in camelCase, so the UI never sees the storage vocabulary.

mod analytics;
mod asset;
mod hour_meter;
mod operator;
mod problem;
mod report;
mod user;

pub use analytics::*;
pub use asset::*;
pub use hour_meter::*;
pub use operator::*;
pub use problem::*;
pub use report::*;
pub use user::*;
