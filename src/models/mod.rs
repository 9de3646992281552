//! Data models for the AeroMed dispatch backend.
//!
//! Field names follow the dashboard's JSON shapes (`_id`, camelCase) so existing clients keep working.

mod activity;
mod inventory;
mod operator;
mod request;

pub use activity::*;
pub use inventory::*;
pub use operator::*;
pub use request::*;
