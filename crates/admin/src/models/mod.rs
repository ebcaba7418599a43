//! Domain models for the admin panel.

mod admin_record;
mod session;

pub use admin_record::AdminRecord;
pub use session::{CurrentAdmin, keys as session_keys};
