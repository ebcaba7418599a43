//! Core domain types.
//!
//! Newtype wrappers that make it impossible to confuse entity references,
//! plus the small validated value types shared between the admin panel
//! and the CLI.

mod email;
mod id;
mod role;

pub use email::{Email, EmailError};
pub use id::{AdminId, UserId};
pub use role::AdminRole;
