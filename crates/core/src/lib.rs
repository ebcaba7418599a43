//! Souk Sparkle Core - Shared types library.
//!
//! This crate provides common types used across all Souk Sparkle components:
//! - `admin` - Back-office panel for the jewelry marketplace
//! - `cli` - Command-line tools for bootstrap and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no access
//! to the hosted backend. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
