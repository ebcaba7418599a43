//! Souk Sparkle Admin library.
//!
//! Back-office panel for the jewelry marketplace, built around one core
//! component: the [`gate`] that decides whether a visitor may reach the
//! administrative area. Everything else is thin plumbing between the
//! router and the hosted backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
