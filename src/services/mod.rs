//! Domain services used by the page controller and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own auth and session logic so route handlers can stay
//! focused on protocol translation and cookie plumbing.

pub mod auth_gate;
pub mod credentials;
pub mod session;
