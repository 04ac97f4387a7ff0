//! Authentication engine.
//!
//! This module provides:
//! - `hasher`: deterministic SHA-256 password digests
//! - `AttemptTracker`: per-username failed-login counting with lockout
//! - `AuthService`: the facade composing the hasher, tracker, and store
//!
//! Lockout state lives in memory only and lasts for the process run.

pub mod attempts;
pub mod error;
pub mod hasher;
pub mod service;

pub use error::{AuthError, ValidationRule};
pub use service::{AuthService, AuthenticatedUser};
