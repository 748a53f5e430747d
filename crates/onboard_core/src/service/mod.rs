//! Use-case services.
//!
//! # Responsibility
//! - Turn UI intents into read-modify-write cycles over repositories.
//! - Own the phase gate and the login flow.
//!
//! # Invariants
//! - Every mutation loads the whole collection, changes it, then saves it.
//! - A mutation that targets a missing id is a silent no-op.
//! - Validation runs before any state is touched.

pub mod auth_service;
pub mod phase;
pub mod project_service;
