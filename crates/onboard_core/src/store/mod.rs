//! Key-value persistence collaborator.
//!
//! # Responsibility
//! - Model the string-keyed local store that holds JSON blobs.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Writes overwrite the whole value for a key.
//! - No cross-key transactions; the last writer wins.

pub mod kv_store;
