//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Encode and decode whole collections stored under well-known keys.
//! - Isolate JSON and storage details from services.
//!
//! # Invariants
//! - Reads fail soft: absent or malformed values load as empty.
//! - Writes replace the whole stored value (last writer wins).

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure on the write path or a store transport failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode stored value: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
