//! Domain model for onboarding projects.
//!
//! # Responsibility
//! - Define the records stored under the `projects` and `users` keys.
//! - Own the checklist rules and the creation-time validation.
//!
//! # Invariants
//! - Project ids are unique within a collection for the store lifetime.
//! - Kanban status and project phase are independent axes.
//! - Projects are never hard-deleted.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account;
pub mod checklist;
pub mod collaborator;
pub mod ids;
pub mod project;

/// Rejected user input. The operation that raised it changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTaskLabel,
    EmptyProgressEntry,
    MissingField(&'static str),
    UnknownPhase(String),
    UnknownStatus(String),
    UnknownComplexity(String),
    UnknownClass(String),
    UnknownCollaborator(u32),
    InvalidDeadline(String),
    InvalidEmail,
    MissingProduct,
    UnknownProduct(String),
    EmptyPassword,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTaskLabel => write!(f, "task label cannot be empty"),
            Self::EmptyProgressEntry => write!(f, "weekly progress entry cannot be empty"),
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::UnknownPhase(value) => write!(f, "unknown project phase `{value}`"),
            Self::UnknownStatus(value) => write!(f, "unknown kanban status `{value}`"),
            Self::UnknownComplexity(value) => write!(f, "unknown complexity level `{value}`"),
            Self::UnknownClass(value) => write!(f, "unknown training class `{value}`"),
            Self::UnknownCollaborator(id) => write!(f, "unknown collaborator id {id}"),
            Self::InvalidDeadline(value) => {
                write!(f, "invalid deadline `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::MissingProduct => write!(f, "a product must be selected"),
            Self::UnknownProduct(value) => write!(f, "unknown product `{value}`"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
