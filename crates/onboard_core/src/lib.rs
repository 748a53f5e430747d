//! Core domain logic for the onboarding project dashboard.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod kanban;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use kanban::{board, DragSession, DropOutcome, KanbanCard, KanbanColumn, KanbanController};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::checklist::{Checklist, ChecklistItem};
pub use model::ids::{ChecklistItemId, CollaboratorId, ProjectId};
pub use model::project::{
    Answer, ChecklistKind, ComplexityLevel, KanbanStatus, NewProjectRequest, Project,
    ProjectPatch, ProjectPhase,
};
pub use model::ValidationError;
pub use query::{
    collaborator_distribution, compute_metrics, dashboard, monthly_distribution, DashboardMetrics,
    DashboardSnapshot, ProjectQuery, Selection, SortKey,
};
pub use repo::project_repo::{KvProjectRepository, ProjectRepository};
pub use repo::user_repo::{KvUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService, LoginOutcome};
pub use service::phase::{PendingPhaseChange, PhaseChange};
pub use service::project_service::{ProjectService, ProjectServiceError, ServiceResult};
pub use session::{AppSession, Theme};
pub use store::kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
