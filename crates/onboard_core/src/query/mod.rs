//! Derived views over the project collection.
//!
//! # Responsibility
//! - Filter and sort the projects listing.
//! - Compute dashboard aggregates and chart series.
//!
//! # Invariants
//! - Every function here is pure; nothing reads or writes the store.
//! - The `all` selection disables a filter.

pub mod filter;
pub mod metrics;

pub use filter::{ProjectQuery, Selection, SortKey};
pub use metrics::{
    collaborator_distribution, compute_metrics, dashboard, monthly_distribution,
    CollaboratorLoad, DashboardMetrics, DashboardSnapshot, MonthlyBucket,
};
