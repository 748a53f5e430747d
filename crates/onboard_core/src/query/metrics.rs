//! Dashboard aggregates.

use crate::model::collaborator::directory;
use crate::model::ids::CollaboratorId;
use crate::model::project::{KanbanStatus, Project};
use crate::query::filter::Selection;
use serde::Serialize;

/// Month labels of the overview chart, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_projects: usize,
    /// Projects not in `Done`.
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Rounded percent of projects in `Done`; `0` without projects.
    pub completion_rate: u32,
    /// Incomplete general checklist tasks across the selection.
    pub pending_tasks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: &'static str,
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorLoad {
    pub collaborator_id: CollaboratorId,
    pub name: String,
    pub projects: usize,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub metrics: DashboardMetrics,
    pub monthly: Vec<MonthlyBucket>,
    pub collaborators: Vec<CollaboratorLoad>,
}

/// Headline numbers over the projects assigned to `collaborator`.
pub fn compute_metrics(
    projects: &[Project],
    collaborator: Selection<CollaboratorId>,
) -> DashboardMetrics {
    let selected = projects
        .iter()
        .filter(|project| collaborator.accepts(project.assigned_to.as_ref()));

    let mut metrics = DashboardMetrics::default();
    for project in selected {
        metrics.total_projects += 1;
        if project.status == KanbanStatus::Done {
            metrics.completed_projects += 1;
        } else {
            metrics.active_projects += 1;
        }
        metrics.pending_tasks += project.checklist.pending_count();
    }

    if metrics.total_projects > 0 {
        let rate = metrics.completed_projects as f64 / metrics.total_projects as f64 * 100.0;
        metrics.completion_rate = rate.round() as u32;
    }
    metrics
}

/// Projects per deadline month, January to December.
///
/// Projects whose deadline does not parse are left out.
pub fn monthly_distribution(projects: &[Project]) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = MONTH_LABELS
        .into_iter()
        .map(|month| MonthlyBucket {
            month,
            total: 0,
            active: 0,
            completed: 0,
        })
        .collect();

    for project in projects {
        let Some(deadline) = project.deadline_date() else {
            continue;
        };
        let bucket = &mut buckets[usize::from(u8::from(deadline.month())) - 1];
        bucket.total += 1;
        if project.status == KanbanStatus::Done {
            bucket.completed += 1;
        } else {
            bucket.active += 1;
        }
    }
    buckets
}

/// Project count per directory collaborator, busiest first.
///
/// Every collaborator appears, including those with no projects; ties keep
/// directory order.
pub fn collaborator_distribution(projects: &[Project]) -> Vec<CollaboratorLoad> {
    let mut loads: Vec<CollaboratorLoad> = directory()
        .iter()
        .map(|collaborator| CollaboratorLoad {
            collaborator_id: collaborator.id,
            name: collaborator.name.clone(),
            projects: projects
                .iter()
                .filter(|project| project.assigned_to == Some(collaborator.id))
                .count(),
        })
        .collect();
    loads.sort_by(|a, b| b.projects.cmp(&a.projects));
    loads
}

/// Full dashboard; the collaborator filter applies to the headline numbers only.
pub fn dashboard(
    projects: &[Project],
    collaborator: Selection<CollaboratorId>,
) -> DashboardSnapshot {
    DashboardSnapshot {
        metrics: compute_metrics(projects, collaborator),
        monthly: monthly_distribution(projects),
        collaborators: collaborator_distribution(projects),
    }
}
