//! Phase gate between `implementação` and `direcionamento`.
//!
//! Moving to `direcionamento` with an unfinished general checklist is held
//! until the user confirms it. Moving back is always allowed.

use crate::model::ids::ProjectId;
use crate::model::project::{Project, ProjectPhase};
use log::info;

/// What the gate says about a requested phase change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseDecision {
    /// Target equals the current phase.
    Unchanged,
    /// Change may be written right away.
    Commit,
    /// Checklist below 100%; needs explicit confirmation first.
    NeedsConfirmation { progress: f64 },
}

/// Evaluates the transition rule for `project` moving to `target`.
pub fn decide(project: &Project, target: ProjectPhase) -> PhaseDecision {
    if project.project_phase == target {
        return PhaseDecision::Unchanged;
    }
    match target {
        ProjectPhase::Direction => {
            let progress = project.progress();
            if progress < 100.0 {
                PhaseDecision::NeedsConfirmation { progress }
            } else {
                PhaseDecision::Commit
            }
        }
        ProjectPhase::Implementation => PhaseDecision::Commit,
    }
}

/// A phase change held until the user answers the warning.
///
/// Hand it to `ProjectService::confirm_phase_change` to commit, or call
/// `decline` to drop it. Either way the token is consumed.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a pending phase change does nothing until confirmed or declined"]
pub struct PendingPhaseChange {
    pub(crate) project_id: ProjectId,
    pub(crate) target: ProjectPhase,
    pub(crate) progress: f64,
}

impl PendingPhaseChange {
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn target(&self) -> ProjectPhase {
        self.target
    }

    /// General checklist progress when the change was requested.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Drops the request; the stored phase stays as it was.
    pub fn decline(self) {
        info!(
            "event=phase_change module=service status=declined project_id={}",
            self.project_id
        );
    }
}

/// Result of asking for a phase change.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseChange {
    Unchanged(Project),
    Committed(Project),
    PendingConfirmation(PendingPhaseChange),
}

#[cfg(test)]
mod tests {
    use super::{decide, PhaseDecision};
    use crate::model::checklist::Checklist;
    use crate::model::ids::ChecklistItemId;
    use crate::model::project::{Project, ProjectPhase};

    fn project_with_progress(done: i64, total: i64) -> Project {
        let mut project: Project = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        let mut list = Checklist::new();
        for n in 1..=total {
            list.add_task(&format!("task {n}"), n).unwrap();
        }
        for n in 1..=done {
            list.toggle_task(ChecklistItemId(n));
        }
        project.checklist = list;
        project
    }

    #[test]
    fn forward_move_is_held_below_full_progress() {
        let project = project_with_progress(3, 5);
        assert_eq!(
            decide(&project, ProjectPhase::Direction),
            PhaseDecision::NeedsConfirmation { progress: 60.0 }
        );
    }

    #[test]
    fn forward_move_commits_at_full_progress() {
        let project = project_with_progress(4, 4);
        assert_eq!(decide(&project, ProjectPhase::Direction), PhaseDecision::Commit);
    }

    #[test]
    fn empty_checklist_counts_as_unfinished() {
        let project = project_with_progress(0, 0);
        assert!(matches!(
            decide(&project, ProjectPhase::Direction),
            PhaseDecision::NeedsConfirmation { .. }
        ));
    }

    #[test]
    fn backward_move_has_no_gate() {
        let mut project = project_with_progress(0, 2);
        project.project_phase = ProjectPhase::Direction;
        assert_eq!(
            decide(&project, ProjectPhase::Implementation),
            PhaseDecision::Commit
        );
        assert_eq!(
            decide(&project, ProjectPhase::Direction),
            PhaseDecision::Unchanged
        );
    }
}
