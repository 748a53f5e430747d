//! Kanban board and drag-and-drop transitions.
//!
//! # Responsibility
//! - Group projects into the three status columns.
//! - Turn a drag gesture into a status update on the project store.
//!
//! # Invariants
//! - Only a drop on a real column different from the current status writes.
//! - Every drop or cancel clears the active card.

use crate::clock::Clock;
use crate::model::ids::ProjectId;
use crate::model::project::{KanbanStatus, Project, ProjectPatch, ProjectPhase};
use crate::repo::project_repo::ProjectRepository;
use crate::service::project_service::{ProjectService, ServiceResult};
use log::{debug, info};
use serde::Serialize;

/// Gesture-library-agnostic drag session.
pub trait DragSession {
    fn on_start(&mut self, item_id: ProjectId);
    fn on_drop(&mut self, item_id: ProjectId, target_zone_id: &str) -> ServiceResult<DropOutcome>;
    fn on_cancel(&mut self);
}

/// What a drop did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Moved {
        project: Project,
        from: KanbanStatus,
    },
    /// Dropped on the column the card is already in.
    SameColumn,
    /// Not a column, no active drag, or the project no longer exists.
    Ignored,
}

/// Drag controller writing through a `ProjectService`.
pub struct KanbanController<'s, R: ProjectRepository, C: Clock> {
    service: &'s ProjectService<R, C>,
    active: Option<ProjectId>,
}

impl<'s, R: ProjectRepository, C: Clock> KanbanController<'s, R, C> {
    pub fn new(service: &'s ProjectService<R, C>) -> Self {
        Self {
            service,
            active: None,
        }
    }

    /// Card currently being dragged.
    pub fn active_item(&self) -> Option<ProjectId> {
        self.active
    }

    /// Moves `item_id` to `target` in one step, as a keyboard move would.
    pub fn move_to(
        &mut self,
        item_id: ProjectId,
        target: KanbanStatus,
    ) -> ServiceResult<DropOutcome> {
        self.on_start(item_id);
        self.on_drop(item_id, target.as_str())
    }
}

impl<R: ProjectRepository, C: Clock> DragSession for KanbanController<'_, R, C> {
    fn on_start(&mut self, item_id: ProjectId) {
        debug!("event=kanban_drag module=kanban status=start project_id={item_id}");
        self.active = Some(item_id);
    }

    fn on_drop(&mut self, item_id: ProjectId, target_zone_id: &str) -> ServiceResult<DropOutcome> {
        let active = self.active.take();
        if active != Some(item_id) {
            debug!(
                "event=kanban_drag module=kanban status=ignored reason=not_active project_id={}",
                item_id
            );
            return Ok(DropOutcome::Ignored);
        }

        let Ok(target) = target_zone_id.parse::<KanbanStatus>() else {
            debug!(
                "event=kanban_drag module=kanban status=ignored reason=not_a_column project_id={}",
                item_id
            );
            return Ok(DropOutcome::Ignored);
        };
        let Some(current) = self.service.get(item_id) else {
            return Ok(DropOutcome::Ignored);
        };
        if current.status == target {
            return Ok(DropOutcome::SameColumn);
        }

        let from = current.status;
        match self.service.update(item_id, ProjectPatch::status(target))? {
            Some(project) => {
                info!(
                    "event=kanban_move module=kanban status=ok project_id={} from={:?} to={:?}",
                    item_id, from, target
                );
                Ok(DropOutcome::Moved { project, from })
            }
            None => Ok(DropOutcome::Ignored),
        }
    }

    fn on_cancel(&mut self) {
        if let Some(item_id) = self.active.take() {
            debug!("event=kanban_drag module=kanban status=cancelled project_id={item_id}");
        }
    }
}

/// One card as rendered on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanCard {
    pub id: ProjectId,
    pub name: String,
    pub project_phase: ProjectPhase,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanColumn {
    pub status: KanbanStatus,
    pub cards: Vec<KanbanCard>,
}

/// Projects grouped by status in column order, input order within a column.
pub fn board(projects: &[Project]) -> Vec<KanbanColumn> {
    KanbanStatus::COLUMNS
        .into_iter()
        .map(|status| KanbanColumn {
            status,
            cards: projects
                .iter()
                .filter(|project| project.status == status)
                .map(|project| KanbanCard {
                    id: project.id,
                    name: project.name.clone(),
                    project_phase: project.project_phase,
                    progress: project.checklist.progress_rounded(),
                })
                .collect(),
        })
        .collect()
}
