//! Project use-case service.
//!
//! # Responsibility
//! - Create projects from intake input and apply partial updates by id.
//! - Drive checklist, weekly progress, class and detail edits.
//! - Route phase changes through the phase gate.
//!
//! # Invariants
//! - Every write is a whole-collection read-modify-write; concurrent writers
//!   are last-writer-wins.
//! - Missing ids are silent no-ops (`Ok(None)`); nothing is written.
//! - Validation errors abort before anything is written.

use crate::clock::Clock;
use crate::model::checklist::Checklist;
use crate::model::ids::{ChecklistItemId, ProjectId};
use crate::model::project::{
    AlignmentDetails, ChecklistKind, ComplexityLevel, CompletedClass, NewProjectRequest,
    OperationalDetails, Project, ProjectPatch, ProjectPhase, WeeklyProgressEntry,
    TRAINING_CLASSES,
};
use crate::model::ValidationError;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoError;
use crate::service::phase::{decide, PendingPhaseChange, PhaseChange, PhaseDecision};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

#[derive(Debug)]
pub enum ProjectServiceError {
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProjectServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Project store facade over a repository and a clock.
pub struct ProjectService<R: ProjectRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ProjectRepository, C: Clock> ProjectService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whole collection in stored order.
    pub fn list(&self) -> Vec<Project> {
        self.repo.load_all()
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.repo
            .load_all()
            .into_iter()
            .find(|project| project.id == id)
    }

    /// Persists a collection as-is.
    pub fn save(&self, projects: &[Project]) -> ServiceResult<()> {
        self.repo.save_all(projects)?;
        Ok(())
    }

    /// Creates a project from the new-project form.
    ///
    /// The id is the current timestamp, bumped past any id already stored.
    pub fn create(&self, request: NewProjectRequest) -> ServiceResult<Project> {
        let input = request.validate()?;

        let mut projects = self.repo.try_load_all()?;
        let next_free = projects
            .iter()
            .map(|project| project.id.0.saturating_add(1))
            .max()
            .unwrap_or(i64::MIN);
        let id = ProjectId(self.clock.now_ms().max(next_free));

        let project = Project::from_intake(id, input);
        projects.push(project.clone());
        self.repo.save_all(&projects)?;

        info!(
            "event=project_create module=service status=ok project_id={} total={}",
            id,
            projects.len()
        );
        Ok(project)
    }

    /// Shallow-merges `patch` into the project with `id`.
    pub fn update(&self, id: ProjectId, patch: ProjectPatch) -> ServiceResult<Option<Project>> {
        self.mutate(id, "update", |project| {
            patch.apply_to(project);
            Ok(true)
        })
    }

    /// Seeds the general checklist template when the list is empty.
    pub fn ensure_default_checklist(&self, id: ProjectId) -> ServiceResult<Option<Project>> {
        self.mutate(id, "seed_checklist", |project| {
            if !project.checklist.is_empty() {
                return Ok(false);
            }
            project.checklist = Checklist::general_template();
            Ok(true)
        })
    }

    /// Appends a task to one of the project's checklists.
    ///
    /// Returns the new task id, or `None` when the project does not exist.
    pub fn add_task(
        &self,
        id: ProjectId,
        kind: ChecklistKind,
        label: &str,
    ) -> ServiceResult<Option<ChecklistItemId>> {
        if label.trim().is_empty() {
            return Err(ValidationError::EmptyTaskLabel.into());
        }

        let now_ms = self.clock.now_ms();
        let mut added = None;
        self.mutate(id, "add_task", |project| {
            let floor = project.next_item_id_floor(now_ms);
            added = Some(project.checklist_mut(kind).add_task(label, floor)?);
            Ok(true)
        })?;
        Ok(added)
    }

    /// Flips one task. Unknown project or task ids change nothing.
    pub fn toggle_task(
        &self,
        id: ProjectId,
        kind: ChecklistKind,
        task_id: ChecklistItemId,
    ) -> ServiceResult<Option<Project>> {
        self.mutate(id, "toggle_task", |project| {
            Ok(project.checklist_mut(kind).toggle_task(task_id))
        })
    }

    /// Removes one task. Unknown project or task ids change nothing.
    pub fn delete_task(
        &self,
        id: ProjectId,
        kind: ChecklistKind,
        task_id: ChecklistItemId,
    ) -> ServiceResult<Option<Project>> {
        self.mutate(id, "delete_task", |project| {
            Ok(project.checklist_mut(kind).delete_task(task_id))
        })
    }

    /// Appends a dated weekly progress note.
    pub fn append_weekly_progress(
        &self,
        id: ProjectId,
        content: &str,
    ) -> ServiceResult<Option<Project>> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyProgressEntry.into());
        }

        let date = self.clock.now_rfc3339();
        self.mutate(id, "weekly_progress", |project| {
            project.weekly_progress_entries.push(WeeklyProgressEntry {
                date,
                content: content.to_string(),
            });
            Ok(true)
        })
    }

    /// Marks a training class done (replacing any earlier record) or undone.
    pub fn set_class_completion(
        &self,
        id: ProjectId,
        class_name: &str,
        completed: bool,
        collaborator: Option<String>,
    ) -> ServiceResult<Option<Project>> {
        let class_name = TRAINING_CLASSES
            .into_iter()
            .find(|name| *name == class_name.trim())
            .ok_or_else(|| ValidationError::UnknownClass(class_name.to_string()))?;

        let date = self.clock.now_rfc3339();
        self.mutate(id, "class_completion", |project| {
            let before = project.completed_classes.len();
            project
                .completed_classes
                .retain(|class| class.name != class_name);
            if completed {
                project.completed_classes.push(CompletedClass {
                    name: class_name.to_string(),
                    date,
                    collaborator,
                });
                return Ok(true);
            }
            Ok(project.completed_classes.len() != before)
        })
    }

    /// Merges alignment-meeting answers and the complexity level.
    pub fn submit_alignment_details(
        &self,
        id: ProjectId,
        details: AlignmentDetails,
        complexity_level: Option<ComplexityLevel>,
    ) -> ServiceResult<Option<Project>> {
        self.update(
            id,
            ProjectPatch {
                alignment: Some(details),
                complexity_level,
                ..ProjectPatch::default()
            },
        )
    }

    /// Merges the operational survey.
    pub fn submit_operational_details(
        &self,
        id: ProjectId,
        details: OperationalDetails,
    ) -> ServiceResult<Option<Project>> {
        self.update(
            id,
            ProjectPatch {
                operational: Some(details),
                ..ProjectPatch::default()
            },
        )
    }

    /// Asks to move a project to the phase named `target`.
    ///
    /// # Errors
    /// - `UnknownPhase` when `target` is not a phase wire value.
    pub fn request_phase_change(
        &self,
        id: ProjectId,
        target: &str,
    ) -> ServiceResult<Option<PhaseChange>> {
        let target: ProjectPhase = target.parse()?;
        let Some(project) = self.get(id) else {
            return Ok(None);
        };

        match decide(&project, target) {
            PhaseDecision::Unchanged => Ok(Some(PhaseChange::Unchanged(project))),
            PhaseDecision::Commit => Ok(self
                .write_phase(id, target)?
                .map(PhaseChange::Committed)),
            PhaseDecision::NeedsConfirmation { progress } => {
                info!(
                    "event=phase_change module=service status=pending project_id={} progress={:.0}",
                    id, progress
                );
                Ok(Some(PhaseChange::PendingConfirmation(PendingPhaseChange {
                    project_id: id,
                    target,
                    progress,
                })))
            }
        }
    }

    /// Commits a phase change the user confirmed.
    pub fn confirm_phase_change(
        &self,
        pending: PendingPhaseChange,
    ) -> ServiceResult<Option<Project>> {
        self.write_phase(pending.project_id, pending.target)
    }

    fn write_phase(&self, id: ProjectId, target: ProjectPhase) -> ServiceResult<Option<Project>> {
        self.mutate(id, "phase_change", |project| {
            let changed = project.project_phase != target;
            project.project_phase = target;
            Ok(changed)
        })
    }

    /// Loads, applies `change` to the project with `id`, and saves when
    /// `change` reports a modification.
    fn mutate<F>(
        &self,
        id: ProjectId,
        op: &'static str,
        change: F,
    ) -> ServiceResult<Option<Project>>
    where
        F: FnOnce(&mut Project) -> ServiceResult<bool>,
    {
        let mut projects = self.repo.try_load_all()?;
        let Some(project) = projects.iter_mut().find(|project| project.id == id) else {
            debug!(
                "event=project_{} module=service status=noop reason=not_found project_id={}",
                op, id
            );
            return Ok(None);
        };

        let changed = change(project)?;
        let updated = project.clone();
        if changed {
            self.repo.save_all(&projects)?;
            info!(
                "event=project_{} module=service status=ok project_id={}",
                op, id
            );
        } else {
            debug!(
                "event=project_{} module=service status=noop reason=unchanged project_id={}",
                op, id
            );
        }
        Ok(Some(updated))
    }
}
