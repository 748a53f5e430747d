//! Listing filters and sort orders.

use crate::model::ids::CollaboratorId;
use crate::model::project::{ComplexityLevel, Project, ProjectPhase};
use std::cmp::Ordering;
use std::str::FromStr;

const ALL_SENTINEL: &str = "all";

/// One filter's setting: everything, or one exact value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn accepts(&self, value: Option<&T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    /// `"all"` selects everything; anything else must parse as `T`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim() == ALL_SENTINEL {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Name ascending, accent- and case-insensitive.
    #[default]
    Name,
    /// Deadline descending; unparseable deadlines last.
    Date,
    /// Complexity descending; unset complexity last.
    Complexity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "complexity" => Ok(Self::Complexity),
            other => Err(format!(
                "unknown sort key `{other}`; expected name|date|complexity"
            )),
        }
    }
}

/// Listing settings: three filters and a sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub collaborator: Selection<CollaboratorId>,
    pub phase: Selection<ProjectPhase>,
    pub complexity: Selection<ComplexityLevel>,
    pub sort: SortKey,
}

impl ProjectQuery {
    /// Whether `project` passes every active filter.
    pub fn matches(&self, project: &Project) -> bool {
        self.collaborator.accepts(project.assigned_to.as_ref())
            && self.phase.accepts(Some(&project.project_phase))
            && self.complexity.accepts(project.complexity_level.as_ref())
    }

    /// Filtered and sorted copy of `projects`. Sorting is stable.
    pub fn apply(&self, projects: &[Project]) -> Vec<Project> {
        let mut selected: Vec<Project> = projects
            .iter()
            .filter(|project| self.matches(project))
            .cloned()
            .collect();
        sort_projects(&mut selected, self.sort);
        selected
    }
}

pub fn sort_projects(projects: &mut [Project], key: SortKey) {
    match key {
        SortKey::Name => projects.sort_by_cached_key(|project| collation_key(&project.name)),
        SortKey::Date => projects.sort_by(|a, b| b.deadline_date().cmp(&a.deadline_date())),
        SortKey::Complexity => projects.sort_by(|a, b| compare_complexity_desc(a, b)),
    }
}

fn compare_complexity_desc(a: &Project, b: &Project) -> Ordering {
    let rank = |project: &Project| project.complexity_level.map_or(0, ComplexityLevel::rank);
    rank(b).cmp(&rank(a))
}

/// Case- and accent-folded key so "Ágil" sorts next to "agil".
fn collation_key(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
