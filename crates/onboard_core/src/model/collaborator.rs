//! Static collaborator directory.
//!
//! The directory is reference data for assignment and filter options.
//! It is never persisted or mutated by core.

use crate::model::ids::CollaboratorId;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: CollaboratorId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
}

static DIRECTORY: Lazy<Vec<Collaborator>> = Lazy::new(|| {
    [
        (1, "Rafael Degolin", "rafael@example.com", "Gerente de Projetos", "TI"),
        (2, "Daniel Souza", "daniel@example.com", "Desenvolvedor", "TI"),
        (3, "Eduardo Gonçalves", "eduardo@example.com", "Analista de Projetos", "TI"),
        (4, "Cauã Araujo", "kauan@example.com", "Designer", "Design"),
    ]
    .into_iter()
    .map(|(id, name, email, role, department)| Collaborator {
        id: CollaboratorId(id),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        department: department.to_string(),
    })
    .collect()
});

/// Returns the full directory in display order.
pub fn directory() -> &'static [Collaborator] {
    DIRECTORY.as_slice()
}

/// Looks up one collaborator by id.
pub fn find_collaborator(id: CollaboratorId) -> Option<&'static Collaborator> {
    DIRECTORY.iter().find(|collaborator| collaborator.id == id)
}

#[cfg(test)]
mod tests {
    use super::{directory, find_collaborator};
    use crate::model::ids::CollaboratorId;

    #[test]
    fn directory_ids_are_unique_and_resolvable() {
        let entries = directory();
        assert_eq!(entries.len(), 4);
        for entry in entries {
            assert_eq!(find_collaborator(entry.id), Some(entry));
        }
        assert!(find_collaborator(CollaboratorId(99)).is_none());
    }
}
