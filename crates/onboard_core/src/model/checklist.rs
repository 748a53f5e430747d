//! Checklist engine.
//!
//! # Responsibility
//! - Keep ordered task lists attached to a project.
//! - Add, toggle and delete tasks; report completion progress.
//!
//! # Invariants
//! - Insertion order is preserved.
//! - New ids never collide with ids already in the list.
//! - Toggle/delete on an absent id is a no-op, not an error.
//! - Progress of an empty list is `0`.

use crate::model::ids::ChecklistItemId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

const GENERAL_TEMPLATE: &[&str] = &[
    "Conferência na base de produtos",
    "Conferência nos anúncios da conta",
    "Mapeamentos das integrações",
    "Gatilhos de estoque",
    "Notas fiscais",
    "Envio para separação",
    "Natureza de operação",
    "Impressão automática",
    "Depósitos de estoque",
    "Débitos de estoque",
    "Configurações para BPO",
];

const LEADER_ONBOARDING_TEMPLATE: &[&str] = &[
    "Call de Alinhamento com a Thais - Boas Vindas a T.HUB",
    "Criar grupo com os responsáveis pela implementação da empresa",
    "Enviar link do formulário de onboarding",
    "Perguntar se o cliente já tem as contas do Tiny",
    "Se não tiver contas do Tiny, solicitar criação e enviar cupom de desconto",
    "Solicitar ao cliente criação de cadastro na Kiwify",
    "Liberar acesso da área de membros na Kiwify",
    "Colocar responsável da empresa no grupo de Avisos THUB",
    "Agendar reunião de alinhamento para início de setup",
];

/// One task in a checklist. The label is stored under `task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    #[serde(rename = "task")]
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

/// Ordered list of checklist items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(Vec<ChecklistItem>);

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ChecklistItem>) -> Self {
        Self(items)
    }

    /// The 11-item general template seeded on first view.
    pub fn general_template() -> Self {
        Self::from_labels(GENERAL_TEMPLATE)
    }

    /// The 9-item leader onboarding template seeded at creation.
    pub fn leader_onboarding_template() -> Self {
        Self::from_labels(LEADER_ONBOARDING_TEMPLATE)
    }

    fn from_labels(labels: &[&str]) -> Self {
        Self(
            labels
                .iter()
                .zip(1_i64..)
                .map(|(label, id)| ChecklistItem {
                    id: ChecklistItemId(id),
                    label: (*label).to_string(),
                    completed: false,
                })
                .collect(),
        )
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: ChecklistItemId) -> Option<&ChecklistItem> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Largest id present, if any.
    pub fn max_id(&self) -> Option<ChecklistItemId> {
        self.0.iter().map(|item| item.id).max()
    }

    /// Appends an incomplete task labelled with the trimmed `label`.
    ///
    /// The new id is `max(min_id, max_id + 1)`, so callers sharing an id
    /// space across lists pass the floor for the whole space.
    ///
    /// # Errors
    /// - `EmptyTaskLabel` when `label` trims to empty; the list is unchanged.
    pub fn add_task(
        &mut self,
        label: &str,
        min_id: i64,
    ) -> Result<ChecklistItemId, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyTaskLabel);
        }

        let next_local = self.max_id().map_or(i64::MIN, |id| id.0.saturating_add(1));
        let id = ChecklistItemId(min_id.max(next_local));
        self.0.push(ChecklistItem {
            id,
            label: label.to_string(),
            completed: false,
        });
        Ok(id)
    }

    /// Flips `completed` on the matching task. Returns whether one matched.
    pub fn toggle_task(&mut self, id: ChecklistItemId) -> bool {
        match self.0.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    /// Removes the matching task. Returns whether one matched.
    pub fn delete_task(&mut self, id: ChecklistItemId) -> bool {
        let before = self.0.len();
        self.0.retain(|item| item.id != id);
        self.0.len() != before
    }

    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|item| item.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.0.len() - self.completed_count()
    }

    /// Completion percentage in `0.0..=100.0`; `0.0` for an empty list.
    pub fn progress(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.0.len() as f64 * 100.0
    }

    /// Progress rounded for display.
    pub fn progress_rounded(&self) -> u8 {
        self.progress().round() as u8
    }

    pub fn is_complete(&self) -> bool {
        !self.0.is_empty() && self.completed_count() == self.0.len()
    }
}
