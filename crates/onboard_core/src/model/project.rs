//! Project record and its questionnaire sections.
//!
//! # Responsibility
//! - Define the stored shape of one onboarding project.
//! - Validate intake input at creation time.
//! - Apply shallow patches where set fields override stored ones.
//!
//! # Invariants
//! - `status` drives the kanban column; `project_phase` drives the workflow gate.
//! - The three checklists share one item id space.
//! - Unknown stored fields survive a load/save cycle through `extra`.

use crate::model::checklist::Checklist;
use crate::model::collaborator::find_collaborator;
use crate::model::ids::{
    deserialize_optional_collaborator, ChecklistItemId, CollaboratorId, ProjectId,
};
use crate::model::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use time::{Date, Month};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4})-(\d{2})-(\d{2})").expect("valid iso date regex"));
static BR_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{2})/(\d{2})/(\d{4})\s*$").expect("valid br date regex"));

/// Training modules a client can complete.
pub const TRAINING_CLASSES: [&str; 4] = ["produtos", "fluxo diário", "estoque", "financeiro"];

/// Kanban column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KanbanStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl KanbanStatus {
    /// Columns in board order.
    pub const COLUMNS: [KanbanStatus; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl FromStr for KanbanStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::COLUMNS
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()))
    }
}

impl Display for KanbanStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow stage, independent of the kanban column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectPhase {
    #[default]
    #[serde(rename = "implementação")]
    Implementation,
    #[serde(rename = "direcionamento")]
    Direction,
}

impl ProjectPhase {
    pub const ALL: [ProjectPhase; 2] = [Self::Implementation, Self::Direction];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Implementation => "implementação",
            Self::Direction => "direcionamento",
        }
    }
}

impl FromStr for ProjectPhase {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == value.trim())
            .ok_or_else(|| ValidationError::UnknownPhase(value.to_string()))
    }
}

impl Display for ProjectPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Sort rank: low=1, medium=2, high=3.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for ComplexityLevel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ValidationError::UnknownComplexity(other.to_string())),
        }
    }
}

fn deserialize_optional_complexity<'de, D>(
    deserializer: D,
) -> Result<Option<ComplexityLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Selects one of the three per-project checklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistKind {
    General,
    Leader,
    Collaborator,
}

impl FromStr for ChecklistKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "general" => Ok(Self::General),
            "leader" => Ok(Self::Leader),
            "collaborator" => Ok(Self::Collaborator),
            other => Err(format!(
                "unknown checklist `{other}`; expected general|leader|collaborator"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgressEntry {
    /// RFC 3339 timestamp of submission.
    pub date: String,
    pub content: String,
}

/// A training class marked as done.
///
/// Older records list classes by bare name; those load with an empty `date`
/// and are written back as bare names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredClass", into = "StoredClass")]
pub struct CompletedClass {
    pub name: String,
    pub date: String,
    pub collaborator: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredClass {
    Name(String),
    Record {
        name: String,
        #[serde(default)]
        date: String,
        #[serde(default)]
        collaborator: Option<String>,
    },
}

impl From<StoredClass> for CompletedClass {
    fn from(stored: StoredClass) -> Self {
        match stored {
            StoredClass::Name(name) => Self {
                name,
                date: String::new(),
                collaborator: None,
            },
            StoredClass::Record {
                name,
                date,
                collaborator,
            } => Self {
                name,
                date,
                collaborator,
            },
        }
    }
}

impl From<CompletedClass> for StoredClass {
    fn from(class: CompletedClass) -> Self {
        if class.date.is_empty() && class.collaborator.is_none() {
            return Self::Name(class.name);
        }
        Self::Record {
            name: class.name,
            date: class.date,
            collaborator: class.collaborator,
        }
    }
}

/// Questionnaire answer kept in the JSON shape it was stored with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(serde_json::Number),
    List(Vec<String>),
}

/// Reads a free-text answer that may have been stored as a number or flag.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Text(text)) => Some(text),
        Some(Loose::Number(number)) => Some(number.to_string()),
        Some(Loose::Flag(flag)) => Some(flag.to_string()),
    })
}

macro_rules! overlay {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $patch.$field.is_some() {
                $target.$field = $patch.$field;
            }
        )*
    };
}

/// Onboarding intake answers captured by the new-project form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeQuestionnaire {
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj_count: Option<Answer>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub main_cnpj: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub state_registrations: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub tax_framework: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub acquisition_channel: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub decision_reason: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub success_criteria: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub product_types: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub multi_cnpj_products: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub product_registration_process: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub inventory_control: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub physical_space: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub entry_note_type: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub inventory_location: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub inventory_process: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub daily_order_average: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub ean_code: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub dispatch_operators: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub marketplaces: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub product_size: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub physical_store: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub dispatch_process: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub financial_processes: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub current_system_use: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub system_access: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl IntakeQuestionnaire {
    pub fn merge_from(&mut self, patch: Self) {
        overlay!(
            self,
            patch,
            [
                client_name,
                company_name,
                cnpj_count,
                main_cnpj,
                state_registrations,
                address,
                city,
                state,
                zip_code,
                country,
                tax_framework,
                monthly_revenue,
                acquisition_channel,
                decision_reason,
                success_criteria,
                product_types,
                multi_cnpj_products,
                product_registration_process,
                inventory_control,
                physical_space,
                entry_note_type,
                inventory_location,
                inventory_process,
                daily_order_average,
                ean_code,
                dispatch_operators,
                marketplaces,
                product_size,
                physical_store,
                dispatch_process,
                financial_processes,
                current_system_use,
                system_access,
                additional_info,
            ]
        );
    }
}

/// Answers from the alignment meeting (project detail page).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlignmentDetails {
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub team_size: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub main_objective: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub stakeholders: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub main_focus: Option<String>,
}

impl AlignmentDetails {
    pub fn merge_from(&mut self, patch: Self) {
        overlay!(
            self,
            patch,
            [team_size, budget, main_objective, stakeholders, risks, main_focus]
        );
    }
}

/// Operational survey filled from the project card detail modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationalDetails {
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub tiny_knowledge: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub tax_regime: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub integrated_cnpjs: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub sales_channels: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub logistics_gateway: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub marketplace_listings: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub same_product_base: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub most_complete_marketplace: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub sku_codes: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub duplicate_listings: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub kit_listings: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub kit_components: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub kit_particularities: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub measurement_units: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub product_base_preference: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub important_functions: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub internal_inventory_control: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub marketplace_inventory_control: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub entry_note_availability: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub order_flow: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub expected_dispatch_process: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub invoices_for_all_sales: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub current_invoice_issuance: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub current_invoice_printing: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub current_label_printing: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub thermal_printer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiny_parallel_use: Option<Answer>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub implementation_type: Option<String>,
    #[serde(deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub important_observations: Option<String>,
}

impl OperationalDetails {
    pub fn merge_from(&mut self, patch: Self) {
        overlay!(
            self,
            patch,
            [
                employee_count,
                tiny_knowledge,
                tax_regime,
                integrated_cnpjs,
                sales_channels,
                logistics_gateway,
                marketplace_listings,
                same_product_base,
                most_complete_marketplace,
                sku_codes,
                duplicate_listings,
                kit_listings,
                kit_components,
                kit_particularities,
                measurement_units,
                product_base_preference,
                important_functions,
                internal_inventory_control,
                marketplace_inventory_control,
                entry_note_availability,
                order_flow,
                expected_dispatch_process,
                invoices_for_all_sales,
                current_invoice_issuance,
                current_invoice_printing,
                current_label_printing,
                thermal_printer,
                tiny_parallel_use,
                implementation_type,
                important_observations,
            ]
        );
    }
}

/// One onboarding project as stored under the `projects` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: KanbanStatus,
    #[serde(default)]
    pub project_phase: ProjectPhase,
    #[serde(default)]
    pub deadline: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_collaborator",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<CollaboratorId>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_complexity",
        skip_serializing_if = "Option::is_none"
    )]
    pub complexity_level: Option<ComplexityLevel>,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default)]
    pub leader_checklist: Checklist,
    #[serde(default)]
    pub collaborator_checklist: Checklist,
    #[serde(default)]
    pub weekly_progress_entries: Vec<WeeklyProgressEntry>,
    #[serde(default)]
    pub weekly_progress: String,
    #[serde(default)]
    pub completed_classes: Vec<CompletedClass>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub intake: IntakeQuestionnaire,
    #[serde(flatten)]
    pub alignment: AlignmentDetails,
    #[serde(flatten)]
    pub operational: OperationalDetails,
    /// Fields written by other versions; kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Builds a freshly created project from validated intake input.
    ///
    /// Starts in `To Do` / `implementação` with the leader onboarding
    /// template and empty general and collaborator checklists.
    pub fn from_intake(id: ProjectId, input: ValidatedIntake) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            status: KanbanStatus::ToDo,
            project_phase: ProjectPhase::Implementation,
            deadline: input.deadline,
            assigned_to: Some(input.assigned_to),
            complexity_level: input.complexity_level,
            checklist: Checklist::new(),
            leader_checklist: Checklist::leader_onboarding_template(),
            collaborator_checklist: Checklist::new(),
            weekly_progress_entries: Vec::new(),
            weekly_progress: String::new(),
            completed_classes: Vec::new(),
            tags: Vec::new(),
            intake: input.intake,
            alignment: AlignmentDetails::default(),
            operational: OperationalDetails::default(),
            extra: Map::new(),
        }
    }

    pub fn checklist(&self, kind: ChecklistKind) -> &Checklist {
        match kind {
            ChecklistKind::General => &self.checklist,
            ChecklistKind::Leader => &self.leader_checklist,
            ChecklistKind::Collaborator => &self.collaborator_checklist,
        }
    }

    pub fn checklist_mut(&mut self, kind: ChecklistKind) -> &mut Checklist {
        match kind {
            ChecklistKind::General => &mut self.checklist,
            ChecklistKind::Leader => &mut self.leader_checklist,
            ChecklistKind::Collaborator => &mut self.collaborator_checklist,
        }
    }

    /// Lowest id a new checklist item may take without colliding in any list.
    pub fn next_item_id_floor(&self, now_ms: i64) -> i64 {
        [
            &self.checklist,
            &self.leader_checklist,
            &self.collaborator_checklist,
        ]
        .into_iter()
        .filter_map(Checklist::max_id)
        .map(|ChecklistItemId(id)| id.saturating_add(1))
        .fold(now_ms, i64::max)
    }

    /// Calendar date of the deadline, when it starts with `YYYY-MM-DD`.
    pub fn deadline_date(&self) -> Option<Date> {
        parse_iso_date_prefix(&self.deadline)
    }

    /// Whole days until the deadline, floored at zero.
    ///
    /// Returns `None` when the deadline cannot be parsed.
    pub fn remaining_days(&self, today: Date) -> Option<i64> {
        self.deadline_date()
            .map(|deadline| (deadline - today).whole_days().max(0))
    }

    /// Completion of the general checklist, in percent.
    pub fn progress(&self) -> f64 {
        self.checklist.progress()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.intake.client_name.as_deref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.intake.company_name.as_deref()
    }
}

/// Input of the new-project form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProjectRequest {
    /// Display name; defaults to the company name when blank.
    pub name: Option<String>,
    pub description: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub deadline: String,
    pub assigned_to: Option<CollaboratorId>,
    pub complexity_level: Option<ComplexityLevel>,
    pub intake: IntakeQuestionnaire,
}

/// Intake input that passed creation-time validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIntake {
    pub name: String,
    pub description: String,
    /// Canonical `YYYY-MM-DD`.
    pub deadline: String,
    pub assigned_to: CollaboratorId,
    pub complexity_level: Option<ComplexityLevel>,
    pub intake: IntakeQuestionnaire,
}

impl NewProjectRequest {
    /// Checks required fields and normalizes the deadline.
    ///
    /// # Errors
    /// - `MissingField` for blank client name, company name or assignee.
    /// - `UnknownCollaborator` when the assignee is not in the directory.
    /// - `InvalidDeadline` when the deadline is not a real calendar date.
    pub fn validate(self) -> Result<ValidatedIntake, ValidationError> {
        required_text(self.intake.client_name.as_deref(), "clientName")?;
        let company_name = required_text(self.intake.company_name.as_deref(), "companyName")?;

        let assigned_to = self
            .assigned_to
            .ok_or(ValidationError::MissingField("assignedTo"))?;
        if find_collaborator(assigned_to).is_none() {
            return Err(ValidationError::UnknownCollaborator(assigned_to.0));
        }

        let deadline = parse_deadline_input(&self.deadline)?;
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => company_name.to_string(),
        };

        Ok(ValidatedIntake {
            name,
            description: self.description.trim().to_string(),
            deadline: format_iso_date(deadline),
            assigned_to,
            complexity_level: self.complexity_level,
            intake: self.intake,
        })
    }
}

/// Shallow patch over a stored project; `None` keeps the stored value.
///
/// Has no phase field; phase changes go through the phase gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<KanbanStatus>,
    pub deadline: Option<String>,
    pub assigned_to: Option<CollaboratorId>,
    pub complexity_level: Option<ComplexityLevel>,
    pub checklist: Option<Checklist>,
    pub leader_checklist: Option<Checklist>,
    pub collaborator_checklist: Option<Checklist>,
    pub weekly_progress_entries: Option<Vec<WeeklyProgressEntry>>,
    pub completed_classes: Option<Vec<CompletedClass>>,
    pub tags: Option<Vec<String>>,
    pub intake: Option<IntakeQuestionnaire>,
    pub alignment: Option<AlignmentDetails>,
    pub operational: Option<OperationalDetails>,
}

impl ProjectPatch {
    pub fn status(status: KanbanStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Applies the patch onto `project`.
    pub fn apply_to(self, project: &mut Project) {
        overlay!(project, self, [assigned_to, complexity_level]);
        if let Some(value) = self.name {
            project.name = value;
        }
        if let Some(value) = self.description {
            project.description = value;
        }
        if let Some(value) = self.status {
            project.status = value;
        }
        if let Some(value) = self.deadline {
            project.deadline = value;
        }
        if let Some(value) = self.checklist {
            project.checklist = value;
        }
        if let Some(value) = self.leader_checklist {
            project.leader_checklist = value;
        }
        if let Some(value) = self.collaborator_checklist {
            project.collaborator_checklist = value;
        }
        if let Some(value) = self.weekly_progress_entries {
            project.weekly_progress_entries = value;
        }
        if let Some(value) = self.completed_classes {
            project.completed_classes = value;
        }
        if let Some(value) = self.tags {
            project.tags = value;
        }
        if let Some(value) = self.intake {
            project.intake.merge_from(value);
        }
        if let Some(value) = self.alignment {
            project.alignment.merge_from(value);
        }
        if let Some(value) = self.operational {
            project.operational.merge_from(value);
        }
    }
}

fn required_text<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Parses a form deadline in `YYYY-MM-DD` (optionally followed by a time)
/// or `DD/MM/YYYY`.
pub fn parse_deadline_input(value: &str) -> Result<Date, ValidationError> {
    let invalid = || ValidationError::InvalidDeadline(value.to_string());
    if let Some(date) = parse_iso_date_prefix(value) {
        return Ok(date);
    }
    let caps = BR_DATE_RE.captures(value).ok_or_else(invalid)?;
    calendar_date(&caps[3], &caps[2], &caps[1]).ok_or_else(invalid)
}

fn parse_iso_date_prefix(value: &str) -> Option<Date> {
    let caps = ISO_DATE_RE.captures(value)?;
    calendar_date(&caps[1], &caps[2], &caps[3])
}

fn calendar_date(year: &str, month: &str, day: &str) -> Option<Date> {
    let year = year.parse::<i32>().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let day = day.parse::<u8>().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
