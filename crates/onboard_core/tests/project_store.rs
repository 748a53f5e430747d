use onboard_core::Clock;
use onboard_core::db::{DbError, DbResult};
use onboard_core::model::project::Answer;
use onboard_core::store::kv_store::PROJECTS_KEY;
use onboard_core::{
    ChecklistKind, CollaboratorId, ComplexityLevel, FixedClock, KanbanStatus, KeyValueStore,
    KvProjectRepository, MemoryKeyValueStore, NewProjectRequest, ProjectId, ProjectPatch,
    ProjectPhase, ProjectService, ProjectServiceError, ProjectRepository, RepoError,
    ValidationError,
};
use serde_json::{json, Value};
use std::cell::Cell;

const NOW_MS: i64 = 1_718_000_000_000;

fn request(company: &str) -> NewProjectRequest {
    let mut request = NewProjectRequest {
        deadline: "20/12/2024".to_string(),
        assigned_to: Some(CollaboratorId(2)),
        complexity_level: Some(ComplexityLevel::Medium),
        ..NewProjectRequest::default()
    };
    request.intake.client_name = Some("Maria".to_string());
    request.intake.company_name = Some(company.to_string());
    request
}

#[test]
fn create_applies_defaults_and_persists() {
    let store = MemoryKeyValueStore::new();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );

    let created = service.create(request("Loja Azul")).unwrap();
    assert_eq!(created.id, ProjectId(NOW_MS));
    assert_eq!(created.name, "Loja Azul");
    assert_eq!(created.status, KanbanStatus::ToDo);
    assert_eq!(created.project_phase, ProjectPhase::Implementation);
    assert_eq!(created.deadline, "2024-12-20");
    assert!(created.checklist.is_empty());
    assert_eq!(created.leader_checklist.len(), 9);

    let stored: Value = serde_json::from_str(&store.get(PROJECTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored[0]["projectPhase"], "implementação");
    assert_eq!(stored[0]["status"], "To Do");
    assert_eq!(stored[0]["assignedTo"], 2);
    assert_eq!(stored[0]["clientName"], "Maria");
}

#[test]
fn ids_stay_unique_within_one_millisecond() {
    let store = MemoryKeyValueStore::new();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );

    let first = service.create(request("A")).unwrap();
    let second = service.create(request("B")).unwrap();
    assert_eq!(second.id, ProjectId(first.id.0 + 1));
    assert_eq!(service.list().len(), 2);
}

#[test]
fn create_rejects_missing_assignee_without_writing() {
    let store = MemoryKeyValueStore::new();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );

    let mut input = request("Loja");
    input.assigned_to = None;
    let err = service.create(input).unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Validation(ValidationError::MissingField("assignedTo"))
    ));
    assert_eq!(store.get(PROJECTS_KEY).unwrap(), None);
}

#[test]
fn update_merges_patch_and_missing_id_is_noop() {
    let store = MemoryKeyValueStore::new();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    let created = service.create(request("Loja")).unwrap();

    let updated = service
        .update(
            created.id,
            ProjectPatch {
                description: Some("nova".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.description, "nova");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.complexity_level, Some(ComplexityLevel::Medium));

    let before = store.get(PROJECTS_KEY).unwrap();
    let missing = service
        .update(ProjectId(42), ProjectPatch::status(KanbanStatus::Done))
        .unwrap();
    assert_eq!(missing, None);
    assert_eq!(store.get(PROJECTS_KEY).unwrap(), before);
}

#[test]
fn stored_records_round_trip_including_unknown_fields() {
    let stored = json!([{
        "id": 1700000000000_i64,
        "name": "Loja Verde",
        "description": "",
        "status": "In Progress",
        "projectPhase": "direcionamento",
        "deadline": "2024-05-01",
        "assignedTo": 3,
        "complexityLevel": "high",
        "checklist": [{ "id": 1, "task": "Notas fiscais", "completed": true }],
        "leaderChecklist": [],
        "collaboratorChecklist": [],
        "weeklyProgressEntries": [{ "date": "2024-04-01T10:00:00Z", "content": "ok" }],
        "weeklyProgress": "",
        "completedClasses": [],
        "tags": ["vip"],
        "clientName": "João",
        "companyName": "Loja Verde",
        "teamSize": "5",
        "mainFocus": "",
        "tinyParallelUse": ["estoque"],
        "legacyField": { "kept": true }
    }]);
    let store = MemoryKeyValueStore::new();
    store.set(PROJECTS_KEY, &stored.to_string()).unwrap();

    let repo = KvProjectRepository::new(&store);
    let projects = repo.load_all();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].assigned_to, Some(CollaboratorId(3)));
    assert_eq!(projects[0].alignment.team_size.as_deref(), Some("5"));

    repo.save_all(&projects).unwrap();
    let reloaded: Value = serde_json::from_str(&store.get(PROJECTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(reloaded, stored);
}

#[test]
fn web_app_records_load_and_survive_the_next_create() {
    let stored = json!([
        {
            "id": 1,
            "name": "Loja Um",
            "status": "Done",
            "weeklyProgress": "",
            "completedClasses": ["produtos"]
        },
        {
            "id": "2",
            "name": "Loja Dois",
            "cnpjCount": 3,
            "employeeCount": 12,
            "tinyParallelUse": "sim, em paralelo"
        }
    ]);
    let store = MemoryKeyValueStore::new();
    store.set(PROJECTS_KEY, &stored.to_string()).unwrap();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );

    let loaded = service.list();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].completed_classes[0].name, "produtos");
    assert_eq!(loaded[1].intake.cnpj_count, Some(Answer::Number(3.into())));
    assert_eq!(loaded[1].operational.employee_count.as_deref(), Some("12"));
    assert_eq!(
        loaded[1].operational.tiny_parallel_use,
        Some(Answer::Text("sim, em paralelo".to_string()))
    );

    let created = service.create(request("Loja Três")).unwrap();
    let saved: Value = serde_json::from_str(&store.get(PROJECTS_KEY).unwrap().unwrap()).unwrap();
    let ids: Vec<_> = saved
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(created.id.0)]);
    assert_eq!(saved[0]["completedClasses"], json!(["produtos"]));
    assert_eq!(saved[1]["cnpjCount"], 3);
    assert_eq!(saved[1]["tinyParallelUse"], "sim, em paralelo");
}

/// Store whose next `fails` reads report a locked database.
struct LockedReads<'a> {
    inner: &'a MemoryKeyValueStore,
    fails: Cell<u32>,
}

impl KeyValueStore for LockedReads<'_> {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        if self.fails.get() > 0 {
            self.fails.set(self.fails.get() - 1);
            return Err(DbError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(5),
                Some("database is locked".to_string()),
            )));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> DbResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn read_failure_on_write_path_keeps_stored_projects() {
    let inner = MemoryKeyValueStore::new();
    let seeded = ProjectService::new(
        KvProjectRepository::new(&inner),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    let first = seeded.create(request("A")).unwrap();
    seeded.create(request("B")).unwrap();
    let before = inner.get(PROJECTS_KEY).unwrap();

    let locked = LockedReads {
        inner: &inner,
        fails: Cell::new(1),
    };
    let service = ProjectService::new(
        KvProjectRepository::new(&locked),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    let err = service.create(request("C")).unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Repo(RepoError::Db(ref db)) if db.is_locked()
    ));
    assert_eq!(inner.get(PROJECTS_KEY).unwrap(), before);

    locked.fails.set(1);
    let err = service
        .update(first.id, ProjectPatch::status(KanbanStatus::Done))
        .unwrap_err();
    assert!(matches!(err, ProjectServiceError::Repo(RepoError::Db(_))));
    assert_eq!(inner.get(PROJECTS_KEY).unwrap(), before);

    locked.fails.set(1);
    assert!(service.list().is_empty());
    assert_eq!(service.list().len(), 2);
    service.create(request("C")).unwrap();
    assert_eq!(service.list().len(), 3);
}

#[test]
fn legacy_string_ids_and_blank_choices_are_normalized() {
    let store = MemoryKeyValueStore::new();
    store
        .set(
            PROJECTS_KEY,
            r#"[{"id":"17","name":"Loja","assignedTo":"4","complexityLevel":"",
                 "checklist":[{"id":"2","task":"x"}]}]"#,
        )
        .unwrap();

    let projects = KvProjectRepository::new(&store).load_all();
    assert_eq!(projects[0].id, ProjectId(17));
    assert_eq!(projects[0].assigned_to, Some(CollaboratorId(4)));
    assert_eq!(projects[0].complexity_level, None);
    assert_eq!(projects[0].status, KanbanStatus::ToDo);
    assert!(!projects[0].checklist.items()[0].completed);
}

#[test]
fn corrupt_state_loads_as_empty() {
    let store = MemoryKeyValueStore::new();
    store.set(PROJECTS_KEY, "{not json").unwrap();

    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    assert!(service.list().is_empty());
    assert_eq!(service.get(ProjectId(1)), None);

    // The next write replaces the corrupt value.
    service.create(request("Loja")).unwrap();
    assert_eq!(service.list().len(), 1);
}

#[test]
fn weekly_progress_and_classes_are_recorded() {
    let store = MemoryKeyValueStore::new();
    let service = ProjectService::new(
        KvProjectRepository::new(&store),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    let id = service.create(request("Loja")).unwrap().id;

    let project = service
        .append_weekly_progress(id, "Treinamento de estoque feito")
        .unwrap()
        .unwrap();
    assert_eq!(project.weekly_progress_entries.len(), 1);
    assert_eq!(project.weekly_progress_entries[0].date, "2024-06-10T06:13:20Z");
    assert!(matches!(
        service.append_weekly_progress(id, "  "),
        Err(ProjectServiceError::Validation(ValidationError::EmptyProgressEntry))
    ));

    service
        .set_class_completion(id, "estoque", true, Some("Ana".to_string()))
        .unwrap();
    let project = service
        .set_class_completion(id, "estoque", true, None)
        .unwrap()
        .unwrap();
    assert_eq!(project.completed_classes.len(), 1);
    assert_eq!(project.completed_classes[0].collaborator, None);

    let project = service
        .set_class_completion(id, "estoque", false, None)
        .unwrap()
        .unwrap();
    assert!(project.completed_classes.is_empty());
    assert!(service
        .set_class_completion(id, "culinária", true, None)
        .is_err());

    let project = service
        .add_task(id, ChecklistKind::Collaborator, "Revisar cadastro")
        .unwrap()
        .and_then(|_| service.get(id))
        .unwrap();
    assert_eq!(project.collaborator_checklist.len(), 1);
}

#[test]
fn remaining_days_floor_at_zero() {
    let store = MemoryKeyValueStore::new();
    let clock = FixedClock::at_epoch_ms(NOW_MS);
    let service = ProjectService::new(KvProjectRepository::new(&store), clock);

    let project = service.create(request("Loja")).unwrap();
    // 2024-06-10 to 2024-12-20
    assert_eq!(project.remaining_days(service.clock().today()), Some(193));

    let mut late = request("Atrasada");
    late.deadline = "2024-01-01".to_string();
    let late = service.create(late).unwrap();
    assert_eq!(late.remaining_days(service.clock().today()), Some(0));
}
