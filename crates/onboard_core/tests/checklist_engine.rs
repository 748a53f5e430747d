use onboard_core::{
    ChecklistItemId, ChecklistKind, CollaboratorId, FixedClock, KvProjectRepository,
    MemoryKeyValueStore, NewProjectRequest, ProjectId, ProjectService, ProjectServiceError,
    ValidationError,
};

const NOW_MS: i64 = 1_718_000_000_000;

type Service<'a> = ProjectService<KvProjectRepository<&'a MemoryKeyValueStore>, FixedClock>;

fn seeded_service(store: &MemoryKeyValueStore) -> (Service<'_>, ProjectId) {
    let service = ProjectService::new(
        KvProjectRepository::new(store),
        FixedClock::at_epoch_ms(NOW_MS),
    );
    let mut request = NewProjectRequest {
        deadline: "2024-09-30".to_string(),
        assigned_to: Some(CollaboratorId(1)),
        ..NewProjectRequest::default()
    };
    request.intake.client_name = Some("Carla".to_string());
    request.intake.company_name = Some("Loja".to_string());
    let id = service.create(request).unwrap().id;
    (service, id)
}

#[test]
fn default_checklist_is_seeded_once() {
    let store = MemoryKeyValueStore::new();
    let (service, id) = seeded_service(&store);

    let project = service.ensure_default_checklist(id).unwrap().unwrap();
    assert_eq!(project.checklist.len(), 11);
    assert_eq!(project.checklist.progress_rounded(), 0);

    service
        .toggle_task(id, ChecklistKind::General, ChecklistItemId(1))
        .unwrap();
    let project = service.ensure_default_checklist(id).unwrap().unwrap();
    assert_eq!(project.checklist.len(), 11);
    assert_eq!(project.checklist.completed_count(), 1);
}

#[test]
fn add_toggle_delete_drive_progress() {
    let store = MemoryKeyValueStore::new();
    let (service, id) = seeded_service(&store);

    let mut ids = Vec::new();
    for label in ["Cadastro", "Estoque", "Fiscal", "Expedição"] {
        ids.push(
            service
                .add_task(id, ChecklistKind::General, label)
                .unwrap()
                .unwrap(),
        );
    }
    service.toggle_task(id, ChecklistKind::General, ids[0]).unwrap();
    let project = service
        .toggle_task(id, ChecklistKind::General, ids[1])
        .unwrap()
        .unwrap();
    assert_eq!(project.progress(), 50.0);

    let project = service
        .toggle_task(id, ChecklistKind::General, ids[1])
        .unwrap()
        .unwrap();
    assert_eq!(project.checklist.progress_rounded(), 25);

    let project = service
        .delete_task(id, ChecklistKind::General, ids[3])
        .unwrap()
        .unwrap();
    let labels: Vec<_> = project
        .checklist
        .items()
        .iter()
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Cadastro", "Estoque", "Fiscal"]);
    assert_eq!(project.checklist.progress_rounded(), 33);
}

#[test]
fn new_ids_never_collide_across_lists() {
    let store = MemoryKeyValueStore::new();
    let (service, id) = seeded_service(&store);

    let general = service
        .add_task(id, ChecklistKind::General, "a")
        .unwrap()
        .unwrap();
    let leader = service
        .add_task(id, ChecklistKind::Leader, "b")
        .unwrap()
        .unwrap();
    let collaborator = service
        .add_task(id, ChecklistKind::Collaborator, "c")
        .unwrap()
        .unwrap();

    assert_eq!(general, ChecklistItemId(NOW_MS));
    assert!(leader > general);
    assert!(collaborator > leader);
}

#[test]
fn unknown_task_ids_change_nothing() {
    let store = MemoryKeyValueStore::new();
    let (service, id) = seeded_service(&store);
    let before = service.get(id).unwrap();

    let after = service
        .toggle_task(id, ChecklistKind::Leader, ChecklistItemId(999))
        .unwrap()
        .unwrap();
    assert_eq!(after, before);
    let after = service
        .delete_task(id, ChecklistKind::Leader, ChecklistItemId(999))
        .unwrap()
        .unwrap();
    assert_eq!(after, before);
}

#[test]
fn blank_label_is_rejected_before_lookup() {
    let store = MemoryKeyValueStore::new();
    let (service, id) = seeded_service(&store);

    let err = service
        .add_task(id, ChecklistKind::General, "   ")
        .unwrap_err();
    assert!(matches!(
        err,
        ProjectServiceError::Validation(ValidationError::EmptyTaskLabel)
    ));
    assert!(service.get(id).unwrap().checklist.is_empty());

    assert_eq!(
        service
            .add_task(ProjectId(1), ChecklistKind::General, "x")
            .unwrap(),
        None
    );
}
