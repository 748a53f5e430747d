use onboard_core::{
    CollaboratorId, ComplexityLevel, Project, ProjectId, ProjectPhase, ProjectQuery, Selection,
    SortKey,
};
use serde_json::json;

fn project(
    id: i64,
    name: &str,
    deadline: &str,
    assignee: u32,
    complexity: &str,
    phase: &str,
) -> Project {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "deadline": deadline,
        "assignedTo": assignee,
        "complexityLevel": complexity,
        "projectPhase": phase,
    }))
    .unwrap()
}

fn ids(projects: &[Project]) -> Vec<i64> {
    projects.iter().map(|project| project.id.0).collect()
}

fn fixture() -> Vec<Project> {
    vec![
        project(1, "Papelaria", "2024-03-10", 1, "low", "implementação"),
        project(2, "Ótica Central", "2024-11-02", 2, "high", "direcionamento"),
        project(3, "armazém", "2024-07-15", 1, "medium", "implementação"),
        project(4, "Bazar", "sem data", 2, "", "implementação"),
    ]
}

#[test]
fn collaborator_filter_keeps_only_their_projects() {
    let query = ProjectQuery {
        collaborator: Selection::Only(CollaboratorId(1)),
        ..ProjectQuery::default()
    };
    let result = query.apply(&fixture());
    assert_eq!(ids(&result), vec![3, 1]);
}

#[test]
fn filters_combine() {
    let query = ProjectQuery {
        collaborator: Selection::Only(CollaboratorId(2)),
        phase: Selection::Only(ProjectPhase::Direction),
        complexity: Selection::Only(ComplexityLevel::High),
        sort: SortKey::Name,
    };
    assert_eq!(ids(&query.apply(&fixture())), vec![2]);

    let query = ProjectQuery {
        phase: "implementação".parse().unwrap(),
        complexity: "all".parse().unwrap(),
        ..ProjectQuery::default()
    };
    assert_eq!(query.apply(&fixture()).len(), 3);
}

#[test]
fn name_sort_ignores_case_and_accents() {
    let result = ProjectQuery::default().apply(&fixture());
    assert_eq!(ids(&result), vec![3, 4, 2, 1]);
}

#[test]
fn date_sort_is_newest_first_with_bad_dates_last() {
    let query = ProjectQuery {
        sort: SortKey::Date,
        ..ProjectQuery::default()
    };
    assert_eq!(ids(&query.apply(&fixture())), vec![2, 3, 1, 4]);
}

#[test]
fn complexity_sort_is_descending_and_stable() {
    let mut projects = fixture();
    projects.push(project(5, "Zeta", "2024-01-01", 3, "high", "implementação"));
    let query = ProjectQuery {
        sort: SortKey::Complexity,
        ..ProjectQuery::default()
    };
    let result = query.apply(&projects);
    assert_eq!(ids(&result), vec![2, 5, 3, 1, 4]);
    assert_eq!(result[0].id, ProjectId(2));
}

#[test]
fn two_project_filter_example() {
    let projects = vec![
        project(1, "P1", "2024-01-01", 1, "low", "implementação"),
        project(2, "P2", "2024-01-01", 2, "high", "implementação"),
    ];

    let by_collaborator = ProjectQuery {
        collaborator: Selection::Only(CollaboratorId(1)),
        ..ProjectQuery::default()
    };
    assert_eq!(ids(&by_collaborator.apply(&projects)), vec![1]);

    let any_complexity = ProjectQuery {
        complexity: Selection::All,
        ..ProjectQuery::default()
    };
    assert_eq!(any_complexity.apply(&projects).len(), 2);
}

#[test]
fn complexity_order_high_medium_low() {
    let projects = vec![
        project(1, "a", "2024-01-01", 1, "low", "implementação"),
        project(2, "b", "2024-01-01", 1, "high", "implementação"),
        project(3, "c", "2024-01-01", 1, "medium", "implementação"),
    ];
    let query = ProjectQuery {
        sort: SortKey::Complexity,
        ..ProjectQuery::default()
    };
    let levels: Vec<_> = query
        .apply(&projects)
        .iter()
        .map(|project| project.complexity_level)
        .collect();
    assert_eq!(
        levels,
        vec![
            Some(ComplexityLevel::High),
            Some(ComplexityLevel::Medium),
            Some(ComplexityLevel::Low)
        ]
    );
}
