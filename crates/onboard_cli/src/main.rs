//! `onboard` command-line front end.
//!
//! # Responsibility
//! - Expose project, checklist, phase, kanban, dashboard and account
//!   operations of `onboard_core` as subcommands.
//! - Print results as pretty JSON on stdout.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use onboard_core::db::open_db;
use onboard_core::model::account::SessionUser;
use onboard_core::model::collaborator::directory;
use onboard_core::model::project::{AlignmentDetails, IntakeQuestionnaire, OperationalDetails};
use onboard_core::{
    board, dashboard, flush_logging, init_logging, AppConfig, AuthService, ChecklistItemId,
    ChecklistKind, Clock, CollaboratorId, ComplexityLevel, DropOutcome, KanbanController,
    KanbanStatus, KvProjectRepository, KvUserRepository, NewProjectRequest, PhaseChange,
    Project, ProjectId, ProjectPhase, ProjectQuery, ProjectService, Selection, SortKey,
    SqliteKeyValueStore, SystemClock,
};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "onboard")]
#[command(version, about = "Onboarding project dashboard", long_about = None)]
struct Cli {
    /// Data directory; overrides ONBOARD_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level; overrides ONBOARD_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand)]
    Project(ProjectCommands),

    #[command(subcommand)]
    Task(TaskCommands),

    #[command(subcommand)]
    Checklist(ChecklistCommands),

    #[command(subcommand)]
    Phase(PhaseCommands),

    #[command(subcommand)]
    Progress(ProgressCommands),

    #[command(subcommand)]
    Class(ClassCommands),

    #[command(subcommand)]
    Kanban(KanbanCommands),

    /// Headline metrics, monthly series and per-collaborator load.
    Dashboard {
        #[arg(long, default_value = "all")]
        collaborator: Selection<CollaboratorId>,
    },

    /// Lists the collaborator directory.
    Collaborators,

    #[command(subcommand)]
    User(UserCommands),
}

#[derive(Subcommand, Debug)]
enum ProjectCommands {
    /// Creates a project from the intake form.
    New(NewProjectArgs),

    #[command(alias = "ls")]
    List {
        #[arg(long, default_value = "all")]
        collaborator: Selection<CollaboratorId>,
        #[arg(long, default_value = "all")]
        phase: Selection<ProjectPhase>,
        #[arg(long, default_value = "all")]
        complexity: Selection<ComplexityLevel>,
        #[arg(long, default_value = "name")]
        sort: SortKey,
    },

    Show {
        id: ProjectId,
    },

    /// Merges alignment or operational answers given as a JSON object.
    Details {
        id: ProjectId,
        #[arg(value_enum)]
        section: DetailsSection,
        answers: String,
        /// Complexity decided in the alignment meeting.
        #[arg(long)]
        complexity: Option<ComplexityLevel>,
    },
}

#[derive(Args, Debug)]
struct NewProjectArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    company: String,
    #[arg(long)]
    deadline: String,
    #[arg(long)]
    assignee: CollaboratorId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    complexity: Option<ComplexityLevel>,
    /// Remaining questionnaire answers as a JSON object.
    #[arg(long)]
    intake: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DetailsSection {
    Alignment,
    Operational,
}

#[derive(Subcommand, Debug)]
enum TaskCommands {
    Add {
        id: ProjectId,
        label: String,
        #[arg(long, default_value = "general")]
        list: ChecklistKind,
    },
    Toggle {
        id: ProjectId,
        task: ChecklistItemId,
        #[arg(long, default_value = "general")]
        list: ChecklistKind,
    },
    Delete {
        id: ProjectId,
        task: ChecklistItemId,
        #[arg(long, default_value = "general")]
        list: ChecklistKind,
    },
}

#[derive(Subcommand, Debug)]
enum ChecklistCommands {
    /// Seeds the general template into an empty checklist.
    Seed { id: ProjectId },
}

#[derive(Subcommand, Debug)]
enum PhaseCommands {
    Set {
        id: ProjectId,
        phase: String,
        /// Accept the change even when the checklist is unfinished.
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressCommands {
    Add { id: ProjectId, content: String },
}

#[derive(Subcommand, Debug)]
enum ClassCommands {
    Set {
        id: ProjectId,
        class: String,
        #[arg(long)]
        undone: bool,
        #[arg(long)]
        collaborator: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum KanbanCommands {
    /// Drops a card on a column ("To Do", "In Progress" or "Done").
    Move { id: ProjectId, column: KanbanStatus },
    Board,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    Register {
        email: String,
        password: String,
        #[arg(long)]
        product: String,
    },
    Login {
        email: String,
        password: String,
        #[arg(long)]
        product: String,
    },
    Logout,
    Whoami,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir)?;
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level)?;
    }

    std::fs::create_dir_all(config.data_dir()).with_context(|| {
        format!("failed to create data dir {}", config.data_dir().display())
    })?;
    init_logging(config.log_level(), &config.log_dir().to_string_lossy())
        .map_err(|err| anyhow!(err))
        .context("failed to start logging")?;

    let conn = open_db(config.db_path())
        .with_context(|| format!("failed to open {}", config.db_path().display()))?;
    let store = SqliteKeyValueStore::new(&conn);
    info!(
        "event=cli_start module=cli status=ok data_dir={}",
        config.data_dir().display()
    );

    let result = run(cli.command, store);
    flush_logging();
    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

fn run(command: Commands, store: SqliteKeyValueStore<'_>) -> Result<Value> {
    let projects = ProjectService::new(KvProjectRepository::new(store), SystemClock);
    let auth = AuthService::new(KvUserRepository::new(store));

    match command {
        Commands::Project(command) => run_project(command, &projects),
        Commands::Task(command) => run_task(command, &projects),
        Commands::Checklist(ChecklistCommands::Seed { id }) => {
            let project = found(projects.ensure_default_checklist(id)?, id)?;
            Ok(serde_json::to_value(project.checklist)?)
        }
        Commands::Phase(PhaseCommands::Set { id, phase, confirm }) => {
            match found(projects.request_phase_change(id, &phase)?, id)? {
                PhaseChange::Unchanged(project) => Ok(phase_view("unchanged", &project)),
                PhaseChange::Committed(project) => Ok(phase_view("committed", &project)),
                PhaseChange::PendingConfirmation(pending) if confirm => {
                    let project = found(projects.confirm_phase_change(pending)?, id)?;
                    Ok(phase_view("committed", &project))
                }
                PhaseChange::PendingConfirmation(pending) => {
                    let progress = pending.progress();
                    pending.decline();
                    Ok(json!({
                        "status": "needs_confirmation",
                        "progress": progress.round(),
                        "hint": "checklist is not complete; rerun with --confirm to proceed",
                    }))
                }
            }
        }
        Commands::Progress(ProgressCommands::Add { id, content }) => {
            let project = found(projects.append_weekly_progress(id, &content)?, id)?;
            Ok(serde_json::to_value(project.weekly_progress_entries)?)
        }
        Commands::Class(ClassCommands::Set {
            id,
            class,
            undone,
            collaborator,
        }) => {
            let project = found(
                projects.set_class_completion(id, &class, !undone, collaborator)?,
                id,
            )?;
            Ok(serde_json::to_value(project.completed_classes)?)
        }
        Commands::Kanban(KanbanCommands::Move { id, column }) => {
            let mut controller = KanbanController::new(&projects);
            let outcome = match controller.move_to(id, column)? {
                DropOutcome::Moved { project, from } => json!({
                    "status": "moved",
                    "id": project.id,
                    "from": from,
                    "to": project.status,
                }),
                DropOutcome::SameColumn => json!({ "status": "unchanged" }),
                DropOutcome::Ignored => json!({ "status": "ignored" }),
            };
            Ok(outcome)
        }
        Commands::Kanban(KanbanCommands::Board) => {
            Ok(serde_json::to_value(board(&projects.list()))?)
        }
        Commands::Dashboard { collaborator } => {
            Ok(serde_json::to_value(dashboard(&projects.list(), collaborator))?)
        }
        Commands::Collaborators => Ok(serde_json::to_value(directory())?),
        Commands::User(command) => run_user(command, &auth),
    }
}

fn run_project(
    command: ProjectCommands,
    projects: &ProjectService<KvProjectRepository<SqliteKeyValueStore<'_>>, SystemClock>,
) -> Result<Value> {
    match command {
        ProjectCommands::New(args) => {
            let mut intake: IntakeQuestionnaire = match &args.intake {
                Some(raw) => serde_json::from_str(raw).context("invalid --intake JSON")?,
                None => IntakeQuestionnaire::default(),
            };
            intake.client_name = Some(args.client);
            intake.company_name = Some(args.company);

            let project = projects.create(NewProjectRequest {
                name: args.name,
                description: args.description,
                deadline: args.deadline,
                assigned_to: Some(args.assignee),
                complexity_level: args.complexity,
                intake,
            })?;
            Ok(serde_json::to_value(project)?)
        }
        ProjectCommands::List {
            collaborator,
            phase,
            complexity,
            sort,
        } => {
            let query = ProjectQuery {
                collaborator,
                phase,
                complexity,
                sort,
            };
            let today = projects.clock().today();
            let rows: Vec<Value> = query
                .apply(&projects.list())
                .iter()
                .map(|project| {
                    json!({
                        "id": project.id,
                        "name": project.name,
                        "status": project.status,
                        "projectPhase": project.project_phase,
                        "complexityLevel": project.complexity_level,
                        "deadline": project.deadline,
                        "remainingDays": project.remaining_days(today),
                        "progress": project.checklist.progress_rounded(),
                    })
                })
                .collect();
            Ok(Value::Array(rows))
        }
        ProjectCommands::Show { id } => {
            let project = found(projects.get(id), id)?;
            let today = projects.clock().today();
            Ok(json!({
                "remainingDays": project.remaining_days(today),
                "progress": project.checklist.progress_rounded(),
                "project": project,
            }))
        }
        ProjectCommands::Details {
            id,
            section,
            answers,
            complexity,
        } => {
            let project = match section {
                DetailsSection::Alignment => {
                    let details: AlignmentDetails =
                        serde_json::from_str(&answers).context("invalid alignment JSON")?;
                    projects.submit_alignment_details(id, details, complexity)?
                }
                DetailsSection::Operational => {
                    let details: OperationalDetails =
                        serde_json::from_str(&answers).context("invalid operational JSON")?;
                    projects.submit_operational_details(id, details)?
                }
            };
            Ok(serde_json::to_value(found(project, id)?)?)
        }
    }
}

fn run_task(
    command: TaskCommands,
    projects: &ProjectService<KvProjectRepository<SqliteKeyValueStore<'_>>, SystemClock>,
) -> Result<Value> {
    match command {
        TaskCommands::Add { id, label, list } => {
            let task_id = found(projects.add_task(id, list, &label)?, id)?;
            Ok(json!({ "id": task_id }))
        }
        TaskCommands::Toggle { id, task, list } => {
            let project = found(projects.toggle_task(id, list, task)?, id)?;
            Ok(serde_json::to_value(project.checklist(list))?)
        }
        TaskCommands::Delete { id, task, list } => {
            let project = found(projects.delete_task(id, list, task)?, id)?;
            Ok(serde_json::to_value(project.checklist(list))?)
        }
    }
}

fn run_user(
    command: UserCommands,
    auth: &AuthService<KvUserRepository<SqliteKeyValueStore<'_>>>,
) -> Result<Value> {
    match command {
        UserCommands::Register {
            email,
            password,
            product,
        } => {
            auth.register(&email, &password, &product)?;
            Ok(json!({ "status": "registered" }))
        }
        UserCommands::Login {
            email,
            password,
            product,
        } => {
            let outcome = auth.login(&email, &password, &product)?;
            Ok(json!({ "user": outcome.user, "landing": outcome.landing }))
        }
        UserCommands::Logout => {
            auth.logout()?;
            Ok(json!({ "status": "logged_out" }))
        }
        UserCommands::Whoami => {
            let session = auth.restore_session();
            let user: Option<&SessionUser> = session.user();
            Ok(json!({ "user": user, "landing": session.landing_route() }))
        }
    }
}

fn phase_view(status: &str, project: &Project) -> Value {
    json!({
        "status": status,
        "id": project.id,
        "projectPhase": project.project_phase,
    })
}

fn found<T>(value: Option<T>, id: ProjectId) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => bail!("project {id} not found"),
    }
}
