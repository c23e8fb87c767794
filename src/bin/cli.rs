use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use team_planning_api::api;
use team_planning_api::board::{self, BoardView, NewTaskForm};
use team_planning_api::client::TaskMirror;
use team_planning_api::config::{ServerConfig, StoreKind};
use team_planning_api::models::{Month, Status};
use team_planning_api::store::{JsonFileStore, MemoryStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// The address to bind to [env: TASKS_ADDR, default: 127.0.0.1:3001]
        #[arg(short, long)]
        addr: Option<SocketAddr>,
        /// JSON file holding the tasks [env: TASKS_DATA_FILE, default: tasks.json]
        #[arg(long)]
        data_file: Option<PathBuf>,
        /// Storage backend [env: TASKS_STORE, default: file]
        #[arg(long, value_enum)]
        store: Option<StoreKind>,
    },
    /// Client commands
    Client {
        /// The base URL of the API
        #[arg(long, env = "TASKS_API_URL", default_value = team_planning_api::BASE_URL)]
        url: String,
        #[command(subcommand)]
        command: ClientCommands,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Print all tasks as JSON
    List,
    /// Draw the board grouped by month
    Board {
        /// Show subtasks of every task
        #[arg(long)]
        expand_all: bool,
        /// Show subtasks of the given task (repeatable)
        #[arg(long)]
        expand: Vec<String>,
        /// Print record ids next to titles
        #[arg(long)]
        ids: bool,
    },
    /// Create a new task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// this or next
        #[arg(long, default_value = "this")]
        month: Month,
    },
    /// Add a subtask to a task
    AddSubtask {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Set a task's status (done, working, stuck)
    Status {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        status: Status,
    },
    /// Set a subtask's status (done, working, stuck)
    SubtaskStatus {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        subtask_id: String,
        #[arg(long)]
        status: Status,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        task_id: String,
    },
    /// Delete a subtask
    DeleteSubtask {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        subtask_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            data_file,
            store,
        } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            if let Some(data_file) = data_file {
                config.data_file = data_file;
            }
            if let Some(store) = store {
                config.store = store;
            }
            serve(config).await
        }
        Commands::Client { url, command } => run_client(url, command).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let app = match config.store {
        StoreKind::File => {
            let store = JsonFileStore::open_or_init(&config.data_file).with_context(|| {
                format!("Failed to open task file {}", config.data_file.display())
            })?;
            tracing::info!("Using task file {}", store.path().display());
            api::create_router(store)
        }
        StoreKind::Memory => {
            tracing::info!("Using in-memory task store");
            api::create_router(MemoryStore::new())
        }
    };

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!("Server is running on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_client(url: String, command: ClientCommands) -> anyhow::Result<()> {
    let mut mirror = TaskMirror::new(url);

    match command {
        ClientCommands::List => {
            mirror.refresh().await?;
            println!("{}", serde_json::to_string_pretty(mirror.tasks())?);
        }
        ClientCommands::Board {
            expand_all,
            expand,
            ids,
        } => {
            mirror.refresh().await?;
            let mut view = BoardView::new().with_ids(ids);
            if expand_all {
                view.expand_all(mirror.tasks().iter().map(|t| t.id.as_str()));
            }
            view.expand_all(expand.iter().map(String::as_str));
            print!("{}", board::render_board(mirror.tasks(), &view));
        }
        ClientCommands::Add {
            title,
            description,
            month,
        } => {
            let mut form = NewTaskForm {
                title,
                description,
                month,
            };
            let Some(task) = form.submit() else {
                bail!("Task title must not be blank");
            };
            mirror.add_task(task).await?;
            if let Some(created) = mirror.tasks().last() {
                println!("{}", serde_json::to_string_pretty(created)?);
            }
        }
        ClientCommands::AddSubtask {
            task_id,
            title,
            description,
        } => {
            let mut view = BoardView::new();
            view.open_subtask_form(&task_id);
            if let Some(draft) = view.subtask_form_mut() {
                draft.title = title;
                draft.description = description;
            }
            let Some(submission) = view.submit_subtask_form() else {
                bail!("Subtask title must not be blank");
            };
            mirror
                .add_subtask(
                    &submission.task_id,
                    &submission.title,
                    &submission.description,
                )
                .await?;
            println!("Subtask added to task {}", submission.task_id);
        }
        ClientCommands::Status { task_id, status } => {
            mirror.change_status(&task_id, status).await?;
            println!("Task {} set to {}", task_id, status.label());
        }
        ClientCommands::SubtaskStatus {
            task_id,
            subtask_id,
            status,
        } => {
            mirror
                .change_subtask_status(&task_id, &subtask_id, status)
                .await?;
            println!("Subtask {} set to {}", subtask_id, status.label());
        }
        ClientCommands::Delete { task_id } => {
            mirror.delete_task(&task_id).await?;
            println!("Task {} deleted", task_id);
        }
        ClientCommands::DeleteSubtask {
            task_id,
            subtask_id,
        } => {
            mirror.delete_subtask(&task_id, &subtask_id).await?;
            println!("Subtask {} deleted", subtask_id);
        }
    }
    Ok(())
}
