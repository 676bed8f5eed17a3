mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{ApiClient, DeviceChanges, DeviceDraft, TaskChanges, TaskDraft};
use taskboard_core::{Device, Task};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Taskboard CLI - manage tasks and devices on a taskboard server
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Command-line client for the taskboard API", long_about = None)]
struct Cli {
    /// Base URL of the server
    #[arg(long, global = true, env = "TASKBOARD_URL", default_value = "http://127.0.0.1:3001")]
    server: String,

    /// Log each request
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is running
    Health,

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage devices
    #[command(subcommand)]
    Device(DeviceCommand),
}

#[derive(Subcommand)]
enum TaskCommand {
    /// List all tasks, newest first
    List,

    /// Show one task
    Get { id: String },

    /// Create a task
    Add {
        /// Title for the task
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Mark the task as completed right away
        #[arg(long)]
        completed: bool,
    },

    /// Change selected fields of a task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Mark a task as completed
    Done { id: String },

    /// Delete a task
    Rm { id: String },
}

#[derive(Subcommand)]
enum DeviceCommand {
    /// List all devices
    List,

    /// Show one device
    Get { id: String },

    /// Register a device
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        storage: String,
    },

    /// Change selected fields of a device
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        storage: Option<String>,
    },

    /// Delete a device
    Rm { id: String },
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{}] {}  {}  ({})",
        mark,
        task.id,
        task.title,
        task.created_at.format("%Y-%m-%d %H:%M")
    );
    if !task.description.is_empty() {
        line.push_str(&format!("\n    {}", task.description));
    }
    line
}

fn format_device(device: &Device) -> String {
    format!(
        "{}  {}  model {}  storage {}",
        device.id, device.name, device.model, device.storage
    )
}

async fn run_task(api: &ApiClient, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List => {
            let tasks = api.list_tasks().await?;
            if tasks.is_empty() {
                println!("No tasks");
            }
            for task in &tasks {
                println!("{}", format_task(task));
            }
        }
        TaskCommand::Get { id } => println!("{}", format_task(&api.get_task(&id).await?)),
        TaskCommand::Add {
            title,
            description,
            completed,
        } => {
            let task = api
                .create_task(&TaskDraft {
                    title,
                    description,
                    completed,
                })
                .await?;
            println!("Created {}", format_task(&task));
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            completed,
        } => {
            let changes = TaskChanges {
                title,
                description,
                completed,
            };
            println!("Updated {}", format_task(&api.update_task(&id, &changes).await?));
        }
        TaskCommand::Done { id } => {
            let changes = TaskChanges {
                completed: Some(true),
                ..Default::default()
            };
            println!("{}", format_task(&api.update_task(&id, &changes).await?));
        }
        TaskCommand::Rm { id } => {
            api.delete_task(&id).await?;
            println!("Deleted task {}", id);
        }
    }
    Ok(())
}

async fn run_device(api: &ApiClient, command: DeviceCommand) -> Result<()> {
    match command {
        DeviceCommand::List => {
            for device in api.list_devices().await? {
                println!("{}", format_device(&device));
            }
        }
        DeviceCommand::Get { id } => println!("{}", format_device(&api.get_device(&id).await?)),
        DeviceCommand::Add {
            name,
            model,
            storage,
        } => {
            let device = api
                .create_device(&DeviceDraft {
                    name,
                    model,
                    storage,
                })
                .await?;
            println!("Created {}", format_device(&device));
        }
        DeviceCommand::Edit {
            id,
            name,
            model,
            storage,
        } => {
            let changes = DeviceChanges {
                name,
                model,
                storage,
            };
            println!(
                "Updated {}",
                format_device(&api.update_device(&id, &changes).await?)
            );
        }
        DeviceCommand::Rm { id } => {
            api.delete_device(&id).await?;
            println!("Deleted device {}", id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let api = ApiClient::new(&cli.server)?;

    match cli.command {
        Commands::Health => {
            let health = api.health().await?;
            println!("{}: {}", health.status, health.message);
        }
        Commands::Task(command) => run_task(&api, command).await?,
        Commands::Device(command) => run_device(&api, command).await?,
    }

    Ok(())
}
