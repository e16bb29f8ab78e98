use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use focusflow::{
    CategoryFilter, Config, FileKv, FilterPatch, NewTask, Priority, PriorityFilter, StatusFilter, Store, Task,
    TaskPatch,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "focusflow")]
#[command(about = "FocusFlow - create, filter and export your tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the task data (overrides config and FOCUSFLOW_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task
    Add {
        title: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Create the task already completed
        #[arg(long)]
        done: bool,
    },

    /// Change fields of an existing task
    #[command(group(ArgGroup::new("state").args(["done", "pending"])))]
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        done: bool,

        #[arg(long)]
        pending: bool,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Flip a task between completed and pending
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// List tasks matching the given filters
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        #[arg(long, default_value = "all")]
        priority: PriorityFilter,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show task counts
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// List categories in use
    Categories {
        /// Include the default categories
        #[arg(long)]
        all: bool,
    },

    /// Write all tasks to focusflow_tasks_<date>.json
    Export {
        /// Target directory (default: config export_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose, config.log_level.as_deref()))
        .with_writer(io::stderr)
        .init();

    let kv = FileKv::open(&config.data_dir)?;
    let mut store = Store::open(kv);

    match cli.command {
        Commands::Add {
            title,
            category,
            priority,
            description,
            done,
        } => {
            let data = NewTask::new(title.trim(), category.trim())
                .with_priority(priority)
                .with_description(description)
                .done(done);
            data.validate()?;

            let id = store.add(data).ok_or_else(|| eyre!("Task was not created"))?;
            println!("Created task {}", short_id(&id).bold());
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            category,
            done,
            pending,
        } => {
            let id = resolve(&store, &id)?;
            let patch = TaskPatch {
                title: title.map(|t| t.trim().to_string()),
                description,
                priority,
                category: category.map(|c| c.trim().to_string()),
                is_done: if done {
                    Some(true)
                } else if pending {
                    Some(false)
                } else {
                    None
                },
            };
            if patch.is_empty() {
                return Err(eyre!("Nothing to change; pass at least one field to edit"));
            }
            if matches!(&patch.title, Some(t) if t.is_empty()) || matches!(&patch.category, Some(c) if c.is_empty()) {
                return Err(eyre!("Title and category cannot be empty"));
            }

            store.edit(&id, patch);
            println!("Updated task {}", short_id(&id).bold());
        }
        Commands::Delete { id, yes } => {
            let id = resolve(&store, &id)?;
            let title = store.get(&id).map(|t| t.title.clone()).unwrap_or_default();

            if !yes && !confirm(&format!("Delete task \"{}\"?", title))? {
                println!("Cancelled");
                return Ok(());
            }

            store.delete(&id);
            println!("Deleted task {}", short_id(&id).bold());
        }
        Commands::Toggle { id } => {
            let id = resolve(&store, &id)?;
            store.toggle(&id);
            if let Some(task) = store.get(&id) {
                let state = if task.is_done { "completed".green() } else { "pending".yellow() };
                println!("Task {} is now {}", short_id(&id).bold(), state);
            }
        }
        Commands::List {
            status,
            category,
            priority,
            json,
        } => {
            store.set_filters(
                FilterPatch::default()
                    .status(status)
                    .category(category)
                    .priority(priority),
            );
            let tasks = store.filtered_tasks();

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }

            if tasks.is_empty() {
                println!("No tasks");
            }
            for task in &tasks {
                print_task(task);
            }
            if store.filters().is_active() {
                println!("\n{} of {} tasks", tasks.len(), store.stats().total);
            }
        }
        Commands::Stats { json } => {
            let stats = store.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(stats)?);
                return Ok(());
            }

            println!("{} {}", "Total:".bold(), stats.total);
            println!("{} {}", "Completed:".bold(), stats.completed.to_string().green());
            println!("{} {}", "Pending:".bold(), stats.pending.to_string().yellow());
            println!("{} {}%", "Progress:".bold(), stats.completion_percentage());

            println!("\n{}", "By priority".bold());
            for priority in Priority::ALL {
                println!("  {:<8} {}", priority.as_str(), stats.priority_count(priority));
            }

            if !stats.by_category.is_empty() {
                println!("\n{}", "By category".bold());
                for (category, count) in &stats.by_category {
                    println!("  {:<12} {}", category, count);
                }
            }
        }
        Commands::Categories { all } => {
            let categories = if all { store.known_categories() } else { store.categories() };
            for category in categories {
                println!("{}", category);
            }
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let path = store.export(&dir).wrap_err("Export failed")?;
            println!("Exported {} tasks to {}", store.tasks().len(), path.display());
        }
    }

    Ok(())
}

fn log_level(verbose: u8, configured: Option<&str>) -> Level {
    match verbose {
        0 => configured.and_then(|l| l.parse().ok()).unwrap_or(Level::WARN),
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn resolve<K: focusflow::KeyValueStore>(store: &Store<K>, id: &str) -> Result<String> {
    store
        .resolve_id(id)
        .ok_or_else(|| eyre!("No task matches id '{}' (or the prefix is ambiguous)", id))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_task(task: &Task) {
    let mark = if task.is_done { "[x]".green() } else { "[ ]".normal() };
    let priority = match task.priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".blue(),
    };
    let title = if task.is_done {
        task.title.strikethrough()
    } else {
        task.title.normal()
    };

    println!(
        "{} {} {} {} {} {}",
        mark,
        short_id(&task.id).dimmed(),
        title,
        format!("({})", task.category).cyan(),
        priority,
        task.created_at.format("%Y-%m-%d").to_string().dimmed()
    );
    if !task.description.is_empty() {
        println!("      {}", task.description.dimmed());
    }
}
