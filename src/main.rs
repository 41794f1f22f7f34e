use clap::{Parser, Subcommand};
use eyre::Result;
use std::io;
use std::path::PathBuf;
use todolist::{Backend, Config, TaskListStore, View, open_backend, render_text, shell};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "A single-list to-do manager persisted to a local key-value store")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/todolist/todolist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the store lives under (overrides the config)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend (overrides the config)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the task list (default)
    List,

    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Replace a task's text
    Edit {
        id: i64,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Flip a task between done and not done
    Toggle { id: i64 },

    /// Delete a task
    Remove { id: i64 },

    /// Interactive shell driving the list one event at a time
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    debug!(path = ?cli.config, ?config, "Loaded config");

    let backend = cli.backend.unwrap_or(config.backend);
    let store_path = match cli.store_path {
        Some(p) => p,
        None => config.resolve_store_path()?,
    };
    let color = config.color && !cli.no_color;

    let storage = open_backend(backend, &store_path)?;
    let mut store = TaskListStore::open(storage)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => {}
        Commands::Add { text } => {
            store.submit(&text.join(" "));
        }
        Commands::Edit { id, text } => {
            store.edit(id, &text.join(" "));
        }
        Commands::Toggle { id } => {
            store.toggle(id);
        }
        Commands::Remove { id } => {
            store.remove(id);
        }
        Commands::Shell => {
            let stdin = io::stdin();
            return shell::run(&mut store, stdin.lock(), &mut io::stdout(), color);
        }
    }

    println!("{}", render_text(&View::from_state(store.state()), color));
    Ok(())
}
