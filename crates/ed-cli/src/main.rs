//! Terminal frontend for the Echoing Depths adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "depths",
    about = "Echoing Depths — a multi-agent text adventure in a collapsing cave",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new saved game and print its session id
    New {
        /// Character name
        #[arg(short, long)]
        name: String,

        /// Character class (warrior, wizard, rogue)
        #[arg(short, long, default_value = "adventurer")]
        class: String,

        /// Directory holding saved sessions
        #[arg(long, default_value = "saves")]
        store_dir: PathBuf,
    },

    /// Play interactively (a fresh throwaway game, or a saved session)
    Play {
        /// Resume a saved session by id (requires --store-dir)
        #[arg(short, long)]
        session: Option<String>,

        /// Character name for a fresh game
        #[arg(short, long, default_value = "Adventurer")]
        name: String,

        /// Character class for a fresh game
        #[arg(short, long, default_value = "adventurer")]
        class: String,

        /// Directory holding saved sessions; omit to play without saving
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Narrate with an LLM provider ("openai") instead of templates
        #[arg(long)]
        narrator: Option<String>,
    },

    /// Print the full state of a saved session as JSON
    State {
        /// Session id
        session: String,

        /// Directory holding saved sessions
        #[arg(long, default_value = "saves")]
        store_dir: PathBuf,
    },

    /// List saved sessions
    Sessions {
        /// Directory holding saved sessions
        #[arg(long, default_value = "saves")]
        store_dir: PathBuf,
    },

    /// Delete a saved session
    Delete {
        /// Session id
        session: String,

        /// Directory holding saved sessions
        #[arg(long, default_value = "saves")]
        store_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::New {
            name,
            class,
            store_dir,
        } => commands::new::run(&name, &class, &store_dir).await,
        Commands::Play {
            session,
            name,
            class,
            store_dir,
            narrator,
        } => {
            commands::play::run(
                session.as_deref(),
                &name,
                &class,
                store_dir.as_deref(),
                narrator.as_deref(),
            )
            .await
        }
        Commands::State { session, store_dir } => commands::state::run(&session, &store_dir).await,
        Commands::Sessions { store_dir } => commands::sessions::run(&store_dir).await,
        Commands::Delete { session, store_dir } => {
            commands::delete::run(&session, &store_dir).await
        }
    };

    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}
