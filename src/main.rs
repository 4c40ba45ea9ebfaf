mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engram::config::EngramConfig;

#[derive(Parser)]
#[command(name = "engram", version, about = "Memory storage and semantic retrieval engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a new memory
    Store {
        /// The text to remember
        text: String,
        /// Category for the memory (e.g. note, reference)
        #[arg(long, default_value = "note")]
        r#type: String,
        /// Provenance tag
        #[arg(long, default_value = "cli")]
        source: String,
        /// Tags, repeatable
        #[arg(long)]
        tag: Vec<String>,
        /// Confidence in [0.0, 1.0]
        #[arg(long)]
        confidence: Option<f64>,
        /// Explicit title (otherwise derived)
        #[arg(long)]
        title: Option<String>,
    },
    /// Search memories by semantic similarity
    Search {
        /// Free-text query
        query: String,
        /// Maximum results
        #[arg(long)]
        limit: Option<usize>,
        /// Restrict to memories carrying any of these tags
        #[arg(long)]
        tag: Vec<String>,
        /// Similarity floor for the strict pass
        #[arg(long)]
        min_similarity: Option<f64>,
    },
    /// Show a memory and its relationships
    Show { id: String },
    /// Delete a memory
    Delete { id: String },
    /// Create a relationship between two memories
    Relate {
        from_id: String,
        to_id: String,
        /// Relationship label (e.g. references, derived_from)
        #[arg(long, default_value = "related_to")]
        r#type: String,
    },
    /// Show memory store statistics
    Stats,
    /// Run database diagnostics
    Doctor,
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.engram/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = EngramConfig::load()?;

    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Store {
            text,
            r#type,
            source,
            tag,
            confidence,
            title,
        } => {
            cli::store::store(
                &config,
                &text,
                &r#type,
                &source,
                &tag,
                confidence,
                title.as_deref(),
            )
            .await?;
        }
        Command::Search {
            query,
            limit,
            tag,
            min_similarity,
        } => {
            cli::search::search(&config, &query, limit, &tag, min_similarity).await?;
        }
        Command::Show { id } => cli::show::show(&config, &id)?,
        Command::Delete { id } => cli::remove::remove(&config, &id)?,
        Command::Relate {
            from_id,
            to_id,
            r#type,
        } => cli::relate::relate(&config, &from_id, &to_id, &r#type)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Model { action } => match action {
            ModelAction::Download => cli::model_download(&config.embedding).await?,
        },
    }

    Ok(())
}
