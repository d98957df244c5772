//! Catalog CLI - Command-line interface for the book catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding the default field bounds
    #[arg(long, global = true)]
    schema: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate book records in a JSON file
    Validate {
        /// Input file path (one record or an array of records)
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Batch validate every JSON file in a directory
    Batch {
        /// Input directory
        input_dir: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Add a book to the library
    Add {
        /// Book title
        #[arg(long)]
        name: String,

        /// Author name
        #[arg(long)]
        author: String,

        /// Year of publication
        #[arg(long, allow_hyphen_values = true)]
        year: String,

        /// Book type (genre)
        #[arg(long)]
        book_type: String,

        /// Library file path
        #[arg(long)]
        library: Option<String>,
    },

    /// List books in the library
    List {
        /// Only books whose name or author contains this text
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Library file path
        #[arg(long)]
        library: Option<String>,
    },

    /// Remove a book from the library
    Remove {
        /// Book id
        id: String,

        /// Library file path
        #[arg(long)]
        library: Option<String>,
    },

    /// Print the effective field bounds
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "catalog_cli=debug,catalog_core=debug"
    } else {
        "catalog_cli=info,catalog_core=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let schema = commands::load_schema(cli.schema.as_deref())?;

    match cli.command {
        Commands::Validate { input, json } => commands::validate(&input, json, schema),

        Commands::Batch { input_dir, jobs } => commands::batch(&input_dir, jobs, schema),

        Commands::Add {
            name,
            author,
            year,
            book_type,
            library,
        } => {
            let library = commands::library_path(library);
            commands::add(&library, schema, &name, &author, &year, &book_type).await
        }

        Commands::List {
            search,
            json,
            library,
        } => {
            let library = commands::library_path(library);
            commands::list(&library, schema, search.as_deref(), json).await
        }

        Commands::Remove { id, library } => {
            let library = commands::library_path(library);
            commands::remove(&library, schema, &id).await
        }

        Commands::Schema => commands::schema(schema),
    }
}
