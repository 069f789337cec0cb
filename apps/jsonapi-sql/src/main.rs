//! JSON:API query translator
//!
//! Turns a JSON:API query string into SQL for one configured resource, or
//! runs it against a database and prints the rows as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Print the SQL for a query
//! jsonapi-sql --config config/example.yaml sql --resource User \
//!     'filter[name]=Bob&sort=-fullName&page[size]=10'
//!
//! # Run it against SQLite, seeding the database first
//! jsonapi-sql --config config/example.yaml run --resource User \
//!     --database-url sqlite::memory: --setup seed.sql 'filter[comments.text]=hi'
//! ```
//!
//! Rejected queries are reported on stderr as a JSON:API error document.

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use modkit_jsonapi::problem::ErrorDocument;
use modkit_jsonapi::sea::SeaQueryBuilder;
use modkit_jsonapi::{Error, JsonApiConfig, JsonApiPager, JsonApiRequest, MappingRegistry};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jsonapi-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with page limits and resource mappings
    #[arg(short, long, global = true, default_value = "jsonapi.yaml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SQL for a query string
    Sql {
        #[command(flatten)]
        target: Target,

        /// SQL dialect to render
        #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
        backend: Backend,
    },
    /// Execute a query string and print the rows as JSON
    Run {
        #[command(flatten)]
        target: Target,

        /// Connection URL, e.g. `sqlite://data.db?mode=ro`
        #[arg(long)]
        database_url: String,

        /// SQL file executed before the query, statements separated by `;`
        #[arg(long)]
        setup: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct Target {
    /// Resource type the query selects from, e.g. `User`
    #[arg(short, long)]
    resource: String,

    /// Query string, e.g. `filter[name]=Bob&sort=-fullName`
    #[arg(value_name = "QUERY", default_value = "")]
    query: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Sqlite,
    Postgres,
    Mysql,
}

impl From<Backend> for DbBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Sqlite => DbBackend::Sqlite,
            Backend::Postgres => DbBackend::Postgres,
            Backend::Mysql => DbBackend::MySql,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Sql { target, backend } => {
            let builder = build(&cli.config, &target)?;
            println!("{}", builder.to_sql(backend.into()));
        }
        Commands::Run {
            target,
            database_url,
            setup,
        } => {
            let builder = build(&cli.config, &target)?;
            let mut options = ConnectOptions::new(database_url.as_str());
            options.max_connections(1);
            let conn = Database::connect(options)
                .await
                .with_context(|| format!("failed to connect to {database_url}"))?;

            if let Some(path) = setup {
                let script = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                    conn.execute_unprepared(statement)
                        .await
                        .with_context(|| format!("setup statement failed: {statement}"))?;
                }
            }

            let rows = builder.fetch_json(&conn).await?;
            tracing::info!(rows = rows.len(), "query finished");
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn build(config_path: &Path, target: &Target) -> anyhow::Result<SeaQueryBuilder> {
    if !config_path.exists() {
        bail!("config file not found: {}", config_path.display());
    }

    let config = JsonApiConfig::load(Some(config_path))?;
    let registry = config.registry()?;
    let mapping = registry
        .mapping_for_resource_type(&target.resource)
        .ok_or_else(|| Error::UnmappedResource(target.resource.clone()))?;
    let request = JsonApiRequest::from_query_str(&target.query)?;

    let mut builder = SeaQueryBuilder::new(mapping);
    let page = JsonApiPager::from_config(&registry, &config).paginate(&mut builder, &request)?;
    tracing::info!(
        resource = %target.resource,
        page.size = page.size,
        page.number = page.number,
        "query built"
    );

    Ok(builder)
}

fn report(err: &anyhow::Error) -> ExitCode {
    let Some(jsonapi) = err.downcast_ref::<Error>() else {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    };

    if jsonapi.is_configuration() {
        tracing::error!(error = %jsonapi, "configuration error");
    }
    let document = ErrorDocument::from(jsonapi.clone());
    if let Ok(json) = serde_json::to_string_pretty(&document) {
        eprintln!("{json}");
    } else {
        eprintln!("Error: {jsonapi}");
    }
    ExitCode::FAILURE
}
