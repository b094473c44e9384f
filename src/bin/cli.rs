//! CLI binary for sister-search.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sister_search::{
    AppConfig, ResultCache, ResultSource, SearchOptions, SearchService, StoredResult,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use web_search::ProviderKind;

/// Fetch ranked web search results and keep them per query.
#[derive(Parser)]
#[command(name = "sister-search", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the result database (overrides the config file).
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search, serving from the cache when the query is stored.
    Search {
        query: String,
        /// Maximum number of results to fetch.
        #[arg(short, long)]
        max: Option<usize>,
        /// Provider to fetch from.
        #[arg(short, long, value_enum)]
        provider: Option<ProviderArg>,
        /// Ignore cached rows and fetch again.
        #[arg(long)]
        refresh: bool,
    },

    /// Show the stored rows for a query.
    Show { query: String },

    /// List stored rows containing a term.
    Filter {
        term: String,
        /// Restrict to one stored query.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List stored queries.
    Queries,

    /// Suggest stored queries similar to the input.
    Suggest {
        input: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Google,
    SerpApi,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Google => ProviderKind::Google,
            ProviderArg::SerpApi => ProviderKind::SerpApi,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sister_search=info,web_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?.with_env_overrides();
    if let Some(database) = cli.database {
        config.store.database_path = database;
    }

    let cache = ResultCache::open(&config.store.database_path)?;
    info!(path = %config.store.database_path.display(), "using result store");

    match cli.command {
        Command::Search {
            query,
            max,
            provider,
            refresh,
        } => {
            let options = SearchOptions {
                provider: provider.map(ProviderKind::from),
                max_results: max,
                refresh,
            };
            run_search(config, cache, &query, options, cli.json).await
        }
        Command::Show { query } => {
            let rows = cache.get_for_query(&query).await?;
            print_rows(&rows, cli.json)
        }
        Command::Filter { term, query } => {
            let rows = cache.filter(query.as_deref(), &term).await?;
            print_rows(&rows, cli.json)
        }
        Command::Queries => {
            let summaries = cache.cached_queries().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("No stored queries.");
            } else {
                for s in &summaries {
                    println!(
                        "{:>4}  {}  {}",
                        s.result_count,
                        s.fetched_at_utc.format("%Y-%m-%d %H:%M"),
                        s.query
                    );
                }
            }
            Ok(())
        }
        Command::Suggest { input, limit } => {
            let suggestions = cache.suggest_queries(&input, limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else if suggestions.is_empty() {
                println!("No similar stored queries.");
            } else {
                for (query, tier) in &suggestions {
                    println!("{}  {query}", tier.score());
                }
            }
            Ok(())
        }
    }
}

async fn run_search(
    config: AppConfig,
    cache: ResultCache,
    query: &str,
    options: SearchOptions,
    json: bool,
) -> anyhow::Result<()> {
    let service = SearchService::new(config.search, cache)?;

    // Handle Ctrl+C
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, cancelling search...");
            cancel_clone.cancel();
        }
    });

    let outcome = service.search(query, options, &cancel).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let source = match outcome.source {
        ResultSource::Cache => "cache",
        ResultSource::Fetched => "fetched",
    };
    println!("{} ({source})", outcome.query);
    print_rows(&outcome.rows, false)
}

fn print_rows(rows: &[StoredResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for row in rows {
        println!("{:>3}. {}", row.position, row.title.as_deref().unwrap_or("(untitled)"));
        println!("     {}", row.url);
        if let Some(snippet) = &row.snippet {
            println!("     {snippet}");
        }
    }
    Ok(())
}
