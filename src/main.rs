use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use techgloss::cache::IndexCache;
use techgloss::search::{SearchOptions, build_index, suggest};
use techgloss::{config, generate, output, scan, search, serve, validate};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "techgloss")]
#[command(about = "Static site generator for technical glossaries")]
#[command(long_about = "\
Static site generator for technical glossaries

Each markdown file under glossary/ is one term. The build validates the
corpus, renders a page per term and per category, and writes a search index
that the site searches in the browser.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Static assets (logo, favicon) → copied to output root
  └── glossary/
      ├── api.md                   # Term page at /glossary/api/
      ├── rest-api.mdx
      └── networking/              # Subdirectories group files; URLs stay flat
          └── dns.md

Front matter (TOML between +++ lines):
  title, description, category   required
  tags, related                  optional lists (related = slugs of other terms)
  last_updated                   optional date, e.g. 2024-03-01
  slug                           optional, defaults to the file name

Run 'techgloss gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and generate the site
    Build,
    /// Validate content without building
    Check,
    /// Search the glossary from the terminal
    Search {
        query: String,
        /// Only terms in this category
        #[arg(long)]
        category: Option<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show search suggestions for a partial query
    Suggest {
        query: String,
        /// Maximum number of suggestions (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Serve the search API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:4321")]
        addr: SocketAddr,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let corpus = scan::scan(&cli.source)?;
            output::print_scan_output(&corpus, &cli.source);

            println!("==> Validating {} terms", corpus.entries.len());
            let report = validate::validate(&corpus.entries);
            if !report.is_valid() {
                output::print_validation_report(&report);
                return Err(format!(
                    "content has {} validation error(s); fix them and rebuild",
                    report.error_count()
                )
                .into());
            }
            for issue in report.warnings() {
                warn!(entry = %issue.entry, kind = %issue.kind, "{}", issue.message);
            }

            init_thread_pool(&corpus.config.processing);
            println!("==> Generating HTML → {}", cli.output.display());
            let result = generate::generate(&corpus, &cli.source, &cli.output, Utc::now())?;
            output::print_generate_output(&corpus, &result);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let corpus = scan::scan(&cli.source)?;
            let report = validate::validate(&corpus.entries);
            output::print_validation_report(&report);
            if !report.is_valid() {
                std::process::exit(1);
            }
            println!("==> Content is valid");
        }
        Command::Search {
            query,
            category,
            limit,
        } => {
            let corpus = scan::scan(&cli.source)?;
            let index = build_index(&corpus.entries);
            let results = search::run(&index, &query, &SearchOptions { category, limit });
            output::print_search_results(&results, &query, std::io::stdout().is_terminal());
        }
        Command::Suggest { query, limit } => {
            let corpus = scan::scan(&cli.source)?;
            let index = build_index(&corpus.entries);
            let limit = limit.unwrap_or(corpus.config.search.suggestion_limit);
            output::print_suggestions(&suggest(&index, &query, limit), &query);
        }
        Command::Serve { addr } => {
            let site_config = config::load_config(&cli.source)?;
            let cache = IndexCache::for_content_root(
                cli.source.clone(),
                Duration::from_secs(site_config.search.cache_ttl_secs),
            );
            let state = serve::AppState {
                cache: Arc::new(cache),
                suggestion_limit: site_config.search.suggestion_limit,
            };
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(serve::serve(addr, state))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only command output.
///
/// `-v`/`-q` win over `RUST_LOG`; without either the default is `warn`.
fn init_logging(verbose: u8, quiet: bool) {
    let flag_level = match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, _) => Some("debug"),
    };
    let filter = match flag_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
