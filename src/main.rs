//! webq - fetch web queries through a local response cache
//!
//! Resolves a literal URL or an `@name` template shortcut into a concrete
//! request, serves it from the on-disk cache when fresh enough, and falls
//! back to a stale cache entry when the download fails. Content goes to
//! stdout; diagnostics go to stderr.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use webq::cache::CacheStore;
use webq::cli::{Cli, Invocation};
use webq::config::{AppConfig, AppContext};
use webq::fetch::HttpFetcher;
use webq::request::Request;
use webq::retrieve::retrieve;
use webq::template::{TemplateSet, DEFAULT_TEMPLATES};

/// Sets up tracing output on stderr
///
/// `RUST_LOG` takes precedence; otherwise warnings are shown, or debug
/// output when `--verbose` is given.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "webq=debug" } else { "webq=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::discover().ok_or("could not determine a home directory")?;
    let config = AppConfig::load_or_init(&ctx.config_path)?;

    let mut params = cli.request_params(&config);
    let templates = TemplateSet::load(
        DEFAULT_TEMPLATES
            .iter()
            .copied()
            .chain(config.templates.iter().map(String::as_str)),
    );

    match cli.invocation()? {
        Invocation::Listing => {
            print!("{}", templates.render_listing());
            return Ok(());
        }
        Invocation::Template { name, values } => {
            let template = templates.resolve(&name, values.len())?;
            template.apply(&values, &mut params)?;
        }
        Invocation::Literal { query } => params.query = query,
    }

    let request = Request::new(&params.query)?;
    let cache = CacheStore::new(ctx.cache_dir.clone());
    let fetcher = HttpFetcher::new();

    let outcome = retrieve(&cache, &fetcher, &request, &params).await?;

    let mut stdout = std::io::stdout();
    stdout.write_all(&outcome.content)?;
    stdout.flush()?;

    if params.verbose {
        eprintln!(
            "mode={} R={} W={}",
            outcome.provenance, params.cache_read, params.cache_write
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("webq: {err}");
            ExitCode::FAILURE
        }
    }
}
