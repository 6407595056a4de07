use std::env;
use std::io::Write;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use finder_core::config::Config;
use finder_core::factory::DeserializeFactory;
use finder_core::traits::Finder;
use finder_core::types::{Params, ResultSet};
use finder_http::{HttpConnector, HttpSettings};
use finder_projection::{ProjectionFinder, DEFAULT_KEEP_ALIVE, DEFAULT_PAGE_SIZE};

const USAGE: &str = "Usage: finder <get <id> | mget <id>... | find <query-json> | scroll <query-json>>";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn parse_query(raw: Option<&String>) -> anyhow::Result<Params> {
    match raw {
        None => Ok(Params::new()),
        Some(text) => match serde_json::from_str(text)? {
            Value::Object(query) => Ok(query),
            other => anyhow::bail!("query must be a JSON object, got {}", other),
        },
    }
}

/// Writes one JSON line per item, stopping at the first item that fails.
fn emit(page: ResultSet<Value>, out: &mut impl Write, emitted: &mut usize) -> anyhow::Result<()> {
    for item in page {
        writeln!(out, "{}", serde_json::to_string(&item)?)?;
        *emitted += 1;
    }
    Ok(())
}

/// Streams every page of a scroll to `out`. The cursor is released even when
/// fetching or writing a page fails.
fn drain_scroll<F>(finder: &F, query: &Params, out: &mut impl Write) -> anyhow::Result<(usize, u64)>
where
    F: Finder<Entity = Value> + ?Sized,
{
    let first = finder.scroll_start(query)?;
    let total = first.total_count();
    let mut cursor = first.scroll_cursor().map(str::to_string);
    let mut emitted = 0usize;
    let mut outcome = emit(first, out, &mut emitted);
    while outcome.is_ok() {
        let Some(current) = cursor.take() else { break };
        let page = match finder.scroll_next(&current) {
            Ok(page) => page,
            Err(e) => { outcome = Err(e.into()); cursor = Some(current); break; }
        };
        cursor = Some(page.scroll_cursor().map(str::to_string).unwrap_or(current));
        if page.is_empty() { break; }
        outcome = emit(page, out, &mut emitted);
    }
    if let Some(last) = cursor {
        if let Err(e) = finder.scroll_end(&last) { warn!(error = %e, "failed to release scroll"); }
    }
    outcome.map(|()| (emitted, total))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, args) = parse_args();

    let finder_name: String = config.get("cli.finder").unwrap_or_else(|_| "default".to_string());
    let settings: HttpSettings = config.get("http")?;
    let finder_config = config.finder(&finder_name)?;
    let keep_alive: String = config.get("scroll.keep_alive").unwrap_or_else(|_| DEFAULT_KEEP_ALIVE.to_string());
    let page_size: u64 = config.get("scroll.page_size").unwrap_or(DEFAULT_PAGE_SIZE);
    info!(finder = %finder_name, url = %settings.url, "finder configured");

    let connector = HttpConnector::new(&settings, finder_config)?;
    let finder = ProjectionFinder::new(Arc::new(connector), DeserializeFactory::<Value>::new())
        .with_keep_alive(keep_alive)
        .with_page_size(page_size);

    match cmd.as_str() {
        "get" => {
            let id = args.first().ok_or_else(|| anyhow::anyhow!(USAGE))?;
            println!("{}", serde_json::to_string_pretty(&finder.get_by_identifier(id)?)?);
        }
        "mget" => {
            if args.is_empty() { anyhow::bail!(USAGE); }
            println!("{}", serde_json::to_string_pretty(&finder.get_by_identifiers(&args[..])?)?);
        }
        "find" => {
            let query = parse_query(args.first())?;
            println!("{}", serde_json::to_string_pretty(&finder.find(&query)?)?);
        }
        "scroll" => {
            let query = parse_query(args.first())?;
            let stdout = std::io::stdout();
            let (emitted, total) = drain_scroll(&finder, &query, &mut stdout.lock())?;
            info!(emitted, total, "scroll drained");
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}
