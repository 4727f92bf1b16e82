use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use colored::Colorize;
use serde_json::{json, Value};
use strata_store::{normalize_params, KvStorage, OrderedKv, RedbStorage, StoreConfig};
use strata_types::{ListParams, ListResponse, StorageQuery};

use crate::cli::*;

/// Field compared by `--after` and `--before`.
const TIME_FIELD: &str = "time";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.dir)?;
    let storage = RedbStorage::open(&config)
        .with_context(|| format!("failed to open store in {}", config.dir.display()))?;
    tracing::debug!(dir = %config.dir.display(), "store opened");

    let format = cli.format;
    let output = match cli.command {
        Command::Get(args) => cmd_get(&storage, args, format).await?,
        Command::Put(args) => cmd_put(&storage, args, format).await?,
        Command::Delete(args) => cmd_delete(&storage, args, format).await?,
        Command::List(args) => cmd_list(&storage, args, format).await?,
        Command::Count(args) => cmd_count(&storage, args, format).await?,
    };
    println!("{output}");
    Ok(())
}

/// Config file (or defaults), then `STRATA_DATA_DIR`, then `--dir`.
fn resolve_config(path: Option<&Path>, dir: Option<PathBuf>) -> anyhow::Result<StoreConfig> {
    let config = match path {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(dir) = dir {
        config.dir = dir;
    }
    Ok(config)
}

async fn cmd_get<B: OrderedKv>(
    storage: &KvStorage<B>,
    args: GetArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let document = storage.get_document(&args.kind, &args.id).await?;
    let pretty = serde_json::to_string_pretty(&document)?;
    Ok(match format {
        OutputFormat::Json => pretty,
        OutputFormat::Text => format!(
            "{}\n{}",
            format!("{}:{}", args.kind, args.id).yellow().bold(),
            pretty
        ),
    })
}

async fn cmd_put<B: OrderedKv>(
    storage: &KvStorage<B>,
    args: PutArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let (id, document) = prepare_document(&args.json, args.id)?;
    storage.save_document(&args.kind, &id, &document).await?;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({ "kind": args.kind, "id": id }))?,
        OutputFormat::Text => format!(
            "{} Stored {}",
            "✓".green().bold(),
            format!("{}:{id}", args.kind).yellow()
        ),
    })
}

async fn cmd_delete<B: OrderedKv>(
    storage: &KvStorage<B>,
    args: DeleteArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let removed = storage.delete_document(&args.kind, &args.id).await?;
    let key = format!("{}:{}", args.kind, args.id);
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({ "deleted": removed }))?,
        OutputFormat::Text if removed => format!("{} Deleted {}", "✓".green().bold(), key.yellow()),
        OutputFormat::Text => format!("Nothing stored under {}", key.yellow()),
    })
}

async fn cmd_list<B: OrderedKv>(
    storage: &KvStorage<B>,
    args: ListArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let query = build_query(&args)?;
    let options = normalize_params(ListParams {
        offset: args.offset,
        limit: args.limit,
        query,
        order_by: args.order_by,
        order_by_direction: args.direction,
    })?;
    let page = storage.list_documents(&args.kind, options).await?;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&page)?,
        OutputFormat::Text => render_page(&args.kind, &page),
    })
}

async fn cmd_count<B: OrderedKv>(
    storage: &KvStorage<B>,
    args: CountArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let query = args
        .query
        .as_deref()
        .map(StorageQuery::from_json)
        .transpose()?;
    let count = storage.count_documents(&args.kind, query).await?;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({ "count": count }))?,
        OutputFormat::Text => format!("{} {} objects", count.to_string().bold(), args.kind.cyan()),
    })
}

fn render_page(kind: &str, page: &ListResponse<Value>) -> String {
    if page.items.is_empty() {
        return format!("No {} objects in range ({} total).", kind.cyan(), page.total);
    }
    let mut lines: Vec<String> = page
        .items
        .iter()
        .map(|document| {
            let id = document.get("id").and_then(Value::as_str).unwrap_or("?");
            format!("{}  {}", id.yellow(), document.to_string().dimmed())
        })
        .collect();
    lines.push(format!(
        "Showing {}-{} of {} {} objects{}",
        page.offset + 1,
        page.next_offset(),
        page.total.to_string().bold(),
        kind.cyan(),
        if page.has_more() { " (more available)" } else { "" }
    ));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse the document for `put` and settle its id.
///
/// The id comes from `--id`, else the document's own `id` field, else a
/// fresh UUID v7. It is written back into the document.
fn prepare_document(input: &str, id: Option<String>) -> anyhow::Result<(String, Value)> {
    let mut document: Value = serde_json::from_str(input).context("document is not valid JSON")?;
    let Some(fields) = document.as_object_mut() else {
        bail!("document must be a JSON object");
    };

    let embedded = fields.get("id").and_then(Value::as_str).map(str::to_string);
    let id = match (id, embedded) {
        (Some(given), Some(embedded)) if given != embedded => {
            bail!("--id {given:?} conflicts with the document's id {embedded:?}")
        }
        (Some(given), _) => given,
        (None, Some(embedded)) => embedded,
        (None, None) => uuid::Uuid::now_v7().to_string(),
    };
    fields.insert("id".into(), Value::String(id.clone()));
    Ok((id, document))
}

/// Combine `--query`, `--after`, `--before` and `--where` into one tree.
///
/// Repeated `--where` filters form an `or` group; everything else is
/// joined with `and`.
fn build_query(args: &ListArgs) -> anyhow::Result<Option<StorageQuery>> {
    let mut clauses = Vec::new();
    if let Some(text) = &args.query {
        clauses.push(StorageQuery::from_json(text)?);
    }
    if let Some(after) = &args.after {
        clauses.push(StorageQuery::gt(TIME_FIELD, parse_timestamp(after)?));
    }
    if let Some(before) = &args.before {
        clauses.push(StorageQuery::lt(TIME_FIELD, parse_timestamp(before)?));
    }
    match args.filters.as_slice() {
        [] => {}
        [single] => clauses.push(parse_filter(single)?),
        many => clauses.push(StorageQuery::or(
            many.iter()
                .map(|f| parse_filter(f))
                .collect::<anyhow::Result<Vec<_>>>()?,
        )),
    }
    Ok(match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(StorageQuery::and(clauses)),
    })
}

/// Accept RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC) and render it as
/// UTC ISO-8601 with milliseconds, matching how timestamps are stored.
fn parse_timestamp(input: &str) -> anyhow::Result<String> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid timestamp {input:?}: expected RFC 3339 or YYYY-MM-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date {input:?}"))?;
    Ok(Utc
        .from_utc_datetime(&midnight)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse `path=value` into an equality leaf. The value is read as JSON when
/// it parses, and as a plain string otherwise.
fn parse_filter(input: &str) -> anyhow::Result<StorageQuery> {
    let Some((path, raw)) = input.split_once('=') else {
        bail!("filter {input:?} must look like path=value");
    };
    let path = path.trim();
    if path.is_empty() {
        bail!("filter {input:?} has an empty path");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok(StorageQuery::eq(path, value))
}
