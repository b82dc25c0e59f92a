//! influxql CLI
//!
//! Command-line interface over the statement builder:
//! - Render statements without running them
//! - Run built or literal statements
//! - Write line-protocol points
//! - Check connectivity

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use influxql_builder::client::{HttpBackend, HttpBackendConfig};
use influxql_builder::query::{BulkInsert, Query, RangeOptions, RawQuery, Value};
use influxql_builder::{Config, RawResult, Response};

#[derive(Parser)]
#[command(name = "influxql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and run InfluxQL statements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store URL, overriding the config
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Database, overriding the config
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the statement a builder invocation renders
    Explain(StatementArgs),

    /// Build a statement and run it
    Query(StatementArgs),

    /// Run a statement exactly as written
    Raw {
        /// Statement text
        statement: String,
    },

    /// Write line-protocol points
    Write {
        /// File holding the points (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Check that the store is reachable
    Ping,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct StatementArgs {
    /// Measurements to read from
    #[arg(required = true)]
    pub measurements: Vec<String>,

    /// Fields to select (comma-separated or repeated)
    #[arg(short, long)]
    pub select: Vec<String>,

    /// Aggregation applied to a field, e.g. mean=usage
    #[arg(short, long)]
    pub aggregate: Vec<String>,

    /// Filters in field__lookup=value form, e.g. usage__gte=90
    #[arg(short = 'w', long = "where")]
    pub filters: Vec<String>,

    /// Excluded filters in field__lookup=value form
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,

    /// Only points newer than this interval, e.g. 1h
    #[arg(long)]
    pub last: Option<String>,

    /// Tags to group by
    #[arg(short, long)]
    pub group_by: Vec<String>,

    /// Time bucket width, e.g. 5m
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Offset of the time buckets, e.g. 15m
    #[arg(long)]
    pub shift: Option<String>,

    /// Value for empty time buckets
    #[arg(long)]
    pub fill: Option<i64>,

    /// Sort field; prefix with '-' for descending
    #[arg(short, long)]
    pub order_by: Option<String>,

    #[arg(short, long)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub offset: Option<i64>,

    #[arg(long)]
    pub slimit: Option<i64>,

    #[arg(long)]
    pub soffset: Option<i64>,

    /// IANA timezone for the result timestamps
    #[arg(long)]
    pub tz: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.url {
        config.influxdb.url = url.clone();
    }
    if let Some(database) = &cli.database {
        config.influxdb.database = Some(database.clone());
    }

    if let Err(e) = influxql_builder::logging::init(&config.logging) {
        eprintln!("Logging disabled: {}", e);
    }

    match cli.command {
        Commands::Explain(args) => {
            let query = build_query(&args, None)?;
            println!("{}", query.explain());
        }

        Commands::Query(args) => {
            let backend = connect(&config)?;
            let query = build_query(&args, config.influxdb.database.clone())?;
            tracing::info!(statement = %query, "Running query");
            let result = query.evaluate(&backend).await?;
            print_result(&result, &cli.format)?;
        }

        Commands::Raw { statement } => {
            let backend = connect(&config)?;
            let mut raw = RawQuery::new(statement);
            if let Some(database) = &config.influxdb.database {
                raw = raw.database(database.clone());
            }
            let result = raw.execute(&backend).await?;
            Response::new(result.clone()).raise_if_error()?;
            print_result(&result, &cli.format)?;
        }

        Commands::Write { input } => {
            let points = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let lines = points.lines().filter(|l| !l.trim().is_empty()).count();
            if lines == 0 {
                bail!("No points to write");
            }

            let backend = connect(&config)?;
            let mut insert = BulkInsert::new(points);
            if let Some(database) = &config.influxdb.database {
                insert = insert.database(database.clone());
            }
            insert.execute(&backend).await?;
            println!("Wrote {} points", lines);
        }

        Commands::Ping => {
            let backend = connect(&config)?;
            match backend.ping().await {
                Ok(()) => println!("{} is reachable", config.influxdb.url),
                Err(e) => {
                    eprintln!("Cannot reach {}", config.influxdb.url);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = influxql_builder::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn connect(config: &Config) -> anyhow::Result<HttpBackend> {
    Ok(HttpBackend::new(HttpBackendConfig::from(&config.influxdb))?)
}

fn build_query(args: &StatementArgs, database: Option<String>) -> anyhow::Result<Query> {
    let mut query = match database {
        Some(database) => Query::with_database(database),
        None => Query::new(),
    };

    let fields: Vec<&str> = args
        .select
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !fields.is_empty() {
        query.select(fields)?;
    }

    for pair in &args.aggregate {
        let (func, field) = split_pair(pair)?;
        match func.to_ascii_lowercase().as_str() {
            "count" => query.count(field.split(','))?,
            "integral" => query.integral(field.split(','))?,
            "distinct" => query.distinct(field)?,
            "mean" => query.mean(field)?,
            "median" => query.median(field)?,
            "mode" => query.mode(field)?,
            "spread" => query.spread(field)?,
            "stddev" => query.std_dev(field)?,
            "sum" => query.sum(field)?,
            other => bail!("Unknown aggregation: {}", other),
        };
    }

    query.from_measurements(args.measurements.iter().cloned())?;

    for pair in &args.filters {
        let (key, value) = split_pair(pair)?;
        query.filter_by(key, parse_value(key, value))?;
    }
    for pair in &args.exclude {
        let (key, value) = split_pair(pair)?;
        query.exclude_by(key, parse_value(key, value))?;
    }
    if let Some(last) = &args.last {
        query.filter_by("time__gte", influxql_builder::Now::minus(last.as_str())?)?;
    }

    match &args.interval {
        Some(interval) => {
            let mut options = RangeOptions::new().tags(args.group_by.iter().cloned());
            if let Some(shift) = &args.shift {
                options = options.shift(shift.as_str());
            }
            if let Some(fill) = args.fill {
                options = options.fill(fill);
            }
            query.range_by(interval.as_str(), options)?;
        }
        None if args.shift.is_some() || args.fill.is_some() => {
            bail!("--shift and --fill require --interval");
        }
        None if !args.group_by.is_empty() => {
            query.group_by(args.group_by.iter().cloned())?;
        }
        None => {}
    }

    if let Some(field) = &args.order_by {
        query.order_by(field)?;
    }
    if let Some(n) = args.limit {
        query.limit(n)?;
    }
    if let Some(n) = args.offset {
        query.offset(n)?;
    }
    if let Some(n) = args.slimit {
        query.slimit(n)?;
    }
    if let Some(n) = args.soffset {
        query.soffset(n)?;
    }
    if let Some(tz) = &args.tz {
        query.tz(tz)?;
    }

    Ok(query)
}

fn split_pair(pair: &str) -> anyhow::Result<(&str, &str)> {
    pair.split_once('=')
        .with_context(|| format!("Expected key=value, got '{}'", pair))
}

/// Numbers and booleans keep their type; list lookups split on commas
fn parse_value(key: &str, raw: &str) -> Value {
    if key.ends_with("__in") || key.ends_with("__range") {
        return Value::List(raw.split(',').map(|item| parse_scalar(item.trim())).collect());
    }
    parse_scalar(raw)
}

fn parse_scalar(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::Str(raw.to_string())
    }
}

fn print_result(result: &RawResult, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let response = Response::new(result.clone());
    let series = response.series();
    if series.is_empty() {
        println!("No data");
        return Ok(());
    }

    for s in series {
        println!("name: {}", s["name"].as_str().unwrap_or("-"));
        if let Some(tags) = s["tags"].as_object() {
            let tags: Vec<String> = tags.iter().map(|(k, v)| format!("{}={}", k, cell(v))).collect();
            println!("tags: {}", tags.join(", "));
        }

        let columns: Vec<&str> = s["columns"]
            .as_array()
            .map(|cols| cols.iter().filter_map(|c| c.as_str()).collect())
            .unwrap_or_default();
        let header: Vec<String> = columns.iter().map(|c| format!("{:<22}", c)).collect();
        println!("{}", header.join(" | "));
        println!("{}", "-".repeat(columns.len() * 25));

        for row in s["values"].as_array().into_iter().flatten() {
            let cells: Vec<String> = row
                .as_array()
                .into_iter()
                .flatten()
                .map(|v| format!("{:<22}", cell(v)))
                .collect();
            println!("{}", cells.join(" | "));
        }
        println!();
    }
    Ok(())
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
