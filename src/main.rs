//! ISTA Explorer - read-only SQL console for the ISTA operations database.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use cli::Cli;
use serde_json::Value;
use tracing::{error, info};

use ista_explorer::config::Config;
use ista_explorer::dashboard::{Dashboard, Slot, SlotState};
use ista_explorer::gateway::HttpGateway;
use ista_explorer::logging;
use ista_explorer::session::{QueryOutcome, QuerySession};
use ista_explorer::table::ResultTable;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.remote.apply_env_defaults();

    // CLI arguments take precedence over the config file.
    if let Some(endpoint) = &cli.endpoint {
        config.remote.endpoint = Some(endpoint.clone());
    }
    if let Some(api_key) = &cli.api_key {
        config.remote.api_key = Some(api_key.clone());
    }

    let gateway = Arc::new(HttpGateway::from_config(&config.remote)?);

    match &cli.execute {
        Some(sql) => run_query(gateway, &config, sql).await,
        None => {
            run_dashboard(gateway).await;
            Ok(())
        }
    }
}

/// Submits one query and prints the outcome.
async fn run_query(
    gateway: Arc<HttpGateway>,
    config: &Config,
    sql: &str,
) -> anyhow::Result<()> {
    let (session, _notices) = QuerySession::with_options(
        gateway,
        config.results.schema_inference,
        config.remote.timeout(),
    );

    match session.submit(sql).await {
        QueryOutcome::Success(table) => {
            print_table(&table);
            Ok(())
        }
        QueryOutcome::Empty => {
            println!("No rows returned");
            Ok(())
        }
        QueryOutcome::Rejected(reason) => Err(anyhow::anyhow!(reason)).context("Query rejected"),
        QueryOutcome::Failed(message) => Err(anyhow::anyhow!(message)).context("Query failed"),
    }
}

/// Loads the dashboard panels and prints each slot.
async fn run_dashboard(gateway: Arc<HttpGateway>) {
    let dashboard = Dashboard::new(gateway);
    dashboard.load_all().await;

    for slot in Slot::ALL {
        println!("{}", slot.title());
        match dashboard.snapshot(slot) {
            SlotState::Loaded(points) => {
                for point in points {
                    println!("  {:<24} {}", point.category, point.value);
                }
            }
            SlotState::NotLoaded => println!("  (not loaded)"),
        }
        println!();
    }
}

/// Prints a normalized table with padded columns.
fn print_table(table: &ResultTable) {
    let names = table.column_names();
    let mut widths: Vec<usize> = names.iter().map(|n| n.len()).collect();

    let mut rendered: Vec<Vec<String>> = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut cells = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let cell = row.cell(name.as_ref()).map(render_cell).unwrap_or_default();
            widths[i] = widths[i].max(cell.len());
            cells.push(cell);
        }
        rendered.push(cells);
    }

    let header: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{:<width$}", n, width = widths[i]))
        .collect();
    println!("{}", header.join("  "));

    for cells in rendered {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }

    println!("({} rows)", table.row_count());
}

/// Renders one cell for terminal output: strings bare, NULL blank.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
