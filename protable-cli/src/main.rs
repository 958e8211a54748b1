mod cli;
mod print;
mod source;

use std::fs;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use protable_lib::intl::IntlMap;
use protable_lib::model::ColumnSpec;
use protable_lib::model::Record;
use protable_lib::model::Value;
use protable_lib::table::ProTable;
use protable_lib::table::TableConfig;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let columns = ColumnSpec::list_from_json_str(&read(&cli.columns)?)
        .with_context(|| format!("Invalid columns in {}", cli.columns.display()))?;
    let rows: Vec<Record> = serde_json::from_str(&read(&cli.rows)?)
        .with_context(|| format!("Invalid rows in {}", cli.rows.display()))?;
    let mut config = match &cli.config {
        Some(path) => TableConfig::from_json_str(&read(path)?)
            .with_context(|| format!("Invalid config in {}", path.display()))?,
        None => TableConfig::default(),
    };
    if let Some(formatter) = cli.date_formatter {
        config = config.with_date_formatter(formatter.into());
    }
    log::info!("Loaded {} columns and {} rows", columns.len(), rows.len());

    let mut table = ProTable::builder(columns)
        .with_config(config)
        .with_request(source::local_source(rows))
        .with_intl(IntlMap::for_locale(cli.locale.code()))
        .build();
    table.settled().await;

    if !cli.search.is_empty() {
        let form = table
            .search_form_mut()
            .context("Search is disabled for this table")?;
        for (key, text) in &cli.search {
            form.set_value(key, search_value(text));
        }
        table.submit_search().context("Search values are invalid")?;
        table.settled().await;
    }

    let page_size = cli
        .page_size
        .or_else(|| table.pagination().map(|view| view.page_size));
    if let Some(page_size) = page_size {
        table.change_page(cli.page, page_size);
        table.settled().await;
    }

    print!("{}", print::table_text(&table));
    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = LevelFilter::from(cli.log_level);
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// JSON when it parses (numbers, lists, booleans), otherwise the raw text.
fn search_value(text: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(text))
}
