//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use protable_lib::search::DateFormatter;
use simplelog::LevelFilter;

#[derive(Parser)]
#[command(
    name = "protable",
    version,
    about = "Render one page of a data table from JSON column specs and rows"
)]
pub struct Cli {
    /// JSON array of column specs.
    #[arg(long, value_name = "PATH")]
    pub columns: PathBuf,

    /// JSON array of row objects.
    #[arg(long, value_name = "PATH")]
    pub rows: PathBuf,

    /// Table configuration (camelCase JSON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page to show, 1-based.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (overrides the config).
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Search value as KEY=VALUE; VALUE is parsed as JSON when possible.
    #[arg(long = "search", value_name = "KEY=VALUE", value_parser = parse_search)]
    pub search: Vec<(String, String)>,

    /// How date search values are sent.
    #[arg(long = "date-formatter", value_enum)]
    pub date_formatter: Option<DateFormatterArg>,

    /// Language of table texts.
    #[arg(long, value_enum, default_value = "en")]
    pub locale: LocaleArg,

    #[arg(long = "log-level", value_enum, default_value = "warn")]
    pub log_level: LogLevelArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_search(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DateFormatterArg {
    String,
    Number,
    Off,
}

impl From<DateFormatterArg> for DateFormatter {
    fn from(arg: DateFormatterArg) -> Self {
        match arg {
            DateFormatterArg::String => DateFormatter::String,
            DateFormatterArg::Number => DateFormatter::Number,
            DateFormatterArg::Off => DateFormatter::Off,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    En,
    Zh,
}

impl LocaleArg {
    pub fn code(self) -> &'static str {
        match self {
            LocaleArg::En => "en_US",
            LocaleArg::Zh => "zh_CN",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}
