//! nl2sql CLI - Translate English questions into SQL
//!
//! Usage:
//!   nl2sql translate <text> [--dialect <dialect>] [--output <format>] [--check]
//!   nl2sql intent <text>
//!   nl2sql chart <result.json>
//!   nl2sql catalog [--json]
//!
//! Examples:
//!   nl2sql translate "top 5 customers by total sales in 2023"
//!   nl2sql translate "monthly revenue for electronics" --dialect postgres --output verbose
//!   nl2sql chart results.json

use clap::{Parser, Subcommand, ValueEnum};
use nl2sql::catalog::{Catalog, ColumnType, MeasureExpr};
use nl2sql::chart::classify;
use nl2sql::config::Settings;
use nl2sql::exec::ResultSet;
use nl2sql::sql::{validate_sql, Dialect};
use nl2sql::translate::Translator;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nl2sql")]
#[command(about = "nl2sql - Translate analytics questions in English into SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a question to SQL
    Translate {
        /// The question, in English
        text: String,

        /// SQL dialect to generate (defaults to the config file's dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// Parse the generated SQL and fail if it is not a single statement
        #[arg(long)]
        check: bool,
    },

    /// Show the intent extracted from a question
    Intent {
        /// The question, in English
        text: String,
    },

    /// Pick a chart for a JSON result set ({"columns": [...], "rows": [...]})
    Chart {
        /// Path to the result set JSON file
        file: PathBuf,
    },

    /// Describe the built-in schema catalog
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Duckdb,
    Postgres,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL with comments
    Verbose,
    /// Output the full translation as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings);

    let translator = Translator::default().with_options(settings.translate_options());

    match cli.command {
        Commands::Translate {
            text,
            dialect,
            output,
            check,
        } => cmd_translate(translator, &text, dialect, output, check),
        Commands::Intent { text } => cmd_intent(&translator, &text),
        Commands::Chart { file } => cmd_chart(file),
        Commands::Catalog { json } => cmd_catalog(translator.catalog(), json),
    }
}

/// Logs go to stderr so stdout carries only SQL or JSON.
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_translate(
    translator: Translator,
    text: &str,
    dialect: Option<DialectArg>,
    output: OutputFormat,
    check: bool,
) -> ExitCode {
    let mut options = *translator.options();
    if let Some(dialect) = dialect {
        options = options.with_dialect(dialect.into());
    }
    let translator = translator.with_options(options);

    let translation = match translator.translate(text) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Translation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if check {
        if let Err(e) = validate_sql(&translation.query, translation.dialect) {
            eprintln!("Generated SQL failed to parse: {}", e);
            return ExitCode::FAILURE;
        }
        debug!("generated SQL parsed as a single statement");
    }

    match output {
        OutputFormat::Sql => {
            println!("{}", translation.query);
        }
        OutputFormat::Verbose => {
            println!("-- Question: {}", text);
            println!("-- {}", translation.description);
            println!("-- Dialect: {}", translation.dialect);
            println!();
            println!("{}", translation.query);
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&translation) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding translation: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_intent(translator: &Translator, text: &str) -> ExitCode {
    let intent = translator.intent(text);
    match serde_json::to_string_pretty(&intent) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding intent: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_chart(file: PathBuf) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result: ResultSet = match serde_json::from_str(&source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing result set '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let chart = classify(&result.columns, &result.rows);
    if chart.is_none() {
        eprintln!("No chart fits this result shape");
    }
    match serde_json::to_string_pretty(&chart) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding chart: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_catalog(catalog: &Catalog, json: bool) -> ExitCode {
    if json {
        return match serde_json::to_string_pretty(catalog) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error encoding catalog: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("Catalog version {}", catalog.version);
    println!();

    for table in &catalog.tables {
        println!("{} (primary key: {})", table.name, table.primary_key);
        if !table.synonyms.is_empty() {
            println!("  Also called: {}", table.synonyms.join(", "));
        }
        for column in &table.columns {
            let data_type = match column.data_type {
                ColumnType::Numeric => "numeric",
                ColumnType::Text => "text",
                ColumnType::Date => "date",
            };
            print!("  - {} ({})", column.name, data_type);
            if !column.synonyms.is_empty() {
                print!(" [{}]", column.synonyms.join(", "));
            }
            println!();
            if !column.known_values.is_empty() {
                println!("      Values: {}", column.known_values.join(", "));
            }
        }
        println!();
    }

    println!("Joins:");
    for key in &catalog.join_keys {
        println!("  - {} = {}", key.left, key.right);
    }
    println!();

    println!("Measures:");
    for measure in &catalog.measures {
        let expr = match &measure.expr {
            MeasureExpr::Column(c) => format!("{}.{}", measure.table, c),
            MeasureExpr::Product(a, b) => {
                format!("{}.{} * {}.{}", measure.table, a, measure.table, b)
            }
        };
        println!(
            "  - {} = {} (default: {})",
            measure.name,
            expr,
            measure.default_aggregate.sql_name()
        );
    }

    ExitCode::SUCCESS
}
