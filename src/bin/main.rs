//! sqlcompose CLI - Compile query compositions to SQL
//!
//! Usage:
//!   sqlcompose compose <query.json> [--schema <schema>] [--params <overrides.json>] [--dialect <dialect>] [--bind]
//!   sqlcompose validate <query.json>
//!   sqlcompose sample <query.json>
//!
//! Examples:
//!   sqlcompose compose spend.json --schema acme
//!   sqlcompose compose spend.json --schema acme --params last_week.json --bind
//!   sqlcompose validate spend.json

use clap::{Parser, Subcommand, ValueEnum};
use sqlcompose::compiler::CompileOptions;
use sqlcompose::composer::Composer;
use sqlcompose::config::Settings;
use sqlcompose::model::{ParameterOverrides, SqlQuery};
use sqlcompose::sql::Dialect;
use sqlcompose::validation;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlcompose")]
#[command(about = "Compile declarative query compositions to SQL")]
#[command(version)]
struct Cli {
    /// Path to a sqlcompose.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a stored query document to SQL
    Compose {
        /// Path to the query document (.json)
        file: PathBuf,

        /// Schema that qualifies the table (falls back to the composition's own)
        #[arg(short, long)]
        schema: Option<String>,

        /// Path to parameter overrides (.json)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// SQL dialect to generate (overrides the config file)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Emit JSON with string literals bound as $n parameters
        #[arg(short, long)]
        bind: bool,
    },

    /// Validate a query document without generating SQL
    Validate {
        /// Path to the query document (.json)
        file: PathBuf,
    },

    /// Render a query against the sample schema
    Sample {
        /// Path to the query document (.json)
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Legacy,
    Postgres,
    Redshift,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Legacy => Dialect::Legacy,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Redshift => Dialect::Redshift,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&settings.logging.filter);

    let options = match settings.compile_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compose {
            file,
            schema,
            params,
            dialect,
            bind,
        } => {
            let options = match dialect {
                Some(d) => options.with_dialect(d.into()),
                None => options,
            };
            cmd_compose(&file, schema.as_deref(), params.as_deref(), options, bind)
        }
        Commands::Validate { file } => cmd_validate(&file, options.max_depth),
        Commands::Sample { file } => cmd_sample(&file, options),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_file(file: &Path) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            None
        }
    }
}

fn load_query(file: &Path, max_depth: usize) -> Option<SqlQuery> {
    let source = read_file(file)?;
    match SqlQuery::from_json_with_depth(&source, max_depth) {
        Ok(query) => Some(query),
        Err(errors) => {
            eprintln!("Validation errors:");
            for error in &errors {
                eprintln!("  {}", error);
            }
            None
        }
    }
}

fn load_overrides(file: &Path, max_depth: usize) -> Option<ParameterOverrides> {
    let source = read_file(file)?;
    let overrides: ParameterOverrides = match serde_json::from_str(&source) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid parameters in '{}': {}", file.display(), e);
            return None;
        }
    };
    if let Err(errors) = validation::validate_overrides(&overrides, max_depth) {
        eprintln!("Invalid parameters: {}", validation::summarize(&errors));
        return None;
    }
    Some(overrides)
}

fn cmd_compose(
    file: &Path,
    schema: Option<&str>,
    params: Option<&Path>,
    options: CompileOptions,
    bind: bool,
) -> ExitCode {
    let Some(query) = load_query(file, options.max_depth) else {
        return ExitCode::FAILURE;
    };
    let overrides = match params {
        Some(path) => match load_overrides(path, options.max_depth) {
            Some(o) => o,
            None => return ExitCode::FAILURE,
        },
        None => ParameterOverrides::default(),
    };

    let composer = Composer::new(options);
    if bind {
        let bound = match composer.compose_bound(&query, schema, &overrides) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        match serde_json::to_string_pretty(&bound) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode output: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    match composer.compose(&query, schema, &overrides) {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(file: &Path, max_depth: usize) -> ExitCode {
    if load_query(file, max_depth).is_none() {
        return ExitCode::FAILURE;
    }
    println!("OK: {} is valid", file.display());
    ExitCode::SUCCESS
}

fn cmd_sample(file: &Path, options: CompileOptions) -> ExitCode {
    let Some(query) = load_query(file, options.max_depth) else {
        return ExitCode::FAILURE;
    };
    let composer = Composer::new(options);
    match composer.compose(
        &query,
        Some(sqlcompose::composer::SAMPLE_SCHEMA),
        &ParameterOverrides::default(),
    ) {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
