use crate::{
    error::CliError,
    output::{CheckReport, CheckedStatement, RenderReport},
};
use binding::{DialectKind, ParamStore};
use clap::Parser;
use commands::Commands;
use engine_core::{Configuration, MapperSession, Settings, load_configuration};
use model::core::value::Value;
use std::{path::Path, str::FromStr, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "mapper", version = "0.1.0", about = "Dynamic SQL mapper tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            mapper,
            statement,
            params,
            dialect,
            settings,
            output,
        } => {
            let config = load(&mapper, settings.as_deref())?;
            let argument = parse_argument(params.as_deref())?;
            let json = render(config, &statement, &argument, &dialect)?;
            output::emit(&json, output.as_deref())?;
        }
        Commands::Check { mapper, settings } => {
            let config = load(&mapper, settings.as_deref())?;
            info!("Checked {} mapper file(s)", mapper.len());
            println!("{}", check(&config)?);
        }
    }

    Ok(())
}

fn load(mappers: &[String], settings: Option<&str>) -> Result<Arc<Configuration>, CliError> {
    let settings = match settings {
        Some(path) => Settings::load(Path::new(path))?,
        None => Settings::default(),
    };
    Ok(load_configuration(settings, mappers)?)
}

fn parse_argument(params: Option<&str>) -> Result<Value, CliError> {
    match params {
        Some(json) => Ok(Value::from_json(serde_json::from_str(json)?)),
        None => Ok(Value::Null),
    }
}

fn render(config: Arc<Configuration>, statement: &str, argument: &Value, dialect: &str) -> Result<String, CliError> {
    let dialect = DialectKind::from_str(dialect).map_err(|_| CliError::InvalidDialect(dialect.to_string()))?;
    let session = MapperSession::new(config);

    let mut store = ParamStore::new();
    let bound = session.prepare(statement, argument, &mut store)?;
    let sql = bound.sql_for(dialect.dialect().as_ref());

    output::to_json(&RenderReport::new(statement, sql, &bound, &store))
}

fn check(config: &Configuration) -> Result<String, CliError> {
    let mut statements = Vec::new();
    for id in config.statement_ids() {
        let statement = config.statement(id)?;
        statements.push(CheckedStatement {
            id: statement.id.clone(),
            kind: statement.command.to_string(),
            dynamic: statement.source.is_dynamic(),
        });
    }
    output::to_json(&CheckReport { statements })
}
