//! Command-line interface for discharge-scribe.
//!
//! Usage:
//!   discharge-scribe plan `<snapshot>` `<payload>` [--grid labs] [--anchor `<marker>`]  - Print the sequenced batch for one grid
//!   discharge-scribe fill `<snapshot>` `<response>` --out `<path>` [--tag Pro]          - Fill a template snapshot from a model response
//!   discharge-scribe template [--columns 7] [--out `<path>`]                             - Emit a blank template snapshot

use std::fs;
use std::path::{Path, PathBuf};

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgMatches, Command};
use serde_json::{json, Value};
use thiserror::Error;

use discharge_scribe::config::ScribeConfig;
use discharge_scribe::document::Document;
use discharge_scribe::grid::{plan_grid_fill, AnchorCleanup, GridPayload, PayloadError};
use discharge_scribe::pipeline::{build_template, DischargeFiller, PipelineError};
use discharge_scribe::profiles::Department;
use discharge_scribe::store::{DocumentStore, InMemoryDocumentStore, StoreError};

#[derive(Error, Debug)]
enum CliError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Grid payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Usage(String),
}

fn main() {
    discharge_scribe::init_tracing();

    let department_arg = || {
        Arg::new("department")
            .long("department")
            .short('d')
            .help("Department profile")
            .value_parser(PossibleValuesParser::new(Department::NAMES.iter().copied()))
            .default_value("medicine")
    };
    let cleanup_arg = || {
        Arg::new("cleanup")
            .long("cleanup")
            .help("Anchor cleanup mode, overrides SCRIBE_ANCHOR_CLEANUP")
            .value_parser(["scoped", "global"])
    };

    let matches = Command::new("discharge-scribe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fills discharge summary templates and their lab grids")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Print the sequenced edit batch for one grid")
                .arg(
                    Arg::new("snapshot")
                        .help("Document snapshot JSON")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("payload")
                        .help("Grid payload JSON (date -> test -> value)")
                        .required(true)
                        .index(2),
                )
                .arg(department_arg())
                .arg(
                    Arg::new("grid")
                        .long("grid")
                        .short('g')
                        .help("Grid name within the department profile")
                        .default_value("labs"),
                )
                .arg(
                    Arg::new("anchor")
                        .long("anchor")
                        .help("Override the grid's anchor marker"),
                )
                .arg(cleanup_arg()),
        )
        .subcommand(
            Command::new("fill")
                .about("Fill a template snapshot from a model response")
                .arg(
                    Arg::new("snapshot")
                        .help("Template snapshot JSON")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("response")
                        .help("Raw model response text")
                        .required(true)
                        .index(2),
                )
                .arg(department_arg())
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .help("Tag appended to the summary title")
                        .default_value("Pro"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Where to write the filled snapshot")
                        .required(true),
                )
                .arg(cleanup_arg()),
        )
        .subcommand(
            Command::new("template")
                .about("Emit a blank template snapshot")
                .arg(department_arg())
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .short('c')
                        .help("Date columns per grid")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("7"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output path (stdout when omitted)"),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("plan", m)) => handle_plan_command(m),
        Some(("fill", m)) => handle_fill_command(m),
        Some(("template", m)) => handle_template_command(m),
        _ => Err(CliError::Usage("unknown command".into())),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Handle the plan command
fn handle_plan_command(m: &ArgMatches) -> Result<(), CliError> {
    let department = department(m)?;
    let grid_name = string_arg(m, "grid")?;
    let Some(grid) = department.grids().iter().find(|g| g.name == grid_name) else {
        let msg = format!("{department} has no grid named '{grid_name}'");
        return Err(CliError::Usage(msg));
    };
    let anchor_override = m.get_one::<String>("anchor");
    let anchor = anchor_override.map(String::as_str).unwrap_or(grid.anchor);

    let doc: Document = read_json(Path::new(string_arg(m, "snapshot")?))?;
    let payload: Value = read_json(Path::new(string_arg(m, "payload")?))?;
    let data = GridPayload::from_value(payload)?.into_lab_data()?;

    let cleanup = config(m).anchor_cleanup;
    let plan = plan_grid_fill(&doc, anchor, &data, grid.test_order, cleanup);
    tracing::info!(
        grid = grid.name,
        headers = plan.diagnostics.header_inserts,
        values = plan.diagnostics.value_inserts,
        skipped = plan.diagnostics.skipped.len(),
        "Plan ready"
    );
    let body = json!({ "requests": plan.requests });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Handle the fill command
fn handle_fill_command(m: &ArgMatches) -> Result<(), CliError> {
    let department = department(m)?;
    let template: Document = read_json(Path::new(string_arg(m, "snapshot")?))?;
    let response_path = PathBuf::from(string_arg(m, "response")?);
    let response = fs::read_to_string(&response_path).map_err(|source| CliError::Io {
        path: response_path,
        source,
    })?;

    let mut store = InMemoryDocumentStore::new();
    let template_id = store.insert(template);
    let mut filler = DischargeFiller::new(Box::new(store), department, config(m));
    let report = filler.fill_from_template(&template_id, &response, string_arg(m, "tag")?)?;

    let filled = filler.store().fetch(&report.document_id)?;
    write_json(Path::new(string_arg(m, "out")?), &filled)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Handle the template command
fn handle_template_command(m: &ArgMatches) -> Result<(), CliError> {
    let columns = m.get_one::<usize>("columns").copied().unwrap_or(7);
    let template = build_template(department(m)?, columns);
    match m.get_one::<String>("out") {
        Some(path) => write_json(Path::new(path), &template),
        None => {
            println!("{}", serde_json::to_string_pretty(&template)?);
            Ok(())
        }
    }
}

fn string_arg<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str, CliError> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing argument {name}")))
}

fn department(m: &ArgMatches) -> Result<Department, CliError> {
    let raw = string_arg(m, "department")?;
    Department::from_str(raw).ok_or_else(|| CliError::Usage(format!("unknown department {raw}")))
}

/// Environment settings, with `--cleanup` taking precedence.
fn config(m: &ArgMatches) -> ScribeConfig {
    let mut config = ScribeConfig::from_env();
    let cleanup = m.try_get_one::<String>("cleanup").ok().flatten();
    if let Some(mode) = cleanup.and_then(|raw| AnchorCleanup::from_str(raw)) {
        config.anchor_cleanup = mode;
    }
    config
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
