//! Minimal CLI: inspect the schema tables, coerce values, normalize vars maps.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};

use cog_vars::brain::brain_property_defaults;
use cog_vars::definition::VariableDefinition;
use cog_vars::loader::{load_definitions, DocumentSource};
use cog_vars::normalize::normalize_vars_map;
use cog_vars::predefined::{
    predefined_name_for_key, predefined_variable, predefined_variable_name_for_id,
    PredefinedVariableName, PREDEFINED_VARIABLES,
};
use cog_vars::variables::{variable_type_defaults, VariableType};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// inspect variable/brain schema tables and coerce untyped variable values
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log verbosity (error, warn, info, debug, trace); logs go to stderr
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print every variable kind with its default value
    Kinds,
    /// print the predefined variable table, or look up one entry
    Predefined(PredefinedQuery),
    /// coerce a single value to a variable kind
    Coerce(CoerceArgs),
    /// coerce every entry of one or more raw vars maps
    Normalize(NormalizeOut),
    /// print the brain (project metadata) property defaults
    Brain,
}

#[derive(Args, Debug)]
struct PredefinedQuery {
    /// look up by id (e.g. -2)
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["name", "key"])]
    id: Option<i64>,

    /// look up by name (e.g. score)
    #[arg(long, conflicts_with = "key")]
    name: Option<String>,

    /// look up a vars-map key, which may be an id or a name
    #[arg(long, allow_hyphen_values = true)]
    key: Option<String>,
}

#[derive(Args, Debug)]
struct CoerceArgs {
    /// target kind: number, boolean or string
    #[arg(long)]
    kind: String,

    /// JSON value; text that is not valid JSON is taken as a string.
    /// Omit to coerce an absent value.
    #[arg(allow_hyphen_values = true)]
    value: Option<String>,

    /// print the textual form instead of JSON (shows NaN)
    #[arg(long)]
    text: bool,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the vars map in each document (e.g. /project/vars)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON array of variable definitions declaring each variable's kind
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// add the default value of every defined variable missing from a map
    #[arg(long)]
    fill_defaults: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn source(&self) -> DocumentSource {
        DocumentSource {
            inputs: self.input.clone(),
            json_pointer: self.json_pointer.clone(),
            jq_expr: self.jq_expr.clone(),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Kinds => {
                let table: Map<String, Value> = variable_type_defaults()
                    .map(|(k, d)| (k.as_str().to_string(), d.to_json()))
                    .collect();
                print_json(&table)
            }
            Command::Predefined(query) => run_predefined(query),
            Command::Coerce(args) => run_coerce(args),
            Command::Normalize(target) => run_normalize(target),
            Command::Brain => {
                let table: Map<String, Value> = brain_property_defaults()
                    .map(|(p, d)| (p.as_str().to_string(), d.to_json()))
                    .collect();
                print_json(&table)
            }
        }
    }
}

fn run_predefined(query: &PredefinedQuery) -> Result<()> {
    let (label, hit) = match (&query.id, &query.name, &query.key) {
        (Some(id), _, _) => (id.to_string(), predefined_variable_name_for_id(*id)),
        (_, Some(name), _) => (name.clone(), PredefinedVariableName::parse(name)),
        (_, _, Some(key)) => (key.clone(), predefined_name_for_key(key)),
        (None, None, None) => return print_json(&PREDEFINED_VARIABLES),
    };
    match hit {
        Some(name) => print_json(predefined_variable(name)),
        None => {
            eprintln!(
                "{} `{label}` is not predefined (user-defined or global variable)",
                "note:".yellow().bold()
            );
            Ok(())
        }
    }
}

fn run_coerce(args: &CoerceArgs) -> Result<()> {
    let kind: VariableType = args.kind.parse()?;
    let value = args
        .value
        .as_ref()
        .map(|raw| serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone())));
    let coerced = cog_vars::convert_var_value_to_type(value.as_ref(), kind);
    if args.text {
        println!("{coerced}");
        Ok(())
    } else {
        print_json(&coerced)
    }
}

fn run_normalize(target: &NormalizeOut) -> Result<()> {
    let definitions: Vec<VariableDefinition> = match target.definitions.as_deref() {
        Some(path) => load_definitions(path)?,
        None => Vec::new(),
    };
    let documents = target.input_settings.source().load()?;

    let mut results = Vec::with_capacity(documents.len());
    let mut unknown = 0usize;
    for doc in &documents {
        let mut normalized = normalize_vars_map(doc.as_vars_object()?, &definitions);
        if target.fill_defaults {
            normalized.fill_defaults(&definitions);
        }
        unknown += normalized.unknown_keys.len();
        let mut row = serde_json::to_value(&normalized)?;
        if let Value::Object(obj) = &mut row {
            obj.insert("file".to_string(), Value::String(doc.file.clone()));
        }
        results.push(row);
    }

    let src = serde_json::to_string_pretty(&results)?;
    match target.out.as_deref() {
        Some(out) => write_file(out, &src)?,
        None => println!("{src}"),
    }

    let summary = format!("normalized {} document(s)", documents.len());
    if unknown > 0 {
        eprintln!("{} {summary}, {unknown} unknown key(s) dropped", "warning:".yellow().bold());
    } else {
        eprintln!("{} {summary}", "ok:".green().bold());
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_file(out: &Path, src: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
