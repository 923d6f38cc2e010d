//! Logsub CLI
//!
//! Offline driver for the synthesis engine: reads a compiled template and a
//! service definition from disk, runs one pass and renders the result.
//! The deployment state comes from the command line instead of a live
//! stack lookup.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use logsub_config::{unit_override_schema, ServiceDefinition};
use logsub_core::{AwsNaming, EngineOptions, StaticStackQuery, SynthesisEngine, SynthesisReport};
use logsub_template::Template;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Arguments of `logsub synth`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthArgs {
    /// Compiled template JSON
    pub template: PathBuf,
    /// Service definition, YAML or JSON
    pub service: PathBuf,
    /// Stage override
    pub stage: Option<String>,
    /// Region override
    pub region: Option<String>,
    /// Build instance id; random when unset
    pub instance_id: Option<String>,
    /// Whether the stack already exists
    pub deployed: bool,
    /// Pretty-print the output
    pub pretty: bool,
}

impl SynthArgs {
    /// Arguments for a template and service file, first deploy, compact output
    #[must_use]
    pub fn new(template: impl Into<PathBuf>, service: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            service: service.into(),
            stage: None,
            region: None,
            instance_id: None,
            deployed: false,
            pretty: false,
        }
    }

    /// Read from parsed `synth` matches
    #[must_use]
    pub fn from_matches(args: &ArgMatches) -> Self {
        let string = |id: &str| args.get_one::<String>(id).cloned();
        Self {
            template: args.get_one::<PathBuf>("template").cloned().unwrap_or_default(),
            service: args.get_one::<PathBuf>("service").cloned().unwrap_or_default(),
            stage: string("stage"),
            region: string("region"),
            instance_id: string("instance-id"),
            deployed: args.get_flag("deployed"),
            pretty: args.get_flag("pretty"),
        }
    }
}

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    Command::new("logsub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Synthesize CloudWatch Logs subscriptions into a compiled template")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("synth")
                .about("Add log subscriptions to a compiled template and print it")
                .arg(
                    Arg::new("template")
                        .long("template")
                        .short('t')
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Compiled template JSON"),
                )
                .arg(
                    Arg::new("service")
                        .long("service")
                        .short('s')
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Service definition (YAML or JSON)"),
                )
                .arg(
                    Arg::new("stage")
                        .long("stage")
                        .help("Stage, overrides provider.stage"),
                )
                .arg(
                    Arg::new("region")
                        .long("region")
                        .help("Region, overrides provider.region"),
                )
                .arg(
                    Arg::new("instance-id")
                        .long("instance-id")
                        .help("Build instance id used for the gateway deployment id"),
                )
                .arg(
                    Arg::new("deployed")
                        .long("deployed")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("first-deploy")
                        .help("The stack already exists"),
                )
                .arg(
                    Arg::new("first-deploy")
                        .long("first-deploy")
                        .action(ArgAction::SetTrue)
                        .help("The stack has never been deployed (default)"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the template"),
                ),
        )
        .subcommand(
            Command::new("schema").about("Print the JSON schema of a function's logSubscription"),
        )
}

/// Load a service definition, choosing the format by extension
///
/// # Errors
/// Returns error if the file cannot be read or decoded
pub fn load_service(path: &Path) -> Result<ServiceDefinition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read service definition {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let service = if is_json {
        ServiceDefinition::from_json(&text)
    } else {
        ServiceDefinition::from_yaml(&text)
    };
    service.with_context(|| format!("invalid service definition {}", path.display()))
}

/// Load a compiled template
///
/// # Errors
/// Returns error if the file cannot be read or is not a template
pub fn load_template(path: &Path) -> Result<Template> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template {}", path.display()))?;
    Template::from_json(&text).with_context(|| format!("invalid template {}", path.display()))
}

/// Run one synthesis pass and return the rendered template
///
/// # Errors
/// Returns error if an input cannot be loaded or synthesis fails
pub async fn synth(args: &SynthArgs) -> Result<(String, SynthesisReport)> {
    let service = load_service(&args.service)?;
    let mut template = load_template(&args.template)?;

    let stage = args
        .stage
        .clone()
        .unwrap_or_else(|| service.stage().to_string());
    let instance_id = args
        .instance_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let mut options = EngineOptions::new(instance_id).with_stage(stage.clone());
    if let Some(region) = &args.region {
        options = options.with_region(region.clone());
    }

    let query = if args.deployed {
        StaticStackQuery::deployed()
    } else {
        StaticStackQuery::first_deploy()
    };
    let engine = SynthesisEngine::new(Arc::new(AwsNaming::new(service.service.clone(), stage)), Arc::new(query))
        .with_options(options);

    let report = engine
        .synthesize_template(&mut template, &service)
        .await
        .context("log subscription synthesis failed")?;
    info!(resources_added = report.resources_added, "Template updated");

    let rendered = template.to_json(args.pretty)?;
    Ok((rendered, report))
}

/// Pretty-printed JSON schema of the per-function override
///
/// # Errors
/// Returns error if the schema cannot be serialized
pub fn schema() -> Result<String> {
    Ok(serde_json::to_string_pretty(&unit_override_schema())?)
}

/// Install the stderr tracing subscriber, `RUST_LOG` or `info`
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
