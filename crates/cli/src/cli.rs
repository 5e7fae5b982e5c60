//! Command definitions and their handlers.

use std::fs;
use std::path::PathBuf;

use apigen_core::{GenError, GenerationReport};
use clap::{Args, Parser, Subcommand};
use console::style;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError, RunPlan};
use crate::sink::DirectorySink;

#[derive(Parser, Debug)]
#[command(
    name = "apigen",
    version,
    about = "Generate typed API clients and React Query hooks from OpenAPI documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate types, request functions and hooks
    Generate(GenerateArgs),
    /// List known profiles and their tag filters
    Profiles(ProfilesArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// API document to read (defaults to the config's input, then swagger.json)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output directories as key:path pairs, comma separated
    #[arg(long = "output-dirs", value_name = "KEY:PATH[,KEY:PATH...]")]
    pub output_dirs: Option<String>,

    /// Profile to generate for; enables its tag filter
    #[arg(long, value_name = "PROFILE")]
    pub project: Option<String>,

    /// Explicit tag allow-list, overriding the profile's
    #[arg(long, value_delimiter = ',', value_name = "TAG[,TAG...]")]
    pub tags: Option<Vec<String>>,

    /// Config file (defaults to ./apigen.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfilesArgs {
    /// Config file (defaults to ./apigen.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Anything that stops a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generate(#[from] GenError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(err) => err.exit_code(),
            Self::Input { .. } => 3,
            Self::Generate(err) => err.exit_code(),
        }
    }
}

fn report_error(err: &CliError) -> i32 {
    eprintln!("{} {err}", style("error:").red().bold());
    err.exit_code()
}

pub fn run_generate(args: &GenerateArgs) -> i32 {
    let plan = match Config::load(args.config.as_deref()).and_then(|config| config.plan(args)) {
        Ok(plan) => plan,
        Err(err) => return report_error(&err.into()),
    };

    let mut sink = DirectorySink::new(&plan.output_dir);
    let result = generate(&plan, &mut sink);

    for path in sink.written() {
        println!("{} {}", style("Generated").green(), path.display());
    }

    match result {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("{} {diagnostic}", style("warning:").yellow().bold());
            }
            println!("{}", style("API code generation completed!").green().bold());
            0
        }
        Err(err) => report_error(&err),
    }
}

fn generate(plan: &RunPlan, sink: &mut DirectorySink) -> Result<GenerationReport, CliError> {
    let json = fs::read_to_string(&plan.input).map_err(|source| CliError::Input {
        path: plan.input.clone(),
        source,
    })?;
    debug!(input = %plan.input.display(), bytes = json.len(), "read API document");

    let filter = plan
        .profile
        .allowed_tags
        .as_ref()
        .map_or_else(|| "none".to_string(), |tags| tags.join(", "));
    info!(
        project = %plan.profile.name,
        tag_filter = %filter,
        output_dir = %plan.output_dir.display(),
        "starting API code generation"
    );

    Ok(apigen_core::generate(&json, &plan.profile, sink)?)
}

pub fn run_profiles(args: &ProfilesArgs) -> i32 {
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report_error(&err.into()),
    };

    for name in config.profile_names() {
        let tags = config.profile_tags(&name).unwrap_or_default();
        let output = config
            .profiles
            .get(&name)
            .and_then(|p| p.output_dir.as_ref())
            .map(|dir| format!(" -> {}", dir.display()))
            .unwrap_or_default();
        println!("{}{output}", style(&name).cyan().bold());
        println!("  tags: {}", if tags.is_empty() { "-".to_string() } else { tags.join(", ") });
    }
    0
}
