//! Orgguard CLI - inspect role permissions and evaluate authorization checks.
//!
//! Provides commands to check a single permission, print the role matrix, and
//! list roles and guarded operations.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use orgguard_core::config::Config;
use orgguard_core::rbac::PolicyEngine;
use orgguard_core::telemetry::init_logging;

use commands::{check, matrix, operations, roles};
use output::OutputFormat;

/// Exit status for a denied check.
const EXIT_DENIED: i32 = 2;

/// Orgguard - organization role-based authorization
#[derive(Parser)]
#[command(
    name = "orgguard",
    version,
    about = "Orgguard - organization role-based authorization",
    long_about = "CLI tool for evaluating role permissions of organization members.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "ORGGUARD_CONFIG")]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one permission for a user and role
    Check(check::CheckArgs),

    /// Print the permission matrix of every role
    Matrix(matrix::MatrixArgs),

    /// List roles and their descriptions
    Roles,

    /// List guarded organization operations
    Operations,
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::from_file(path).with_context(|| format!("Failed to load config from {path}"))
        }
        None => Config::load().context("Failed to load config from environment"),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_logging(&config.logging)?;

    let engine = PolicyEngine::with_config(config.authorization.clone());
    let format = cli.output;

    let result = match cli.command {
        Commands::Check(args) => check::execute(args, &engine, format).map(|allowed| {
            if !allowed {
                std::process::exit(EXIT_DENIED);
            }
        }),
        Commands::Matrix(args) => matrix::execute(args, &engine, format),
        Commands::Roles => roles::execute(&engine, format),
        Commands::Operations => operations::execute(format),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
