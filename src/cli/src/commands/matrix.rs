//! Permission matrix command.
//!
//! Prints one row per `Kind:action` pair and one column per role.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use orgguard_core::rbac::{Permission, PolicyEngine, Role};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct MatrixArgs {
    /// Include actions that do not apply to a kind (always denied)
    #[arg(short, long)]
    all: bool,

    /// Only show permissions this role may be granted
    #[arg(short, long)]
    role: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct MatrixRow {
    #[tabled(rename = "Permission")]
    permission: String,
    #[tabled(rename = "ADMIN")]
    admin: String,
    #[tabled(rename = "MEMBER")]
    member: String,
    #[tabled(rename = "BILLING")]
    billing: String,
}

pub fn execute(args: MatrixArgs, engine: &PolicyEngine, format: OutputFormat) -> Result<()> {
    let only: Option<Role> = args.role.as_deref().map(str::parse::<Role>).transpose()?;

    let admin = engine.rule_table(Role::Admin);
    let member = engine.rule_table(Role::Member);
    let billing = engine.rule_table(Role::Billing);

    let rows: Vec<MatrixRow> = admin
        .iter()
        .map(|(permission, _)| permission)
        .filter(|permission: &Permission| args.all || permission.is_applicable())
        .filter(|permission| match only {
            Some(role) => engine.rule_table(role).rule(permission).may_allow(),
            None => true,
        })
        .map(|permission| MatrixRow {
            permission: permission.to_string(),
            admin: admin.rule(&permission).to_string(),
            member: member.rule(&permission).to_string(),
            billing: billing.rule(&permission).to_string(),
        })
        .collect();

    output::print_list(&rows, format)
}
