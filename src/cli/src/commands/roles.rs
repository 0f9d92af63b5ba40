//! Role listing command.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use orgguard_core::rbac::{PolicyEngine, Role};

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Granted")]
    granted: usize,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn execute(engine: &PolicyEngine, format: OutputFormat) -> Result<()> {
    let rows: Vec<RoleRow> = Role::ALL
        .into_iter()
        .map(|role| RoleRow {
            role: role.to_string(),
            name: role.name().to_string(),
            granted: engine.rule_table(role).granted().len(),
            description: role.description().to_string(),
        })
        .collect();

    output::print_list(&rows, format)
}
