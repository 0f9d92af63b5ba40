//! Guarded operation listing command.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use orgguard_core::rbac::Operation;

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct OperationRow {
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Requires")]
    permission: String,
    #[tabled(rename = "Instance")]
    instance: bool,
    #[tabled(rename = "Denial message")]
    message: String,
}

pub fn execute(format: OutputFormat) -> Result<()> {
    let rows: Vec<OperationRow> = Operation::ALL
        .into_iter()
        .map(|op| OperationRow {
            operation: op.to_string(),
            permission: op.permission().to_string(),
            instance: op.targets_instance(),
            message: op.denial_message().to_string(),
        })
        .collect();

    output::print_list(&rows, format)
}
