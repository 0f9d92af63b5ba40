//! Permission check command.
//!
//! Evaluates one `Kind:action` permission for a user and role, optionally
//! against a resource instance given as JSON, e.g.
//! `{"__typename":"Project","id":"p1","ownerId":"user-1"}`.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use orgguard_core::rbac::{Permission, PolicyDecision, PolicyEngine, Resource, Subject, Target};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Permission to check, e.g. Project:delete
    permission: String,

    /// Role of the user in the organization (ADMIN, OWNER, MEMBER, BILLING)
    #[arg(short, long)]
    role: String,

    /// Acting user id
    #[arg(short, long, default_value = "cli-user")]
    user: String,

    /// Resource instance as JSON, needed for ownership rules
    #[arg(long)]
    resource: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    user: String,
    role: String,
    permission: String,
    instance: bool,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Run the check and report whether it was allowed.
pub fn execute(args: CheckArgs, engine: &PolicyEngine, format: OutputFormat) -> Result<bool> {
    let permission = Permission::parse(&args.permission)?;
    let perms = engine.permissions_for(args.user.as_str(), &args.role)?;

    let resource: Option<Resource> = args
        .resource
        .as_deref()
        .map(serde_json::from_str::<Resource>)
        .transpose()
        .context("Failed to parse --resource JSON")?;

    let target = match &resource {
        Some(r) if r.kind() != permission.kind => {
            bail!(
                "Resource is a {} but the permission targets {}",
                r.kind(),
                permission.kind
            )
        }
        Some(r) => Target::Instance(r),
        None => Target::Kind(permission.kind),
    };

    let decision = perms.decide(permission.action, target);
    let subject: &Subject = perms.subject();

    let result = CheckResult {
        user: subject.id.to_string(),
        role: subject.role.to_string(),
        permission: permission.to_string(),
        instance: resource.is_some(),
        allowed: decision.is_allowed(),
        reason: match &decision {
            PolicyDecision::Allow => None,
            PolicyDecision::Deny(reason) => Some(reason.clone()),
        },
    };

    match format {
        OutputFormat::Table => {
            output::print_header("Permission Check");
            output::print_detail("User", &result.user);
            output::print_detail("Role", &result.role);
            output::print_detail("Permission", &result.permission);
            output::print_detail("Rule", &perms.table().rule(&permission).to_string());
            println!();
            match &decision {
                PolicyDecision::Allow => output::print_success(&format!(
                    "{} may {} {}",
                    result.user, permission.action, permission.kind
                )),
                PolicyDecision::Deny(reason) => output::print_denied(reason),
            }
        }
        _ => output::print_item(&result, format)?,
    }

    Ok(result.allowed)
}
