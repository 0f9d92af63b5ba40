//! Role-Based Access Control (RBAC) for organization-scoped multi-tenancy.
//!
//! This module provides:
//! - **Models**: Role, Action, Resource, Subject and Permission types
//! - **Roles**: The static rule table for each role, including ownership conditions
//! - **Policy Engine**: Evaluates whether a subject can perform an action on a resource
//! - **Guards**: Named API operations with their required permission and denial message
//!
//! # Usage
//!
//! ```rust
//! use orgguard_core::rbac::{build_permissions, Action, Resource, ResourceKind};
//!
//! let perms = build_permissions("user-1", "MEMBER").unwrap();
//!
//! assert!(perms.can(Action::Create, ResourceKind::Project));
//! assert!(perms.can(Action::Delete, &Resource::project("p1", "user-1")));
//! assert!(perms.cannot(Action::Delete, &Resource::project("p2", "user-2")));
//! assert!(perms.cannot(Action::Get, ResourceKind::Billing));
//! ```

pub mod guard;
pub mod models;
pub mod policy;
pub mod roles;

pub use guard::{ensure_invite_recipient, Membership, Operation};
pub use models::{
    Action, OrganizationId, Permission, Resource, ResourceKind, Role, Subject, UserId,
};
pub use policy::{build_permissions, PermissionSet, PolicyDecision, PolicyEngine, Target};
pub use roles::{Condition, Rule, RuleTable};
