//! # Orgguard Core
//!
//! Role-based authorization for a multi-tenant SaaS API.
//!
//! ## Architecture
//!
//! - **RBAC**: Closed role/action/resource model with a static, total rule table per role
//! - **Policy Engine**: `can`/`cannot` decisions, ownership conditions and memoized rule tables
//! - **Guards**: Named organization operations with client-facing denial messages
//! - **Telemetry**: Structured logging setup
//! - **Config**: File and environment configuration

pub mod config;
pub mod error;
pub mod rbac;
pub mod telemetry;

pub use error::{AuthzError, ErrorCode, ErrorResponse, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AuthorizationConfig, Config};
    pub use crate::error::{AuthzError, ErrorCode, ErrorResponse, ErrorSeverity, Result};
    pub use crate::rbac::{
        build_permissions, ensure_invite_recipient, Action, Condition, Membership, Operation,
        OrganizationId, Permission, PermissionSet, PolicyDecision, PolicyEngine, Resource,
        ResourceKind, Role, Rule, RuleTable, Subject, Target, UserId,
    };
}
