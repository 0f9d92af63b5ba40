//! Policy engine for evaluating authorization decisions.
//!
//! The policy engine answers the question:
//! "Can subject X, holding role R in this organization, perform action Y on
//! resource Z?"

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::models::{Action, Permission, Resource, ResourceKind, Role, Subject, UserId};
use super::roles::{Rule, RuleTable};
use crate::config::AuthorizationConfig;
use crate::error::{AuthzError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Target
// ═══════════════════════════════════════════════════════════════════════════════

/// What a check is evaluated against: a bare kind or a loaded instance.
///
/// Conditional rules only grant access when an instance is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Kind(ResourceKind),
    Instance(&'a Resource),
}

impl Target<'_> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Kind(kind) => *kind,
            Self::Instance(resource) => resource.kind(),
        }
    }
}

impl From<ResourceKind> for Target<'_> {
    fn from(kind: ResourceKind) -> Self {
        Self::Kind(kind)
    }
}

impl<'a> From<&'a Resource> for Target<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self::Instance(resource)
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The action is allowed.
    Allow,
    /// The action is denied, with a reason.
    Deny(String),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Permission Set
// ═══════════════════════════════════════════════════════════════════════════════

/// A subject bound to its role's rule table.
#[derive(Debug, Clone)]
pub struct PermissionSet {
    subject: Subject,
    table: Arc<RuleTable>,
}

impl PermissionSet {
    /// Build a permission set with a freshly constructed rule table.
    pub fn new(subject: Subject) -> Self {
        let table = Arc::new(RuleTable::for_role(subject.role));
        Self { subject, table }
    }

    pub(crate) fn with_table(subject: Subject, table: Arc<RuleTable>) -> Self {
        debug_assert_eq!(subject.role, table.role());
        Self { subject, table }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.subject.role
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// True iff a rule grants `action` on the target.
    pub fn can<'a>(&self, action: Action, target: impl Into<Target<'a>>) -> bool {
        let target = target.into();
        match self.table.rule(&Permission::new(target.kind(), action)) {
            Rule::Allow => true,
            Rule::Deny => false,
            Rule::AllowIf(condition) => match target {
                Target::Instance(resource) => condition.evaluate(&self.subject, resource),
                Target::Kind(_) => false,
            },
        }
    }

    /// Negation of [`PermissionSet::can`].
    pub fn cannot<'a>(&self, action: Action, target: impl Into<Target<'a>>) -> bool {
        !self.can(action, target)
    }

    /// Like [`PermissionSet::can`], but explains a denial.
    pub fn decide<'a>(&self, action: Action, target: impl Into<Target<'a>>) -> PolicyDecision {
        let target = target.into();
        let permission = Permission::new(target.kind(), action);

        match self.table.rule(&permission) {
            Rule::Allow => PolicyDecision::Allow,
            Rule::Deny if !permission.is_applicable() => PolicyDecision::Deny(format!(
                "Action {} does not apply to {}",
                action,
                target.kind()
            )),
            Rule::Deny => PolicyDecision::Deny(format!(
                "Role {} does not have permission {}",
                self.subject.role, permission
            )),
            Rule::AllowIf(condition) => match target {
                Target::Instance(resource) if condition.evaluate(&self.subject, resource) => {
                    PolicyDecision::Allow
                }
                Target::Instance(_) => PolicyDecision::Deny(format!(
                    "User {} does not satisfy {} for {}",
                    self.subject.id,
                    condition.name(),
                    permission
                )),
                Target::Kind(_) => PolicyDecision::Deny(format!(
                    "Permission {} requires a {} instance to evaluate {}",
                    permission,
                    target.kind(),
                    condition.name()
                )),
            },
        }
    }
}

/// Build the permission set for a user and a raw role string.
///
/// Fails with [`AuthzError::InvalidRole`] when the role is not one of
/// `ADMIN`/`OWNER`, `MEMBER` or `BILLING`.
pub fn build_permissions(user_id: impl Into<UserId>, role: &str) -> Result<PermissionSet> {
    let role: Role = role.parse()?;
    Ok(PermissionSet::new(Subject::new(user_id, role)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Policy Engine
// ═══════════════════════════════════════════════════════════════════════════════

/// Hands out permission sets backed by shared, per-role rule tables.
///
/// Thread-safe via `DashMap`; cloning shares the same table cache.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    /// Rule tables indexed by role, built on first use.
    tables: Arc<DashMap<Role, Arc<RuleTable>>>,

    config: AuthorizationConfig,
}

impl PolicyEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(AuthorizationConfig::default())
    }

    pub fn with_config(config: AuthorizationConfig) -> Self {
        Self {
            tables: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &AuthorizationConfig {
        &self.config
    }

    /// Get the rule table for a role, building it if needed.
    pub fn rule_table(&self, role: Role) -> Arc<RuleTable> {
        if !self.config.memoize_rule_tables {
            return Arc::new(RuleTable::for_role(role));
        }

        self.tables
            .entry(role)
            .or_insert_with(|| {
                debug!(role = %role, "Building rule table");
                Arc::new(RuleTable::for_role(role))
            })
            .value()
            .clone()
    }

    /// Bind a subject to its role's rule table.
    pub fn permissions(&self, subject: Subject) -> PermissionSet {
        let table = self.rule_table(subject.role);
        PermissionSet::with_table(subject, table)
    }

    /// Bind a user to a raw role string.
    pub fn permissions_for(&self, user_id: impl Into<UserId>, role: &str) -> Result<PermissionSet> {
        let role: Role = role.parse().map_err(|err: AuthzError| {
            err.log();
            err
        })?;
        Ok(self.permissions(Subject::new(user_id, role)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a single action on a target for a subject.
    pub fn check<'a>(
        &self,
        subject: &Subject,
        action: Action,
        target: impl Into<Target<'a>>,
    ) -> PolicyDecision {
        let target = target.into();
        let decision = self.permissions(subject.clone()).decide(action, target);

        if self.config.log_decisions {
            match &decision {
                PolicyDecision::Allow => debug!(
                    user_id = %subject.id,
                    role = %subject.role,
                    action = %action,
                    resource = %target,
                    "Permission granted"
                ),
                PolicyDecision::Deny(reason) => debug!(
                    user_id = %subject.id,
                    role = %subject.role,
                    action = %action,
                    resource = %target,
                    reason = %reason,
                    "Permission denied"
                ),
            }
        }

        decision
    }

    /// Convenience: returns `Ok(())` if allowed, `Err(AuthzError::Unauthorized)` if denied.
    pub fn enforce<'a>(
        &self,
        subject: &Subject,
        action: Action,
        target: impl Into<Target<'a>>,
    ) -> Result<()> {
        match self.check(subject, action, target) {
            PolicyDecision::Allow => Ok(()),
            PolicyDecision::Deny(reason) => Err(AuthzError::Unauthorized(reason)),
        }
    }

    /// Check multiple kind-level permissions; returns `Allow` only if ALL are granted.
    pub fn check_all(&self, subject: &Subject, permissions: &[Permission]) -> PolicyDecision {
        for perm in permissions {
            let decision = self.check(subject, perm.action, perm.kind);
            if decision.is_denied() {
                return decision;
            }
        }
        PolicyDecision::Allow
    }

    /// Check multiple kind-level permissions; returns `Allow` if ANY is granted.
    pub fn check_any(&self, subject: &Subject, permissions: &[Permission]) -> PolicyDecision {
        for perm in permissions {
            if self.check(subject, perm.action, perm.kind).is_allowed() {
                return PolicyDecision::Allow;
            }
        }
        PolicyDecision::Deny(format!(
            "User {} does not have any of the required permissions",
            subject.id
        ))
    }

    /// Number of cached rule tables.
    pub fn cached_tables(&self) -> usize {
        self.tables.len()
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
