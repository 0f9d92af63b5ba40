//! Role rule tables.
//!
//! Every membership holds exactly one of three roles:
//!
//! | Role     | Description                                                       |
//! |----------|-------------------------------------------------------------------|
//! | Admin    | Full access to every resource, regardless of ownership             |
//! | Member   | Work with projects and invites; change only what they own/authored |
//! | Billing  | Read billing information only                                      |
//!
//! The table is total: every (role, kind, action) triple resolves to a `Rule`.
//! Actions that do not apply to a kind (see `ResourceKind::actions`) are denied
//! for every role, including Admin.

use std::collections::BTreeMap;
use std::fmt;

use super::models::{Action, Permission, Resource, ResourceKind, Role, Subject};

// ═══════════════════════════════════════════════════════════════════════════════
// Conditions
// ═══════════════════════════════════════════════════════════════════════════════

/// A named predicate over the acting subject and a resource instance.
#[derive(Clone, Copy)]
pub struct Condition {
    name: &'static str,
    predicate: fn(&Subject, &Resource) -> bool,
}

impl Condition {
    /// The subject owns the resource (`ownerId` matches).
    pub const OWNS_RESOURCE: Condition = Condition {
        name: "owns_resource",
        predicate: owns_resource,
    };

    /// The subject created the invite (`authorId` matches).
    pub const AUTHORED_INVITE: Condition = Condition {
        name: "authored_invite",
        predicate: authored_invite,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn evaluate(&self, subject: &Subject, resource: &Resource) -> bool {
        (self.predicate)(subject, resource)
    }
}

fn owns_resource(subject: &Subject, resource: &Resource) -> bool {
    resource.owner_id() == Some(&subject.id)
}

fn authored_invite(subject: &Subject, resource: &Resource) -> bool {
    resource.author_id() == Some(&subject.id)
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.name).finish()
    }
}

// Conditions are compared by name; the predicate is fixed per name.
impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Condition {}

// ═══════════════════════════════════════════════════════════════════════════════
// Rule
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of a rule lookup before any instance data is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Allow,
    Deny,
    /// Allowed only when the condition holds against a resource instance.
    AllowIf(Condition),
}

impl Rule {
    /// Whether the rule can ever grant access.
    pub fn may_allow(&self) -> bool {
        !matches!(self, Self::Deny)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
            Self::AllowIf(cond) => write!(f, "allow if {}", cond.name()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role definitions
// ═══════════════════════════════════════════════════════════════════════════════

impl Role {
    /// Get the human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
            Self::Billing => "Billing",
        }
    }

    /// Get the description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Full access to all resources and organization settings",
            Self::Member => "Create and read projects and invites; change own projects",
            Self::Billing => "Read-only access to billing information",
        }
    }

    /// Resolve the rule for an action on a resource kind.
    pub fn rule(&self, kind: ResourceKind, action: Action) -> Rule {
        if !kind.supports(action) {
            return Rule::Deny;
        }
        match self {
            Self::Admin => Rule::Allow,
            Self::Member => member_rule(kind, action),
            Self::Billing => billing_rule(kind, action),
        }
    }
}

fn member_rule(kind: ResourceKind, action: Action) -> Rule {
    match kind {
        ResourceKind::User => match action {
            Action::Get => Rule::Allow,
            // Removing or inviting members is reserved to admins.
            _ => Rule::Deny,
        },
        ResourceKind::Project => match action {
            Action::Create | Action::Get => Rule::Allow,
            Action::Update | Action::Delete => Rule::AllowIf(Condition::OWNS_RESOURCE),
            _ => Rule::Deny,
        },
        ResourceKind::Invite => match action {
            Action::Create | Action::Get => Rule::Allow,
            Action::Delete => Rule::AllowIf(Condition::AUTHORED_INVITE),
            _ => Rule::Deny,
        },
        ResourceKind::Billing => Rule::Deny,
        ResourceKind::Organization => match action {
            Action::Get => Rule::Allow,
            _ => Rule::Deny,
        },
    }
}

fn billing_rule(kind: ResourceKind, action: Action) -> Rule {
    match kind {
        ResourceKind::Billing | ResourceKind::Organization => match action {
            Action::Get => Rule::Allow,
            _ => Rule::Deny,
        },
        ResourceKind::User | ResourceKind::Project | ResourceKind::Invite => Rule::Deny,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rule table
// ═══════════════════════════════════════════════════════════════════════════════

/// The materialized rule table for one role.
///
/// Holds an entry for every kind × action pair and is never mutated after
/// construction, so it can be shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    role: Role,
    rules: BTreeMap<Permission, Rule>,
}

impl RuleTable {
    /// Build the table for a role.
    pub fn for_role(role: Role) -> Self {
        let rules = ResourceKind::ALL
            .into_iter()
            .flat_map(|kind| {
                Action::ALL
                    .into_iter()
                    .map(move |action| (Permission::new(kind, action), role.rule(kind, action)))
            })
            .collect();
        Self { role, rules }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Look up the rule for a permission.
    pub fn rule(&self, permission: &Permission) -> Rule {
        self.rules.get(permission).copied().unwrap_or(Rule::Deny)
    }

    /// Iterate over every entry in (kind, action) order.
    pub fn iter(&self) -> impl Iterator<Item = (Permission, Rule)> + '_ {
        self.rules.iter().map(|(p, r)| (*p, *r))
    }

    /// Permissions that are granted, unconditionally or under a condition.
    pub fn granted(&self) -> Vec<Permission> {
        self.iter()
            .filter(|(_, rule)| rule.may_allow())
            .map(|(perm, _)| perm)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(kind: ResourceKind, action: Action) -> Permission {
        Permission::new(kind, action)
    }

    #[test]
    fn test_table_is_total() {
        for role in Role::ALL {
            let table = RuleTable::for_role(role);
            assert_eq!(table.len(), ResourceKind::ALL.len() * Action::ALL.len());
        }
    }

    #[test]
    fn test_admin_allows_every_applicable_action() {
        let table = RuleTable::for_role(Role::Admin);
        for kind in ResourceKind::ALL {
            for action in kind.actions() {
                assert_eq!(table.rule(&perm(kind, *action)), Rule::Allow);
            }
        }
    }

    #[test]
    fn test_inapplicable_actions_denied_for_all_roles() {
        for role in Role::ALL {
            let table = RuleTable::for_role(role);
            assert_eq!(table.rule(&perm(ResourceKind::Billing, Action::Delete)), Rule::Deny);
            assert_eq!(
                table.rule(&perm(ResourceKind::Project, Action::TransferOwnership)),
                Rule::Deny
            );
        }
    }

    #[test]
    fn test_member_rules() {
        let table = RuleTable::for_role(Role::Member);
        assert_eq!(table.rule(&perm(ResourceKind::Project, Action::Create)), Rule::Allow);
        assert_eq!(table.rule(&perm(ResourceKind::Project, Action::Get)), Rule::Allow);
        assert_eq!(
            table.rule(&perm(ResourceKind::Project, Action::Delete)),
            Rule::AllowIf(Condition::OWNS_RESOURCE)
        );
        assert_eq!(
            table.rule(&perm(ResourceKind::Invite, Action::Delete)),
            Rule::AllowIf(Condition::AUTHORED_INVITE)
        );
        assert_eq!(table.rule(&perm(ResourceKind::User, Action::Delete)), Rule::Deny);
        assert_eq!(table.rule(&perm(ResourceKind::Billing, Action::Get)), Rule::Deny);
    }

    #[test]
    fn test_billing_rules() {
        let table = RuleTable::for_role(Role::Billing);
        assert_eq!(
            table.granted(),
            vec![
                perm(ResourceKind::Billing, Action::Get),
                perm(ResourceKind::Organization, Action::Get),
            ]
        );
    }

    #[test]
    fn test_conditions() {
        let alice = Subject::new("alice", Role::Member);
        assert!(Condition::OWNS_RESOURCE.evaluate(&alice, &Resource::project("p1", "alice")));
        assert!(!Condition::OWNS_RESOURCE.evaluate(&alice, &Resource::project("p1", "bob")));

        let invite = Resource::Invite {
            id: "i1".into(),
            email: "carol@acme.com".into(),
            role: Role::Member,
            author_id: None,
        };
        assert!(!Condition::AUTHORED_INVITE.evaluate(&alice, &invite));
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::Allow.to_string(), "allow");
        assert_eq!(
            Rule::AllowIf(Condition::OWNS_RESOURCE).to_string(),
            "allow if owns_resource"
        );
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::Admin.name(), "Admin");
        assert_eq!(Role::Member.name(), "Member");
        assert_eq!(Role::Billing.name(), "Billing");
    }
}
