//! RBAC data models: identifiers, Role, Action, Resource, Subject and Permission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthzError;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Strongly-typed organization identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrganizationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role
// ═══════════════════════════════════════════════════════════════════════════════

/// Membership role within one organization.
///
/// `OWNER` is accepted as an alias of `ADMIN` when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(alias = "OWNER")]
    Admin,
    Member,
    Billing,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::Billing];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Billing => "BILLING",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" | "OWNER" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            "BILLING" => Ok(Self::Billing),
            _ => Err(AuthzError::InvalidRole(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Action
// ═══════════════════════════════════════════════════════════════════════════════

/// Operation verb applied to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Get,
    Update,
    Delete,
    Invite,
    TransferOwnership,
    Export,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Create,
        Action::Get,
        Action::Update,
        Action::Delete,
        Action::Invite,
        Action::TransferOwnership,
        Action::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Invite => "invite",
            Self::TransferOwnership => "transfer_ownership",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthzError::InvalidAction(s.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resource kinds and instances
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of entity an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    User,
    Project,
    Invite,
    Billing,
    Organization,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::User,
        ResourceKind::Project,
        ResourceKind::Invite,
        ResourceKind::Billing,
        ResourceKind::Organization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Project => "Project",
            Self::Invite => "Invite",
            Self::Billing => "Billing",
            Self::Organization => "Organization",
        }
    }

    /// Actions that are meaningful for this kind. Every other action is
    /// denied for every role.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Self::User => &[Action::Get, Action::Update, Action::Delete, Action::Invite],
            Self::Project => &[Action::Create, Action::Get, Action::Update, Action::Delete],
            Self::Invite => &[Action::Create, Action::Get, Action::Delete],
            Self::Billing => &[Action::Get, Action::Export],
            Self::Organization => &[
                Action::Get,
                Action::Update,
                Action::Delete,
                Action::TransferOwnership,
            ],
        }
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions().contains(&action)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthzError::InvalidResourceKind(s.to_string()))
    }
}

/// A concrete resource instance, as loaded by the caller.
///
/// Only the attributes that take part in authorization are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Resource {
    #[serde(rename_all = "camelCase")]
    User { id: UserId },

    #[serde(rename_all = "camelCase")]
    Project { id: String, owner_id: UserId },

    #[serde(rename_all = "camelCase")]
    Invite {
        id: String,
        email: String,
        role: Role,
        #[serde(default)]
        author_id: Option<UserId>,
    },

    #[serde(rename_all = "camelCase")]
    Billing { organization_id: OrganizationId },

    #[serde(rename_all = "camelCase")]
    Organization { id: OrganizationId, owner_id: UserId },
}

impl Resource {
    pub fn project(id: impl Into<String>, owner_id: impl Into<UserId>) -> Self {
        Self::Project {
            id: id.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn organization(id: impl Into<OrganizationId>, owner_id: impl Into<UserId>) -> Self {
        Self::Organization {
            id: id.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User { .. } => ResourceKind::User,
            Self::Project { .. } => ResourceKind::Project,
            Self::Invite { .. } => ResourceKind::Invite,
            Self::Billing { .. } => ResourceKind::Billing,
            Self::Organization { .. } => ResourceKind::Organization,
        }
    }

    /// The owning user, for kinds that have one.
    pub fn owner_id(&self) -> Option<&UserId> {
        match self {
            Self::Project { owner_id, .. } | Self::Organization { owner_id, .. } => Some(owner_id),
            _ => None,
        }
    }

    /// The user who created an invite, if recorded.
    pub fn author_id(&self) -> Option<&UserId> {
        match self {
            Self::Invite { author_id, .. } => author_id.as_ref(),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Subject
// ═══════════════════════════════════════════════════════════════════════════════

/// The authenticated actor, scoped to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub id: UserId,
    pub role: Role,
}

impl Subject {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Permission
// ═══════════════════════════════════════════════════════════════════════════════

/// An action on a resource kind.
///
/// Permissions use the textual form `Kind:action`, for example:
/// - `Project:delete`
/// - `Billing:get`
/// - `Organization:transfer_ownership`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    pub kind: ResourceKind,
    pub action: Action,
}

impl Permission {
    pub fn new(kind: ResourceKind, action: Action) -> Self {
        Self { kind, action }
    }

    /// Parse a permission from a colon-separated string like `"Project:delete"`.
    pub fn parse(s: &str) -> Result<Self, AuthzError> {
        let (kind, action) = s
            .split_once(':')
            .ok_or_else(|| AuthzError::InvalidPermission(s.to_string()))?;
        Ok(Self::new(kind.parse()?, action.parse()?))
    }

    /// Whether the action is meaningful for the kind.
    pub fn is_applicable(&self) -> bool {
        self.kind.supports(self.action)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.action)
    }
}

impl FromStr for Permission {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
