//! Use-case guards for organization-scoped operations.
//!
//! Each API operation that consults the policy is listed in [`Operation`] with
//! the permission it requires and the message returned to the client when the
//! caller is not allowed. Handlers resolve a [`Membership`] for the current
//! user and organization, then call [`Membership::authorize`] before touching
//! any data.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::models::{Action, OrganizationId, Permission, Resource, ResourceKind, Role, Subject, UserId};
use super::policy::{PermissionSet, PolicyEngine, Target};
use crate::error::{AuthzError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════════════════════════

/// An organization-scoped operation guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListProjects,
    GetProject,
    CreateProject,
    UpdateProject,
    DeleteProject,
    ListInvites,
    CreateInvite,
    RevokeInvite,
    RemoveMember,
    GetBilling,
    ExportBilling,
    UpdateOrganization,
    DeleteOrganization,
    TransferOwnership,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::ListProjects,
        Operation::GetProject,
        Operation::CreateProject,
        Operation::UpdateProject,
        Operation::DeleteProject,
        Operation::ListInvites,
        Operation::CreateInvite,
        Operation::RevokeInvite,
        Operation::RemoveMember,
        Operation::GetBilling,
        Operation::ExportBilling,
        Operation::UpdateOrganization,
        Operation::DeleteOrganization,
        Operation::TransferOwnership,
    ];

    /// The permission this operation requires.
    pub fn permission(&self) -> Permission {
        let (kind, action) = match self {
            Self::ListProjects | Self::GetProject => (ResourceKind::Project, Action::Get),
            Self::CreateProject => (ResourceKind::Project, Action::Create),
            Self::UpdateProject => (ResourceKind::Project, Action::Update),
            Self::DeleteProject => (ResourceKind::Project, Action::Delete),
            Self::ListInvites => (ResourceKind::Invite, Action::Get),
            Self::CreateInvite => (ResourceKind::Invite, Action::Create),
            Self::RevokeInvite => (ResourceKind::Invite, Action::Delete),
            Self::RemoveMember => (ResourceKind::User, Action::Delete),
            Self::GetBilling => (ResourceKind::Billing, Action::Get),
            Self::ExportBilling => (ResourceKind::Billing, Action::Export),
            Self::UpdateOrganization => (ResourceKind::Organization, Action::Update),
            Self::DeleteOrganization => (ResourceKind::Organization, Action::Delete),
            Self::TransferOwnership => (ResourceKind::Organization, Action::TransferOwnership),
        };
        Permission::new(kind, action)
    }

    /// Whether the operation targets one loaded instance.
    ///
    /// Members can only pass these when the instance is supplied, since their
    /// rules depend on ownership.
    pub fn targets_instance(&self) -> bool {
        matches!(
            self,
            Self::GetProject
                | Self::UpdateProject
                | Self::DeleteProject
                | Self::RevokeInvite
                | Self::UpdateOrganization
                | Self::DeleteOrganization
                | Self::TransferOwnership
        )
    }

    /// Client-facing message when the operation is denied.
    pub fn denial_message(&self) -> &'static str {
        match self {
            Self::ListProjects => "You are not authorized to see organization projects.",
            Self::GetProject => "You are not authorized to see project.",
            Self::CreateProject => "You are not authorized to create projects.",
            Self::UpdateProject => "You are not authorized to update this project.",
            Self::DeleteProject => "You are not authorized to delete this project.",
            Self::ListInvites => "You are not authorized to get organization invites.",
            Self::CreateInvite => "You are not authorized to create new invites.",
            Self::RevokeInvite => "You are not authorized to revoke this invite.",
            Self::RemoveMember => "You are not allowed to remove this member from the organization.",
            Self::GetBilling => "You are not authorized to see billing information.",
            Self::ExportBilling => "You are not authorized to export billing information.",
            Self::UpdateOrganization => "You are not authorized to update this organization.",
            Self::DeleteOrganization => "You are not authorized to shutdown this organization.",
            Self::TransferOwnership => {
                "You are not authorized to transfer this organization ownership."
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListProjects => "list_projects",
            Self::GetProject => "get_project",
            Self::CreateProject => "create_project",
            Self::UpdateProject => "update_project",
            Self::DeleteProject => "delete_project",
            Self::ListInvites => "list_invites",
            Self::CreateInvite => "create_invite",
            Self::RevokeInvite => "revoke_invite",
            Self::RemoveMember => "remove_member",
            Self::GetBilling => "get_billing",
            Self::ExportBilling => "export_billing",
            Self::UpdateOrganization => "update_organization",
            Self::DeleteOrganization => "delete_organization",
            Self::TransferOwnership => "transfer_ownership",
        };
        f.write_str(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Membership
// ═══════════════════════════════════════════════════════════════════════════════

/// A user's membership in one organization, as resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: Role,
}

impl Membership {
    pub fn new(
        user_id: impl Into<UserId>,
        organization_id: impl Into<OrganizationId>,
        role: Role,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            organization_id: organization_id.into(),
            role,
        }
    }

    pub fn subject(&self) -> Subject {
        Subject::new(self.user_id.clone(), self.role)
    }

    /// Permission set for this membership, backed by a fresh rule table.
    pub fn permissions(&self) -> PermissionSet {
        PermissionSet::new(self.subject())
    }

    /// Authorize an operation against the engine's shared rule tables.
    ///
    /// `instance` must be the loaded resource for operations that target one;
    /// passing an instance of a different kind is a contract violation.
    pub fn authorize(
        &self,
        engine: &PolicyEngine,
        operation: Operation,
        instance: Option<&Resource>,
    ) -> Result<()> {
        let permission = operation.permission();

        let target = match instance {
            Some(resource) if resource.kind() != permission.kind => {
                let err = AuthzError::ResourceMismatch {
                    expected: permission.kind.to_string(),
                    actual: resource.kind().to_string(),
                };
                err.log();
                return Err(err);
            }
            Some(resource) => Target::Instance(resource),
            None => Target::Kind(permission.kind),
        };

        let perms = engine.permissions(self.subject());
        if perms.can(permission.action, target) {
            return Ok(());
        }

        warn!(
            user_id = %self.user_id,
            org_id = %self.organization_id,
            role = %self.role,
            operation = %operation,
            permission = %permission,
            "Permission denied"
        );
        Err(AuthzError::Unauthorized(operation.denial_message().to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Invite recipient
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepting or rejecting an invite is only open to the invited address.
///
/// This check does not involve roles: the invitee is not yet a member.
pub fn ensure_invite_recipient(invite: &Resource, user_email: &str) -> Result<()> {
    match invite {
        Resource::Invite { email, .. } if email == user_email => Ok(()),
        Resource::Invite { .. } => Err(AuthzError::BadRequest(
            "User does not have access to this invite".to_string(),
        )),
        other => Err(AuthzError::ResourceMismatch {
            expected: ResourceKind::Invite.to_string(),
            actual: other.kind().to_string(),
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(author: Option<&str>) -> Resource {
        Resource::Invite {
            id: "inv-1".into(),
            email: "carol@acme.com".into(),
            role: Role::Member,
            author_id: author.map(UserId::new),
        }
    }

    #[test]
    fn test_every_operation_is_applicable() {
        for op in Operation::ALL {
            assert!(op.permission().is_applicable(), "{op} maps to an inapplicable permission");
        }
    }

    #[test]
    fn test_admin_passes_every_operation() {
        let engine = PolicyEngine::new();
        let admin = Membership::new("alice", "org1", Role::Admin);

        for op in Operation::ALL {
            assert!(admin.authorize(&engine, op, None).is_ok(), "{op}");
        }
    }

    #[test]
    fn test_member_delete_project_requires_ownership() {
        let engine = PolicyEngine::new();
        let member = Membership::new("bob", "org1", Role::Member);

        let own = Resource::project("p1", "bob");
        assert!(member.authorize(&engine, Operation::DeleteProject, Some(&own)).is_ok());

        let other = Resource::project("p2", "alice");
        let err = member
            .authorize(&engine, Operation::DeleteProject, Some(&other))
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::Unauthorized("You are not authorized to delete this project.".into())
        );

        assert!(member.authorize(&engine, Operation::DeleteProject, None).is_err());
    }

    #[test]
    fn test_member_revoke_invite_requires_authorship() {
        let engine = PolicyEngine::new();
        let member = Membership::new("bob", "org1", Role::Member);

        assert!(member
            .authorize(&engine, Operation::RevokeInvite, Some(&invite(Some("bob"))))
            .is_ok());
        assert!(member
            .authorize(&engine, Operation::RevokeInvite, Some(&invite(Some("alice"))))
            .is_err());
        assert!(member
            .authorize(&engine, Operation::RevokeInvite, Some(&invite(None)))
            .is_err());
    }

    #[test]
    fn test_billing_denials_use_operation_messages() {
        let engine = PolicyEngine::new();
        let billing = Membership::new("dana", "org1", Role::Billing);

        assert!(billing.authorize(&engine, Operation::GetBilling, None).is_ok());

        let err = billing
            .authorize(&engine, Operation::RemoveMember, None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You are not allowed to remove this member from the organization."
        );

        let err = billing
            .authorize(&engine, Operation::CreateProject, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "You are not authorized to create projects.");
    }

    #[test]
    fn test_resource_mismatch() {
        let engine = PolicyEngine::new();
        let admin = Membership::new("alice", "org1", Role::Admin);

        let err = admin
            .authorize(&engine, Operation::DeleteProject, Some(&invite(None)))
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::ResourceMismatch {
                expected: "Project".into(),
                actual: "Invite".into(),
            }
        );
    }

    #[test]
    fn test_invite_recipient() {
        let inv = invite(Some("alice"));
        assert!(ensure_invite_recipient(&inv, "carol@acme.com").is_ok());

        let err = ensure_invite_recipient(&inv, "mallory@acme.com").unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.to_string(), "User does not have access to this invite");

        let project = Resource::project("p1", "alice");
        assert!(matches!(
            ensure_invite_recipient(&project, "carol@acme.com"),
            Err(AuthzError::ResourceMismatch { .. })
        ));
    }

    #[test]
    fn test_membership_permissions() {
        let member = Membership::new("bob", "org1", Role::Member);
        let perms = member.permissions();
        assert_eq!(perms.subject().id, UserId::new("bob"));
        assert!(perms.can(Action::Create, ResourceKind::Project));
    }
}
