use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LoginReason;

/// The single screen/context a resolution lands on.
///
/// Variants that name an organization are only ever produced after the
/// identity's membership or client record for that organization was checked.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "destination", rename_all = "snake_case")]
pub enum Destination {
    AgencyDashboard { organization_id: String },
    ClientPortal { organization_id: String },
    /// Staff-side picker across several workspaces.
    SelectOrganization,
    /// Client-side picker across several portals.
    SelectClientOrganization,
    /// Account holds both staff and client relationships.
    SelectRole,
    NoOrganization,
    ResetPassword,
    Login { reason: LoginReason },
}

impl Destination {
    #[must_use]
    pub fn agency(organization_id: impl Into<String>) -> Self {
        Self::AgencyDashboard {
            organization_id: organization_id.into(),
        }
    }

    #[must_use]
    pub fn client(organization_id: impl Into<String>) -> Self {
        Self::ClientPortal {
            organization_id: organization_id.into(),
        }
    }

    #[must_use]
    pub const fn login(reason: LoginReason) -> Self {
        Self::Login { reason }
    }

    /// Organization named by this destination, if any.
    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Self::AgencyDashboard { organization_id } | Self::ClientPortal { organization_id } => {
                Some(organization_id)
            }
            _ => None,
        }
    }

    /// Destinations inside the staff workspace.
    #[must_use]
    pub const fn is_staff_context(&self) -> bool {
        matches!(self, Self::AgencyDashboard { .. } | Self::SelectOrganization)
    }

    /// Router path for the external router.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::AgencyDashboard { organization_id } => format!("/dashboard/{organization_id}"),
            Self::ClientPortal { organization_id } => format!("/client-portal/{organization_id}"),
            Self::SelectOrganization => "/select-organization".into(),
            Self::SelectClientOrganization => "/client-dashboard".into(),
            Self::SelectRole => "/select-role".into(),
            Self::NoOrganization => "/no-organization".into(),
            Self::ResetPassword => "/reset-password".into(),
            Self::Login { reason } => format!("/login?reason={reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paths_match_router_shapes() {
        assert_eq!(Destination::agency("org-a").path(), "/dashboard/org-a");
        assert_eq!(Destination::client("org-b").path(), "/client-portal/org-b");
        assert_eq!(Destination::SelectClientOrganization.path(), "/client-dashboard");
        assert_eq!(
            Destination::login(LoginReason::ExpiredLink).path(),
            "/login?reason=expired-link"
        );
    }

    #[test]
    fn only_dashboard_and_org_picker_are_staff_context() {
        assert!(Destination::agency("org-a").is_staff_context());
        assert!(Destination::SelectOrganization.is_staff_context());
        assert!(!Destination::SelectRole.is_staff_context());
        assert!(!Destination::client("org-a").is_staff_context());
        assert!(!Destination::SelectClientOrganization.is_staff_context());
    }

    #[test]
    fn serializes_with_destination_tag() {
        let json = serde_json::to_value(Destination::client("org-a")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"destination": "client_portal", "organization_id": "org-a"})
        );
        let json = serde_json::to_value(Destination::login(LoginReason::NoSession)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"destination": "login", "reason": "no-session"})
        );
    }

    #[test]
    fn organization_id_only_for_tenant_destinations() {
        assert_eq!(Destination::agency("org-a").organization_id(), Some("org-a"));
        assert_eq!(Destination::SelectRole.organization_id(), None);
    }
}
