//! The pure decision table mapping an identity's relationships to a destination.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. recovery marker -> `ResetPassword`
//! 2. hint verified against the identity's own records -> that organization
//! 3. staff only -> `AgencyDashboard` (one org) or `SelectOrganization`
//! 4. client only -> `ClientPortal` (one org) or `SelectClientOrganization`
//! 5. both -> `SelectRole`
//! 6. neither -> `NoOrganization`
//!
//! Counts are over distinct organization ids, so list order and duplicate
//! rows never change the outcome.

use std::collections::BTreeSet;
use std::fmt;

use thr_core::entities::{ClientRecord, Destination, Hint, StaffMembership};
use thr_core::enums::HintContext;

/// Which rule produced a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Recovery,
    VerifiedHint,
    StaffOnly,
    ClientOnly,
    DualRole,
    NoAccess,
    RoleChoice,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recovery => "recovery",
            Self::VerifiedHint => "verified-hint",
            Self::StaffOnly => "staff-only",
            Self::ClientOnly => "client-only",
            Self::DualRole => "dual-role",
            Self::NoAccess => "no-access",
            Self::RoleChoice => "role-choice",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub recovery: bool,
    pub hint: Option<&'a Hint>,
    pub memberships: &'a [StaffMembership],
    pub clients: &'a [ClientRecord],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub destination: Destination,
    pub rule: Rule,
}

impl Resolution {
    const fn new(destination: Destination, rule: Rule) -> Self {
        Self { destination, rule }
    }
}

/// Destination for `input`. Never fails.
#[must_use]
pub fn resolve(input: &ResolveInput<'_>) -> Destination {
    evaluate(input).destination
}

/// Like [`resolve`], also reporting the rule that fired.
#[must_use]
pub fn evaluate(input: &ResolveInput<'_>) -> Resolution {
    if input.recovery {
        return Resolution::new(Destination::ResetPassword, Rule::Recovery);
    }

    let staff_orgs = staff_orgs(input.memberships);
    let client_orgs = client_orgs(input.clients);

    if let Some(hint) = input.hint {
        let org = hint.organization_id.as_str();
        match hint.context {
            HintContext::Client if client_orgs.contains(org) => {
                return Resolution::new(Destination::client(org), Rule::VerifiedHint);
            }
            HintContext::Agency if staff_orgs.contains(org) => {
                return Resolution::new(Destination::agency(org), Rule::VerifiedHint);
            }
            _ => {
                tracing::debug!(
                    context = %hint.context,
                    organization = org,
                    "HintUnverifiable: hint ignored"
                );
            }
        }
    }

    match (staff_orgs.len(), client_orgs.len()) {
        (0, 0) => Resolution::new(Destination::NoOrganization, Rule::NoAccess),
        (_, 0) => Resolution::new(pick_staff(&staff_orgs), Rule::StaffOnly),
        (0, _) => Resolution::new(pick_client(&client_orgs), Rule::ClientOnly),
        _ => Resolution::new(Destination::SelectRole, Rule::DualRole),
    }
}

/// Continue from `SelectRole` once the user picked a side.
///
/// Only the chosen side's records are considered. Choosing a side with no
/// records lands back on `SelectRole`.
#[must_use]
pub fn resolve_role_choice(
    choice: HintContext,
    memberships: &[StaffMembership],
    clients: &[ClientRecord],
) -> Destination {
    match choice {
        HintContext::Agency => {
            let orgs = staff_orgs(memberships);
            if orgs.is_empty() {
                Destination::SelectRole
            } else {
                pick_staff(&orgs)
            }
        }
        HintContext::Client => {
            let orgs = client_orgs(clients);
            if orgs.is_empty() {
                Destination::SelectRole
            } else {
                pick_client(&orgs)
            }
        }
    }
}

fn staff_orgs(memberships: &[StaffMembership]) -> BTreeSet<&str> {
    memberships
        .iter()
        .map(|m| m.organization_id.as_str())
        .collect()
}

fn client_orgs(clients: &[ClientRecord]) -> BTreeSet<&str> {
    clients
        .iter()
        .filter(|c| !c.is_deleted())
        .map(|c| c.organization_id.as_str())
        .collect()
}

fn pick_staff(orgs: &BTreeSet<&str>) -> Destination {
    match single(orgs) {
        Some(org) => Destination::agency(org),
        None => Destination::SelectOrganization,
    }
}

fn pick_client(orgs: &BTreeSet<&str>) -> Destination {
    match single(orgs) {
        Some(org) => Destination::client(org),
        None => Destination::SelectClientOrganization,
    }
}

fn single<'a>(orgs: &BTreeSet<&'a str>) -> Option<&'a str> {
    if orgs.len() == 1 {
        orgs.first().copied()
    } else {
        None
    }
}
