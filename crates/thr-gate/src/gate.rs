//! The single orchestration point run for every authentication event.
//!
//! `SessionGate::handle` consumes the stored hint, runs the lookups, asks the
//! resolver for a destination and applies the side effects (token linking,
//! last-seen touch). It never returns an error: every failure maps to a
//! `Login` destination plus a user-visible notice.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinSet;

use thr_core::entities::{ClientRecord, Destination, Identity, PublicForm, StaffMembership, TokenState};
use thr_core::enums::{HintContext, LoginReason};

use crate::error::GateError;
use crate::event::AuthEvent;
use crate::hint_store::HintStore;
use crate::identification::IdentificationStore;
use crate::lookup::{ClientStore, MembershipLookup, PresenceRecorder, TokenLookup};
use crate::provision::ClientAutoProvisioner;
use crate::resolver::{self, ResolveInput, Rule};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible banner shown alongside the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub destination: Destination,
    pub notice: Option<Notice>,
}

impl GateOutcome {
    #[must_use]
    pub const fn new(destination: Destination) -> Self {
        Self {
            destination,
            notice: None,
        }
    }

    #[must_use]
    pub const fn with_notice(destination: Destination, notice: Notice) -> Self {
        Self {
            destination,
            notice: Some(notice),
        }
    }

    fn lookup_failed(error: &GateError) -> Self {
        Self::with_notice(
            Destination::login(LoginReason::LookupError),
            Notice::error(format!("We could not load your organizations: {error}")),
        )
    }
}

// ---------------------------------------------------------------------------
// Token linking
// ---------------------------------------------------------------------------

/// Links a held token-only client record to the identity that just signed in,
/// when the identity's verified email matches the record.
#[derive(Clone)]
struct TokenLinking {
    identification: IdentificationStore,
    tokens: Arc<dyn TokenLookup>,
    store: Arc<dyn ClientStore>,
}

impl TokenLinking {
    async fn try_link(&self, identity: &Identity) {
        let Some(held) = self.identification.current() else {
            return;
        };

        let record = match self.tokens.resolve_token(&held.token).await {
            Ok(Some(record)) if !record.is_deleted() => record,
            Ok(_) => {
                tracing::debug!(identity = %identity.id, "held token no longer resolves");
                return;
            }
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, "token lookup failed during linking");
                return;
            }
        };

        if record.identity_id.as_deref() == Some(identity.id.as_str()) {
            self.forget();
            return;
        }
        if record.is_linked()
            || record.token_state_at(Utc::now()) == TokenState::Expired
            || !identity.has_verified_email(&record.email)
        {
            tracing::debug!(identity = %identity.id, client = %record.id, "held token not linkable");
            return;
        }

        match self
            .store
            .find_client(&identity.id, &record.organization_id)
            .await
        {
            Ok(Some(existing)) => {
                tracing::debug!(
                    identity = %identity.id,
                    client = %existing.id,
                    organization = %record.organization_id,
                    "identity already holds client access here; dropping held token"
                );
                self.forget();
                return;
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, "client lookup failed during linking");
                return;
            }
        }

        match self.store.link_client_identity(&record.id, &identity.id).await {
            Ok(linked) => {
                tracing::info!(
                    identity = %identity.id,
                    client = %linked.id,
                    organization = %linked.organization_id,
                    "token record linked to identity"
                );
                self.forget();
            }
            Err(GateError::ProvisionConflict { .. }) => {
                tracing::debug!(identity = %identity.id, client = %record.id, "link lost to an existing record; dropping held token");
                self.forget();
            }
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, client = %record.id, "token record linking failed");
            }
        }
    }

    fn forget(&self) {
        if let Err(error) = self.identification.forget() {
            tracing::warn!(%error, "failed to clear token identification");
        }
    }
}

// ---------------------------------------------------------------------------
// SessionGate
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SessionGate {
    hints: HintStore,
    lookup: Arc<dyn MembershipLookup>,
    provisioner: ClientAutoProvisioner,
    presence: Option<Arc<dyn PresenceRecorder>>,
    linking: Option<TokenLinking>,
    pending: Arc<Mutex<JoinSet<()>>>,
}

impl SessionGate {
    #[must_use]
    pub fn new(
        hints: HintStore,
        lookup: Arc<dyn MembershipLookup>,
        provisioner: ClientAutoProvisioner,
    ) -> Self {
        Self {
            hints,
            lookup,
            provisioner,
            presence: None,
            linking: None,
            pending: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Touch `last_seen_at` whenever a resolution lands in the staff workspace.
    #[must_use]
    pub fn with_presence(mut self, presence: Arc<dyn PresenceRecorder>) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Link a held token identification to the signing-in identity.
    #[must_use]
    pub fn with_token_linking(
        mut self,
        identification: IdentificationStore,
        tokens: Arc<dyn TokenLookup>,
        store: Arc<dyn ClientStore>,
    ) -> Self {
        self.linking = Some(TokenLinking {
            identification,
            tokens,
            store,
        });
        self
    }

    #[must_use]
    pub const fn hints(&self) -> &HintStore {
        &self.hints
    }

    /// Resolve one authentication event to a destination.
    pub async fn handle(&self, event: &AuthEvent) -> GateOutcome {
        // Consumed before anything can fail so a retry never replays it.
        let stored_hint = self.hints.read_and_clear();

        if let Some(error) = &event.provider_error {
            tracing::warn!(kind = %event.kind, code = %error.code, "auth provider reported an error");
            return GateOutcome::with_notice(
                Destination::login(LoginReason::ProviderError),
                Notice::error(error.to_string()),
            );
        }

        let Some(identity) = &event.identity else {
            tracing::debug!(kind = %event.kind, "no session on auth event");
            return GateOutcome::new(Destination::login(LoginReason::NoSession));
        };

        if event.is_recovery() {
            tracing::info!(identity = %identity.id, rule = %Rule::Recovery, "password recovery");
            return GateOutcome::new(Destination::ResetPassword);
        }

        if let Some(linking) = &self.linking {
            linking.try_link(identity).await;
        }

        let hint = event.url_hint.clone().or(stored_hint);

        let (memberships, clients) = match self.fetch(&identity.id).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, "relationship lookup failed");
                return GateOutcome::lookup_failed(&error);
            }
        };

        let resolution = resolver::evaluate(&ResolveInput {
            recovery: false,
            hint: hint.as_ref(),
            memberships: &memberships,
            clients: &clients,
        });

        tracing::info!(
            identity = %identity.id,
            kind = %event.kind,
            rule = %resolution.rule,
            destination = %resolution.destination.path(),
            "resolved"
        );

        self.after_resolution(identity, &resolution.destination);
        GateOutcome::new(resolution.destination)
    }

    /// Continue from `SelectRole` with the side the user picked.
    pub async fn choose_role(&self, identity: &Identity, choice: HintContext) -> GateOutcome {
        let (memberships, clients) = match self.fetch(&identity.id).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, "relationship lookup failed");
                return GateOutcome::lookup_failed(&error);
            }
        };

        let destination = resolver::resolve_role_choice(choice, &memberships, &clients);
        tracing::info!(
            identity = %identity.id,
            rule = %Rule::RoleChoice,
            %choice,
            destination = %destination.path(),
            "resolved"
        );

        self.after_resolution(identity, &destination);
        GateOutcome::new(destination)
    }

    /// An authenticated identity opened a public intake form.
    ///
    /// Provisions a client record for the form's organization when the
    /// identity has none, then routes to that portal.
    pub async fn open_public_form(&self, identity: &Identity, form: &PublicForm) -> GateOutcome {
        match self
            .provisioner
            .provision(identity, &form.organization_id, &form.id)
            .await
        {
            Ok(provisioned) => {
                let destination = Destination::client(provisioned.record.organization_id);
                if provisioned.created {
                    GateOutcome::with_notice(
                        destination,
                        Notice::info("Client access created for this organization"),
                    )
                } else {
                    GateOutcome::new(destination)
                }
            }
            Err(error) => {
                tracing::warn!(%error, identity = %identity.id, form = %form.id, "form provisioning failed");
                GateOutcome::with_notice(
                    Destination::login(LoginReason::LookupError),
                    Notice::error(format!("We could not open this form: {error}")),
                )
            }
        }
    }

    async fn fetch(
        &self,
        identity_id: &str,
    ) -> Result<(Vec<StaffMembership>, Vec<ClientRecord>), GateError> {
        tokio::try_join!(
            self.lookup.staff_memberships(identity_id),
            self.lookup.client_records(identity_id),
        )
    }

    fn after_resolution(&self, identity: &Identity, destination: &Destination) {
        if !destination.is_staff_context() {
            return;
        }
        let Some(presence) = self.presence.clone() else {
            return;
        };
        let identity_id = identity.id.clone();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            if let Err(error) = presence.touch_last_seen(&identity_id, Utc::now()).await {
                tracing::warn!(%error, identity = %identity_id, "failed to record last seen");
            }
        });
    }

    /// Wait for background last-seen writes started by earlier resolutions.
    ///
    /// Navigation never waits on these. Short-lived callers use this before
    /// exiting so the writes are not dropped with the runtime.
    pub async fn settle(&self) {
        let mut pending = {
            let mut guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        while let Some(joined) = pending.join_next().await {
            if let Err(error) = joined {
                tracing::warn!(%error, "last-seen task did not complete");
            }
        }
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("hints", &self.hints)
            .field("presence", &self.presence.is_some())
            .field("linking", &self.linking.is_some())
            .finish_non_exhaustive()
    }
}
