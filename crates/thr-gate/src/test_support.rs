//! In-memory fakes for the storage seams.

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{Mutex, PoisonError};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use thr_core::entities::{ClientRecord, Identity, StaffMembership};
    use thr_core::enums::{ClientOrigin, StaffRole};

    use crate::error::GateError;
    use crate::lookup::{ClientStore, MembershipLookup, PresenceRecorder, TokenLookup};

    #[derive(Default)]
    struct State {
        memberships: Vec<StaffMembership>,
        clients: Vec<ClientRecord>,
        touched: Vec<(String, DateTime<Utc>)>,
        lookup_calls: usize,
        next_id: usize,
    }

    /// Every trait over one shared table set. Failure switches make a
    /// specific seam return errors.
    #[derive(Default)]
    pub struct FakeDirectory {
        state: Mutex<State>,
        pub fail_lookups: Mutex<bool>,
        pub fail_presence: Mutex<bool>,
        /// Simulate a concurrent writer: the next insert stores the record and
        /// then reports a conflict.
        pub race_next_insert: Mutex<bool>,
    }

    impl FakeDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> std::sync::MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn flag(flag: &Mutex<bool>) -> bool {
            *flag.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn set_flag(flag: &Mutex<bool>, value: bool) {
            *flag.lock().unwrap_or_else(PoisonError::into_inner) = value;
        }

        pub fn add_staff(&self, identity_id: &str, org: &str) {
            self.state().memberships.push(StaffMembership {
                identity_id: identity_id.into(),
                organization_id: org.into(),
                role: StaffRole::Member,
            });
        }

        pub fn add_client(&self, identity_id: Option<&str>, org: &str, email: &str) -> ClientRecord {
            let mut state = self.state();
            state.next_id += 1;
            let record = ClientRecord {
                id: format!("cli-{:08x}", state.next_id),
                identity_id: identity_id.map(str::to_string),
                organization_id: org.into(),
                email: email.into(),
                access_token: None,
                access_token_expires_at: None,
                deleted_at: None,
                created_from: ClientOrigin::Invitation,
                source_form_id: None,
                created_at: Utc::now(),
            };
            state.clients.push(record.clone());
            record
        }

        pub fn set_token(&self, client_id: &str, token: &str, expires_at: Option<DateTime<Utc>>) {
            for record in &mut self.state().clients {
                if record.id == client_id {
                    record.access_token = Some(token.into());
                    record.access_token_expires_at = expires_at;
                }
            }
        }

        pub fn delete_client(&self, client_id: &str) {
            for record in &mut self.state().clients {
                if record.id == client_id {
                    record.deleted_at = Some(Utc::now());
                }
            }
        }

        pub fn clients_for(&self, identity_id: &str, org: &str) -> Vec<ClientRecord> {
            self.state()
                .clients
                .iter()
                .filter(|c| {
                    c.identity_id.as_deref() == Some(identity_id)
                        && c.organization_id == org
                        && c.deleted_at.is_none()
                })
                .cloned()
                .collect()
        }

        pub fn touched(&self) -> Vec<(String, DateTime<Utc>)> {
            self.state().touched.clone()
        }

        pub fn lookup_calls(&self) -> usize {
            self.state().lookup_calls
        }
    }

    #[async_trait]
    impl MembershipLookup for FakeDirectory {
        async fn staff_memberships(
            &self,
            identity_id: &str,
        ) -> Result<Vec<StaffMembership>, GateError> {
            let mut state = self.state();
            state.lookup_calls += 1;
            if Self::flag(&self.fail_lookups) {
                return Err(GateError::LookupFailed("memberships unavailable".into()));
            }
            Ok(state
                .memberships
                .iter()
                .filter(|m| m.identity_id == identity_id)
                .cloned()
                .collect())
        }

        async fn client_records(&self, identity_id: &str) -> Result<Vec<ClientRecord>, GateError> {
            let mut state = self.state();
            state.lookup_calls += 1;
            if Self::flag(&self.fail_lookups) {
                return Err(GateError::LookupFailed("client records unavailable".into()));
            }
            Ok(state
                .clients
                .iter()
                .filter(|c| c.identity_id.as_deref() == Some(identity_id) && c.deleted_at.is_none())
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl TokenLookup for FakeDirectory {
        async fn resolve_token(&self, token: &str) -> Result<Option<ClientRecord>, GateError> {
            if Self::flag(&self.fail_lookups) {
                return Err(GateError::LookupFailed("tokens unavailable".into()));
            }
            Ok(self
                .state()
                .clients
                .iter()
                .find(|c| c.access_token.as_deref() == Some(token))
                .cloned())
        }
    }

    #[async_trait]
    impl PresenceRecorder for FakeDirectory {
        async fn touch_last_seen(
            &self,
            identity_id: &str,
            at: DateTime<Utc>,
        ) -> Result<(), GateError> {
            if Self::flag(&self.fail_presence) {
                return Err(GateError::LookupFailed("presence unavailable".into()));
            }
            self.state().touched.push((identity_id.to_string(), at));
            Ok(())
        }
    }

    #[async_trait]
    impl ClientStore for FakeDirectory {
        async fn find_client(
            &self,
            identity_id: &str,
            organization_id: &str,
        ) -> Result<Option<ClientRecord>, GateError> {
            Ok(self.clients_for(identity_id, organization_id).into_iter().next())
        }

        async fn insert_client(
            &self,
            identity: &Identity,
            organization_id: &str,
            origin: ClientOrigin,
            source_form_id: Option<&str>,
        ) -> Result<ClientRecord, GateError> {
            let conflict = GateError::ProvisionConflict {
                identity_id: identity.id.clone(),
                organization_id: organization_id.to_string(),
            };
            if !self.clients_for(&identity.id, organization_id).is_empty() {
                return Err(conflict);
            }
            let mut record =
                self.add_client(Some(&identity.id), organization_id, &identity.email);
            record.created_from = origin;
            record.source_form_id = source_form_id.map(str::to_string);
            {
                let mut state = self.state();
                if let Some(stored) = state.clients.iter_mut().find(|c| c.id == record.id) {
                    stored.created_from = origin;
                    stored.source_form_id = record.source_form_id.clone();
                }
            }
            if Self::flag(&self.race_next_insert) {
                Self::set_flag(&self.race_next_insert, false);
                return Err(conflict);
            }
            Ok(record)
        }

        async fn link_client_identity(
            &self,
            client_id: &str,
            identity_id: &str,
        ) -> Result<ClientRecord, GateError> {
            let mut state = self.state();
            let org = state
                .clients
                .iter()
                .find(|c| c.id == client_id)
                .map(|c| c.organization_id.clone());
            if let Some(org) = org
                && state.clients.iter().any(|c| {
                    c.identity_id.as_deref() == Some(identity_id)
                        && c.organization_id == org
                        && c.deleted_at.is_none()
                })
            {
                return Err(GateError::ProvisionConflict {
                    identity_id: identity_id.to_string(),
                    organization_id: org,
                });
            }
            let record = state
                .clients
                .iter_mut()
                .find(|c| c.id == client_id && c.identity_id.is_none() && c.deleted_at.is_none())
                .ok_or_else(|| GateError::ProvisionFailed(format!("{client_id} not linkable")))?;
            record.identity_id = Some(identity_id.to_string());
            Ok(record.clone())
        }
    }

    pub fn identity(id: &str, email: &str) -> Identity {
        Identity {
            id: id.into(),
            email: email.into(),
            email_verified: true,
            metadata_role: None,
            last_seen_at: None,
        }
    }
}
