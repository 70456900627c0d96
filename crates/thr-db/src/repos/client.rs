//! Client record repository.
//!
//! Every read excludes soft-deleted rows. Inserts surface storage uniqueness
//! failures unchanged so callers can check `DatabaseError::is_unique_violation`.

use chrono::{DateTime, TimeDelta, Utc};

use thr_core::entities::ClientRecord;
use thr_core::enums::ClientOrigin;
use thr_core::ids::PREFIX_CLIENT;

use crate::error::DatabaseError;
use crate::helpers::{
    generate_access_token, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime,
};
use crate::service::AccessService;

const CLIENT_COLUMNS: &str = "id, identity_id, organization_id, email, access_token, \
     access_token_expires_at, deleted_at, created_from, created_at, source_form_id";

/// Fields for a new client record. The id and `created_at` are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewClientRecord {
    pub identity_id: Option<String>,
    pub organization_id: String,
    pub email: String,
    pub created_from: ClientOrigin,
    pub source_form_id: Option<String>,
}

impl AccessService {
    /// Insert a client record.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails. A second live record for the
    /// same `(identity, organization)` reports `is_unique_violation()`.
    pub async fn insert_client(&self, new: &NewClientRecord) -> Result<ClientRecord, DatabaseError> {
        let id = self.db().generate_id(PREFIX_CLIENT).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO client_records
                    (id, identity_id, organization_id, email, created_from, source_form_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    new.identity_id.as_deref(),
                    new.organization_id.as_str(),
                    new.email.as_str(),
                    new.created_from.as_str(),
                    new.source_form_id.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(
            client = %id,
            organization = %new.organization_id,
            origin = %new.created_from,
            "client record inserted"
        );

        Ok(ClientRecord {
            id,
            identity_id: new.identity_id.clone(),
            organization_id: new.organization_id.clone(),
            email: new.email.clone(),
            access_token: None,
            access_token_expires_at: None,
            deleted_at: None,
            created_from: new.created_from,
            source_form_id: new.source_form_id.clone(),
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no live record has this id.
    pub async fn get_client(&self, id: &str) -> Result<ClientRecord, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CLIENT_COLUMNS} FROM client_records WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_client(&row)
    }

    /// Live client records linked to an identity, ordered by organization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_client_records(
        &self,
        identity_id: &str,
    ) -> Result<Vec<ClientRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CLIENT_COLUMNS} FROM client_records
                     WHERE identity_id = ?1 AND deleted_at IS NULL
                     ORDER BY organization_id"
                ),
                [identity_id],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_client(&row)?);
        }
        Ok(records)
    }

    /// The live record linking `identity_id` to `organization_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_client(
        &self,
        identity_id: &str,
        organization_id: &str,
    ) -> Result<Option<ClientRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CLIENT_COLUMNS} FROM client_records
                     WHERE identity_id = ?1 AND organization_id = ?2 AND deleted_at IS NULL"
                ),
                [identity_id, organization_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    /// Look up a live record by access token. Expired tokens are still returned.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_client_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ClientRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CLIENT_COLUMNS} FROM client_records
                     WHERE access_token = ?1 AND deleted_at IS NULL"
                ),
                [token],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    /// Issue a fresh access token for a record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no live record has this id.
    pub async fn issue_access_token(
        &self,
        client_id: &str,
        ttl: TimeDelta,
    ) -> Result<(String, DateTime<Utc>), DatabaseError> {
        let token = generate_access_token()?;
        let expires_at = Utc::now() + ttl;

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE client_records SET access_token = ?1, access_token_expires_at = ?2
                 WHERE id = ?3 AND deleted_at IS NULL",
                libsql::params![token.as_str(), expires_at.to_rfc3339(), client_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        tracing::debug!(client = client_id, %expires_at, "access token issued");
        Ok((token, expires_at))
    }

    /// Attach an identity to a token-only record.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the record is missing, deleted,
    /// or already linked, and a unique violation if the identity already holds
    /// a live record for the same organization.
    pub async fn link_client_identity(
        &self,
        client_id: &str,
        identity_id: &str,
    ) -> Result<ClientRecord, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE client_records SET identity_id = ?1
                 WHERE id = ?2 AND identity_id IS NULL AND deleted_at IS NULL",
                [identity_id, client_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "client record {client_id} is not a live unlinked record"
            )));
        }
        self.get_client(client_id).await
    }

    /// Soft-delete a record. Returns `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn delete_client(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE client_records SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                libsql::params![Utc::now().to_rfc3339(), client_id],
            )
            .await?;
        Ok(changed > 0)
    }
}

fn row_to_client(row: &libsql::Row) -> Result<ClientRecord, DatabaseError> {
    Ok(ClientRecord {
        id: row.get::<String>(0)?,
        identity_id: get_opt_string(row, 1)?,
        organization_id: row.get::<String>(2)?,
        email: row.get::<String>(3)?,
        access_token: get_opt_string(row, 4)?,
        access_token_expires_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        created_from: parse_enum(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        source_form_id: get_opt_string(row, 9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn svc_with_identity() -> (AccessService, String) {
        let svc = AccessService::new_local(":memory:").await.unwrap();
        let identity = svc.create_identity("ana@example.com", true, None).await.unwrap();
        (svc, identity.id)
    }

    fn linked(identity_id: &str, org: &str) -> NewClientRecord {
        NewClientRecord {
            identity_id: Some(identity_id.to_string()),
            organization_id: org.to_string(),
            email: "ana@example.com".into(),
            created_from: ClientOrigin::Invitation,
            source_form_id: None,
        }
    }

    fn token_only(org: &str) -> NewClientRecord {
        NewClientRecord {
            identity_id: None,
            organization_id: org.to_string(),
            email: "ana@example.com".into(),
            created_from: ClientOrigin::Invitation,
            source_form_id: None,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let (svc, id) = svc_with_identity().await;
        let inserted = svc.insert_client(&linked(&id, "org-a")).await.unwrap();

        let found = svc.find_client(&id, "org-a").await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.created_from, ClientOrigin::Invitation);
        assert!(svc.find_client(&id, "org-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn form_origin_keeps_its_source_form() {
        let (svc, id) = svc_with_identity().await;
        let inserted = svc
            .insert_client(&NewClientRecord {
                created_from: ClientOrigin::FormSubmission,
                source_form_id: Some("frm-intake".into()),
                ..linked(&id, "org-a")
            })
            .await
            .unwrap();

        let found = svc.get_client(&inserted.id).await.unwrap();
        assert_eq!(found.created_from, ClientOrigin::FormSubmission);
        assert_eq!(found.source_form_id.as_deref(), Some("frm-intake"));
    }

    #[tokio::test]
    async fn second_live_record_for_same_pair_is_unique_violation() {
        let (svc, id) = svc_with_identity().await;
        svc.insert_client(&linked(&id, "org-a")).await.unwrap();
        let err = svc.insert_client(&linked(&id, "org-a")).await.unwrap_err();
        assert!(err.is_unique_violation(), "got {err}");
    }

    #[tokio::test]
    async fn deleted_record_frees_the_pair() {
        let (svc, id) = svc_with_identity().await;
        let first = svc.insert_client(&linked(&id, "org-a")).await.unwrap();
        assert!(svc.delete_client(&first.id).await.unwrap());

        svc.insert_client(&linked(&id, "org-a")).await.unwrap();
        let records = svc.list_client_records(&id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_ne!(records[0].id, first.id);
    }

    #[tokio::test]
    async fn token_only_records_do_not_collide() {
        let (svc, _) = svc_with_identity().await;
        svc.insert_client(&token_only("org-a")).await.unwrap();
        svc.insert_client(&token_only("org-a")).await.unwrap();
    }

    #[tokio::test]
    async fn issued_token_resolves_until_deleted() {
        let (svc, _) = svc_with_identity().await;
        let record = svc.insert_client(&token_only("org-a")).await.unwrap();
        let (token, expires_at) = svc
            .issue_access_token(&record.id, TimeDelta::hours(1))
            .await
            .unwrap();

        let found = svc.find_client_by_token(&token).await.unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(found.access_token.as_deref(), Some(token.as_str()));
        assert_eq!(
            found.access_token_expires_at.map(|t| t.timestamp()),
            Some(expires_at.timestamp())
        );

        svc.delete_client(&record.id).await.unwrap();
        assert!(svc.find_client_by_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_token_is_still_returned() {
        let (svc, _) = svc_with_identity().await;
        let record = svc.insert_client(&token_only("org-a")).await.unwrap();
        let (token, _) = svc
            .issue_access_token(&record.id, TimeDelta::hours(-1))
            .await
            .unwrap();
        assert!(svc.find_client_by_token(&token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn link_attaches_identity_once() {
        let (svc, id) = svc_with_identity().await;
        let record = svc.insert_client(&token_only("org-a")).await.unwrap();

        let linked = svc.link_client_identity(&record.id, &id).await.unwrap();
        assert_eq!(linked.identity_id.as_deref(), Some(id.as_str()));

        let err = svc.link_client_identity(&record.id, &id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn issue_token_for_missing_record_is_no_result() {
        let (svc, _) = svc_with_identity().await;
        let err = svc
            .issue_access_token("cli-missing", TimeDelta::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }
}
