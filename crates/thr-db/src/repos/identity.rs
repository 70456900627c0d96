//! Identity repository.
//!
//! Identities are created by the auth provider on sign-up; here they are
//! seeded explicitly. The only field Threshold writes afterwards is
//! `last_seen_at`.

use chrono::{DateTime, Utc};

use thr_core::entities::Identity;
use thr_core::ids::PREFIX_IDENTITY;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, parse_optional_datetime};
use crate::service::AccessService;

const IDENTITY_COLUMNS: &str = "id, email, email_verified, metadata_role, last_seen_at";

impl AccessService {
    /// Create an identity with a generated `usr-` id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if insertion fails (including a duplicate email,
    /// which reports `is_unique_violation()`).
    pub async fn create_identity(
        &self,
        email: &str,
        email_verified: bool,
        metadata_role: Option<&str>,
    ) -> Result<Identity, DatabaseError> {
        let id = self.db().generate_id(PREFIX_IDENTITY).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO identities (id, email, email_verified, metadata_role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    email,
                    i64::from(email_verified),
                    metadata_role,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(identity = %id, "identity created");

        Ok(Identity {
            id,
            email: email.to_string(),
            email_verified,
            metadata_role: metadata_role.map(str::to_string),
            last_seen_at: None,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the identity does not exist.
    pub async fn get_identity(&self, id: &str) -> Result<Identity, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_identity(&row)
    }

    /// Case-insensitive lookup by email.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_identity_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {IDENTITY_COLUMNS} FROM identities WHERE lower(email) = lower(?1)"
                ),
                [email.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_identity(&row)?)),
            None => Ok(None),
        }
    }

    /// Mark the identity's email as verified.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the identity does not exist.
    pub async fn verify_email(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE identities SET email_verified = 1 WHERE id = ?1",
                [id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Record the identity's last activity.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the identity does not exist.
    pub async fn touch_last_seen(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE identities SET last_seen_at = ?1 WHERE id = ?2",
                libsql::params![at.to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

fn row_to_identity(row: &libsql::Row) -> Result<Identity, DatabaseError> {
    Ok(Identity {
        id: row.get::<String>(0)?,
        email: row.get::<String>(1)?,
        email_verified: get_bool(row, 2)?,
        metadata_role: get_opt_string(row, 3)?,
        last_seen_at: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
    })
}
