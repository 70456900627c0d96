//! Staff membership repository.
//!
//! Removal is a soft delete. Re-adding a removed membership revives the row
//! with the new role.

use chrono::Utc;

use thr_core::entities::StaffMembership;
use thr_core::enums::StaffRole;

use crate::error::DatabaseError;
use crate::helpers::parse_enum;
use crate::service::AccessService;

impl AccessService {
    /// Add (or revive) a staff membership.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the identity does not exist or the write fails.
    pub async fn add_membership(
        &self,
        identity_id: &str,
        organization_id: &str,
        role: StaffRole,
    ) -> Result<StaffMembership, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO staff_memberships (identity_id, organization_id, role, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (identity_id, organization_id)
                 DO UPDATE SET role = excluded.role, deleted_at = NULL",
                libsql::params![
                    identity_id,
                    organization_id,
                    role.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(identity = identity_id, organization = organization_id, %role, "membership added");

        Ok(StaffMembership {
            identity_id: identity_id.to_string(),
            organization_id: organization_id.to_string(),
            role,
        })
    }

    /// Soft-delete a membership. Returns `false` if there was no live membership.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn remove_membership(
        &self,
        identity_id: &str,
        organization_id: &str,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE staff_memberships SET deleted_at = ?1
                 WHERE identity_id = ?2 AND organization_id = ?3 AND deleted_at IS NULL",
                libsql::params![Utc::now().to_rfc3339(), identity_id, organization_id],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Live staff memberships for an identity, ordered by organization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row holds an unknown role.
    pub async fn list_staff_memberships(
        &self,
        identity_id: &str,
    ) -> Result<Vec<StaffMembership>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT identity_id, organization_id, role FROM staff_memberships
                 WHERE identity_id = ?1 AND deleted_at IS NULL
                 ORDER BY organization_id",
                [identity_id],
            )
            .await?;

        let mut memberships = Vec::new();
        while let Some(row) = rows.next().await? {
            memberships.push(row_to_membership(&row)?);
        }
        Ok(memberships)
    }
}

fn row_to_membership(row: &libsql::Row) -> Result<StaffMembership, DatabaseError> {
    Ok(StaffMembership {
        identity_id: row.get::<String>(0)?,
        organization_id: row.get::<String>(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
    })
}
