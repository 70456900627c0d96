//! Service layer the repos hang off of.
//!
//! `AccessService` wraps `ThresholdDb`. All repo methods are implemented as
//! `impl AccessService` blocks under `repos/`.

use crate::ThresholdDb;
use crate::error::DatabaseError;

pub struct AccessService {
    db: ThresholdDb,
}

impl AccessService {
    /// Create a new service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = ThresholdDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    #[must_use]
    pub const fn from_db(db: ThresholdDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ThresholdDb {
        &self.db
    }
}
