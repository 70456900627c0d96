//! Single-use routing hints that survive one authentication round-trip.
//!
//! A hint is written when a flow starts (e.g. a client-specific login page is
//! opened for an organization) and consumed by the next resolution whether or
//! not it was honored.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use thr_core::entities::Hint;

use crate::error::GateError;
use crate::slots::Slots;

pub const CONTEXT_KEY: &str = "auth_context";
pub const ORG_KEY: &str = "auth_org_id";
pub const WRITTEN_AT_KEY: &str = "auth_context_written_at";

/// Default hint lifetime: 30 minutes.
pub const DEFAULT_HINT_TTL: Duration = Duration::from_secs(30 * 60);

/// Raw `(context, organization, written_at)` slot values.
type StoredParts = (Option<String>, Option<String>, Option<String>);

#[derive(Clone)]
pub struct HintStore {
    slots: Arc<dyn Slots>,
    ttl: Option<TimeDelta>,
    guard: Arc<Mutex<()>>,
}

impl HintStore {
    /// Hint store with the default 30 minute lifetime.
    #[must_use]
    pub fn new(slots: Arc<dyn Slots>) -> Self {
        Self {
            slots,
            ttl: TimeDelta::from_std(DEFAULT_HINT_TTL).ok(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Override the lifetime. `None` keeps hints until consumed.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl.and_then(|d| TimeDelta::from_std(d).ok());
        self
    }

    /// Overwrite any existing hint.
    ///
    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend rejects the write.
    pub fn write(&self, hint: &Hint) -> Result<(), GateError> {
        self.write_at(hint, Utc::now())
    }

    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend rejects the write.
    pub fn write_at(&self, hint: &Hint, at: DateTime<Utc>) -> Result<(), GateError> {
        let _lock = self.lock();
        self.slots.set(CONTEXT_KEY, hint.context.as_str())?;
        self.slots.set(ORG_KEY, &hint.organization_id)?;
        self.slots.set(WRITTEN_AT_KEY, &at.to_rfc3339())?;
        tracing::debug!(context = %hint.context, organization = %hint.organization_id, "hint stored");
        Ok(())
    }

    /// Return the current hint, if any, and remove it.
    ///
    /// Never fails: an unreadable store reads as "no hint".
    pub fn read_and_clear(&self) -> Option<Hint> {
        self.read_and_clear_at(Utc::now())
    }

    pub fn read_and_clear_at(&self, now: DateTime<Utc>) -> Option<Hint> {
        let _lock = self.lock();
        let (context, organization_id, written_at) = match self.take_parts() {
            Ok(parts) => parts,
            Err(error) => {
                tracing::warn!(%error, "hint store unavailable; continuing without hint");
                self.clear_unlocked();
                return None;
            }
        };

        let hint = Hint::from_parts(context.as_deref(), organization_id.as_deref());
        if hint.is_none() && (context.is_some() || organization_id.is_some()) {
            tracing::debug!("incomplete stored hint discarded");
            return None;
        }
        let hint = hint?;

        if let Some(ttl) = self.ttl {
            let written_at = written_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            match written_at {
                Some(at) if now - at <= ttl => {}
                _ => {
                    tracing::debug!(organization = %hint.organization_id, "stored hint expired");
                    return None;
                }
            }
        }

        Some(hint)
    }

    /// Remove any stored hint without reading it.
    ///
    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend rejects the removal.
    pub fn clear(&self) -> Result<(), GateError> {
        let _lock = self.lock();
        self.slots.remove(CONTEXT_KEY)?;
        self.slots.remove(ORG_KEY)?;
        self.slots.remove(WRITTEN_AT_KEY)?;
        Ok(())
    }

    fn take_parts(&self) -> Result<StoredParts, GateError> {
        Ok((
            self.slots.take(CONTEXT_KEY)?,
            self.slots.take(ORG_KEY)?,
            self.slots.take(WRITTEN_AT_KEY)?,
        ))
    }

    fn clear_unlocked(&self) {
        for key in [CONTEXT_KEY, ORG_KEY, WRITTEN_AT_KEY] {
            if let Err(error) = self.slots.remove(key) {
                tracing::warn!(%error, key, "failed to clear hint slot");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HintStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintStore").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
