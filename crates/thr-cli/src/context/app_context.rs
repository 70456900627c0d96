use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use thr_config::ThresholdConfig;
use thr_core::entities::Identity;
use thr_db::service::AccessService;
use thr_gate::slots::FileSlots;
use thr_gate::{
    ClientAutoProvisioner, ClientTokenResolver, HintStore, IdentificationStore, SessionGate,
};

use crate::cli::root_commands::{IdentityRef, SessionIdentity};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<AccessService>,
    pub config: ThresholdConfig,
    pub gate: SessionGate,
    pub tokens: ClientTokenResolver,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open storage and wire the gate for the discovered project root.
    pub async fn init(project_root: PathBuf, config: ThresholdConfig) -> anyhow::Result<Self> {
        let db_path = if config.database.is_in_memory() {
            config.database.path.clone()
        } else {
            resolve_in_project(&project_root, &config.database.path)
                .to_string_lossy()
                .into_owned()
        };
        let service = Arc::new(
            AccessService::new_local(&db_path)
                .await
                .with_context(|| format!("failed to open database at {db_path}"))?,
        );

        let hints_dir = resolve_in_project(&project_root, &config.hints.dir);
        let slots = Arc::new(FileSlots::new(hints_dir));

        let hints = HintStore::new(slots.clone()).with_ttl(config.hints.ttl());
        let identification = IdentificationStore::new(slots);

        let mut gate = SessionGate::new(
            hints,
            service.clone(),
            ClientAutoProvisioner::new(service.clone()),
        )
        .with_token_linking(identification.clone(), service.clone(), service.clone());
        if config.session.touch_last_seen {
            gate = gate.with_presence(service.clone());
        }
        let tokens = ClientTokenResolver::new(service.clone(), identification);

        tracing::debug!(
            project = %project_root.display(),
            database = %db_path,
            "threshold context ready"
        );

        Ok(Self {
            service,
            config,
            gate,
            tokens,
            project_root,
        })
    }

    /// Look up the identity named on the command line.
    pub async fn identity(&self, who: &IdentityRef) -> anyhow::Result<Identity> {
        self.lookup(who.identity.as_deref(), who.email.as_deref())
            .await?
            .context("either --identity or --email is required")
    }

    /// Like [`Self::identity`], but no selector means no session.
    pub async fn session_identity(&self, who: &SessionIdentity) -> anyhow::Result<Option<Identity>> {
        self.lookup(who.identity.as_deref(), who.email.as_deref())
            .await
    }

    async fn lookup(
        &self,
        id: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<Option<Identity>> {
        if let Some(id) = id {
            let identity = self
                .service
                .get_identity(id)
                .await
                .with_context(|| format!("identity '{id}' not found"))?;
            return Ok(Some(identity));
        }
        if let Some(email) = email {
            let identity = self
                .service
                .find_identity_by_email(email)
                .await?
                .with_context(|| format!("no identity with email '{email}'"))?;
            return Ok(Some(identity));
        }
        Ok(None)
    }
}

/// Relative config paths are anchored at the project root.
#[must_use]
pub fn resolve_in_project(project_root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use thr_config::ThresholdConfig;
    use thr_core::entities::{Destination, Hint};
    use thr_core::enums::{AuthEventKind, HintContext, StaffRole};
    use thr_gate::AuthEvent;

    use super::{AppContext, resolve_in_project};
    use crate::cli::root_commands::{IdentityRef, SessionIdentity};

    async fn context(dir: &TempDir) -> AppContext {
        let mut config = ThresholdConfig::default();
        config.database.path = ":memory:".into();
        AppContext::init(dir.path().to_path_buf(), config)
            .await
            .expect("context should init")
    }

    #[tokio::test]
    async fn stored_hints_live_under_the_project_root() {
        let dir = TempDir::new().expect("tempdir should create");
        let ctx = context(&dir).await;

        ctx.gate
            .hints()
            .write(&Hint::new(HintContext::Agency, "org-a"))
            .expect("hint should store");
        assert!(dir.path().join(".threshold/hints").is_dir());
    }

    #[tokio::test]
    async fn identity_selectors_resolve_by_id_and_email() {
        let dir = TempDir::new().expect("tempdir should create");
        let ctx = context(&dir).await;
        let ana = ctx
            .service
            .create_identity("ana@example.com", true, None)
            .await
            .expect("identity should create");

        let by_email = ctx
            .identity(&IdentityRef {
                identity: None,
                email: Some("ANA@example.com".into()),
            })
            .await
            .expect("lookup by email");
        assert_eq!(by_email.id, ana.id);

        let none = ctx
            .session_identity(&SessionIdentity {
                identity: None,
                email: None,
            })
            .await
            .expect("empty selector");
        assert!(none.is_none());

        let missing = ctx
            .identity(&IdentityRef {
                identity: Some("usr-missing".into()),
                email: None,
            })
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn gate_routes_and_records_presence() {
        let dir = TempDir::new().expect("tempdir should create");
        let ctx = context(&dir).await;
        let ana = ctx
            .service
            .create_identity("ana@example.com", true, None)
            .await
            .expect("identity should create");
        ctx.service
            .add_membership(&ana.id, "org-a", StaffRole::Owner)
            .await
            .expect("membership should add");

        let outcome = ctx
            .gate
            .handle(&AuthEvent::new(AuthEventKind::SignIn).with_identity(ana.clone()))
            .await;
        ctx.gate.settle().await;

        assert_eq!(outcome.destination, Destination::agency("org-a"));
        let seen = ctx
            .service
            .get_identity(&ana.id)
            .await
            .expect("identity should load")
            .last_seen_at;
        assert!(seen.is_some());
    }

    #[test]
    fn relative_paths_join_project_root() {
        assert_eq!(
            resolve_in_project(Path::new("/srv/app"), ".threshold/threshold.db"),
            PathBuf::from("/srv/app/.threshold/threshold.db")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_in_project(Path::new("/srv/app"), "/var/lib/thr.db"),
            PathBuf::from("/var/lib/thr.db")
        );
    }
}
