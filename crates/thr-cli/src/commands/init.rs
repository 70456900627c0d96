use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use thr_config::ThresholdConfig;
use thr_db::service::AccessService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::{PROJECT_DIR, resolve_in_project};
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    database: String,
    hints_dir: String,
}

/// Handle `thr init`.
///
/// Idempotent: re-running migrates an existing database in place.
pub async fn handle(
    args: &InitArgs,
    config: &ThresholdConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let root = match args.path.as_deref().or(flags.project.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let project_dir = root.join(PROJECT_DIR);
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;

    let hints_dir = resolve_in_project(&root, &config.hints.dir);
    std::fs::create_dir_all(&hints_dir)
        .with_context(|| format!("failed to create {}", hints_dir.display()))?;

    let database = if config.database.is_in_memory() {
        config.database.path.clone()
    } else {
        let path = resolve_in_project(&root, &config.database.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        path.to_string_lossy().into_owned()
    };
    AccessService::new_local(&database)
        .await
        .with_context(|| format!("failed to initialize database at {database}"))?;

    tracing::info!(project = %root.display(), %database, "threshold project initialized");

    output(
        &InitResponse {
            project_root: root.to_string_lossy().into_owned(),
            database,
            hints_dir: hints_dir.to_string_lossy().into_owned(),
        },
        flags.format,
    )
}
