use std::path::PathBuf;

use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context;

/// Load `.env` for the target project, then the layered config.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<thr_config::ThresholdConfig> {
    load_project_dotenv(flags)?;
    thr_config::ThresholdConfig::load().map_err(anyhow::Error::from)
}

fn load_project_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match &flags.project {
        Some(project) => {
            let project_path = PathBuf::from(project);
            if project_path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name == context::PROJECT_DIR)
            {
                project_path
                    .parent()
                    .map(std::path::Path::to_path_buf)
                    .unwrap_or(project_path.clone())
            } else {
                project_path
            }
        }
        None => {
            let cwd = std::env::current_dir().context("failed to determine current directory")?;
            context::find_project_root(&cwd).unwrap_or(cwd)
        }
    };

    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
