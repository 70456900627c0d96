use std::path::{Path, PathBuf};

/// Marker directory that makes a directory a threshold project.
pub const PROJECT_DIR: &str = ".threshold";

/// Walk upwards from `start` until a `.threshold` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
