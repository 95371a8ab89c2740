//! Isolated per-attempt workspace directories.
//!
//! Workspace names combine a UTC timestamp with a random alphanumeric
//! suffix so two concurrent conversions never collide on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// An isolated workspace directory. When `owns_cleanup` is true, dropping
/// this value's owner (the sandbox) is responsible for removing `root`.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub owns_cleanup: bool,
}

impl Workspace {
    /// Create a fresh temporary workspace under `base_dir`.
    pub fn create_temp(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("create workspace base dir {}", base_dir.display()))?;
        let name = unique_name();
        let root = base_dir.join(name);
        fs::create_dir_all(&root)
            .with_context(|| format!("create workspace root {}", root.display()))?;
        Ok(Self {
            root,
            owns_cleanup: true,
        })
    }

    /// Wrap a caller-supplied directory. The caller owns cleanup.
    pub fn borrowed(root: PathBuf) -> Self {
        Self {
            root,
            owns_cleanup: false,
        }
    }

    /// Remove the workspace from disk if this sandbox created it.
    pub fn teardown(&self) -> Result<()> {
        if self.owns_cleanup && self.root.exists() {
            fs::remove_dir_all(&self.root)
                .with_context(|| format!("remove workspace {}", self.root.display()))?;
        }
        Ok(())
    }
}

fn unique_name() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S%3f").to_string();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("lats-{timestamp}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_temp_makes_a_fresh_directory() {
        let base = tempdir().expect("tempdir");
        let ws = Workspace::create_temp(base.path()).expect("workspace");
        assert!(ws.root.exists());
        assert!(ws.root.starts_with(base.path()));
    }

    #[test]
    fn two_workspaces_never_collide() {
        let base = tempdir().expect("tempdir");
        let a = Workspace::create_temp(base.path()).expect("workspace a");
        let b = Workspace::create_temp(base.path()).expect("workspace b");
        assert_ne!(a.root, b.root);
    }

    #[test]
    fn teardown_removes_owned_workspace() {
        let base = tempdir().expect("tempdir");
        let ws = Workspace::create_temp(base.path()).expect("workspace");
        ws.teardown().expect("teardown");
        assert!(!ws.root.exists());
    }

    #[test]
    fn borrowed_workspace_is_not_removed() {
        let base = tempdir().expect("tempdir");
        let ws = Workspace::borrowed(base.path().to_path_buf());
        ws.teardown().expect("teardown");
        assert!(base.path().exists());
    }
}
