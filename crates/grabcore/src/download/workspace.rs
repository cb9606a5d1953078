//! Per-request scratch directory.
//!
//! Every handler invocation downloads into its own directory under the
//! download root, so concurrent requests never share a path. The directory
//! is removed by [`TempWorkspace::cleanup`] on success and by `Drop` of the
//! underlying [`TempDir`] on every other exit path.

use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};

use crate::core::error::AppError;

/// Prefix of per-request directory names
pub const WORKSPACE_PREFIX: &str = "req-";

#[derive(Debug)]
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    /// Creates a fresh unique directory under `root` (creating `root` too if needed).
    pub async fn create(root: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(root).await?;
        let dir = Builder::new().prefix(WORKSPACE_PREFIX).tempdir_in(root)?;
        log::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory and everything in it, off the async worker.
    pub async fn cleanup(self) -> Result<(), AppError> {
        let dir = self.dir;
        let shown = dir.path().display().to_string();
        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(std::io::Error::other)??;
        log::debug!("Removed workspace {}", shown);
        Ok(())
    }

    /// Moves `file` out of the workspace into `dest_dir`, then removes the workspace.
    ///
    /// Returns the final path of the file.
    pub async fn persist(self, file: &Path, dest_dir: &Path) -> Result<PathBuf, AppError> {
        let file_name = file
            .file_name()
            .ok_or_else(|| AppError::Validation(format!("Not a file path: {}", file.display())))?;
        tokio::fs::create_dir_all(dest_dir).await?;
        let target = dest_dir.join(file_name);

        if let Err(e) = tokio::fs::rename(file, &target).await {
            // rename fails across filesystems
            log::debug!("rename failed ({}), copying {} instead", e, file.display());
            tokio::fs::copy(file, &target).await?;
        }

        self.cleanup().await?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workspaces_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = TempWorkspace::create(root.path()).await.unwrap();
        let b = TempWorkspace::create(root.path()).await.unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(root.path()));
        assert!(a.path().is_dir());
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(WORKSPACE_PREFIX));
    }

    #[tokio::test]
    async fn test_create_makes_missing_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("downloads").join("nested");
        let ws = TempWorkspace::create(&root).await.unwrap();
        assert!(ws.path().starts_with(&root));
        assert!(ws.path().is_dir());
    }

    #[tokio::test]
    async fn test_cleanup_removes_files() {
        let root = tempfile::tempdir().unwrap();
        let ws = TempWorkspace::create(root.path()).await.unwrap();
        let file = ws.path().join("video.mp4");
        std::fs::write(&file, b"data").unwrap();
        let dir = ws.path().to_path_buf();

        ws.cleanup().await.unwrap();
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = {
            let ws = TempWorkspace::create(root.path()).await.unwrap();
            std::fs::write(ws.path().join("partial.mp4.part"), b"data").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_persist_moves_file_out() {
        let root = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let ws = TempWorkspace::create(root.path()).await.unwrap();
        let file = ws.path().join("abc.mp4");
        std::fs::write(&file, b"video").unwrap();
        let dir = ws.path().to_path_buf();

        let saved = ws.persist(&file, dest.path()).await.unwrap();
        assert_eq!(saved, dest.path().join("abc.mp4"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"video");
        assert!(!dir.exists());
    }
}
