//! # Runtime Assets
//!
//! The receipt page template ships in the source `assets/` directory and is
//! read from a runtime asset directory. [`provision`] copies it across once
//! at startup.
//!
//! ```text
//! asset_source_dir/              asset_dir/
//! └── receipt.html   ──copy──►   └── receipt.html   (kept if it exists)
//! ```
//!
//! An existing runtime file is never overwritten, so a school can edit its
//! receipt layout in place.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

/// File name of the receipt page template.
pub const RECEIPT_TEMPLATE: &str = "receipt.html";

/// Asset errors. Every variant means a runtime resource is unavailable.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Asset {} could not be read or written: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> AssetError + '_ {
    move |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copies every file of `source` into `dest`, skipping files that already
/// exist there.
///
/// Creates `dest` if needed. Safe to run on every start.
///
/// ## Returns
/// * `Ok(n)` - number of files copied (0 when everything was present)
/// * `Err(AssetError::SourceMissing)` - `source` is not a directory
pub async fn provision(source: &Path, dest: &Path) -> Result<usize, AssetError> {
    if !fs::metadata(source).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Err(AssetError::SourceMissing(source.to_path_buf()));
    }

    fs::create_dir_all(dest).await.map_err(io_error(dest))?;

    let mut entries = fs::read_dir(source).await.map_err(io_error(source))?;
    let mut copied = 0;

    while let Some(entry) = entries.next_entry().await.map_err(io_error(source))? {
        let from = entry.path();
        let file_type = entry.file_type().await.map_err(io_error(&from))?;
        if !file_type.is_file() {
            continue;
        }

        let to = dest.join(entry.file_name());
        if fs::try_exists(&to).await.map_err(io_error(&to))? {
            debug!(path = %to.display(), "Asset already provisioned");
            continue;
        }

        fs::copy(&from, &to).await.map_err(io_error(&to))?;
        info!(from = %from.display(), to = %to.display(), "Asset provisioned");
        copied += 1;
    }

    Ok(copied)
}

/// Handle to the runtime asset directory.
#[derive(Debug, Clone)]
pub struct ReceiptAssets {
    dir: PathBuf,
}

impl ReceiptAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ReceiptAssets { dir: dir.into() }
    }

    pub fn template_path(&self) -> PathBuf {
        self.dir.join(RECEIPT_TEMPLATE)
    }

    /// Reads the receipt page template. Read at every call, so edits to the
    /// runtime copy take effect without a restart.
    pub async fn template(&self) -> Result<String, AssetError> {
        let path = self.template_path();
        fs::read_to_string(&path).await.map_err(io_error(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    #[tokio::test]
    async fn test_provision_copies_then_skips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        let dest = dir.path().join("runtime/assets");
        stdfs::create_dir_all(source.join("nested")).unwrap();
        stdfs::write(source.join(RECEIPT_TEMPLATE), "<html>{rows}</html>").unwrap();

        assert_eq!(provision(&source, &dest).await.unwrap(), 1);
        assert!(!dest.join("nested").exists());
        assert_eq!(provision(&source, &dest).await.unwrap(), 0);

        let assets = ReceiptAssets::new(&dest);
        assert_eq!(assets.template().await.unwrap(), "<html>{rows}</html>");
    }

    #[tokio::test]
    async fn test_existing_runtime_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assets");
        let dest = dir.path().join("runtime");
        stdfs::create_dir_all(&source).unwrap();
        stdfs::create_dir_all(&dest).unwrap();
        stdfs::write(source.join(RECEIPT_TEMPLATE), "shipped").unwrap();
        stdfs::write(dest.join(RECEIPT_TEMPLATE), "customised").unwrap();

        assert_eq!(provision(&source, &dest).await.unwrap(), 0);
        assert_eq!(stdfs::read_to_string(dest.join(RECEIPT_TEMPLATE)).unwrap(), "customised");
    }

    #[tokio::test]
    async fn test_missing_source_and_template() {
        let dir = tempfile::tempdir().unwrap();

        let err = provision(&dir.path().join("nope"), dir.path()).await.unwrap_err();
        assert!(matches!(err, AssetError::SourceMissing(_)));

        let err = ReceiptAssets::new(dir.path()).template().await.unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
