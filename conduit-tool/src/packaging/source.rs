use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::FileType;
use std::path::{Path, PathBuf};

use crate::error::FilesystemError;

/// One child of a listed directory.
#[derive(Debug)]
pub struct DirChild {
    pub path: PathBuf,
    pub file_name: OsString,
    /// Not followed through symlinks.
    pub file_type: std::io::Result<FileType>,
}

/// Where the traversal reads directories and files from.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Children of `dir`, sorted by file name.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<DirChild>, FilesystemError>;

    /// Full contents of a regular file plus its modification time, if known.
    async fn read_file(
        &self,
        path: &Path,
    ) -> Result<(Vec<u8>, Option<DateTime<Utc>>), FilesystemError>;
}

/// The local filesystem, through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

#[async_trait]
impl FileSource for LocalFs {
    async fn list_dir(&self, dir: &Path) -> Result<Vec<DirChild>, FilesystemError> {
        let list_error = |source| FilesystemError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut read_dir = tokio::fs::read_dir(dir).await.map_err(list_error)?;
        let mut children = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(list_error)? {
            children.push(DirChild {
                path: entry.path(),
                file_name: entry.file_name(),
                file_type: entry.file_type().await,
            });
        }
        children.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(children)
    }

    async fn read_file(
        &self,
        path: &Path,
    ) -> Result<(Vec<u8>, Option<DateTime<Utc>>), FilesystemError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| FilesystemError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Ok((data, modified))
    }
}
