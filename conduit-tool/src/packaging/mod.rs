use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ArchiveWriteError, FilesystemError, Result};
use crate::fs_utils::EntryFilter;

pub mod source;
pub mod zip;

pub use source::{DirChild, FileSource, LocalFs};

/// One file ready to be stored in the archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path relative to the traversal root, `/`-separated.
    pub name: String,
    pub data: Vec<u8>,
    pub modified: Option<DateTime<Utc>>,
}

/// Destination for the entries produced by a traversal.
///
/// The traversal owns no writer of its own; it hands every entry to the sink
/// it was given. Any error returned here aborts the traversal.
#[async_trait]
pub trait EntrySink: Send {
    async fn add_entry(&mut self, entry: ArchiveEntry) -> Result<(), ArchiveWriteError>;
}

/// Outcome of a traversal that was not aborted.
#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub entries: usize,
    pub bytes: u64,
    /// Files and directories that could not be read and were left out.
    pub warnings: Vec<FilesystemError>,
}

impl ArchiveReport {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Sink that keeps entry names and sizes instead of writing anything.
/// Backs `--dry` runs.
#[derive(Debug, Default)]
pub struct ListingSink {
    pub entries: Vec<(String, u64)>,
}

#[async_trait]
impl EntrySink for ListingSink {
    async fn add_entry(&mut self, entry: ArchiveEntry) -> Result<(), ArchiveWriteError> {
        self.entries.push((entry.name, entry.data.len() as u64));
        Ok(())
    }
}

/// Check that `root` is an existing directory and return its canonical form.
pub async fn traversal_root(root: &Path) -> Result<PathBuf, FilesystemError> {
    let unavailable = |source| FilesystemError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    };

    let root = tokio::fs::canonicalize(root).await.map_err(unavailable)?;
    let metadata = tokio::fs::metadata(&root).await.map_err(unavailable)?;
    if !metadata.is_dir() {
        return Err(FilesystemError::NotADirectory(root));
    }
    Ok(root)
}

/// Recursively feed every regular file under `root` into `sink`.
///
/// The root must be a listable directory. Below it, unreadable files and
/// directories are recorded as warnings and skipped; sink errors abort.
pub async fn archive_tree<S: EntrySink>(
    root: &Path,
    sink: &mut S,
    filter: &EntryFilter,
) -> Result<ArchiveReport> {
    archive_tree_from(&LocalFs, root, sink, filter).await
}

/// [`archive_tree`] reading through an arbitrary [`FileSource`].
pub async fn archive_tree_from<F: FileSource, S: EntrySink>(
    files: &F,
    root: &Path,
    sink: &mut S,
    filter: &EntryFilter,
) -> Result<ArchiveReport> {
    let root = traversal_root(root).await?;
    let children = files.list_dir(&root).await?;

    let mut report = ArchiveReport::default();
    add_children(files, sink, filter, "", children, &mut report).await?;
    Ok(report)
}

async fn add_dir<F: FileSource, S: EntrySink>(
    files: &F,
    sink: &mut S,
    filter: &EntryFilter,
    dir: &Path,
    prefix: &str,
    report: &mut ArchiveReport,
) -> Result<(), ArchiveWriteError> {
    match files.list_dir(dir).await {
        Ok(children) => add_children(files, sink, filter, prefix, children, report).await,
        Err(err) => {
            warn!("{err}");
            report.warnings.push(err);
            Ok(())
        }
    }
}

async fn add_children<F: FileSource, S: EntrySink>(
    files: &F,
    sink: &mut S,
    filter: &EntryFilter,
    prefix: &str,
    children: Vec<DirChild>,
    report: &mut ArchiveReport,
) -> Result<(), ArchiveWriteError> {
    for DirChild {
        path,
        file_name,
        file_type,
    } in children
    {
        // Lossy names could collide with a sibling, so such files are left out.
        let Some(file_name) = file_name.to_str() else {
            let err = FilesystemError::InvalidName(path);
            warn!("{err}");
            report.warnings.push(err);
            continue;
        };
        let name = format!("{prefix}{file_name}");

        if filter.is_skipped(&path, &name) {
            debug!("skipping {name}");
            continue;
        }

        let file_type = match file_type {
            Ok(file_type) => file_type,
            Err(source) => {
                let err = FilesystemError::ReadFile { path, source };
                warn!("{err}");
                report.warnings.push(err);
                continue;
            }
        };

        if file_type.is_dir() {
            debug!("descending into {name}/");
            Box::pin(add_dir(files, sink, filter, &path, &format!("{name}/"), report)).await?;
        } else if file_type.is_file() {
            match files.read_file(&path).await {
                Ok((data, modified)) => {
                    debug!("adding {name}");
                    let size = data.len() as u64;
                    sink.add_entry(ArchiveEntry {
                        name,
                        data,
                        modified,
                    })
                    .await?;
                    report.entries += 1;
                    report.bytes += size;
                }
                Err(err) => {
                    warn!("{err}");
                    report.warnings.push(err);
                }
            }
        } else {
            debug!("ignoring {name}: not a regular file or directory");
        }
    }
    Ok(())
}
