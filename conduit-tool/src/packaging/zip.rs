use async_trait::async_trait;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipDateTime, ZipEntryBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::{ArchiveEntry, ArchiveReport, EntrySink, archive_tree, traversal_root};
use crate::error::{ArchiveWriteError, FilesystemError, Result};
use crate::fs_utils::EntryFilter;
use crate::sink::save_file::create_file_writer;

/// Compression algorithm to use when creating the ZIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compressor {
    Deflate,
    #[default]
    Stored,
}

impl From<Compressor> for Compression {
    fn from(compressor: Compressor) -> Self {
        match compressor {
            Compressor::Deflate => Compression::Deflate,
            Compressor::Stored => Compression::Stored,
        }
    }
}

/// Entry sink writing a zip archive to a file on disk.
///
/// The writer is consumed by [`ZipSink::finish`], so nothing can open the
/// archive for reading through this handle before it is finalized.
pub struct ZipSink {
    writer: ZipFileWriter<File>,
    path: PathBuf,
    compression: Compression,
    names: HashSet<String>,
}

impl ZipSink {
    pub async fn create(path: &Path, compressor: Compressor) -> Result<Self, FilesystemError> {
        let file = create_file_writer(path).await?;
        Ok(Self {
            writer: ZipFileWriter::with_tokio(file),
            path: path.to_path_buf(),
            compression: compressor.into(),
            names: HashSet::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the central directory, then flush and sync the file.
    pub async fn finish(self) -> Result<(), ArchiveWriteError> {
        let path = self.path;
        let mut file = self
            .writer
            .close()
            .await
            .map_err(|source| ArchiveWriteError::Finalize {
                path: path.clone(),
                source,
            })?
            .into_inner();

        file.flush()
            .await
            .map_err(|source| ArchiveWriteError::Flush {
                path: path.clone(),
                source,
            })?;
        file.sync_all()
            .await
            .map_err(|source| ArchiveWriteError::Flush { path, source })
    }

    /// Drop the writer and remove the incomplete archive.
    pub async fn discard(self) {
        let path = self.path;
        drop(self.writer);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!("failed to remove incomplete archive {path:?}: {err}");
        }
    }
}

#[async_trait]
impl EntrySink for ZipSink {
    async fn add_entry(&mut self, entry: ArchiveEntry) -> Result<(), ArchiveWriteError> {
        if !self.names.insert(entry.name.clone()) {
            return Err(ArchiveWriteError::DuplicateEntry(entry.name));
        }

        let mut builder = ZipEntryBuilder::new(entry.name.clone().into(), self.compression);
        if let Some(modified) = entry.modified {
            builder = builder.last_modification_date(ZipDateTime::from_chrono(&modified));
        }

        self.writer
            .write_entry_whole(builder, &entry.data)
            .await
            .map_err(|source| ArchiveWriteError::Entry {
                name: entry.name,
                source,
            })
    }
}

/// Package every regular file under `root` into a zip archive at `destination`.
///
/// The root is validated before the destination is created. On a fatal error
/// the partially written archive is removed.
pub async fn build_archive(
    root: &Path,
    destination: &Path,
    compressor: Compressor,
    filter: &EntryFilter,
) -> Result<ArchiveReport> {
    let root = traversal_root(root).await?;
    let mut sink = ZipSink::create(destination, compressor).await?;

    // The archive may live inside the tree it packages.
    let filter = match tokio::fs::canonicalize(destination).await {
        Ok(archive) => filter.clone().excluding(archive),
        Err(_) => filter.clone(),
    };

    let report = match archive_tree(&root, &mut sink, &filter).await {
        Ok(report) => report,
        Err(err) => {
            sink.discard().await;
            return Err(err);
        }
    };

    let path = sink.path().to_path_buf();
    if let Err(err) = sink.finish().await {
        if let Err(remove_err) = tokio::fs::remove_file(&path).await {
            warn!("failed to remove incomplete archive {path:?}: {remove_err}");
        }
        return Err(err.into());
    }

    info!(
        "archived {} files ({} bytes) from {root:?} into {destination:?}",
        report.entries, report.bytes
    );
    Ok(report)
}
