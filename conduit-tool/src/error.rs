//! Error types for packaging and shipping a project tree.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem failures while reading the tree or creating the archive.
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("traversal root {path:?} cannot be accessed: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("traversal root {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot list directory {path:?}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file name of {0:?} is not valid UTF-8")]
    InvalidName(PathBuf),

    #[error("cannot create archive {path:?}: {source}")]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by the archive writer. Always fatal.
#[derive(Debug, Error)]
pub enum ArchiveWriteError {
    #[error("duplicate archive entry {0:?}")]
    DuplicateEntry(String),

    #[error("failed to write entry {name:?}: {source}")]
    Entry {
        name: String,
        #[source]
        source: async_zip::error::ZipError,
    },

    #[error("failed to finalize archive {path:?}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: async_zip::error::ZipError,
    },

    #[error("failed to flush archive {path:?}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transport failures talking to the deployment host.
///
/// A non-2xx status is not an error; it is handed back for display.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    ArchiveWrite(#[from] ArchiveWriteError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
