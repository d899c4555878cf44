//! Package a project tree into a zip archive and ship it to a deployment host.
//!
//! The archiving core walks a directory depth-first and hands each regular
//! file to an [`packaging::EntrySink`]; [`packaging::zip::build_archive`]
//! drives that walk into a zip file on disk. Uploading and checking the host
//! are separate steps in [`sink::send_net`].

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod logging;
pub mod packaging;
pub mod process;
pub mod sink;

#[cfg(test)]
mod testing;

pub use error::{ArchiveWriteError, Error, FilesystemError, NetworkError};
pub use packaging::zip::{Compressor, build_archive};
pub use packaging::{ArchiveEntry, ArchiveReport, EntrySink, ListingSink, archive_tree};
