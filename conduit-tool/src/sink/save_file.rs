use std::path::Path;
use tokio::fs::{DirBuilder, File};

use crate::error::FilesystemError;

/// Creates (or truncates) the archive file.
/// Automatically creates parent directories if they don't exist.
pub async fn create_file_writer<P: AsRef<Path>>(path: P) -> Result<File, FilesystemError> {
    let path = path.as_ref();
    let create_error = |source| FilesystemError::CreateArchive {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o777);
        builder.create(parent).await.map_err(create_error)?;
    }

    File::create(path).await.map_err(create_error)
}
