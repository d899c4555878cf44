use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use tracing::info;

use super::HttpReply;
use crate::error::{FilesystemError, NetworkError, Result};

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// POST the finalized archive at `archive` to `url` in a single request.
///
/// The archive is read fully before the request starts. Any status the
/// server returns is handed back; only transport failures are errors.
pub async fn upload_archive(client: &Client, url: &str, archive: &Path) -> Result<HttpReply> {
    let body = tokio::fs::read(archive)
        .await
        .map_err(|source| FilesystemError::ReadFile {
            path: archive.to_path_buf(),
            source,
        })?;

    info!("uploading {} bytes to {url}", body.len());
    let resp = client
        .post(url)
        .header(CONTENT_TYPE, ZIP_CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .map_err(|source| NetworkError::Request {
            url: url.to_string(),
            source,
        })?;

    into_reply(url, resp).await
}

/// GET `url` and hand back whatever the host says.
pub async fn check_endpoint(client: &Client, url: &str) -> Result<HttpReply> {
    info!("checking {url}");
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|source| NetworkError::Request {
            url: url.to_string(),
            source,
        })?;

    into_reply(url, resp).await
}

async fn into_reply(url: &str, resp: reqwest::Response) -> Result<HttpReply> {
    let status = resp.status();
    let body = resp.text().await.map_err(|source| NetworkError::Body {
        url: url.to_string(),
        source,
    })?;
    Ok(HttpReply { status, body })
}
