//! Helpers shared by the unit tests.

use async_zip::tokio::read::fs::ZipFileReader;
use reqwest::Client;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by [`one_shot_server`].
pub struct Captured {
    pub head: String,
    pub body: Vec<u8>,
}

/// Serve exactly one request with the given status line and body.
/// Returns the base URL and a handle yielding the captured request.
pub async fn one_shot_server(
    status: &'static str,
    reply: &'static str,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim().parse::<usize>().unwrap())
            .unwrap_or(0);

        let mut body = raw[head_end..].to_vec();
        while body.len() < content_length {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before body");
            body.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
            reply.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        Captured { head, body }
    });

    (format!("http://{addr}"), handle)
}

/// Client that ignores proxy settings from the environment.
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

/// Every entry of a zip file as (name, contents), in archive order.
pub async fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    let reader = ZipFileReader::new(path).await.unwrap();
    let mut entries = Vec::new();
    for index in 0..reader.file().entries().len() {
        let name = reader.file().entries()[index]
            .filename()
            .as_str()
            .unwrap()
            .to_string();
        let mut data = Vec::new();
        let mut entry_reader = reader.reader_with_entry(index).await.unwrap();
        entry_reader.read_to_end_checked(&mut data).await.unwrap();
        entries.push((name, data));
    }
    entries
}
