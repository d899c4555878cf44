use reqwest::StatusCode;

pub mod save_file;
pub mod send_net;

/// What the deployment host answered, kept opaque for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}
