use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Rejections raised before any network interaction. Shown to the user as a
/// blocking alert, never written to the progress log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file first.")]
    NoFileSelected,

    #[error("Please upload an Excel (.xlsx) file.")]
    WrongExtension { file_name: String },

    #[error("An upload is already in progress.")]
    Busy,
}

#[derive(Error, Debug)]
pub enum UploadError {
    /// Non-2xx response; carries the server's `error` field or the fallback text.
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload task ended unexpectedly")]
    Interrupted,
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("no packet received within {0:?}")]
    Timeout(Duration),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("malformed packet: {0}")]
    Packet(#[from] PacketError),

    #[error("server rejected the connection: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("empty frame")]
    Empty,

    #[error("unknown packet type {0:?}")]
    UnknownType(char),

    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary packets are not supported")]
    Binary,

    #[error("event packet without a name")]
    MissingEventName,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("unsupported url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}
