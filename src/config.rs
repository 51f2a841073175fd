use crate::error::ConfigError;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const UPLOAD_PATH: &str = "/upload";
pub const SOCKET_IO_PATH: &str = "/socket.io/";
pub const PROGRESS_EVENT: &str = "progress";

/// Connection settings for the address processing server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server, `http` or `https` (default: http://127.0.0.1:5000)
    pub server_url: Url,

    /// Name of the push event carrying progress text (default: "progress")
    pub progress_event: String,

    /// Connect timeout for both the upload request and the progress channel (default: 10s)
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        let server_url = Url::parse(server_url).map_err(|source| ConfigError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;

        match server_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            server_url,
            progress_event: PROGRESS_EVENT.to_string(),
            connect_timeout: Duration::from_secs(10),
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            env::var("ADDRESS_UPLOADER_SERVER").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&server_url)?;

        if let Some(secs) = env::var("ADDRESS_UPLOADER_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn upload_url(&self) -> Url {
        let mut url = self.server_url.clone();
        url.set_path(UPLOAD_PATH);
        url.set_query(None);
        url
    }

    /// Socket.IO endpoint using the websocket transport directly, skipping the
    /// long-polling bootstrap.
    pub fn progress_url(&self) -> Url {
        let mut url = self.server_url.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) stays within the special schemes, which url allows
        let _ = url.set_scheme(scheme);
        url.set_path(SOCKET_IO_PATH);
        url.set_query(Some("EIO=4&transport=websocket"));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_endpoints_from_base_url() {
        let config = ClientConfig::new("http://localhost:5000").unwrap();
        assert_eq!(config.upload_url().as_str(), "http://localhost:5000/upload");
        assert_eq!(
            config.progress_url().as_str(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn secure_server_uses_secure_websocket() {
        let config = ClientConfig::new("https://geo.example.com/").unwrap();
        assert_eq!(
            config.progress_url().as_str(),
            "wss://geo.example.com/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
