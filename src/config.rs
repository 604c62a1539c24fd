use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Gateway settings, one instance built at startup. Every field has a
/// documented default and an environment override.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    /// Horde async submit endpoint (POST).
    pub submit_url: String,
    /// Horde status endpoint base; the job id is appended as a path segment.
    pub status_url: String,
    /// API key forwarded when the caller sends no Authorization header.
    /// `"0000000000"` is the Horde's well-known anonymous key, not a secret.
    pub anonymous_key: String,
    pub max_context_length: u32,
    /// Output length submitted for chat jobs; chat requests carry no length
    /// field of their own.
    pub chat_max_length: u32,
    pub poll_interval: Duration,
    /// Ceiling on the total time spent polling one job before giving up.
    pub poll_timeout: Duration,
    /// Per-request transport timeout on the downstream HTTP client.
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080));

        let submit_url = env::var("HORDE_SUBMIT_URL")
            .unwrap_or_else(|_| "https://horde.koboldai.net/api/v2/generate/text/async".into());
        let status_url = env::var("HORDE_STATUS_URL")
            .unwrap_or_else(|_| "https://horde.koboldai.net/api/v2/generate/text/status".into())
            .trim_end_matches('/')
            .to_string();
        let anonymous_key = env::var("HORDE_ANONYMOUS_KEY").unwrap_or_else(|_| "0000000000".into());

        let max_context_length = env::var("MAX_CONTEXT_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1024);
        let chat_max_length = env::var("CHAT_MAX_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let poll_interval = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(2));
        let poll_timeout = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(300));
        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        Ok(Self {
            listen_addr,
            submit_url,
            status_url,
            anonymous_key,
            max_context_length,
            chat_max_length,
            poll_interval,
            poll_timeout,
            request_timeout,
        })
    }
}
