//! API configuration.

use std::time::Instant;

use url::Url;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Allowed CORS origins. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Site root for download and share URLs. Defaults to the bind address.
    pub public_url: Option<Url>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl ApiConfig {
    /// Creates a new API configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_public_url(mut self, url: Url) -> Self {
        self.public_url = Some(url);
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the site root URLs are built against.
    pub fn public_url(&self) -> Result<Url, url::ParseError> {
        match self.public_url {
            Some(ref url) => Ok(url.clone()),
            None => Url::parse(&format!("http://{}/", self.bind_address())),
        }
    }

    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            cors_origins: vec!["*".to_string()],
            public_url: None,
            start_time: Instant::now(),
        }
    }
}
