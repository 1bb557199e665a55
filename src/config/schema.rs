//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! bootstrap layer. All types derive Serde traits for deserialization from
//! the application's `config/config.json`.

use std::fmt;
use std::path::PathBuf;

use axum::http::Method;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Root configuration for a bootstrapped application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Absolute root of the application being bootstrapped.
    /// Injected by the loader, never read from the file.
    #[serde(skip)]
    pub app_path: PathBuf,

    /// Cluster fan-out settings.
    pub cluster: ClusterConfig,

    /// Per-protocol server settings.
    pub servers: ServersConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Cluster fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Fork worker processes that each replay the startup sequence.
    pub enabled: bool,

    /// Worker count, or `"auto"` for the host's logical CPU count.
    pub cores: Cores,
}

impl ClusterConfig {
    /// Resolve the `"auto"` sentinel to the host's logical CPU count.
    ///
    /// Mutates the in-memory configuration only; the file on disk keeps
    /// the sentinel.
    pub fn resolve_auto_cores(&mut self) {
        if self.enabled && matches!(self.cores, Cores::Auto) {
            self.cores = Cores::Fixed(num_cpus::get());
        }
    }
}

/// Worker process count: a fixed number or the `"auto"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cores {
    Auto,
    Fixed(usize),
}

impl Default for Cores {
    fn default() -> Self {
        Cores::Auto
    }
}

impl Cores {
    /// The concrete worker count this value stands for.
    pub fn resolved(&self) -> usize {
        match self {
            Cores::Fixed(n) => *n,
            Cores::Auto => num_cpus::get(),
        }
    }
}

impl<'de> Deserialize<'de> for Cores {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(usize),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Cores::Fixed(n)),
            Raw::Word(w) if w == "auto" => Ok(Cores::Auto),
            Raw::Word(w) => Err(de::Error::custom(format!(
                "cluster.cores must be a number or \"auto\", got {:?}",
                w
            ))),
        }
    }
}

impl Serialize for Cores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Cores::Auto => serializer.serialize_str("auto"),
            Cores::Fixed(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

/// Per-protocol server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServersConfig {
    pub http: HttpConfig,
    pub https: HttpsConfig,
    pub tcp: TcpConfig,
    pub udp: UdpConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    pub enabled: bool,

    /// Listening port.
    pub port: u16,

    /// HTTP methods the router accepts; requests outside this list are
    /// rejected with 501.
    pub methods: Vec<HttpMethod>,

    /// Attach a websocket upgrade handler to the HTTP listener.
    pub web_sockets: bool,
}

impl HttpConfig {
    /// Supported methods as plain `http::Method` values.
    pub fn methods(&self) -> Vec<Method> {
        self.methods.iter().map(|m| m.0.clone()).collect()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 0,
            methods: vec![
                HttpMethod(Method::GET),
                HttpMethod(Method::POST),
                HttpMethod(Method::PUT),
                HttpMethod(Method::DELETE),
            ],
            web_sockets: false,
        }
    }
}

/// HTTPS server configuration.
///
/// TLS material is loaded by the server driver; this layer only carries the
/// paths through.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpsConfig {
    pub enabled: bool,
    pub port: u16,
    pub methods: Vec<HttpMethod>,

    /// Path to the certificate file (PEM).
    pub cert: PathBuf,

    /// Path to the private key file (PEM).
    pub key: PathBuf,
}

impl HttpsConfig {
    pub fn methods(&self) -> Vec<Method> {
        self.methods.iter().map(|m| m.0.clone()).collect()
    }
}

impl Default for HttpsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 0,
            methods: vec![HttpMethod(Method::GET), HttpMethod(Method::POST)],
            cert: PathBuf::new(),
            key: PathBuf::new(),
        }
    }
}

/// TCP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpConfig {
    pub enabled: bool,
    pub port: u16,

    /// Keep the write half open after the peer sends FIN.
    pub allow_half_open: bool,

    /// Hand the connection to the handler without reading from it first.
    pub pause_on_connect: bool,
}

/// UDP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UdpConfig {
    pub enabled: bool,
    pub port: u16,

    /// Socket family, `"udp4"` or `"udp6"`.
    #[serde(rename = "type")]
    pub kind: UdpKind,
}

/// UDP socket family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum UdpKind {
    #[default]
    #[serde(rename = "udp4")]
    Udp4,
    #[serde(rename = "udp6")]
    Udp6,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// An HTTP method parsed at the serde boundary, so a typo in the config
/// surfaces as a parse error instead of a runtime surprise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethod(pub Method);

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Method::from_bytes(raw.as_bytes())
            .map(HttpMethod)
            .map_err(|_| de::Error::custom(format!("invalid http method: {:?}", raw)))
    }
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}
