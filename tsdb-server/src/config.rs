//! Server configuration: built-in defaults, layered with an optional
//! `Tsdb.toml` and `TSDB_*` environment variables via the `config`
//! crate.

use serde::Deserialize;
use validator::Validate;

/// Resolved, validated server configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Cap on a single command line, to bound memory use per connection.
    #[validate(range(min = 1))]
    pub max_line_bytes: usize,

    /// When set, `Insert`/`CreateSeries`/`DeleteSeries` are replayed
    /// from and appended to a write-ahead log rooted at this
    /// directory. Off by default: most deployments run the registry
    /// purely in memory and don't need state to survive a restart.
    pub persistence_path: Option<String>,

    /// Optional override for the tokio runtime's worker thread count.
    pub worker_threads: Option<usize>,

    /// Optional directory for non-blocking file logging via
    /// `tracing-appender`. Console logging via `tracing-subscriber`'s
    /// `fmt` layer is always on regardless of this setting.
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Layer built-in defaults, then `Tsdb.toml` if present, then
    /// `TSDB_*` environment variables (`TSDB_PORT`, `TSDB_HOST`, ...),
    /// and validate the result before returning it.
    pub fn load() -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())?;

        let config = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("Tsdb").required(false))
            .add_source(config::Environment::with_prefix("TSDB"))
            .build()?;

        let resolved: Self = config.try_deserialize()?;
        resolved.validate()?;
        Ok(resolved)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9999,
            max_line_bytes: tsdb_core::DEFAULT_MAX_LINE_BYTES,
            persistence_path: None,
            worker_threads: None,
            log_dir: None,
        }
    }
}

// `config::Config::try_from` needs the default config to implement
// `Serialize` too, since it round-trips the struct through its own
// internal `Value` representation.
impl serde::Serialize for ServerConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ServerConfig", 6)?;
        state.serialize_field("host", &self.host)?;
        state.serialize_field("port", &self.port)?;
        state.serialize_field("max_line_bytes", &self.max_line_bytes)?;
        state.serialize_field("persistence_path", &self.persistence_path)?;
        state.serialize_field("worker_threads", &self.worker_threads)?;
        state.serialize_field("log_dir", &self.log_dir)?;
        state.end()
    }
}
