use serde::Deserialize;
use std::path::Path;
use tracing::error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TASKS_FILE: &str = "tasks.json";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// Optional TOML config file — all fields are overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 8080).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Path to the JSON task file (default: "tasks.json"). Must end in .json.
    tasks_file: Option<String>,
    /// Origins allowed to call the API from a browser
    /// (default: ["http://localhost:5173"]).
    allowed_origins: Option<Vec<String>>,
    /// Log level filter string, e.g. "debug", "info,todod=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
}

fn load_toml(path: &Path) -> Option<TomlConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config file — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bind address for the HTTP server (TODOD_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Path of the JSON file the task list is persisted to.
    pub tasks_file: String,
    /// CORS origin allow-list.
    pub allowed_origins: Vec<String>,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `config_file`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        tasks_file: Option<String>,
        log: Option<String>,
        bind_address: Option<String>,
        config_file: &Path,
    ) -> Self {
        // Load TOML as the lowest-priority override layer
        let toml = load_toml(config_file).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let tasks_file = tasks_file
            .or(toml.tasks_file)
            .unwrap_or_else(|| DEFAULT_TASKS_FILE.to_string());

        let bind_address = bind_address
            .or(std::env::var("TODOD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let allowed_origins = toml
            .allowed_origins
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        let log_format = std::env::var("TODOD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            port,
            bind_address,
            tasks_file,
            allowed_origins,
            log,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = ServerConfig::new(None, None, None, None, &dir.path().join("todod.toml"));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.tasks_file, "tasks.json");
        assert_eq!(cfg.allowed_origins, ["http://localhost:5173"]);
        assert_eq!(cfg.log_format, "pretty");
    }

    #[test]
    fn cli_beats_toml_beats_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("todod.toml");
        std::fs::write(
            &path,
            "port = 9000\ntasks_file = \"from-toml.json\"\nallowed_origins = [\"http://example.com\"]\n",
        )
        .unwrap();

        let cfg = ServerConfig::new(Some(9999), None, None, None, &path);
        assert_eq!(cfg.port, 9999);
        assert_eq!(cfg.tasks_file, "from-toml.json");
        assert_eq!(cfg.allowed_origins, ["http://example.com"]);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("todod.toml");
        std::fs::write(&path, "port = \"not a number").unwrap();

        let cfg = ServerConfig::new(None, None, None, None, &path);
        assert_eq!(cfg.port, 8080);
    }
}
