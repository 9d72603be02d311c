//! Server configuration loading.
//!
//! The expected YAML structure is (every key optional):
//! ```yaml
//! host: "0.0.0.0"
//! port: 12346
//! shift_workers: 5
//! ```
//!
//! Values absent from the file keep their defaults; command-line flags are
//! applied on top with [`ServerConfig::with_overrides`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::early::DEFAULT_SHIFT_WORKERS;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default TCP port of the timetable server.
pub const DEFAULT_PORT: u16 = 12346;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.
///
/// Kept private – callers work with [`ServerConfig`] instead.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerConfigFile {
    host: Option<String>,
    port: Option<u16>,
    shift_workers: Option<usize>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Effective server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Size of the early-lecture day-processing pool.
    pub shift_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shift_workers: DEFAULT_SHIFT_WORKERS,
        }
    }
}

impl ServerConfig {
    /// Parses `path`, filling missing keys with defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, carries
    /// unknown keys, or sets `shift_workers` to zero.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading server configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let file: ServerConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;
        debug!(?file, "raw configuration");

        let defaults = Self::default();
        Self {
            host: file.host.unwrap_or(defaults.host),
            port: file.port.unwrap_or(defaults.port),
            shift_workers: file.shift_workers.unwrap_or(defaults.shift_workers),
        }
        .validated()
    }

    /// Applies command-line values on top of this configuration.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        shift_workers: Option<usize>,
    ) -> Result<Self> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(workers) = shift_workers {
            self.shift_workers = workers;
        }
        self.validated()
    }

    /// `host:port` string for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validated(self) -> Result<Self> {
        if self.shift_workers == 0 {
            bail!("shift_workers must be at least 1");
        }
        if self.host.trim().is_empty() {
            bail!("host must not be empty");
        }
        Ok(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 12346);
        assert_eq!(cfg.shift_workers, 5);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:12346");
    }

    #[test]
    fn load_full_file() {
        let f = yaml_tempfile("host: \"127.0.0.1\"\nport: 4000\nshift_workers: 2\n");
        let cfg = ServerConfig::load_from_file(f.path()).unwrap();
        assert_eq!(
            cfg,
            ServerConfig {
                host: "127.0.0.1".into(),
                port: 4000,
                shift_workers: 2,
            }
        );
    }

    #[test]
    fn missing_keys_use_defaults() {
        let f = yaml_tempfile("port: 5000\n");
        let cfg = ServerConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.shift_workers, DEFAULT_SHIFT_WORKERS);

        let f = yaml_tempfile("{}\n");
        assert_eq!(
            ServerConfig::load_from_file(f.path()).unwrap(),
            ServerConfig::default()
        );
    }

    #[test]
    fn zero_workers_rejected() {
        let f = yaml_tempfile("shift_workers: 0\n");
        let err = ServerConfig::load_from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("shift_workers"));
    }

    #[test]
    fn unknown_key_rejected() {
        let f = yaml_tempfile("prot: 1\n");
        assert!(ServerConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = ServerConfig::load_from_file(Path::new("/nonexistent/path/server.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(ServerConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = ServerConfig::default()
            .with_overrides(Some("localhost".into()), None, Some(3))
            .unwrap();
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.shift_workers, 3);

        assert!(ServerConfig::default()
            .with_overrides(None, None, Some(0))
            .is_err());
    }
}
