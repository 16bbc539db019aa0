use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filestore_state::{FileWorldState, InMemoryWorldState, WorldState};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration, loadable from TOML.
///
/// ```toml
/// bind_addr = "0.0.0.0:7051"
/// max_body_bytes = 1048576
///
/// [state]
/// backend = "file"
/// path = "/var/lib/filestore/state.bin"
/// ```
///
/// Keys left out of the file keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub state: StateConfig,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 7051)),
            state: StateConfig::Memory,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Which world-state backend the host serves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StateConfig {
    /// Volatile state, lost on shutdown.
    #[default]
    Memory,
    /// Snapshot file on local disk.
    File { path: PathBuf },
}

impl ServerConfig {
    /// Read a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Open the configured world-state backend.
    pub fn open_state(&self) -> ServerResult<Arc<dyn WorldState>> {
        Ok(match &self.state {
            StateConfig::Memory => Arc::new(InMemoryWorldState::new()),
            StateConfig::File { path } => Arc::new(FileWorldState::open(path)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7051".parse::<SocketAddr>().unwrap());
        assert_eq!(c.state, StateConfig::Memory);
        assert_eq!(c.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn file_backend_from_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"

            [state]
            backend = "file"
            path = "/tmp/state.bin"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(
            c.state,
            StateConfig::File {
                path: PathBuf::from("/tmp/state.bin")
            }
        );
        assert_eq!(c.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn opens_file_state() {
        let dir = tempfile::tempdir().unwrap();
        let c = ServerConfig {
            state: StateConfig::File {
                path: dir.path().join("state.bin"),
            },
            ..Default::default()
        };
        let state = c.open_state().unwrap();
        state.put_state("k", b"v").unwrap();
        assert!(dir.path().join("state.bin").exists());
    }
}
