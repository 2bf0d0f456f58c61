use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::{DEFAULT_ETCD_ADDR, DEFAULT_PATH, DEFAULT_TTL_SECS, MIN_TTL_SECS, TYPE_MSG, TYPE_NET};
use crate::cli::Cli;
use crate::error::AnnounceError;

/// Optional TOML file, e.g.
///
/// ```toml
/// [announce]
/// service = "riak-1"
/// path = "/service/riak"
/// type = "net"
/// interface = "eth0"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub announce: AnnounceSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnounceSection {
    #[serde(default)]
    pub service: String,
    #[serde(default = "default_etcd")]
    pub etcd: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_ttl")]
    pub ttl: u64,
    #[serde(default = "default_type", rename = "type")]
    pub announce_type: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub interface: String,
}

fn default_etcd() -> String {
    DEFAULT_ETCD_ADDR.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_type() -> String {
    TYPE_MSG.to_string()
}

impl Default for AnnounceSection {
    fn default() -> Self {
        Self {
            service: String::new(),
            etcd: default_etcd(),
            path: default_path(),
            ttl: default_ttl(),
            announce_type: default_type(),
            msg: String::new(),
            interface: String::new(),
        }
    }
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

/// What gets announced on every tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceMode {
    /// A static string, identical on every tick
    Message(String),
    /// The first address of this interface, re-resolved on every tick
    Network { interface: String },
}

/// Immutable, validated announcer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceConfig {
    pub service: String,
    pub etcd_addr: String,
    pub path: String,
    pub ttl: u64,
    pub mode: AnnounceMode,
}

impl AnnounceConfig {
    /// Merge command-line flags over the file section and validate the result.
    pub fn from_sources(cli: &Cli, file: AnnounceSection) -> Result<Self, AnnounceError> {
        let pick = |flag: &Option<String>, fallback: String| flag.clone().unwrap_or(fallback);

        let service = pick(&cli.service, file.service);
        let etcd_addr = pick(&cli.etcd, file.etcd);
        let path = pick(&cli.path, file.path);
        let ttl = cli.ttl.unwrap_or(file.ttl);
        let announce_type = pick(&cli.announce_type, file.announce_type);
        let msg = pick(&cli.msg, file.msg);
        let interface = pick(&cli.interface, file.interface);

        if service.is_empty() {
            return Err(AnnounceError::Validation(
                "Must supply service name with -service".to_string(),
            ));
        }

        let mode = match announce_type.as_str() {
            TYPE_MSG if msg.is_empty() => {
                return Err(AnnounceError::Validation("Must set message with -msg".to_string()));
            }
            TYPE_MSG => AnnounceMode::Message(msg),
            TYPE_NET if interface.is_empty() => {
                return Err(AnnounceError::Validation("Must set interface with -if".to_string()));
            }
            TYPE_NET => AnnounceMode::Network { interface },
            other => {
                return Err(AnnounceError::Validation(format!(
                    "Unknown announce type {:?}, expected \"net\" or \"msg\"",
                    other
                )));
            }
        };

        if ttl < MIN_TTL_SECS {
            return Err(AnnounceError::Validation(format!(
                "TTL must be at least {} seconds, got {}",
                MIN_TTL_SECS, ttl
            )));
        }

        Ok(Self {
            service,
            etcd_addr,
            path,
            ttl,
            mode,
        })
    }

    /// Key the service is announced under. Not normalized; the store may do so.
    pub fn key(&self) -> String {
        format!("{}/{}", self.path, self.service)
    }

    /// Half the TTL, so the record is refreshed well before it expires.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs((self.ttl / 2).max(1))
    }
}
