//! Configuration file support
//!
//! Loads service configuration from TOML files. Every section except
//! `[server]` is optional and falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{MixerConfig, PublisherConfig, ResolverConfig, SyncConfig};
use crate::error::{Result, SyncError};
use crate::model::Session;

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Session settings
    pub session: Option<SessionSettings>,
    /// Resolver settings
    pub resolver: Option<ResolverSettings>,
    /// Publisher settings
    pub publisher: Option<PublisherSettings>,
    /// Mixer settings
    pub mixer: Option<MixerSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub player_id: String,
    pub campaign_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    pub slow_timeout_ms: Option<u64>,
    pub tabletop_base: Option<String>,
    pub incompetech_base: Option<String>,
    pub library_base: Option<String>,
    pub battlebards_proxy_url: Option<String>,
    pub drop_timed_out: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherSettings {
    pub endpoint: String,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixerSettings {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SyncError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = SyncConfig::default();
        Self {
            server: ServerSettings {
                host: defaults.host,
                port: defaults.port,
                cors_enabled: Some(defaults.cors_enabled),
            },
            session: Some(SessionSettings {
                player_id: String::new(),
                campaign_id: String::new(),
            }),
            resolver: Some(ResolverSettings {
                slow_timeout_ms: Some(defaults.resolver.slow_timeout_ms),
                tabletop_base: Some(defaults.resolver.tabletop_base),
                incompetech_base: Some(defaults.resolver.incompetech_base),
                library_base: Some(defaults.resolver.library_base),
                battlebards_proxy_url: Some(defaults.resolver.battlebards_proxy_url),
                drop_timed_out: Some(defaults.resolver.drop_timed_out),
            }),
            publisher: Some(PublisherSettings {
                endpoint: defaults.publisher.endpoint,
                request_timeout_ms: Some(defaults.publisher.request_timeout_ms),
            }),
            mixer: Some(MixerSettings {
                url: defaults.mixer.url,
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to SyncConfig
    pub fn into_sync_config(self) -> SyncConfig {
        let resolver_defaults = ResolverConfig::default();
        let resolver = match self.resolver {
            Some(r) => ResolverConfig {
                slow_timeout_ms: r.slow_timeout_ms.unwrap_or(resolver_defaults.slow_timeout_ms),
                tabletop_base: r.tabletop_base.unwrap_or(resolver_defaults.tabletop_base),
                incompetech_base: r
                    .incompetech_base
                    .unwrap_or(resolver_defaults.incompetech_base),
                library_base: r.library_base.unwrap_or(resolver_defaults.library_base),
                battlebards_proxy_url: r
                    .battlebards_proxy_url
                    .unwrap_or(resolver_defaults.battlebards_proxy_url),
                drop_timed_out: r.drop_timed_out.unwrap_or(resolver_defaults.drop_timed_out),
            },
            None => resolver_defaults,
        };

        let publisher = match self.publisher {
            Some(p) => PublisherConfig {
                endpoint: p.endpoint,
                request_timeout_ms: p
                    .request_timeout_ms
                    .unwrap_or(PublisherConfig::default().request_timeout_ms),
            },
            None => PublisherConfig::default(),
        };

        SyncConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            session: self
                .session
                .map(|s| Session {
                    player_id: s.player_id,
                    campaign_id: s.campaign_id,
                })
                .unwrap_or_default(),
            resolver,
            publisher,
            mixer: self
                .mixer
                .map(|m| MixerConfig { url: m.url })
                .unwrap_or_default(),
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: self
                .logging
                .and_then(|l| l.format)
                .unwrap_or_else(|| "pretty".to_string()),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.resolver.unwrap().slow_timeout_ms, Some(2000));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[server]
host = "127.0.0.1"
port = 9090

[session]
player_id = "42"
campaign_id = "1337"

[resolver]
slow_timeout_ms = 500
"#,
            )
            .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_sync_config();
        assert_eq!(config.socket_addr(), "127.0.0.1:9090");
        assert_eq!(config.session.campaign_id, "1337");
        assert_eq!(config.resolver.slow_timeout_ms, 500);
        assert_eq!(
            config.resolver.tabletop_base,
            ResolverConfig::default().tabletop_base
        );
        assert_eq!(config.publisher.endpoint, PublisherConfig::default().endpoint);
        assert_eq!(config.log_format, "pretty");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[server]\nport = \"nope\"\n").unwrap();

        let err = ConfigFile::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        let loaded = ConfigFile::from_file(&path).unwrap().into_sync_config();
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.resolver.slow_timeout_ms, 2000);
    }
}
