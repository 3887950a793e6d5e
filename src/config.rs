//! Service configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::Session;

/// Default race budget for the slow external provider
pub const DEFAULT_SLOW_TIMEOUT_MS: u64 = 2000;

/// Track resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Time budget for the slow external-service provider in milliseconds
    pub slow_timeout_ms: u64,

    /// URL prefix for Tabletop Audio tracks
    pub tabletop_base: String,

    /// URL prefix for Incompetech tracks
    pub incompetech_base: String,

    /// Base URL of the authenticated audio library
    pub library_base: String,

    /// Proxy endpoint resolving Battlebards track URLs
    pub battlebards_proxy_url: String,

    /// Drop timed-out tracks from snapshots instead of publishing the placeholder
    pub drop_timed_out: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            slow_timeout_ms: DEFAULT_SLOW_TIMEOUT_MS,
            tabletop_base: "https://s3.amazonaws.com/cdn.roll20.net/ttaudio".to_string(),
            incompetech_base: "https://s3.amazonaws.com/cdn.roll20.net/incompetech".to_string(),
            library_base: "https://app.roll20.net".to_string(),
            battlebards_proxy_url: "https://app.roll20.net/editor/audiourl/bb".to_string(),
            drop_timed_out: false,
        }
    }
}

impl ResolverConfig {
    /// Slow provider budget as a duration
    pub fn slow_timeout(&self) -> Duration {
        Duration::from_millis(self.slow_timeout_ms)
    }
}

/// Snapshot publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Sync endpoint receiving snapshots
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/v1/jukeboxsyncer/evt".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl PublisherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Live audio mixer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixerConfig {
    /// Base URL of the mixer API
    pub url: String,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:50001/live-audio-mixer".to_string(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Session originating snapshots
    pub session: Session,

    /// Resolver configuration
    pub resolver: ResolverConfig,

    /// Publisher configuration
    pub publisher: PublisherConfig,

    /// Mixer configuration
    pub mixer: MixerConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
            session: Session::default(),
            resolver: ResolverConfig::default(),
            publisher: PublisherConfig::default(),
            mixer: MixerConfig::default(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl SyncConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
