//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - The process-wide resolution cache
//! - The playlist hook (resolver, snapshot builder, publisher)
//! - The jukebox syncer and its mixer client
//! - Service configuration

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::hook::JukeboxHook;
use crate::publisher::{HttpPublisher, Publisher};
use crate::resolver::{CacheStats, ResolutionCache, StrategySet, TrackResolver};
use crate::snapshot::SnapshotBuilder;
use crate::syncer::{HttpMixerClient, JukeboxSyncer, MixerApi};

/// Application state shared across all handlers
pub struct AppState {
    /// Resolution cache, lives as long as the process
    pub cache: Arc<ResolutionCache>,

    /// Playlist change hook
    pub hook: JukeboxHook,

    /// Snapshot receiver
    pub syncer: JukeboxSyncer,

    /// Playlist changes observed
    pub playlist_changes: AtomicU64,

    /// Service configuration
    pub config: SyncConfig,
}

impl AppState {
    /// Create a new AppState with HTTP collaborators built from the configuration
    pub fn new(config: SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jukebox-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let strategies = StrategySet::from_config(&config.resolver, &config.session, client.clone());
        let publisher = Arc::new(HttpPublisher::new(
            client.clone(),
            config.publisher.endpoint.clone(),
            config.publisher.request_timeout(),
        ));
        let mixer = Arc::new(HttpMixerClient::new(client, &config.mixer.url));

        Ok(Self::from_parts(config, strategies, publisher, mixer))
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(
        config: SyncConfig,
        strategies: StrategySet,
        publisher: Arc<dyn Publisher>,
        mixer: Arc<dyn MixerApi>,
    ) -> Self {
        let cache = Arc::new(ResolutionCache::new());
        let resolver = TrackResolver::new(cache.clone(), strategies, config.resolver.slow_timeout());
        let builder =
            SnapshotBuilder::new(Arc::new(resolver)).drop_timed_out(config.resolver.drop_timed_out);

        Self {
            cache,
            hook: JukeboxHook::new(builder, publisher, config.session.clone()),
            syncer: JukeboxSyncer::new(mixer),
            playlist_changes: AtomicU64::new(0),
            config,
        }
    }

    /// Default playlist handling: count the change
    pub fn observe_playlist(&self) {
        self.playlist_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn playlist_change_count(&self) -> u64 {
        self.playlist_changes.load(Ordering::Relaxed)
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
