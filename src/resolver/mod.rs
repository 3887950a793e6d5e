//! Track URL resolution
//!
//! This module resolves playable URLs for jukebox tracks:
//! - Resolution cache consulted before any strategy
//! - One strategy per content provider
//! - Time-boxed race for the slow external provider

pub mod battlebards;
pub mod cache;
pub mod library;
pub mod strategy;

use std::sync::Arc;
use std::time::Duration;

use crate::model::{Resolution, TrackDescriptor};

pub use cache::{CacheStats, ResolutionCache};
pub use strategy::{ResolveStrategy, StrategySet, TemplateStrategy};

/// Resolves one track at a time, memoizing every outcome
pub struct TrackResolver {
    cache: Arc<ResolutionCache>,
    strategies: StrategySet,
    slow_timeout: Duration,
}

impl TrackResolver {
    pub fn new(cache: Arc<ResolutionCache>, strategies: StrategySet, slow_timeout: Duration) -> Self {
        Self {
            cache,
            strategies,
            slow_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Resolve a track's URL.
    ///
    /// A cached value is returned as is. Otherwise the provider's strategy
    /// runs (raced against the timer for the slow provider) and whatever it
    /// yields, including unavailable and timed-out results, is cached.
    pub async fn resolve(&self, track: &TrackDescriptor) -> Resolution {
        if let Some(cached) = self.cache.get(&track.id) {
            tracing::trace!("Resolution cache hit for {}", track.id);
            return cached;
        }

        let resolution = match self.strategies.for_provider(&track.provider) {
            Some(strategy) if track.provider.is_slow() => {
                self.race_slow(strategy.clone(), track.clone()).await
            }
            Some(strategy) => strategy.resolve(track).await,
            None => {
                tracing::debug!(
                    "Omitting track {} ({}) from unrecognized provider {}",
                    track.id,
                    track.title,
                    track.provider
                );
                Resolution::Unavailable
            }
        };

        self.cache.set(&track.id, resolution.clone());
        resolution
    }

    /// First of the strategy call and the timer wins. The call runs on its
    /// own task so that losing the race leaves it running; its late result
    /// goes nowhere.
    async fn race_slow(
        &self,
        strategy: Arc<dyn ResolveStrategy>,
        track: TrackDescriptor,
    ) -> Resolution {
        let track_id = track.id.clone();
        let call = tokio::spawn(async move { strategy.resolve(&track).await });

        tokio::select! {
            joined = call => joined.unwrap_or_else(|e| {
                tracing::warn!("Resolution task for {} failed: {}", track_id, e);
                Resolution::Unavailable
            }),
            _ = tokio::time::sleep(self.slow_timeout) => {
                tracing::warn!(
                    "Resolution of {} exceeded {}ms",
                    track_id,
                    self.slow_timeout.as_millis()
                );
                Resolution::TimedOut
            }
        }
    }
}
