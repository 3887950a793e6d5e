//! Per-provider resolution strategies

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::model::{Provider, Resolution, Session, TrackDescriptor};

use super::battlebards::BattlebardsStrategy;
use super::library::LibraryLookupStrategy;

/// Maps a track descriptor to a playable URL.
///
/// Implementations never fail: errors are logged and turned into
/// [`Resolution::Unavailable`].
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    async fn resolve(&self, track: &TrackDescriptor) -> Resolution;
}

/// Static URL templating on the id segment, no network involved
#[derive(Debug, Clone)]
pub struct TemplateStrategy {
    base: String,
}

impl TemplateStrategy {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, track: &TrackDescriptor) -> String {
        format!("{}/{}", self.base, track.id_segment())
    }
}

#[async_trait]
impl ResolveStrategy for TemplateStrategy {
    async fn resolve(&self, track: &TrackDescriptor) -> Resolution {
        Resolution::from_url(self.url_for(track))
    }
}

/// One strategy per recognized provider
#[derive(Clone)]
pub struct StrategySet {
    pub tabletop: Arc<dyn ResolveStrategy>,
    pub incompetech: Arc<dyn ResolveStrategy>,
    pub library: Arc<dyn ResolveStrategy>,
    pub battlebards: Arc<dyn ResolveStrategy>,
}

impl StrategySet {
    /// Build the production strategies sharing one HTTP client
    pub fn from_config(config: &ResolverConfig, session: &Session, client: reqwest::Client) -> Self {
        Self {
            tabletop: Arc::new(TemplateStrategy::new(&config.tabletop_base)),
            incompetech: Arc::new(TemplateStrategy::new(&config.incompetech_base)),
            library: Arc::new(LibraryLookupStrategy::new(
                client.clone(),
                &config.library_base,
                &session.campaign_id,
            )),
            battlebards: Arc::new(BattlebardsStrategy::new(
                client,
                &config.battlebards_proxy_url,
            )),
        }
    }

    /// Strategy for a provider, `None` when the provider is unrecognized
    pub fn for_provider(&self, provider: &Provider) -> Option<&Arc<dyn ResolveStrategy>> {
        match provider {
            Provider::TabletopAudio => Some(&self.tabletop),
            Provider::Incompetech => Some(&self.incompetech),
            Provider::MyAudio => Some(&self.library),
            Provider::Battlebards => Some(&self.battlebards),
            Provider::Unrecognized(_) => None,
        }
    }
}
