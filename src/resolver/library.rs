//! Authenticated audio library lookup
//!
//! The library answers `GET /audio_library/play/{room}/{id}` with a redirect
//! to the actual media file; the effective URL after redirects is the result.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Resolution, TrackDescriptor};

use super::strategy::ResolveStrategy;

#[derive(Debug, Clone)]
pub struct LibraryLookupStrategy {
    client: reqwest::Client,
    base_url: String,
    room_id: String,
}

impl LibraryLookupStrategy {
    pub fn new(client: reqwest::Client, base_url: &str, room_id: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            room_id: room_id.to_string(),
        }
    }

    fn lookup_url(&self, track: &TrackDescriptor) -> String {
        format!(
            "{}/audio_library/play/{}/{}",
            self.base_url,
            self.room_id,
            track.id_segment()
        )
    }

    async fn lookup(&self, track: &TrackDescriptor) -> Result<String> {
        let response = self
            .client
            .get(self.lookup_url(track))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.url().to_string())
    }
}

#[async_trait]
impl ResolveStrategy for LibraryLookupStrategy {
    async fn resolve(&self, track: &TrackDescriptor) -> Resolution {
        match self.lookup(track).await {
            Ok(url) => Resolution::from_url(url),
            Err(e) => {
                tracing::warn!("Could not get url for track {} ({}): {}", track.id, track.title, e);
                Resolution::Unavailable
            }
        }
    }
}
