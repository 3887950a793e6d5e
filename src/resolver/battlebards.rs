//! Battlebards resolution through the editor's audio URL proxy
//!
//! Battlebards track ids embed the source file name (`<file>.mp3-<suffix>`).
//! The proxy expects that file name, unescaped and re-encoded as a URI
//! component, and answers with the playable URL as plain text. The proxy can
//! be slow; the resolver always races this strategy against a timer.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::Result;
use crate::model::{Resolution, TrackDescriptor};

use super::strategy::ResolveStrategy;

/// Characters left alone by a URI component encoding
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MP3_MARKER: &str = ".mp3";

/// Turn a Battlebards track id into the `trackurl` the proxy expects
pub fn track_url_param(track_id: &str) -> String {
    let file = track_id
        .split(".mp3-")
        .next()
        .unwrap_or_default();
    let file = format!("{}{}", file, MP3_MARKER).replace("%20%2D%20", " - ");
    utf8_percent_encode(&file, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone)]
pub struct BattlebardsStrategy {
    client: reqwest::Client,
    proxy_url: String,
}

impl BattlebardsStrategy {
    pub fn new(client: reqwest::Client, proxy_url: &str) -> Self {
        Self {
            client,
            proxy_url: proxy_url.to_string(),
        }
    }

    async fn fetch(&self, track: &TrackDescriptor) -> Result<String> {
        let param = track_url_param(&track.id);
        let body = self
            .client
            .post(&self.proxy_url)
            .form(&[("trackurl", param)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl ResolveStrategy for BattlebardsStrategy {
    async fn resolve(&self, track: &TrackDescriptor) -> Resolution {
        match self.fetch(track).await {
            Ok(url) => Resolution::from_url(url),
            Err(e) => {
                tracing::warn!("Battlebards lookup failed for {}: {}", track.id, e);
                Resolution::Unavailable
            }
        }
    }
}
