//! Live audio mixer client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SyncError};

/// Kind of change forwarded to the mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Play,
    Stop,
    Volume,
    Seek,
    Other,
}

/// A discrete playback change on one track of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixerEvent {
    pub record_id: String,
    pub evt_id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub asset_url: String,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub volume_delta_db: f64,
    pub seek_position_sec: i64,
}

/// Record lifecycle and event sink of the mixer
#[async_trait]
pub trait MixerApi: Send + Sync {
    async fn start(&self, record_id: &str) -> Result<()>;
    async fn stop(&self, record_id: &str) -> Result<()>;
    async fn send(&self, event: &MixerEvent) -> Result<()>;
}

#[derive(Serialize)]
struct RecordRequest<'a> {
    id: &'a str,
}

/// JSON over HTTP mixer client
#[derive(Debug, Clone)]
pub struct HttpMixerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMixerClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(5))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Mixer(format!(
                "{} answered {}",
                url,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MixerApi for HttpMixerClient {
    async fn start(&self, record_id: &str) -> Result<()> {
        self.post("/start", &RecordRequest { id: record_id }).await
    }

    async fn stop(&self, record_id: &str) -> Result<()> {
        self.post("/stop", &RecordRequest { id: record_id }).await
    }

    async fn send(&self, event: &MixerEvent) -> Result<()> {
        self.post("/events", event).await
    }
}
