//! Snapshot publishing
//!
//! One attempt per snapshot. Callers log and drop failures.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::model::SnapshotPayload;

/// Sends snapshots to the synchronization endpoint
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: &SnapshotPayload) -> Result<()>;
}

/// POSTs snapshots as JSON
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpPublisher {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, payload: &SnapshotPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::PublishRejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(
            "Published snapshot for room {} ({} tracks): {}",
            payload.room_id,
            payload.tracks.len(),
            status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Session, SnapshotTrack};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> SnapshotPayload {
        let session = Session {
            player_id: "42".to_string(),
            campaign_id: "1337".to_string(),
        };
        SnapshotPayload::new(&session, vec![SnapshotTrack::new("http://cdn/t1")])
    }

    #[tokio::test]
    async fn test_publish_posts_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/jukeboxsyncer/evt"))
            .and(body_partial_json(serde_json::json!({
                "uId": "42",
                "rId": "1337",
                "tracks": [{ "url": "http://cdn/t1" }],
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        let publisher = HttpPublisher::new(
            reqwest::Client::new(),
            format!("{}/v1/jukeboxsyncer/evt", mock_server.uri()),
            Duration::from_secs(5),
        );

        publisher.publish(&payload()).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let publisher =
            HttpPublisher::new(reqwest::Client::new(), mock_server.uri(), Duration::from_secs(5));

        let err = publisher.publish(&payload()).await.unwrap_err();
        assert!(matches!(err, SyncError::PublishRejected { status: 503 }));
    }
}
