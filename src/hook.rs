//! Playlist change hook
//!
//! Entry point of the publishing side: the host's own playlist handling
//! runs first, then an authorized session builds and publishes a snapshot.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::{Session, TrackDescriptor};
use crate::publisher::Publisher;
use crate::snapshot::SnapshotBuilder;

/// The host's jukebox playlist changed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistChanged {
    /// Whether the current session is the game master
    #[serde(default)]
    pub is_gm: bool,
    pub playlist: Vec<TrackDescriptor>,
}

/// What the hook did with a playlist change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HookOutcome {
    /// Session not authorized to originate snapshots
    Skipped,
    Published { tracks: usize },
    PublishFailed { reason: String },
}

pub struct JukeboxHook {
    builder: SnapshotBuilder,
    publisher: Arc<dyn Publisher>,
    session: Session,
}

impl JukeboxHook {
    pub fn new(builder: SnapshotBuilder, publisher: Arc<dyn Publisher>, session: Session) -> Self {
        Self {
            builder,
            publisher,
            session,
        }
    }

    pub fn builder(&self) -> &SnapshotBuilder {
        &self.builder
    }

    /// Run `host_default` to completion, then publish a snapshot if the
    /// session is authorized. Never fails.
    pub async fn on_playlist_changed<F>(&self, event: PlaylistChanged, host_default: F) -> HookOutcome
    where
        F: FnOnce(&[TrackDescriptor]),
    {
        host_default(&event.playlist);

        if !event.is_gm {
            tracing::trace!("Playlist changed, session is not GM: skipping snapshot");
            return HookOutcome::Skipped;
        }

        let payload = self.builder.build(&event.playlist, &self.session).await;
        let tracks = payload.tracks.len();

        match self.publisher.publish(&payload).await {
            Ok(()) => {
                tracing::info!("Sent jukebox state for room {} ({} tracks)", payload.room_id, tracks);
                HookOutcome::Published { tracks }
            }
            Err(e) => {
                tracing::warn!("Error while sending jukebox state: {}", e);
                HookOutcome::PublishFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SyncError};
    use crate::model::SnapshotPayload;
    use crate::resolver::test_support::*;
    use crate::resolver::{ResolutionCache, TrackResolver};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<SnapshotPayload>>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, payload: &SnapshotPayload) -> Result<()> {
            if self.fail {
                return Err(SyncError::PublishRejected { status: 500 });
            }
            self.sent.lock().push(payload.clone());
            Ok(())
        }
    }

    fn hook(publisher: Arc<RecordingPublisher>) -> JukeboxHook {
        let resolver = TrackResolver::new(
            Arc::new(ResolutionCache::new()),
            strategies_with_slow(Arc::new(PanicStrategy)),
            Duration::from_millis(2000),
        );
        JukeboxHook::new(
            SnapshotBuilder::new(Arc::new(resolver)),
            publisher,
            Session {
                player_id: "42".to_string(),
                campaign_id: "1337".to_string(),
            },
        )
    }

    fn event(is_gm: bool) -> PlaylistChanged {
        PlaylistChanged {
            is_gm,
            playlist: vec![
                TrackDescriptor::new("t1-a", "Tabletop Audio"),
                TrackDescriptor::new("t3-c", "Unknown"),
            ],
        }
    }

    #[tokio::test]
    async fn test_gm_publishes_snapshot() {
        let publisher = Arc::new(RecordingPublisher::default());
        let hook = hook(publisher.clone());

        let outcome = hook.on_playlist_changed(event(true), |_| {}).await;

        assert_eq!(outcome, HookOutcome::Published { tracks: 1 });
        let sent = publisher.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].room_id, "1337");
    }

    #[tokio::test]
    async fn test_non_gm_skips_but_runs_host_default() {
        let publisher = Arc::new(RecordingPublisher::default());
        let hook = hook(publisher.clone());
        let mut seen = 0;

        let outcome = hook
            .on_playlist_changed(event(false), |playlist| seen = playlist.len())
            .await;

        assert_eq!(outcome, HookOutcome::Skipped);
        assert_eq!(seen, 2);
        assert!(publisher.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_host_default_runs_before_resolution() {
        let publisher = Arc::new(RecordingPublisher::default());
        let hook = hook(publisher.clone());
        let cache = hook.builder().resolver().cache().clone();
        let mut cached_before = None;

        hook.on_playlist_changed(event(true), |_| cached_before = Some(cache.len()))
            .await;

        assert_eq!(cached_before, Some(0));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported_not_raised() {
        let publisher = Arc::new(RecordingPublisher {
            fail: true,
            ..Default::default()
        });
        let hook = hook(publisher);

        let outcome = hook.on_playlist_changed(event(true), |_| {}).await;

        assert!(matches!(outcome, HookOutcome::PublishFailed { .. }));
    }
}
