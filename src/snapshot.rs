//! Snapshot assembly
//!
//! Resolves a whole playlist concurrently and keeps the tracks that ended
//! up with a URL, in playlist order.

use futures::future::join_all;
use std::sync::Arc;

use crate::model::{Resolution, Session, SnapshotPayload, TrackDescriptor};
use crate::resolver::TrackResolver;

pub struct SnapshotBuilder {
    resolver: Arc<TrackResolver>,
    drop_timed_out: bool,
}

impl SnapshotBuilder {
    pub fn new(resolver: Arc<TrackResolver>) -> Self {
        Self {
            resolver,
            drop_timed_out: false,
        }
    }

    /// Also filter out tracks whose resolution timed out
    pub fn drop_timed_out(mut self, drop: bool) -> Self {
        self.drop_timed_out = drop;
        self
    }

    pub fn resolver(&self) -> &Arc<TrackResolver> {
        &self.resolver
    }

    /// Resolve every track at once and assemble the payload
    pub async fn build(&self, playlist: &[TrackDescriptor], session: &Session) -> SnapshotPayload {
        let resolutions = join_all(playlist.iter().map(|track| self.resolver.resolve(track))).await;

        let tracks = playlist
            .iter()
            .zip(resolutions)
            .filter(|(_, resolution)| self.keep(resolution))
            .map(|(track, resolution)| track.with_url(resolution.as_wire()))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Built snapshot for room {}: {}/{} tracks",
            session.campaign_id,
            tracks.len(),
            playlist.len()
        );

        SnapshotPayload::new(session, tracks)
    }

    fn keep(&self, resolution: &Resolution) -> bool {
        match resolution {
            Resolution::Url(_) => true,
            Resolution::Unavailable => false,
            Resolution::TimedOut => !self.drop_timed_out,
        }
    }
}
