//! Jukebox syncer
//!
//! Receiving end of published snapshots. Keeps the last snapshot of every
//! started record and forwards what changed to the live audio mixer.

pub mod delta;
pub mod mixer;

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::model::SnapshotPayload;

pub use delta::{parse_duration, scan_for_play, state_delta, track_delta, volume_delta_db};
pub use mixer::{EventType, HttpMixerClient, MixerApi, MixerEvent};

#[derive(Debug, Default)]
struct Records {
    /// Last known snapshot per record id
    states: HashMap<String, SnapshotPayload>,
    /// Records started on the mixer
    started: HashSet<String>,
}

pub struct JukeboxSyncer {
    mixer: Arc<dyn MixerApi>,
    records: Mutex<Records>,
}

impl JukeboxSyncer {
    pub fn new(mixer: Arc<dyn MixerApi>) -> Self {
        Self {
            mixer,
            records: Mutex::new(Records::default()),
        }
    }

    /// Start recording a record on the mixer
    pub async fn start(&self, record_id: &str) -> Result<()> {
        self.mixer.start(record_id).await?;
        self.records.lock().started.insert(record_id.to_string());
        Ok(())
    }

    /// Stop a record and forget everything known about it
    pub async fn stop(&self, record_id: &str) -> Result<()> {
        self.mixer.stop(record_id).await?;
        let mut records = self.records.lock();
        records.started.remove(record_id);
        records.states.remove(record_id);
        Ok(())
    }

    pub fn is_started(&self, record_id: &str) -> bool {
        self.records.lock().started.contains(record_id)
    }

    pub fn started_count(&self) -> usize {
        self.records.lock().started.len()
    }

    /// Forward the changes carried by a new snapshot to the mixer.
    ///
    /// Mixer send failures are logged and do not fail the snapshot.
    pub async fn handle(&self, new: SnapshotPayload) -> Result<usize> {
        let events = {
            let records = self.records.lock();
            if !records.started.contains(&new.room_id) {
                return Err(SyncError::NotStarted(new.room_id.clone()));
            }
            match records.states.get(&new.room_id) {
                Some(old) => state_delta(old, &new)?,
                None => scan_for_play(&new),
            }
        };

        for event in &events {
            if let Err(e) = self.mixer.send(event).await {
                tracing::warn!("Event with url {} failed: {}", event.asset_url, e);
            }
        }

        // The record may have been stopped while events were in flight
        let mut records = self.records.lock();
        if records.started.contains(&new.room_id) {
            records.states.insert(new.room_id.clone(), new);
        } else {
            tracing::debug!("Record {} stopped, dropping its snapshot", new.room_id);
        }
        Ok(events.len())
    }
}
