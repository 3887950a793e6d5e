//! Jukebox Sync
//!
//! Mirrors a host application's jukebox to other listeners. The publishing
//! side resolves a playable URL for every playlist track (per provider,
//! cached, with a time budget for slow providers) and publishes snapshots;
//! the receiving side diffs consecutive snapshots into live mixer events.

pub mod config;
pub mod config_file;
pub mod error;
pub mod hook;
pub mod http;
pub mod model;
pub mod publisher;
pub mod resolver;
pub mod snapshot;
pub mod state;
pub mod syncer;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use hook::{HookOutcome, JukeboxHook, PlaylistChanged};
pub use model::{Provider, Resolution, Session, SnapshotPayload, SnapshotTrack, TrackDescriptor};
pub use publisher::{HttpPublisher, Publisher};
pub use resolver::{ResolutionCache, ResolveStrategy, StrategySet, TrackResolver};
pub use snapshot::SnapshotBuilder;
pub use state::AppState;
pub use syncer::{JukeboxSyncer, MixerApi, MixerEvent};
