//! Playlist and snapshot types
//!
//! Track descriptors come in from the host's jukebox, resolutions are what
//! the resolver caches, and snapshots are what travels over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder published for a track whose resolution ran out of time.
pub const TIMEOUT_SENTINEL: &str = "p1";

/// Content provider of a jukebox track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    TabletopAudio,
    Incompetech,
    /// User-uploaded library, resolved through an authenticated lookup
    MyAudio,
    /// External service behind a slow proxy
    Battlebards,
    Unrecognized(String),
}

impl Provider {
    /// Host tag for this provider
    pub fn tag(&self) -> &str {
        match self {
            Provider::TabletopAudio => "Tabletop Audio",
            Provider::Incompetech => "Incompetech",
            Provider::MyAudio => "My Audio",
            Provider::Battlebards => "Battlebards",
            Provider::Unrecognized(tag) => tag,
        }
    }

    /// Whether resolution goes through the slow external service
    pub fn is_slow(&self) -> bool {
        matches!(self, Provider::Battlebards)
    }
}

impl From<&str> for Provider {
    fn from(tag: &str) -> Self {
        match tag {
            "Tabletop Audio" => Provider::TabletopAudio,
            "Incompetech" => Provider::Incompetech,
            "My Audio" => Provider::MyAudio,
            "Battlebards" => Provider::Battlebards,
            other => Provider::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Provider {
    fn from(tag: String) -> Self {
        Provider::from(tag.as_str())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.tag().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One playlist entry as observed at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    #[serde(rename = "trackId")]
    pub id: String,
    #[serde(rename = "source")]
    pub provider: Provider,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub volume: f64,
    #[serde(default, alias = "gprogress")]
    pub progress: f64,
    #[serde(default)]
    pub duration: String,
}

impl TrackDescriptor {
    /// Create a descriptor with only an id and a provider set
    pub fn new(id: impl Into<String>, provider: impl Into<Provider>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            title: String::new(),
            looping: false,
            playing: false,
            volume: 0.0,
            progress: 0.0,
            duration: String::new(),
        }
    }

    /// Part of the id before the first `-`
    pub fn id_segment(&self) -> &str {
        self.id.split('-').next().unwrap_or_default()
    }

    /// Attach a resolved URL to the public fields of this track
    pub fn with_url(&self, url: impl Into<String>) -> SnapshotTrack {
        SnapshotTrack {
            title: self.title.clone(),
            url: url.into(),
            looping: self.looping,
            playing: self.playing,
            volume: self.volume,
            progress: self.progress,
            duration: self.duration.clone(),
        }
    }
}

/// Outcome of resolving a track's playable URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Url(String),
    /// Deliberately no URL for this track
    Unavailable,
    /// Resolution exceeded its time budget
    TimedOut,
}

impl Resolution {
    /// Build a resolution from a raw URL; an empty URL means unavailable
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.is_empty() {
            Resolution::Unavailable
        } else {
            Resolution::Url(url)
        }
    }

    /// String published for this resolution
    pub fn as_wire(&self) -> &str {
        match self {
            Resolution::Url(url) => url,
            Resolution::Unavailable => "",
            Resolution::TimedOut => TIMEOUT_SENTINEL,
        }
    }
}

/// Opaque identifiers of the session originating snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Player id
    pub player_id: String,
    /// Campaign id, also used as the room / record id
    pub campaign_id: String,
}

/// A resolved track as it travels over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTrack {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub duration: String,
}

impl SnapshotTrack {
    /// Minimal track, mostly useful to build states by hand
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            url: url.into(),
            looping: false,
            playing: false,
            volume: 0.0,
            progress: 0.0,
            duration: String::new(),
        }
    }
}

/// Point-in-time view of the jukebox, ready for publishing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    #[serde(rename = "uId")]
    pub user_id: String,
    #[serde(rename = "rId")]
    pub room_id: String,
    pub date: DateTime<Utc>,
    pub tracks: Vec<SnapshotTrack>,
}

impl SnapshotPayload {
    pub fn new(session: &Session, tracks: Vec<SnapshotTrack>) -> Self {
        Self {
            user_id: session.player_id.clone(),
            room_id: session.campaign_id.clone(),
            date: Utc::now(),
            tracks,
        }
    }
}
