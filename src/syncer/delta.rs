//! Snapshot deltas
//!
//! Turns consecutive jukebox snapshots of a room into mixer events.

use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::model::{SnapshotPayload, SnapshotTrack};

use super::mixer::{EventType, MixerEvent};

/// Quietest volume considered, -60dB relative to full volume
const MIN_VOLUME: f64 = 1.0e-3;
const MAX_VOLUME: f64 = 1.0;

/// Difference in decibels between two volumes in `[0.001, 1]`.
/// Values outside the range are clamped to the closest bound.
pub fn volume_delta_db(old: f64, new: f64) -> f64 {
    let old = old.clamp(MIN_VOLUME, MAX_VOLUME);
    let new = new.clamp(MIN_VOLUME, MAX_VOLUME);
    20.0 * (new / old).log10()
}

/// Parse a duration given as seconds, `mm:ss` or `hh:mm:ss`
pub fn parse_duration(s: &str) -> Result<Duration> {
    let invalid = || SyncError::InvalidDuration(s.to_string());
    let parts = s
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    let (hr, min, sec) = match parts.as_slice() {
        [sec] => (0, 0, *sec),
        [min, sec] => (0, *min, *sec),
        [hr, min, sec] => (*hr, *min, *sec),
        _ => return Err(invalid()),
    };
    let secs = hr
        .checked_mul(3600)
        .zip(min.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(sec))
        .ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}

fn make_event(track: &SnapshotTrack, kind: EventType, room_id: &str) -> MixerEvent {
    MixerEvent {
        record_id: room_id.to_string(),
        evt_id: track.url.clone(),
        kind,
        asset_url: track.url.clone(),
        looping: track.looping,
        // Tracks are not played at full volume by default
        volume_delta_db: volume_delta_db(1.0, track.volume / 100.0),
        seek_position_sec: 0,
    }
}

/// PLAY events for every playing track of a first snapshot
pub fn scan_for_play(state: &SnapshotPayload) -> Vec<MixerEvent> {
    state
        .tracks
        .iter()
        .filter(|t| t.playing)
        .map(|t| make_event(t, EventType::Play, &state.room_id))
        .collect()
}

/// Events needed to go from `old` to `new` for one track
pub fn track_delta(old: Option<&SnapshotTrack>, new: &SnapshotTrack, room_id: &str) -> Vec<MixerEvent> {
    let mut events = Vec::new();

    // Unknown track, only its play state matters
    let Some(old) = old else {
        if new.playing {
            events.push(make_event(new, EventType::Play, room_id));
        }
        return events;
    };

    if new.playing != old.playing {
        let kind = if new.playing {
            EventType::Play
        } else {
            EventType::Stop
        };
        events.push(make_event(new, kind, room_id));
    }

    if new.looping != old.looping {
        events.push(make_event(new, EventType::Other, room_id));
    }

    if new.volume != old.volume {
        let mut event = make_event(new, EventType::Volume, room_id);
        event.volume_delta_db = volume_delta_db(old.volume / 100.0, new.volume / 100.0);
        events.push(event);
    }

    // A seek shows up as a progress change; the position is progress * duration
    if new.playing && old.playing && new.progress != old.progress {
        match parse_duration(&new.duration) {
            Ok(duration) => {
                let mut event = make_event(new, EventType::Seek, room_id);
                event.seek_position_sec = (duration.as_secs_f64() * new.progress.min(1.0)) as i64;
                events.push(event);
            }
            Err(e) => {
                tracing::warn!("Ignoring SEEK event for {}: {}", new.url, e);
            }
        }
    }

    events
}

/// Events needed to go from one snapshot of a room to the next
pub fn state_delta(old: &SnapshotPayload, new: &SnapshotPayload) -> Result<Vec<MixerEvent>> {
    if new.room_id != old.room_id {
        return Err(SyncError::RoomMismatch {
            old: old.room_id.clone(),
            new: new.room_id.clone(),
        });
    }

    // Out of order snapshots are dropped, the next one carries the changes
    if new.date < old.date {
        return Err(SyncError::StaleState {
            new: new.date.to_rfc3339(),
            old: old.date.to_rfc3339(),
        });
    }

    // Only one user may drive a record
    if new.user_id != old.user_id {
        return Err(SyncError::UserMismatch {
            old: old.user_id.clone(),
            new: new.user_id.clone(),
        });
    }

    Ok(new
        .tracks
        .iter()
        .flat_map(|new_track| {
            let old_track = old.tracks.iter().find(|t| t.url == new_track.url);
            track_delta(old_track, new_track, &new.room_id)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn track(url: &str, playing: bool) -> SnapshotTrack {
        SnapshotTrack {
            playing,
            ..SnapshotTrack::new(url)
        }
    }

    fn state(tracks: Vec<SnapshotTrack>) -> SnapshotPayload {
        SnapshotPayload {
            user_id: String::new(),
            room_id: String::new(),
            date: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            tracks,
        }
    }

    fn kinds(events: &[MixerEvent]) -> Vec<EventType> {
        events.iter().map(|e| e.kind).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_track_delta_unknown_track() {
        let events = track_delta(None, &track("a", true), "0");
        assert_eq!(kinds(&events), vec![EventType::Play]);

        let events = track_delta(None, &track("a", false), "0");
        assert!(events.is_empty());
    }

    #[test]
    fn test_track_delta_play_state() {
        let cases = [
            (true, true, vec![]),
            (true, false, vec![EventType::Stop]),
            (false, true, vec![EventType::Play]),
            (false, false, vec![]),
        ];
        for (old, new, expected) in cases {
            let events = track_delta(Some(&track("a", old)), &track("a", new), "0");
            assert_eq!(kinds(&events), expected, "old={} new={}", old, new);
        }
    }

    #[test]
    fn test_track_delta_loop_state() {
        let looping = SnapshotTrack {
            looping: true,
            ..SnapshotTrack::new("a")
        };
        let plain = SnapshotTrack::new("a");

        assert!(track_delta(Some(&looping), &looping, "0").is_empty());
        assert_eq!(
            kinds(&track_delta(Some(&looping), &plain, "0")),
            vec![EventType::Other]
        );
        assert_eq!(
            kinds(&track_delta(Some(&plain), &looping, "0")),
            vec![EventType::Other]
        );
    }

    #[test]
    fn test_track_delta_volume() {
        let old = SnapshotTrack {
            volume: 100.0,
            ..SnapshotTrack::new("a")
        };
        let new = SnapshotTrack {
            volume: 10.0,
            ..SnapshotTrack::new("a")
        };

        let events = track_delta(Some(&old), &new, "0");
        assert_eq!(kinds(&events), vec![EventType::Volume]);
        assert!(approx(events[0].volume_delta_db, -20.0));
    }

    #[test]
    fn test_track_delta_seek() {
        let old = SnapshotTrack {
            playing: true,
            progress: 0.1,
            duration: "2:00".to_string(),
            ..SnapshotTrack::new("a")
        };
        let new = SnapshotTrack {
            progress: 0.5,
            ..old.clone()
        };

        let events = track_delta(Some(&old), &new, "0");
        assert_eq!(kinds(&events), vec![EventType::Seek]);
        assert_eq!(events[0].seek_position_sec, 60);
    }

    #[test]
    fn test_track_delta_seek_clamps_progress() {
        let old = SnapshotTrack {
            playing: true,
            progress: 0.1,
            duration: "90".to_string(),
            ..SnapshotTrack::new("a")
        };
        let new = SnapshotTrack {
            progress: 3.0,
            ..old.clone()
        };

        let events = track_delta(Some(&old), &new, "0");
        assert_eq!(events[0].seek_position_sec, 90);
    }

    #[test]
    fn test_track_delta_seek_bad_duration_is_skipped() {
        let old = SnapshotTrack {
            playing: true,
            progress: 0.1,
            duration: "soon".to_string(),
            ..SnapshotTrack::new("a")
        };
        let new = SnapshotTrack {
            progress: 0.5,
            ..old.clone()
        };

        assert!(track_delta(Some(&old), &new, "0").is_empty());
    }

    #[test]
    fn test_track_delta_seek_huge_duration_is_skipped() {
        let old = SnapshotTrack {
            playing: true,
            progress: 0.1,
            duration: "400000000000000000:0".to_string(),
            ..SnapshotTrack::new("a")
        };
        let new = SnapshotTrack {
            progress: 0.5,
            ..old.clone()
        };

        assert!(track_delta(Some(&old), &new, "0").is_empty());
    }

    #[test]
    fn test_state_delta_no_change() {
        let events = state_delta(&state(vec![]), &state(vec![])).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_state_delta_play_state() {
        let events = state_delta(
            &state(vec![track("a", true)]),
            &state(vec![track("a", false)]),
        )
        .unwrap();
        assert_eq!(kinds(&events), vec![EventType::Stop]);

        let events = state_delta(
            &state(vec![track("a", false)]),
            &state(vec![track("a", true), track("b", true)]),
        )
        .unwrap();
        assert_eq!(kinds(&events), vec![EventType::Play, EventType::Play]);
        assert_eq!(events[1].asset_url, "b");
    }

    #[test]
    fn test_state_delta_new_state_is_older() {
        let old = state(vec![]);
        let new = SnapshotPayload {
            date: old.date - chrono::Duration::seconds(1),
            ..old.clone()
        };
        assert!(matches!(
            state_delta(&old, &new),
            Err(SyncError::StaleState { .. })
        ));
    }

    #[test]
    fn test_state_delta_mismatching_ids() {
        let old = state(vec![]);

        let new = SnapshotPayload {
            user_id: "b".to_string(),
            ..old.clone()
        };
        assert!(matches!(
            state_delta(&old, &new),
            Err(SyncError::UserMismatch { .. })
        ));

        let new = SnapshotPayload {
            room_id: "b".to_string(),
            ..old.clone()
        };
        assert!(matches!(
            state_delta(&old, &new),
            Err(SyncError::RoomMismatch { .. })
        ));
    }

    #[test]
    fn test_scan_for_play() {
        assert!(scan_for_play(&state(vec![])).is_empty());
        assert!(scan_for_play(&state(vec![track("a", false)])).is_empty());

        let events = scan_for_play(&state(vec![track("a", true), track("b", false)]));
        assert_eq!(kinds(&events), vec![EventType::Play]);
        assert_eq!(events[0].asset_url, "a");
    }

    #[test]
    fn test_volume_delta_db() {
        assert!(approx(volume_delta_db(0.0, 0.0), 0.0));
        assert!(approx(volume_delta_db(1.0, 0.0), -60.0));
        assert!(approx(volume_delta_db(0.0, 1.0), 60.0));
        assert!(approx(volume_delta_db(-52.0, 99884.0), 60.0));
        assert!(approx(volume_delta_db(0.01, 1.0), 40.0));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("01").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("1:23").unwrap(), Duration::from_secs(83));
        assert_eq!(parse_duration("01:03").unwrap(), Duration::from_secs(63));
        assert_eq!(parse_duration("01:3").unwrap(), Duration::from_secs(63));
        assert_eq!(parse_duration("1:23:45").unwrap(), Duration::from_secs(5025));
        assert_eq!(parse_duration("01:3:5").unwrap(), Duration::from_secs(3785));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("a").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("1:xx").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert!(parse_duration("18446744073709551615:0:0").is_err());
        assert!(parse_duration("400000000000000000:0").is_err());
        assert!(parse_duration("0:0:18446744073709551615").is_ok());
    }
}
