//! Audio session and volume persistence over a string key-value store.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::manifest::Track;

/// Synchronous string storage; `localStorage` in the browser.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSession {
    #[serde(rename = "src")]
    pub source_url: String,
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub track_index: usize,
    #[serde(default)]
    pub is_playing: bool,
    /// Epoch milliseconds when written.
    pub timestamp: f64,
}

impl AudioSession {
    pub fn is_expired(&self, now_ms: f64, max_age_ms: f64) -> bool {
        now_ms - self.timestamp > max_age_ms
    }
}

pub struct SessionStore<S> {
    store: S,
    session_key: String,
    volume_key: String,
    max_age_ms: f64,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(
        store: S,
        session_key: impl Into<String>,
        volume_key: impl Into<String>,
        max_age_ms: f64,
    ) -> Self {
        Self {
            store,
            session_key: session_key.into(),
            volume_key: volume_key.into(),
            max_age_ms,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unparsable and expired sessions are deleted and reported as absent.
    pub fn load_session(&self, now_ms: f64) -> Option<AudioSession> {
        let raw = self.store.get(&self.session_key)?;
        let session = match serde_json::from_str::<AudioSession>(&raw) {
            Ok(session) => session,
            Err(_) => {
                self.store.remove(&self.session_key);
                return None;
            }
        };
        if session.is_expired(now_ms, self.max_age_ms) {
            self.store.remove(&self.session_key);
            return None;
        }
        Some(session)
    }

    pub fn save_session(&self, session: &AudioSession) {
        if let Ok(raw) = serde_json::to_string(session) {
            self.store.set(&self.session_key, &raw);
        }
    }

    pub fn clear_session(&self) {
        self.store.remove(&self.session_key);
    }

    /// Missing, unparsable or non-positive values read as full volume.
    pub fn load_volume(&self) -> f64 {
        self.store
            .get(&self.volume_key)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0)
            .map(|value| value.min(1.0))
            .unwrap_or(1.0)
    }

    pub fn save_volume(&self, volume: f64) {
        self.store.set(&self.volume_key, &volume.to_string());
    }
}

/// Lets a time-update save through at most once per interval.
#[derive(Debug)]
pub struct SaveThrottle {
    interval_ms: f64,
    last_ms: f64,
}

impl SaveThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: 0.0,
        }
    }

    pub fn ready(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms > self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

    fn store() -> SessionStore<MemoryStore> {
        SessionStore::new(MemoryStore::default(), "state", "volume", DAY_MS)
    }

    fn session(timestamp: f64) -> AudioSession {
        AudioSession {
            source_url: "audio/a.wav".into(),
            current_time: 12.5,
            track_name: "A".into(),
            tracks: vec![Track::new("A", "audio/a.wav")],
            track_index: 0,
            is_playing: true,
            timestamp,
        }
    }

    #[test]
    fn fresh_session_is_restored() {
        let s = store();
        s.save_session(&session(1_000.0));
        assert_eq!(s.load_session(5_000.0), Some(session(1_000.0)));
    }

    #[test]
    fn stale_session_is_deleted() {
        let s = store();
        s.save_session(&session(0.0));
        assert_eq!(s.load_session(DAY_MS + 1.0), None);
        assert_eq!(s.store().get("state"), None);
    }

    #[test]
    fn malformed_session_is_deleted() {
        let s = store();
        s.store().set("state", "{not json");
        assert_eq!(s.load_session(0.0), None);
        assert_eq!(s.store().get("state"), None);
    }

    #[test]
    fn blob_uses_original_field_names() {
        let raw = serde_json::to_string(&session(7.0)).unwrap();
        for field in ["\"src\"", "\"currentTime\"", "\"trackName\"", "\"trackIndex\"", "\"isPlaying\""] {
            assert!(raw.contains(field), "missing {field} in {raw}");
        }
    }

    #[test]
    fn volume_defaults_to_full() {
        let s = store();
        assert_eq!(s.load_volume(), 1.0);
        s.store().set("volume", "0");
        assert_eq!(s.load_volume(), 1.0);
        s.save_volume(0.4);
        assert_eq!(s.load_volume(), 0.4);
    }

    #[test]
    fn throttle_spaces_saves() {
        let mut throttle = SaveThrottle::new(2000.0);
        assert!(throttle.ready(2500.0));
        assert!(!throttle.ready(4000.0));
        assert!(throttle.ready(4501.0));
    }
}
