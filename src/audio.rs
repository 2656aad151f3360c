//! Playlist, volume and the small formatting helpers shared by the popup and
//! mini players.

use crate::cycle::{next_index, prev_index};
use crate::geometry::Rect;
use crate::manifest::Track;

pub const GLYPH_PLAYING: &str = "[⏸]";
pub const GLYPH_PAUSED: &str = "[▶]";
pub const ICON_VOLUME: &str = "[♪]";
pub const ICON_MUTED: &str = "[○]";

#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    index: usize,
}

impl Playlist {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    /// Replaces the playlist and rewinds to track 0 unless `tracks` starts with
    /// the same path as the loaded list. Returns whether it was replaced.
    pub fn adopt(&mut self, tracks: &[Track]) -> bool {
        let same = match (self.tracks.first(), tracks.first()) {
            (Some(current), Some(incoming)) => current.path == incoming.path,
            _ => false,
        };
        if same {
            return false;
        }
        self.tracks = tracks.to_vec();
        self.index = 0;
        true
    }

    /// Restores a saved playlist verbatim.
    pub fn restore(&mut self, tracks: Vec<Track>, index: usize) {
        self.tracks = tracks;
        self.index = index;
    }

    /// Bounds-checked selection.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.index = index;
        self.tracks.get(index)
    }

    pub fn next_index(&self) -> Option<usize> {
        next_index(self.index, self.tracks.len())
    }

    pub fn prev_index(&self) -> Option<usize> {
        prev_index(self.index, self.tracks.len())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolumeUi {
    pub bar_percent: f64,
    pub icon: &'static str,
    pub muted: bool,
}

/// What a volume input changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeChange {
    /// Level to apply to the media element.
    pub level: f64,
    /// Value to write to storage, if any.
    pub persist: Option<f64>,
}

#[derive(Debug)]
pub struct Volume {
    level: f64,
    remembered: f64,
    muted: bool,
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Volume {
    pub fn new(initial: f64) -> Self {
        let level = clamp_unit(initial);
        Self {
            level,
            remembered: if level > 0.0 { level } else { 1.0 },
            muted: false,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Clamps into `[0, 1]`. Only non-zero levels are remembered and persisted.
    pub fn set(&mut self, value: f64) -> VolumeChange {
        let level = clamp_unit(value);
        self.level = level;
        if level > 0.0 {
            self.remembered = level;
            self.muted = false;
            VolumeChange {
                level,
                persist: Some(level),
            }
        } else {
            VolumeChange {
                level,
                persist: None,
            }
        }
    }

    pub fn toggle_mute(&mut self) -> VolumeChange {
        if self.muted || self.level == 0.0 {
            let restore = if self.remembered > 0.0 {
                self.remembered
            } else {
                1.0
            };
            self.set(restore)
        } else {
            self.remembered = self.level;
            self.level = 0.0;
            self.muted = true;
            VolumeChange {
                level: 0.0,
                persist: None,
            }
        }
    }

    pub fn ui(&self) -> VolumeUi {
        let silent = self.level == 0.0;
        VolumeUi {
            bar_percent: self.level * 100.0,
            icon: if silent { ICON_MUTED } else { ICON_VOLUME },
            muted: silent,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

pub fn play_glyph(playing: bool) -> &'static str {
    if playing {
        GLYPH_PLAYING
    } else {
        GLYPH_PAUSED
    }
}

/// `m:ss`; anything non-finite or negative renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / duration * 100.0).clamp(0.0, 100.0)
}

/// Fraction of `bar` to the left of `client_x`, clamped to `[0, 1]`.
pub fn fraction_along(client_x: f64, bar: Rect) -> f64 {
    let width = bar.width();
    if width <= 0.0 {
        return 0.0;
    }
    ((client_x - bar.left) / width).clamp(0.0, 1.0)
}
