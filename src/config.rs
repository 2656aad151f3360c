//! Site-wide settings: manifest locations, storage keys, timings and layout
//! constants. Everything has a default; `<body data-*>` attributes may override
//! the manifest URLs and the default track.

use crate::manifest::Track;

pub const POPUP_HIDE_DELAY_MS: u32 = 200;
pub const SLIDESHOW_INTERVAL_MS: u32 = 3000;
pub const RIPPLE_LIFETIME_MS: u32 = 1000;
pub const SESSION_SAVE_INTERVAL_MS: f64 = 2000.0;
pub const SESSION_MAX_AGE_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Gap between the hovered word and the popup.
pub const POPUP_OFFSET: f64 = 20.0;
/// Minimum distance the popup keeps from every viewport edge.
pub const VIEWPORT_PADDING: f64 = 20.0;

pub const AUDIO_STATE_KEY: &str = "portfolio_audio_state";
pub const VOLUME_KEY: &str = "portfolio_audio_volume";

pub const IMAGE_MANIFEST_URL: &str = "js/project-images.json";
pub const AUDIO_MANIFEST_URL: &str = "js/project-audio.json";

pub const DEFAULT_TRACK_NAME: &str = "Kremnitze";
pub const DEFAULT_TRACK_PATH: &str =
    "https://media.leosakharoff.com/audio/ambient-electroacustic/Kremnitze.wav";

#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub image_manifest_url: String,
    pub audio_manifest_url: String,
    pub audio_state_key: String,
    pub volume_key: String,
    pub default_track: Track,
    pub popup_hide_delay_ms: u32,
    pub slideshow_interval_ms: u32,
    pub ripple_lifetime_ms: u32,
    pub session_save_interval_ms: f64,
    pub session_max_age_ms: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            image_manifest_url: IMAGE_MANIFEST_URL.to_string(),
            audio_manifest_url: AUDIO_MANIFEST_URL.to_string(),
            audio_state_key: AUDIO_STATE_KEY.to_string(),
            volume_key: VOLUME_KEY.to_string(),
            default_track: Track::new(DEFAULT_TRACK_NAME, DEFAULT_TRACK_PATH),
            popup_hide_delay_ms: POPUP_HIDE_DELAY_MS,
            slideshow_interval_ms: SLIDESHOW_INTERVAL_MS,
            ripple_lifetime_ms: RIPPLE_LIFETIME_MS,
            session_save_interval_ms: SESSION_SAVE_INTERVAL_MS,
            session_max_age_ms: SESSION_MAX_AGE_MS,
        }
    }
}

impl SiteConfig {
    /// Applies overrides looked up by attribute name (`data-image-manifest`,
    /// `data-audio-manifest`, `data-default-track-name`,
    /// `data-default-track-path`, `data-ripple-lifetime`). Blank or unparsable
    /// values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        if let Some(url) = value("data-image-manifest") {
            self.image_manifest_url = url;
        }
        if let Some(url) = value("data-audio-manifest") {
            self.audio_manifest_url = url;
        }
        if let Some(name) = value("data-default-track-name") {
            self.default_track.name = name;
        }
        if let Some(path) = value("data-default-track-path") {
            self.default_track.path = path;
        }
        if let Some(ms) = value("data-ripple-lifetime").and_then(|raw| raw.parse().ok()) {
            self.ripple_lifetime_ms = ms;
        }
        self
    }
}
