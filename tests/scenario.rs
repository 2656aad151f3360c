//! End-to-end controller runs on the host: popup gallery, session restore and
//! the category legend.

use portfolio_wasm::audio::{VolumeUi, GLYPH_PAUSED, GLYPH_PLAYING, ICON_MUTED, ICON_VOLUME};
use portfolio_wasm::config::SiteConfig;
use portfolio_wasm::controller::{
    ClickRegions, Command, HoverRole, Key, PopupContent, ScatteredController, UiEvent,
};
use portfolio_wasm::lightbox::MediaKind;
use portfolio_wasm::manifest::{AudioManifest, ImageManifest, Track};
use portfolio_wasm::popup::ProjectDescriptor;
use portfolio_wasm::session::{AudioSession, MemoryStore, SessionStore};
use portfolio_wasm::ElementId;

const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

fn controller_with_images(json: &str) -> ScatteredController {
    let mut c = ScatteredController::new(SiteConfig::default(), 1.0);
    let manifest = ImageManifest::from_json(json).unwrap();
    assert!(c.handle(UiEvent::ImageManifestLoaded(manifest), 0.0).is_empty());
    c
}

fn descriptor(id: &str, title: &str) -> ProjectDescriptor {
    ProjectDescriptor {
        title: title.to_string(),
        project_id: Some(id.to_string()),
        ..ProjectDescriptor::default()
    }
}

fn media(path: &str, kind: MediaKind, alt: &str) -> Command {
    Command::ShowMedia {
        path: path.to_string(),
        kind,
        alt: alt.to_string(),
    }
}

#[test]
fn mixed_gallery_plays_through_and_hides() {
    let mut c = controller_with_images(r#"{"p": ["a.jpg", "b.mp4"]}"#);
    let shown = c.handle(
        UiEvent::HoverEnter {
            element: ElementId(0),
            role: HoverRole::Word,
            project: descriptor("p", "P"),
        },
        0.0,
    );
    assert_eq!(
        shown,
        vec![
            Command::StopSlideshow,
            Command::ClearPopupMedia,
            Command::FillPopup(PopupContent {
                title: "P".into(),
                description: String::new(),
                tech: String::new(),
                year: String::new(),
                links: Vec::new(),
            }),
            media("a.jpg", MediaKind::Image, "P"),
            Command::SetGalleryArrows(true),
            Command::StartSlideshow,
            Command::RenderDots {
                count: 2,
                active: 0
            },
            Command::ShowAudioPlayer(false),
            Command::ShowPopup {
                anchor: ElementId(0)
            },
            Command::SetPopupActive {
                element: ElementId(0),
                active: true
            },
        ]
    );

    let tick = c.handle(UiEvent::SlideshowTick, 3000.0);
    assert_eq!(
        tick,
        vec![media("b.mp4", MediaKind::Video, ""), Command::SetActiveDot(1)]
    );
    // The slideshow waits on a video.
    assert!(c.handle(UiEvent::SlideshowTick, 6000.0).is_empty());
    assert_eq!(c.gallery().index(), 1);

    let next = c.handle(UiEvent::GalleryNext, 6500.0);
    assert_eq!(
        next,
        vec![
            media("a.jpg", MediaKind::Image, ""),
            Command::SetActiveDot(0),
            Command::StartSlideshow,
        ]
    );

    let leave = c.handle(
        UiEvent::HoverLeave {
            element: ElementId(0),
            role: HoverRole::Word,
            onto_sub_project: false,
            left_element: true,
        },
        7000.0,
    );
    assert_eq!(leave, vec![Command::StartHideTimer]);
    assert!(c.popup_visible());

    let hidden = c.handle(UiEvent::HideTimerFired, 7200.0);
    assert!(hidden.contains(&Command::HidePopup));
    assert!(hidden.contains(&Command::StopSlideshow));
    assert!(!hidden.contains(&Command::CancelHideTimer));
    assert!(!c.popup_visible());
    assert_eq!(c.current_project(), None);
}

#[test]
fn arrow_keys_only_act_on_a_visible_navigable_gallery() {
    let mut c = controller_with_images(r#"{"p": ["a.jpg", "b.jpg", "c.jpg"], "q": ["only.jpg"]}"#);
    let left = UiEvent::Key {
        key: Key::ArrowLeft,
        in_text_input: false,
    };
    assert!(c.handle(left.clone(), 0.0).is_empty());

    c.handle(
        UiEvent::HoverEnter {
            element: ElementId(2),
            role: HoverRole::Word,
            project: descriptor("p", "P"),
        },
        0.0,
    );
    let out = c.handle(left.clone(), 10.0);
    assert_eq!(out.first(), Some(&Command::ConsumeKey));
    assert!(out.contains(&media("c.jpg", MediaKind::Image, "")));

    c.handle(
        UiEvent::HoverEnter {
            element: ElementId(3),
            role: HoverRole::Word,
            project: descriptor("q", "Q"),
        },
        20.0,
    );
    assert!(c.handle(left, 30.0).is_empty());
}

#[test]
fn saved_session_resumes_paused_and_expired_one_waits_for_a_click() {
    let store = SessionStore::new(MemoryStore::default(), "state", "volume", DAY_MS);
    let tracks = vec![Track::new("One", "one.mp3"), Track::new("Two", "two.mp3")];
    store.save_session(&AudioSession {
        source_url: "two.mp3".into(),
        current_time: 42.0,
        track_name: "Two".into(),
        tracks: tracks.clone(),
        track_index: 1,
        is_playing: false,
        timestamp: 1_000.0,
    });

    let mut c = ScatteredController::new(SiteConfig::default(), store.load_volume());
    let restored = c.handle(
        UiEvent::AudioManifestSettled {
            manifest: None,
            saved: store.load_session(2_000.0),
        },
        2_000.0,
    );
    assert_eq!(restored[0], Command::LoadSource("two.mp3".into()));
    assert_eq!(restored[1], Command::SetCurrentTime(42.0));
    assert!(restored.contains(&Command::ShowMiniPlayer {
        label: "Two".into()
    }));
    assert!(!restored.contains(&Command::Play));
    assert_eq!(c.playlist().tracks(), tracks.as_slice());
    assert_eq!(c.playlist().index(), 1);

    // A day and a bit later the same blob is gone.
    let late = 1_000.0 + DAY_MS + 1.0;
    assert_eq!(store.load_session(late), None);
    let mut fresh = ScatteredController::new(SiteConfig::default(), 1.0);
    let settled = fresh.handle(
        UiEvent::AudioManifestSettled {
            manifest: None,
            saved: store.load_session(late),
        },
        late,
    );
    assert_eq!(settled, vec![Command::ArmFirstClick]);

    let first = fresh.handle(UiEvent::FirstClick, late + 5.0);
    let default_track = SiteConfig::default().default_track;
    assert_eq!(
        first,
        vec![Command::LoadSource(default_track.path.clone()), Command::Play]
    );
    let started = fresh.handle(UiEvent::PlaybackStarted, late + 10.0);
    assert!(started.contains(&Command::ShowMiniPlayer {
        label: default_track.name.clone()
    }));
    assert!(started
        .iter()
        .any(|command| matches!(command, Command::PersistSession(s) if s.is_playing)));
}

#[test]
fn project_audio_drives_the_player() {
    let manifest = AudioManifest::from_json(
        r#"{"band": [{"name": "A", "path": "a.mp3"}, {"name": "B", "path": "b.mp3"}]}"#,
    )
    .unwrap();
    let mut c = ScatteredController::new(SiteConfig::default(), 1.0);
    c.handle(
        UiEvent::AudioManifestSettled {
            manifest: Some(manifest),
            saved: None,
        },
        0.0,
    );
    let shown = c.handle(
        UiEvent::HoverEnter {
            element: ElementId(1),
            role: HoverRole::Word,
            project: descriptor("band", "Band"),
        },
        0.0,
    );
    assert!(shown.contains(&Command::ShowAudioPlayer(true)));

    let play = c.handle(
        UiEvent::Key {
            key: Key::Space,
            in_text_input: false,
        },
        10.0,
    );
    assert_eq!(play[0], Command::ConsumeKey);
    assert!(play.contains(&Command::LoadSource("a.mp3".into())));

    c.handle(UiEvent::PlaybackStarted, 20.0);
    let ended = c.handle(UiEvent::TrackEnded, 30.0);
    assert!(ended.contains(&Command::LoadSource("b.mp3".into())));
    assert!(ended.contains(&Command::HighlightTrack(1)));

    // Typing a space in a form field is left alone.
    assert!(c
        .handle(
            UiEvent::Key {
                key: Key::Space,
                in_text_input: true
            },
            40.0
        )
        .is_empty());

    let closed = c.handle(UiEvent::CloseMiniPlayer, 50.0);
    assert!(closed.contains(&Command::ClearSession));
    assert!(closed.contains(&Command::HideMiniPlayer));
}

#[test]
fn legend_filter_toggles_and_clears_on_outside_click() {
    let mut c = ScatteredController::new(SiteConfig::default(), 1.0);
    assert_eq!(
        c.handle(UiEvent::LegendClick("music".into()), 0.0),
        vec![Command::ApplyFilter(Some("music".into()))]
    );
    assert_eq!(c.filter().active(), Some("music"));

    let on_project = ClickRegions {
        on_project: true,
        ..ClickRegions::default()
    };
    assert!(!c
        .handle(UiEvent::DocumentClick(on_project), 1.0)
        .contains(&Command::ApplyFilter(None)));

    assert!(c
        .handle(UiEvent::DocumentClick(ClickRegions::default()), 2.0)
        .contains(&Command::ApplyFilter(None)));
    assert_eq!(c.filter().active(), None);

    c.handle(UiEvent::LegendClick("music".into()), 3.0);
    assert_eq!(
        c.handle(UiEvent::LegendClick("music".into()), 4.0),
        vec![Command::ApplyFilter(None)]
    );
}

fn band_and_solo() -> AudioManifest {
    AudioManifest::from_json(
        r#"{
            "band": [{"name": "A", "path": "a.mp3"}, {"name": "B", "path": "b.mp3"}],
            "solo": [{"name": "S", "path": "s.mp3"}]
        }"#,
    )
    .unwrap()
}

fn with_audio(manifest: AudioManifest) -> ScatteredController {
    let mut c = ScatteredController::new(SiteConfig::default(), 1.0);
    c.handle(
        UiEvent::AudioManifestSettled {
            manifest: Some(manifest),
            saved: None,
        },
        0.0,
    );
    c
}

fn hover_word(c: &mut ScatteredController, element: usize, id: &str, title: &str) -> Vec<Command> {
    c.handle(
        UiEvent::HoverEnter {
            element: ElementId(element),
            role: HoverRole::Word,
            project: descriptor(id, title),
        },
        0.0,
    )
}

fn band_tracks() -> Vec<Track> {
    vec![Track::new("A", "a.mp3"), Track::new("B", "b.mp3")]
}

fn bare_popup(title: &str) -> Command {
    Command::FillPopup(PopupContent {
        title: title.into(),
        description: String::new(),
        tech: String::new(),
        year: String::new(),
        links: Vec::new(),
    })
}

#[test]
fn blocked_playback_leaves_a_paused_mini_player() {
    let mut fresh = ScatteredController::new(SiteConfig::default(), 1.0);
    assert!(fresh.handle(UiEvent::PlaybackBlocked, 0.0).is_empty());

    let mut c = with_audio(band_and_solo());
    hover_word(&mut c, 1, "band", "Band");
    assert_eq!(
        c.handle(UiEvent::SelectTrack(0), 10.0),
        vec![
            Command::LoadSource("a.mp3".into()),
            Command::Play,
            Command::HighlightTrack(0),
            Command::SetPlayGlyph(GLYPH_PLAYING),
            Command::ShowMiniPlayer { label: "A".into() },
        ]
    );
    assert_eq!(
        c.handle(UiEvent::PlaybackBlocked, 20.0),
        vec![
            Command::ShowMiniPlayer { label: "A".into() },
            Command::SetPlayGlyph(GLYPH_PAUSED),
        ]
    );
    // The source stays loaded, so the next toggle only resumes it.
    assert_eq!(c.handle(UiEvent::TogglePlayback, 30.0), vec![Command::Play]);
}

#[test]
fn playing_session_restores_straight_into_playback() {
    let tracks = vec![Track::new("A", "a.mp3")];
    let saved = AudioSession {
        source_url: "a.mp3".into(),
        current_time: 3.0,
        track_name: "A".into(),
        tracks: tracks.clone(),
        track_index: 0,
        is_playing: true,
        timestamp: 1_000.0,
    };
    let mut c = ScatteredController::new(SiteConfig::default(), 1.0);
    assert_eq!(
        c.handle(
            UiEvent::AudioManifestSettled {
                manifest: None,
                saved: Some(saved),
            },
            5.0,
        ),
        vec![
            Command::LoadSource("a.mp3".into()),
            Command::SetCurrentTime(3.0),
            Command::Play,
        ]
    );
    assert_eq!(
        c.handle(UiEvent::PlaybackStarted, 10.0),
        vec![
            Command::SetPlayGlyph(GLYPH_PLAYING),
            Command::ShowMiniPlayer { label: "A".into() },
            Command::PersistSession(AudioSession {
                source_url: "a.mp3".into(),
                current_time: 3.0,
                track_name: "A".into(),
                tracks,
                track_index: 0,
                is_playing: true,
                timestamp: 10.0,
            }),
        ]
    );
    // A restored source is never replaced by the first-click default.
    assert!(c.handle(UiEvent::FirstClick, 20.0).is_empty());
}

#[test]
fn volume_changes_apply_persist_and_remember_the_level() {
    let ui = |level: f64| VolumeUi {
        bar_percent: level * 100.0,
        icon: if level == 0.0 { ICON_MUTED } else { ICON_VOLUME },
        muted: level == 0.0,
    };
    let apply = |level: f64| Command::ApplyVolume {
        level,
        ui: ui(level),
    };

    let mut c = ScatteredController::new(SiteConfig::default(), 0.6);
    assert_eq!(c.start(), vec![apply(0.6)]);

    assert_eq!(
        c.handle(UiEvent::SetVolume(1.7), 0.0),
        vec![apply(1.0), Command::PersistVolume(1.0)]
    );
    assert_eq!(
        c.handle(UiEvent::SetVolume(0.6), 0.0),
        vec![apply(0.6), Command::PersistVolume(0.6)]
    );
    assert_eq!(c.handle(UiEvent::ToggleMute, 0.0), vec![apply(0.0)]);
    assert_eq!(
        c.handle(UiEvent::ToggleMute, 0.0),
        vec![apply(0.6), Command::PersistVolume(0.6)]
    );
    // Dragging to zero silences without persisting the zero.
    assert_eq!(c.handle(UiEvent::SetVolume(-1.0), 0.0), vec![apply(0.0)]);
    assert_eq!(
        c.handle(UiEvent::ToggleMute, 0.0),
        vec![apply(0.6), Command::PersistVolume(0.6)]
    );
}

#[test]
fn time_updates_persist_at_most_every_two_seconds() {
    let mut c = with_audio(band_and_solo());
    assert!(c.handle(UiEvent::BeforeUnload, 0.0).is_empty());

    hover_word(&mut c, 1, "band", "Band");
    c.handle(UiEvent::SelectTrack(0), 9_000.0);
    c.handle(UiEvent::PlaybackStarted, 9_000.0);

    let session = |current_time: f64, timestamp: f64| {
        Command::PersistSession(AudioSession {
            source_url: "a.mp3".into(),
            current_time,
            track_name: "A".into(),
            tracks: band_tracks(),
            track_index: 0,
            is_playing: true,
            timestamp,
        })
    };
    let update = |current: f64| UiEvent::TimeUpdate {
        current,
        duration: 100.0,
    };

    assert_eq!(
        c.handle(update(5.0), 10_000.0),
        vec![
            Command::SetProgress(5.0),
            Command::SetCurrentTimeLabel("0:05".into()),
            session(5.0, 10_000.0),
        ]
    );
    assert_eq!(
        c.handle(update(6.0), 11_000.0),
        vec![
            Command::SetProgress(6.0),
            Command::SetCurrentTimeLabel("0:06".into()),
        ]
    );
    assert_eq!(
        c.handle(update(7.0), 12_001.0),
        vec![
            Command::SetProgress(7.0),
            Command::SetCurrentTimeLabel("0:07".into()),
            session(7.0, 12_001.0),
        ]
    );
    // Unload always writes, throttle or not.
    assert_eq!(
        c.handle(UiEvent::BeforeUnload, 12_500.0),
        vec![session(7.0, 12_500.0)]
    );
}

#[test]
fn seeking_needs_a_known_duration() {
    let mut c = with_audio(band_and_solo());
    hover_word(&mut c, 1, "band", "Band");
    c.handle(UiEvent::SelectTrack(0), 0.0);

    assert!(c.handle(UiEvent::Seek(0.5), 0.0).is_empty());
    assert_eq!(
        c.handle(UiEvent::MetadataLoaded { duration: 200.0 }, 0.0),
        vec![Command::SetDurationLabel("3:20".into())]
    );
    assert_eq!(
        c.handle(UiEvent::Seek(0.25), 0.0),
        vec![Command::SetCurrentTime(50.0)]
    );
    assert_eq!(
        c.handle(UiEvent::Seek(1.5), 0.0),
        vec![Command::SetCurrentTime(200.0)]
    );
}

#[test]
fn hovering_another_project_replaces_the_playlist() {
    let mut c = with_audio(band_and_solo());
    hover_word(&mut c, 1, "band", "Band");
    c.handle(UiEvent::SelectTrack(1), 0.0);

    // Same project again: position kept.
    assert_eq!(
        hover_word(&mut c, 1, "band", "Band"),
        vec![
            Command::StopSlideshow,
            Command::ClearPopupMedia,
            bare_popup("Band"),
            Command::SetGalleryArrows(false),
            Command::RenderDots {
                count: 0,
                active: 0
            },
            Command::RenderTrackList {
                tracks: band_tracks(),
                active: 1
            },
            Command::ShowAudioPlayer(true),
            Command::ShowPopup {
                anchor: ElementId(1)
            },
            Command::SetPopupActive {
                element: ElementId(1),
                active: true
            },
        ]
    );

    assert_eq!(
        hover_word(&mut c, 2, "solo", "Solo"),
        vec![
            Command::SetPopupActive {
                element: ElementId(1),
                active: false
            },
            Command::StopSlideshow,
            Command::ClearPopupMedia,
            bare_popup("Solo"),
            Command::SetGalleryArrows(false),
            Command::RenderDots {
                count: 0,
                active: 0
            },
            Command::RenderTrackList {
                tracks: vec![Track::new("S", "s.mp3")],
                active: 0
            },
            Command::ShowAudioPlayer(true),
            Command::ShowPopup {
                anchor: ElementId(2)
            },
            Command::SetPopupActive {
                element: ElementId(2),
                active: true
            },
        ]
    );
    assert_eq!(c.playlist().index(), 0);

    // What is already playing keeps its own name.
    let resumed = c.handle(UiEvent::PlaybackStarted, 5.0);
    assert!(resumed.contains(&Command::ShowMiniPlayer { label: "B".into() }));
}
