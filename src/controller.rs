//! Page controller for the scattered portfolio: hover popups with their media
//! gallery, umbrella expansion, the audio players, the category legend and the
//! contact dropdown.
//!
//! Browser input arrives as [`UiEvent`]s. [`ScatteredController::handle`]
//! updates state and answers with the [`Command`]s the DOM layer must carry
//! out, in order. Nothing here touches the DOM, so every transition runs on
//! the host.

use crate::audio::{format_time, play_glyph, progress_percent, Playlist, Volume, VolumeUi};
use crate::config::SiteConfig;
use crate::filter::CategoryFilter;
use crate::gallery::PopupGallery;
use crate::lightbox::MediaKind;
use crate::manifest::{AudioManifest, ImageManifest, Track};
use crate::media::{media_kind, resolve_media};
use crate::popup::{LinkButton, ProjectDescriptor};
use crate::session::{AudioSession, SaveThrottle};
use crate::umbrella::{UmbrellaState, UmbrellaTransition};
use crate::ElementId;

/// How a hovered element takes part in popups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverRole {
    Word,
    Umbrella,
    SubProject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    pub fn from_event(key: &str, code: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            " " => Key::Space,
            _ if code == "Space" => Key::Space,
            _ => Key::Other,
        }
    }
}

/// Which interesting regions a document-level click landed inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickRegions {
    pub on_umbrella: bool,
    pub on_sub_project: bool,
    pub on_popup: bool,
    pub on_project: bool,
    pub in_legend: bool,
    pub in_contact: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    ImageManifestLoaded(ImageManifest),
    /// The audio manifest request finished; `manifest` is `None` on failure.
    AudioManifestSettled {
        manifest: Option<AudioManifest>,
        saved: Option<AudioSession>,
    },

    HoverEnter {
        element: ElementId,
        role: HoverRole,
        project: ProjectDescriptor,
    },
    HoverLeave {
        element: ElementId,
        role: HoverRole,
        onto_sub_project: bool,
        left_element: bool,
    },
    PopupEnter,
    PopupLeave,
    HideTimerFired,
    SlideshowTick,
    GalleryPrev,
    GalleryNext,
    GalleryDot(usize),

    WordClick {
        element: ElementId,
        umbrella: bool,
    },
    DocumentClick(ClickRegions),
    FirstClick,
    Key {
        key: Key,
        in_text_input: bool,
    },
    Resize,
    LegendClick(String),
    ContactToggle,

    TogglePlayback,
    PrevTrack,
    NextTrack,
    SelectTrack(usize),
    Seek(f64),
    SetVolume(f64),
    ToggleMute,
    CloseMiniPlayer,

    PlaybackStarted,
    PlaybackPaused,
    PlaybackBlocked,
    TimeUpdate {
        current: f64,
        duration: f64,
    },
    MetadataLoaded {
        duration: f64,
    },
    TrackEnded,
    BeforeUnload,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub description: String,
    pub tech: String,
    pub year: String,
    pub links: Vec<LinkButton>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// The triggering key event should not reach the browser default.
    ConsumeKey,

    StartHideTimer,
    CancelHideTimer,
    StartSlideshow,
    StopSlideshow,

    ClearPopupMedia,
    FillPopup(PopupContent),
    ShowMedia {
        path: String,
        kind: MediaKind,
        alt: String,
    },
    PausePopupVideo,
    SetGalleryArrows(bool),
    RenderDots {
        count: usize,
        active: usize,
    },
    SetActiveDot(usize),
    ShowPopup {
        anchor: ElementId,
    },
    PositionPopup {
        anchor: ElementId,
    },
    HidePopup,
    SetPopupActive {
        element: ElementId,
        active: bool,
    },
    SetDirectHover {
        element: ElementId,
        hovered: bool,
    },

    SetExpanded {
        umbrella: ElementId,
        expanded: bool,
    },
    SetContainerExpanded(bool),
    LayoutSubProjects {
        umbrella: ElementId,
    },

    ApplyFilter(Option<String>),
    SetContactOpen(bool),

    ShowAudioPlayer(bool),
    RenderTrackList {
        tracks: Vec<Track>,
        active: usize,
    },
    HighlightTrack(usize),
    LoadSource(String),
    SetCurrentTime(f64),
    Play,
    Pause,
    ClearSource,
    SetPlayGlyph(&'static str),
    ShowMiniPlayer {
        label: String,
    },
    HideMiniPlayer,
    SetProgress(f64),
    SetCurrentTimeLabel(String),
    SetDurationLabel(String),
    ApplyVolume {
        level: f64,
        ui: VolumeUi,
    },
    PersistVolume(f64),
    PersistSession(AudioSession),
    ClearSession,
    ArmFirstClick,
}

#[derive(Debug, Default)]
struct PopupState {
    visible: bool,
    current: Option<ElementId>,
    hide_pending: bool,
}

#[derive(Debug)]
struct PlaybackState {
    source: Option<String>,
    /// Display name of `source`, kept with it so a playlist swapped by a later
    /// hover cannot relabel what is playing.
    name: Option<String>,
    position: f64,
    duration: f64,
    paused: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            source: None,
            name: None,
            position: 0.0,
            duration: f64::NAN,
            paused: true,
        }
    }
}

pub struct ScatteredController {
    config: SiteConfig,
    images: Option<ImageManifest>,
    audio_manifest: Option<AudioManifest>,
    popup: PopupState,
    gallery: PopupGallery,
    umbrellas: UmbrellaState,
    playlist: Playlist,
    playback: PlaybackState,
    volume: Volume,
    throttle: SaveThrottle,
    filter: CategoryFilter,
    contact_open: bool,
}

impl ScatteredController {
    pub fn new(config: SiteConfig, initial_volume: f64) -> Self {
        let throttle = SaveThrottle::new(config.session_save_interval_ms);
        Self {
            config,
            images: None,
            audio_manifest: None,
            popup: PopupState::default(),
            gallery: PopupGallery::default(),
            umbrellas: UmbrellaState::default(),
            playlist: Playlist::default(),
            playback: PlaybackState::default(),
            volume: Volume::new(initial_volume),
            throttle,
            filter: CategoryFilter::default(),
            contact_open: false,
        }
    }

    /// Commands to run once before any input.
    pub fn start(&self) -> Vec<Command> {
        vec![self.volume_command()]
    }

    pub fn popup_visible(&self) -> bool {
        self.popup.visible
    }

    pub fn current_project(&self) -> Option<ElementId> {
        self.popup.current
    }

    pub fn expanded_umbrella(&self) -> Option<ElementId> {
        self.umbrellas.expanded()
    }

    pub fn gallery(&self) -> &PopupGallery {
        &self.gallery
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn handle(&mut self, event: UiEvent, now_ms: f64) -> Vec<Command> {
        match event {
            UiEvent::ImageManifestLoaded(manifest) => {
                self.images = Some(manifest);
                Vec::new()
            }
            UiEvent::AudioManifestSettled { manifest, saved } => {
                self.audio_manifest = manifest;
                self.restore_session(saved)
            }

            UiEvent::HoverEnter {
                element,
                role,
                project,
            } => self.hover_enter(element, role, &project),
            UiEvent::HoverLeave {
                element,
                role,
                onto_sub_project,
                left_element,
            } => self.hover_leave(element, role, onto_sub_project, left_element),
            UiEvent::PopupEnter => self.popup_enter(),
            UiEvent::PopupLeave => self.request_hide(),
            UiEvent::HideTimerFired => self.hide_now(),
            UiEvent::SlideshowTick => match self.gallery.tick().map(str::to_string) {
                Some(path) => {
                    vec![
                        show_media(path, String::new()),
                        Command::SetActiveDot(self.gallery.index()),
                    ]
                }
                None => Vec::new(),
            },
            UiEvent::GalleryPrev => {
                let index = self.gallery.index() as isize - 1;
                self.navigate_gallery(index)
            }
            UiEvent::GalleryNext => {
                let index = self.gallery.index() as isize + 1;
                self.navigate_gallery(index)
            }
            UiEvent::GalleryDot(index) => self.navigate_gallery(index as isize),

            UiEvent::WordClick { element, umbrella } => {
                if umbrella {
                    self.toggle_umbrella(element)
                } else {
                    Vec::new()
                }
            }
            UiEvent::DocumentClick(regions) => self.document_click(regions),
            UiEvent::FirstClick => self.start_default_track(),
            UiEvent::Key { key, in_text_input } => self.key(key, in_text_input),
            UiEvent::Resize => {
                let mut out = Vec::new();
                if let (true, Some(anchor)) = (self.popup.visible, self.popup.current) {
                    out.push(Command::PositionPopup { anchor });
                }
                if let Some(umbrella) = self.umbrellas.expanded() {
                    out.push(Command::LayoutSubProjects { umbrella });
                }
                out
            }
            UiEvent::LegendClick(category) => {
                self.filter.toggle(&category);
                vec![Command::ApplyFilter(
                    self.filter.active().map(str::to_string),
                )]
            }
            UiEvent::ContactToggle => {
                self.contact_open = !self.contact_open;
                vec![Command::SetContactOpen(self.contact_open)]
            }

            UiEvent::TogglePlayback => self.toggle_playback(),
            UiEvent::PrevTrack => match self.playlist.prev_index() {
                Some(index) => self.load_and_play(index),
                None => Vec::new(),
            },
            UiEvent::NextTrack | UiEvent::TrackEnded => match self.playlist.next_index() {
                Some(index) => self.load_and_play(index),
                None => Vec::new(),
            },
            UiEvent::SelectTrack(index) => self.load_and_play(index),
            UiEvent::Seek(fraction) => {
                let duration = self.playback.duration;
                if duration.is_finite() && duration > 0.0 {
                    vec![Command::SetCurrentTime(fraction.clamp(0.0, 1.0) * duration)]
                } else {
                    Vec::new()
                }
            }
            UiEvent::SetVolume(value) => {
                let change = self.volume.set(value);
                self.volume_commands(change.persist)
            }
            UiEvent::ToggleMute => {
                let change = self.volume.toggle_mute();
                self.volume_commands(change.persist)
            }
            UiEvent::CloseMiniPlayer => {
                self.playback.source = None;
                self.playback.name = None;
                self.playback.position = 0.0;
                vec![
                    Command::Pause,
                    Command::ClearSource,
                    Command::HideMiniPlayer,
                    Command::ClearSession,
                ]
            }

            UiEvent::PlaybackStarted => {
                self.playback.paused = false;
                let mut out = vec![Command::SetPlayGlyph(play_glyph(true))];
                if self.playback.source.is_some() {
                    out.push(Command::ShowMiniPlayer {
                        label: self.current_label(),
                    });
                }
                out.extend(self.persist(now_ms));
                out
            }
            UiEvent::PlaybackPaused => {
                self.playback.paused = true;
                let mut out = vec![Command::SetPlayGlyph(play_glyph(false))];
                out.extend(self.persist(now_ms));
                out
            }
            UiEvent::PlaybackBlocked => {
                self.playback.paused = true;
                if self.playback.source.is_none() {
                    return Vec::new();
                }
                vec![
                    Command::ShowMiniPlayer {
                        label: self.current_label(),
                    },
                    Command::SetPlayGlyph(play_glyph(false)),
                ]
            }
            UiEvent::TimeUpdate { current, duration } => {
                self.playback.position = current;
                self.playback.duration = duration;
                let mut out = vec![
                    Command::SetProgress(progress_percent(current, duration)),
                    Command::SetCurrentTimeLabel(format_time(current)),
                ];
                if self.throttle.ready(now_ms) {
                    out.extend(self.persist(now_ms));
                }
                out
            }
            UiEvent::MetadataLoaded { duration } => {
                self.playback.duration = duration;
                vec![Command::SetDurationLabel(format_time(duration))]
            }
            UiEvent::BeforeUnload => self.persist(now_ms).into_iter().collect(),
        }
    }

    fn hover_enter(
        &mut self,
        element: ElementId,
        role: HoverRole,
        project: &ProjectDescriptor,
    ) -> Vec<Command> {
        let expanded = self.umbrellas.expanded();
        match role {
            HoverRole::Word if expanded.is_some() => Vec::new(),
            HoverRole::Umbrella if expanded.is_some_and(|open| open != element) => Vec::new(),
            HoverRole::Umbrella => {
                let mut out = vec![Command::SetDirectHover {
                    element,
                    hovered: true,
                }];
                out.extend(self.show_popup(element, project));
                out
            }
            HoverRole::Word | HoverRole::SubProject => self.show_popup(element, project),
        }
    }

    fn hover_leave(
        &mut self,
        element: ElementId,
        role: HoverRole,
        onto_sub_project: bool,
        left_element: bool,
    ) -> Vec<Command> {
        if role != HoverRole::Umbrella {
            return self.request_hide();
        }
        if !onto_sub_project && !left_element {
            return Vec::new();
        }
        let mut out = vec![Command::SetDirectHover {
            element,
            hovered: false,
        }];
        out.extend(self.request_hide());
        out
    }

    fn show_popup(&mut self, element: ElementId, project: &ProjectDescriptor) -> Vec<Command> {
        let mut out = Vec::new();
        if self.popup.hide_pending {
            self.popup.hide_pending = false;
            out.push(Command::CancelHideTimer);
        }
        if let Some(previous) = self.popup.current.filter(|prev| *prev != element) {
            out.push(Command::SetPopupActive {
                element: previous,
                active: false,
            });
        }
        out.push(Command::StopSlideshow);
        out.push(Command::ClearPopupMedia);
        out.push(Command::FillPopup(PopupContent {
            title: project.title.clone(),
            description: project.description.clone(),
            tech: project.tech.clone(),
            year: project.year.clone(),
            links: project.links.buttons(),
        }));

        let project_id = project.project_id.as_deref();
        let media = resolve_media(
            self.images.as_ref(),
            project_id,
            project.inline_media.as_deref(),
        );
        self.gallery.load(media);
        match self.gallery.current() {
            Some(first) => {
                out.push(show_media(first.to_string(), project.title.clone()));
                let navigable = self.gallery.is_navigable();
                out.push(Command::SetGalleryArrows(navigable));
                if navigable {
                    out.push(Command::StartSlideshow);
                }
                out.push(Command::RenderDots {
                    count: self.gallery.len(),
                    active: 0,
                });
            }
            None => {
                out.push(Command::SetGalleryArrows(false));
                out.push(Command::RenderDots {
                    count: 0,
                    active: 0,
                });
            }
        }

        let tracks = self
            .audio_manifest
            .as_ref()
            .zip(project_id)
            .and_then(|(manifest, id)| manifest.tracks_for(id));
        match tracks {
            Some(tracks) => {
                self.playlist.adopt(tracks);
                out.push(Command::RenderTrackList {
                    tracks: self.playlist.tracks().to_vec(),
                    active: self.playlist.index(),
                });
                out.push(Command::ShowAudioPlayer(true));
            }
            None => out.push(Command::ShowAudioPlayer(false)),
        }

        out.push(Command::ShowPopup { anchor: element });
        out.push(Command::SetPopupActive {
            element,
            active: true,
        });
        self.popup.visible = true;
        self.popup.current = Some(element);
        out
    }

    fn request_hide(&mut self) -> Vec<Command> {
        self.popup.hide_pending = true;
        vec![Command::StartHideTimer]
    }

    // Never cancels the hide timer: it runs from inside that timer's callback.
    fn hide_now(&mut self) -> Vec<Command> {
        if !self.popup.hide_pending {
            return Vec::new();
        }
        self.popup.hide_pending = false;
        self.popup.visible = false;
        let mut out = vec![
            Command::HidePopup,
            Command::StopSlideshow,
            Command::PausePopupVideo,
        ];
        if let Some(element) = self.popup.current.take() {
            out.push(Command::SetPopupActive {
                element,
                active: false,
            });
        }
        out
    }

    fn popup_enter(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.popup.hide_pending {
            self.popup.hide_pending = false;
            out.push(Command::CancelHideTimer);
        }
        if let Some(element) = self.popup.current {
            out.push(Command::SetPopupActive {
                element,
                active: true,
            });
        }
        out
    }

    fn navigate_gallery(&mut self, index: isize) -> Vec<Command> {
        let Some(path) = self.gallery.show(index).map(str::to_string) else {
            return Vec::new();
        };
        let mut out = vec![
            show_media(path, String::new()),
            Command::SetActiveDot(self.gallery.index()),
        ];
        if self.gallery.is_navigable() {
            out.push(Command::StartSlideshow);
        }
        out
    }

    fn toggle_umbrella(&mut self, element: ElementId) -> Vec<Command> {
        match self.umbrellas.toggle(element) {
            UmbrellaTransition::Expanded {
                umbrella,
                collapsed,
            } => {
                let mut out = Vec::new();
                if let Some(previous) = collapsed {
                    out.push(Command::SetExpanded {
                        umbrella: previous,
                        expanded: false,
                    });
                    out.push(Command::SetPopupActive {
                        element: previous,
                        active: false,
                    });
                }
                out.push(Command::LayoutSubProjects { umbrella });
                out.push(Command::SetExpanded {
                    umbrella,
                    expanded: true,
                });
                out.push(Command::SetPopupActive {
                    element: umbrella,
                    active: true,
                });
                out.push(Command::SetContainerExpanded(true));
                out
            }
            UmbrellaTransition::Collapsed { umbrella } => vec![
                Command::SetExpanded {
                    umbrella,
                    expanded: false,
                },
                Command::SetPopupActive {
                    element: umbrella,
                    active: false,
                },
                Command::SetContainerExpanded(false),
            ],
        }
    }

    fn collapse_umbrella(&mut self) -> Vec<Command> {
        match self.umbrellas.collapse() {
            Some(umbrella) => vec![
                Command::SetExpanded {
                    umbrella,
                    expanded: false,
                },
                Command::SetContainerExpanded(false),
            ],
            None => Vec::new(),
        }
    }

    fn document_click(&mut self, regions: ClickRegions) -> Vec<Command> {
        let mut out = Vec::new();
        if !regions.on_umbrella && !regions.on_sub_project && !regions.on_popup {
            out.extend(self.collapse_umbrella());
        }
        if self.filter.clears_on_click(regions.in_legend, regions.on_project) {
            self.filter.clear();
            out.push(Command::ApplyFilter(None));
        }
        if !regions.in_contact && self.contact_open {
            self.contact_open = false;
            out.push(Command::SetContactOpen(false));
        }
        out
    }

    fn key(&mut self, key: Key, in_text_input: bool) -> Vec<Command> {
        match key {
            Key::Escape => {
                let mut out = Vec::new();
                if self.popup.visible {
                    self.popup.visible = false;
                    out.push(Command::HidePopup);
                    if let Some(element) = self.popup.current.take() {
                        out.push(Command::SetPopupActive {
                            element,
                            active: false,
                        });
                    }
                }
                out.extend(self.collapse_umbrella());
                out
            }
            Key::Space if in_text_input => Vec::new(),
            Key::Space => {
                let mut out = vec![Command::ConsumeKey];
                out.extend(self.toggle_playback());
                out
            }
            Key::ArrowLeft | Key::ArrowRight
                if self.popup.visible && self.gallery.is_navigable() =>
            {
                let step = if key == Key::ArrowLeft { -1 } else { 1 };
                let target = self.gallery.index() as isize + step;
                let mut out = vec![Command::ConsumeKey];
                out.extend(self.navigate_gallery(target));
                out
            }
            _ => Vec::new(),
        }
    }

    fn toggle_playback(&mut self) -> Vec<Command> {
        if !self.playback.paused {
            return vec![Command::Pause];
        }
        match &self.playback.source {
            Some(_) => vec![Command::Play],
            None if !self.playlist.is_empty() => self.load_and_play(0),
            None => Vec::new(),
        }
    }

    fn load_and_play(&mut self, index: usize) -> Vec<Command> {
        let Some(track) = self.playlist.select(index).cloned() else {
            return Vec::new();
        };
        self.playback.source = Some(track.path.clone());
        self.playback.name = Some(track.name.clone());
        self.playback.position = 0.0;
        vec![
            Command::LoadSource(track.path),
            Command::Play,
            Command::HighlightTrack(index),
            Command::SetPlayGlyph(play_glyph(true)),
            Command::ShowMiniPlayer { label: track.name },
        ]
    }

    fn restore_session(&mut self, saved: Option<AudioSession>) -> Vec<Command> {
        let Some(saved) = saved.filter(|session| !session.source_url.is_empty()) else {
            return vec![Command::ArmFirstClick];
        };
        self.playlist.restore(saved.tracks, saved.track_index);
        let listed = self
            .playlist
            .current()
            .filter(|track| track.path == saved.source_url)
            .map(|track| track.name.clone());
        self.playback.name = Some(saved.track_name)
            .filter(|name| !name.is_empty())
            .or(listed);
        self.playback.source = Some(saved.source_url.clone());
        self.playback.position = saved.current_time;
        let mut out = vec![
            Command::LoadSource(saved.source_url),
            Command::SetCurrentTime(saved.current_time),
        ];
        if saved.is_playing {
            out.push(Command::Play);
        } else {
            out.push(Command::ShowMiniPlayer {
                label: self.current_label(),
            });
            out.push(Command::SetPlayGlyph(play_glyph(false)));
        }
        out
    }

    fn start_default_track(&mut self) -> Vec<Command> {
        if self.playback.source.is_some() {
            return Vec::new();
        }
        let track = self.config.default_track.clone();
        self.playlist.restore(vec![track], 0);
        self.playback.source = Some(self.config.default_track.path.clone());
        self.playback.name = Some(self.config.default_track.name.clone());
        self.playback.position = 0.0;
        vec![
            Command::LoadSource(self.config.default_track.path.clone()),
            Command::Play,
        ]
    }

    fn current_label(&self) -> String {
        self.playback
            .name
            .clone()
            .unwrap_or_else(|| "Unknown track".to_string())
    }

    fn persist(&self, now_ms: f64) -> Option<Command> {
        let source = self.playback.source.as_ref()?;
        Some(Command::PersistSession(AudioSession {
            source_url: source.clone(),
            current_time: self.playback.position,
            track_name: self
                .playback
                .name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            tracks: self.playlist.tracks().to_vec(),
            track_index: self.playlist.index(),
            is_playing: !self.playback.paused,
            timestamp: now_ms,
        }))
    }

    fn volume_command(&self) -> Command {
        Command::ApplyVolume {
            level: self.volume.level(),
            ui: self.volume.ui(),
        }
    }

    fn volume_commands(&self, persist: Option<f64>) -> Vec<Command> {
        let mut out = vec![self.volume_command()];
        if let Some(level) = persist {
            out.push(Command::PersistVolume(level));
        }
        out
    }
}

fn show_media(path: String, alt: String) -> Command {
    Command::ShowMedia {
        kind: media_kind(&path),
        path,
        alt,
    }
}
