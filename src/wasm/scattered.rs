//! DOM side of the scattered portfolio page. Listeners translate browser events
//! into `UiEvent`s for the controller and `run` carries out the commands it
//! returns.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlAudioElement, HtmlElement, HtmlImageElement,
    HtmlVideoElement, KeyboardEvent, MouseEvent, Node, Window,
};

use super::dom;
use super::fetch::fetch_json;
use super::storage::BrowserStore;
use crate::audio::{fraction_along, VolumeUi};
use crate::config::SiteConfig;
use crate::controller::{
    ClickRegions, Command, HoverRole, Key, PopupContent, ScatteredController, UiEvent,
};
use crate::decor::{float_animation, FLOAT_KEYFRAMES};
use crate::filter::{mark_for, Mark};
use crate::geometry::Size;
use crate::lightbox::MediaKind;
use crate::manifest::{AudioManifest, ImageManifest, Track};
use crate::popup::{place_popup, ProjectDescriptor};
use crate::session::SessionStore;
use crate::umbrella::{place_sub_projects, LayoutParams};
use crate::ElementId;

struct PopupDom {
    root: HtmlElement,
    image: HtmlImageElement,
    video: HtmlVideoElement,
    title: HtmlElement,
    description: HtmlElement,
    tech: HtmlElement,
    year: HtmlElement,
    links: HtmlElement,
    prev: HtmlElement,
    next: HtmlElement,
    dots: HtmlElement,
}

/// Controls present on both the popup player and the mini player, found by
/// id prefix (`audio*`, `miniAudio*`).
struct TransportDom {
    play_pause: Option<HtmlElement>,
    prev: Option<HtmlElement>,
    next: Option<HtmlElement>,
    progress: Option<HtmlElement>,
    progress_bar: Option<HtmlElement>,
    volume_button: Option<HtmlElement>,
    volume: Option<HtmlElement>,
    volume_bar: Option<HtmlElement>,
}

impl TransportDom {
    fn lookup(document: &Document, prefix: &str) -> Self {
        let id = |suffix: &str| {
            dom::optional_by_id::<HtmlElement>(document, &format!("{prefix}{suffix}"))
        };
        Self {
            play_pause: id("PlayPause"),
            prev: id("Prev"),
            next: id("Next"),
            progress: id("Progress"),
            progress_bar: id("ProgressBar"),
            volume_button: id("VolumeBtn"),
            volume: id("Volume"),
            volume_bar: id("VolumeBar"),
        }
    }
}

struct PlayerDom {
    root: Option<HtmlElement>,
    track_list: Option<HtmlElement>,
    current_time: Option<HtmlElement>,
    duration: Option<HtmlElement>,
    controls: TransportDom,
}

struct MiniDom {
    root: Option<HtmlElement>,
    track: Option<HtmlElement>,
    close: Option<HtmlElement>,
    controls: TransportDom,
}

struct Preload {
    _image: HtmlImageElement,
    _load: EventListener,
    _error: EventListener,
}

struct Runtime {
    config: SiteConfig,
    controller: RefCell<ScatteredController>,
    store: SessionStore<BrowserStore>,
    window: Window,
    document: Document,
    container: Option<HtmlElement>,
    projects: Vec<HtmlElement>,
    words: Vec<HtmlElement>,
    legend: Vec<HtmlElement>,
    contact_list: Option<Element>,
    popup: PopupDom,
    audio: HtmlAudioElement,
    player: PlayerDom,
    mini: MiniDom,
    hide_timer: RefCell<Option<Timeout>>,
    slideshow: RefCell<Option<Interval>>,
    preload: RefCell<Option<Preload>>,
    dot_listeners: RefCell<Vec<EventListener>>,
    track_listeners: RefCell<Vec<EventListener>>,
}

pub fn start(config: SiteConfig) -> Result<(), JsValue> {
    let window = dom::window()?;
    let document = dom::document()?;
    if document.get_element_by_id("projectPopup").is_none() {
        gloo::console::log!("scattered: no project popup on this page");
        return Ok(());
    }

    let store = SessionStore::new(
        BrowserStore::open(),
        config.audio_state_key.clone(),
        config.volume_key.clone(),
        config.session_max_age_ms,
    );
    let controller = ScatteredController::new(config.clone(), store.load_volume());

    let popup = PopupDom {
        root: dom::by_id(&document, "projectPopup")?,
        image: dom::by_id(&document, "popupImage")?,
        video: dom::by_id(&document, "popupVideo")?,
        title: dom::by_id(&document, "popupTitle")?,
        description: dom::by_id(&document, "popupDescription")?,
        tech: dom::by_id(&document, "popupTech")?,
        year: dom::by_id(&document, "popupYear")?,
        links: dom::by_id(&document, "popupLinks")?,
        prev: dom::by_id(&document, "galleryPrev")?,
        next: dom::by_id(&document, "galleryNext")?,
        dots: dom::by_id(&document, "popupDots")?,
    };
    let player = PlayerDom {
        root: dom::optional_by_id(&document, "audioPlayer"),
        track_list: dom::optional_by_id(&document, "audioTrackList"),
        current_time: dom::optional_by_id(&document, "audioCurrentTime"),
        duration: dom::optional_by_id(&document, "audioDuration"),
        controls: TransportDom::lookup(&document, "audio"),
    };
    let mini = MiniDom {
        root: dom::optional_by_id(&document, "miniAudioPlayer"),
        track: dom::optional_by_id(&document, "miniAudioTrack"),
        close: dom::optional_by_id(&document, "miniAudioClose"),
        controls: TransportDom::lookup(&document, "miniAudio"),
    };

    let rt = Rc::new(Runtime {
        config,
        controller: RefCell::new(controller),
        store,
        window,
        container: document
            .query_selector(".scattered-container")?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
        projects: dom::query_all(&document, ".project-word, .sub-project")?,
        words: dom::query_all(&document, ".project-word")?,
        legend: dom::query_all(&document, ".legend-item[data-filter]")?,
        contact_list: document.query_selector(".contact-list")?,
        popup,
        audio: dom::by_id(&document, "audioElement")?,
        player,
        mini,
        document,
        hide_timer: RefCell::new(None),
        slideshow: RefCell::new(None),
        preload: RefCell::new(None),
        dot_listeners: RefCell::new(Vec::new()),
        track_listeners: RefCell::new(Vec::new()),
    });

    let initial = rt.controller.borrow().start();
    for command in initial {
        run_logged(&rt, command);
    }

    wire_projects(&rt);
    wire_popup(&rt);
    wire_document(&rt)?;
    wire_audio(&rt);
    wire_legend_and_contact(&rt)?;
    decorate(&rt)?;

    for (index, project) in rt.projects.iter().enumerate() {
        if is_umbrella(project) {
            run_logged(
                &rt,
                Command::LayoutSubProjects {
                    umbrella: ElementId(index),
                },
            );
        }
    }

    load_manifests(&rt);
    Ok(())
}

fn dispatch(rt: &Rc<Runtime>, event: UiEvent) -> bool {
    let commands = rt.controller.borrow_mut().handle(event, dom::now_ms());
    let mut consumed = false;
    for command in commands {
        if command == Command::ConsumeKey {
            consumed = true;
            continue;
        }
        run_logged(rt, command);
    }
    consumed
}

fn run_logged(rt: &Rc<Runtime>, command: Command) {
    if let Err(err) = run(rt, command) {
        gloo::console::error!("scattered: command failed", err);
    }
}

fn is_umbrella(element: &Element) -> bool {
    element.get_attribute("data-umbrella").as_deref() == Some("true")
}

fn role_of(element: &Element) -> HoverRole {
    if element.class_list().contains("sub-project") {
        HoverRole::SubProject
    } else if is_umbrella(element) {
        HoverRole::Umbrella
    } else {
        HoverRole::Word
    }
}

fn listen<F>(rt: &Rc<Runtime>, target: &web_sys::EventTarget, name: &'static str, handler: F)
where
    F: Fn(&Rc<Runtime>, &Event) + 'static,
{
    let rt = Rc::clone(rt);
    EventListener::new(target, name, move |event| handler(&rt, event)).forget();
}

/// Click listener for player buttons: the click must not reach the document
/// handlers (umbrella collapse, filter reset, default-track autoplay).
fn on_click<F>(rt: &Rc<Runtime>, target: Option<&HtmlElement>, handler: F)
where
    F: Fn(&Rc<Runtime>, &MouseEvent) + 'static,
{
    let Some(target) = target else {
        return;
    };
    listen(rt, target, "click", move |rt, event| {
        event.stop_propagation();
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            handler(rt, event);
        }
    });
}

fn hover_enter(rt: &Rc<Runtime>, index: usize, element: &Element) {
    let project = ProjectDescriptor::from_attributes(dom::attribute_lookup(element));
    dispatch(
        rt,
        UiEvent::HoverEnter {
            element: ElementId(index),
            role: role_of(element),
            project,
        },
    );
}

fn wire_projects(rt: &Rc<Runtime>) {
    for (index, project) in rt.projects.iter().enumerate() {
        let role = role_of(project);
        match role {
            HoverRole::Umbrella => {
                let word = project.clone();
                listen(rt, project, "mouseover", move |rt, event| {
                    let target = dom::event_element(event);
                    if !dom::within(target.as_ref(), ".sub-project") {
                        hover_enter(rt, index, &word);
                    }
                });
                let word = project.clone();
                listen(rt, project, "mouseout", move |rt, event| {
                    let related = event
                        .dyn_ref::<MouseEvent>()
                        .and_then(|event| dom::target_element(event.related_target()));
                    let onto_sub_project = dom::within(related.as_ref(), ".sub-project");
                    let left_element = !word.contains(related.as_ref().map(AsRef::<Node>::as_ref));
                    dispatch(
                        rt,
                        UiEvent::HoverLeave {
                            element: ElementId(index),
                            role,
                            onto_sub_project,
                            left_element,
                        },
                    );
                });
                listen(rt, project, "click", move |rt, event| {
                    event.stop_propagation();
                    dispatch(
                        rt,
                        UiEvent::WordClick {
                            element: ElementId(index),
                            umbrella: true,
                        },
                    );
                });
            }
            HoverRole::Word | HoverRole::SubProject => {
                let word = project.clone();
                listen(rt, project, "mouseenter", move |rt, _| {
                    hover_enter(rt, index, &word);
                });
                listen(rt, project, "mouseleave", move |rt, _| {
                    dispatch(
                        rt,
                        UiEvent::HoverLeave {
                            element: ElementId(index),
                            role,
                            onto_sub_project: false,
                            left_element: true,
                        },
                    );
                });
                listen(rt, project, "click", move |rt, event| {
                    if role == HoverRole::SubProject {
                        event.stop_propagation();
                    } else {
                        event.prevent_default();
                        dispatch(
                            rt,
                            UiEvent::WordClick {
                                element: ElementId(index),
                                umbrella: false,
                            },
                        );
                    }
                });
            }
        }
    }
}

fn wire_popup(rt: &Rc<Runtime>) {
    listen(rt, &rt.popup.root, "mouseenter", |rt, _| {
        dispatch(rt, UiEvent::PopupEnter);
    });
    listen(rt, &rt.popup.root, "mouseleave", |rt, _| {
        dispatch(rt, UiEvent::PopupLeave);
    });
    for (button, event) in [
        (&rt.popup.prev, UiEvent::GalleryPrev),
        (&rt.popup.next, UiEvent::GalleryNext),
    ] {
        listen(rt, button, "click", move |rt, e| {
            e.prevent_default();
            e.stop_propagation();
            dispatch(rt, event.clone());
        });
    }
}

fn wire_document(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    listen(rt, &rt.document, "click", |rt, event| {
        let target = dom::event_element(event);
        let t = target.as_ref();
        let regions = ClickRegions {
            on_umbrella: dom::within(t, ".umbrella-project"),
            on_sub_project: dom::within(t, ".sub-project"),
            on_popup: dom::within(t, ".project-popup"),
            on_project: dom::within(t, ".project-word") || dom::within(t, ".sub-project"),
            in_legend: dom::within(t, ".category-legend"),
            in_contact: dom::within(t, ".contact-dropdown"),
        };
        dispatch(rt, UiEvent::DocumentClick(regions));
    });

    // Non-passive so space and arrows can be kept from scrolling the page.
    let options = EventListenerOptions::enable_prevent_default();
    let handler = Rc::clone(rt);
    EventListener::new_with_options(&rt.document, "keydown", options, move |event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let in_text_input = dom::event_element(event)
            .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
            .unwrap_or(false);
        let key = Key::from_event(&key_event.key(), &key_event.code());
        if dispatch(&handler, UiEvent::Key { key, in_text_input }) {
            event.prevent_default();
        }
    })
    .forget();

    listen(rt, &rt.window, "resize", |rt, _| {
        dispatch(rt, UiEvent::Resize);
    });
    listen(rt, &rt.window, "beforeunload", |rt, _| {
        dispatch(rt, UiEvent::BeforeUnload);
    });
    Ok(())
}

fn wire_audio(rt: &Rc<Runtime>) {
    for controls in [&rt.player.controls, &rt.mini.controls] {
        on_click(rt, controls.play_pause.as_ref(), |rt, _| {
            dispatch(rt, UiEvent::TogglePlayback);
        });
        on_click(rt, controls.prev.as_ref(), |rt, _| {
            dispatch(rt, UiEvent::PrevTrack);
        });
        on_click(rt, controls.next.as_ref(), |rt, _| {
            dispatch(rt, UiEvent::NextTrack);
        });
        on_click(rt, controls.volume_button.as_ref(), |rt, _| {
            dispatch(rt, UiEvent::ToggleMute);
        });
        if let Some(bar) = &controls.progress {
            let track = bar.clone();
            on_click(rt, Some(bar), move |rt, event| {
                let fraction = fraction_along(event.client_x() as f64, dom::rect_of(&track));
                dispatch(rt, UiEvent::Seek(fraction));
            });
        }
        if let Some(bar) = &controls.volume {
            let track = bar.clone();
            on_click(rt, Some(bar), move |rt, event| {
                let fraction = fraction_along(event.client_x() as f64, dom::rect_of(&track));
                dispatch(rt, UiEvent::SetVolume(fraction));
            });
        }
    }
    on_click(rt, rt.mini.close.as_ref(), |rt, _| {
        dispatch(rt, UiEvent::CloseMiniPlayer);
    });

    listen(rt, &rt.audio, "timeupdate", |rt, _| {
        let event = UiEvent::TimeUpdate {
            current: rt.audio.current_time(),
            duration: rt.audio.duration(),
        };
        dispatch(rt, event);
    });
    listen(rt, &rt.audio, "loadedmetadata", |rt, _| {
        let duration = rt.audio.duration();
        dispatch(rt, UiEvent::MetadataLoaded { duration });
    });
    listen(rt, &rt.audio, "ended", |rt, _| {
        dispatch(rt, UiEvent::TrackEnded);
    });
    listen(rt, &rt.audio, "play", |rt, _| {
        dispatch(rt, UiEvent::PlaybackStarted);
    });
    listen(rt, &rt.audio, "pause", |rt, _| {
        dispatch(rt, UiEvent::PlaybackPaused);
    });
}

fn wire_legend_and_contact(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    for item in &rt.legend {
        let category = item.get_attribute("data-filter").unwrap_or_default();
        listen(rt, item, "click", move |rt, event| {
            event.stop_propagation();
            dispatch(rt, UiEvent::LegendClick(category.clone()));
        });
    }
    if rt.contact_list.is_some() {
        if let Some(link) = rt.document.query_selector(".contact-link")? {
            listen(rt, &link, "click", |rt, event| {
                event.stop_propagation();
                dispatch(rt, UiEvent::ContactToggle);
            });
        }
    }
    Ok(())
}

fn decorate(rt: &Rc<Runtime>) -> Result<(), JsValue> {
    let mut rng = js_sys::Math::random;
    for word in dom::query_all::<HtmlElement>(&rt.document, ".context-word")? {
        dom::set_style(&word, "animation", &float_animation(&mut rng));
    }
    let style = rt.document.create_element("style")?;
    style.set_text_content(Some(FLOAT_KEYFRAMES));
    if let Some(head) = rt.document.head() {
        head.append_child(&style)?;
    }
    Ok(())
}

fn load_manifests(rt: &Rc<Runtime>) {
    let images_rt = Rc::clone(rt);
    spawn_local(async move {
        let url = images_rt.config.image_manifest_url.clone();
        match fetch_json::<ImageManifest>(&url).await {
            Ok(manifest) => {
                gloo::console::log!("manifest: images loaded", manifest.len() as u32);
                dispatch(&images_rt, UiEvent::ImageManifestLoaded(manifest));
            }
            Err(err) => gloo::console::error!("manifest: images failed", err),
        }
    });

    let audio_rt = Rc::clone(rt);
    spawn_local(async move {
        let url = audio_rt.config.audio_manifest_url.clone();
        let manifest = match fetch_json::<AudioManifest>(&url).await {
            Ok(manifest) => {
                gloo::console::log!("manifest: audio loaded", manifest.len() as u32);
                Some(manifest)
            }
            Err(err) => {
                gloo::console::error!("manifest: audio failed", err);
                None
            }
        };
        let saved = audio_rt.store.load_session(dom::now_ms());
        dispatch(&audio_rt, UiEvent::AudioManifestSettled { manifest, saved });
    });
}

fn run(rt: &Rc<Runtime>, command: Command) -> Result<(), JsValue> {
    match command {
        Command::ConsumeKey => {}

        Command::StartHideTimer => {
            let handler = Rc::clone(rt);
            let timer = Timeout::new(rt.config.popup_hide_delay_ms, move || {
                dispatch(&handler, UiEvent::HideTimerFired);
            });
            *rt.hide_timer.borrow_mut() = Some(timer);
        }
        Command::CancelHideTimer => {
            rt.hide_timer.borrow_mut().take();
        }
        Command::StartSlideshow => {
            let handler = Rc::clone(rt);
            let interval = Interval::new(rt.config.slideshow_interval_ms, move || {
                dispatch(&handler, UiEvent::SlideshowTick);
            });
            *rt.slideshow.borrow_mut() = Some(interval);
        }
        Command::StopSlideshow => {
            rt.slideshow.borrow_mut().take();
        }

        Command::ClearPopupMedia => {
            rt.preload.borrow_mut().take();
            dom::set_display(&rt.popup.image, "none");
            rt.popup.image.set_src("");
            dom::set_display(&rt.popup.video, "none");
            rt.popup.video.pause()?;
            rt.popup.video.set_src("");
        }
        Command::FillPopup(content) => fill_popup(rt, &content)?,
        Command::ShowMedia { path, kind, alt } => show_media(rt, &path, kind, &alt)?,
        Command::PausePopupVideo => rt.popup.video.pause()?,
        Command::SetGalleryArrows(visible) => {
            let display = if visible { "flex" } else { "none" };
            dom::set_display(&rt.popup.prev, display);
            dom::set_display(&rt.popup.next, display);
        }
        Command::RenderDots { count, active } => render_dots(rt, count, active)?,
        Command::SetActiveDot(active) => {
            let dots = dom::query_all_in::<Element>(&rt.popup.dots, ".popup-dot")?;
            for (index, dot) in dots.iter().enumerate() {
                dom::set_class(dot, "active", index == active);
            }
        }
        Command::ShowPopup { anchor } => {
            dom::set_style(&rt.popup.root, "visibility", "hidden");
            dom::set_class(&rt.popup.root, "active", true);
            position_popup(rt, anchor);
            dom::set_style(&rt.popup.root, "visibility", "");
        }
        Command::PositionPopup { anchor } => position_popup(rt, anchor),
        Command::HidePopup => dom::set_class(&rt.popup.root, "active", false),
        Command::SetPopupActive { element, active } => {
            if let Some(el) = rt.projects.get(element.0) {
                dom::set_class(el, "popup-active", active);
            }
        }
        Command::SetDirectHover { element, hovered } => {
            if let Some(el) = rt.projects.get(element.0) {
                dom::set_class(el, "direct-hover", hovered);
            }
        }

        Command::SetExpanded { umbrella, expanded } => {
            if let Some(el) = rt.projects.get(umbrella.0) {
                dom::set_class(el, "expanded", expanded);
            }
        }
        Command::SetContainerExpanded(expanded) => {
            if let Some(container) = &rt.container {
                dom::set_class(container, "has-expanded", expanded);
            }
        }
        Command::LayoutSubProjects { umbrella } => layout_sub_projects(rt, umbrella)?,

        Command::ApplyFilter(active) => apply_filter(rt, active.as_deref()),
        Command::SetContactOpen(open) => {
            if let Some(list) = &rt.contact_list {
                dom::set_class(list, "open", open);
            }
        }

        Command::ShowAudioPlayer(visible) => {
            if let Some(root) = &rt.player.root {
                dom::set_display(root, if visible { "block" } else { "none" });
            }
        }
        Command::RenderTrackList { tracks, active } => render_tracks(rt, &tracks, active)?,
        Command::HighlightTrack(active) => {
            if let Some(list) = &rt.player.track_list {
                let rows = dom::query_all_in::<Element>(list, ".audio-track")?;
                for (index, row) in rows.iter().enumerate() {
                    dom::set_class(row, "active", index == active);
                }
            }
        }
        Command::LoadSource(src) => rt.audio.set_src(&src),
        Command::SetCurrentTime(seconds) => rt.audio.set_current_time(seconds),
        Command::Play => play(rt),
        Command::Pause => rt.audio.pause()?,
        Command::ClearSource => rt.audio.set_src(""),
        Command::SetPlayGlyph(glyph) => {
            for button in [&rt.player.controls.play_pause, &rt.mini.controls.play_pause]
                .into_iter()
                .flatten()
            {
                button.set_text_content(Some(glyph));
            }
        }
        Command::ShowMiniPlayer { label } => {
            if let (Some(root), Some(track)) = (&rt.mini.root, &rt.mini.track) {
                track.set_text_content(Some(&label));
                dom::set_class(root, "visible", true);
            }
        }
        Command::HideMiniPlayer => {
            if let Some(root) = &rt.mini.root {
                dom::set_class(root, "visible", false);
            }
        }
        Command::SetProgress(percent) => {
            let width = format!("{percent}%");
            for bar in [&rt.player.controls.progress_bar, &rt.mini.controls.progress_bar]
                .into_iter()
                .flatten()
            {
                dom::set_style(bar, "width", &width);
            }
        }
        Command::SetCurrentTimeLabel(label) => {
            if let Some(el) = &rt.player.current_time {
                el.set_text_content(Some(&label));
            }
        }
        Command::SetDurationLabel(label) => {
            if let Some(el) = &rt.player.duration {
                el.set_text_content(Some(&label));
            }
        }
        Command::ApplyVolume { level, ui } => {
            rt.audio.set_volume(level);
            apply_volume_ui(rt, &ui);
        }
        Command::PersistVolume(level) => rt.store.save_volume(level),
        Command::PersistSession(session) => rt.store.save_session(&session),
        Command::ClearSession => rt.store.clear_session(),
        Command::ArmFirstClick => {
            let handler = Rc::clone(rt);
            EventListener::once(&rt.document, "click", move |_| {
                dispatch(&handler, UiEvent::FirstClick);
            })
            .forget();
        }
    }
    Ok(())
}

fn play(rt: &Rc<Runtime>) {
    match rt.audio.play() {
        Ok(promise) => {
            let handler = Rc::clone(rt);
            spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    gloo::console::log!("audio: playback blocked", err);
                    dispatch(&handler, UiEvent::PlaybackBlocked);
                }
            });
        }
        Err(err) => {
            gloo::console::log!("audio: play failed", err);
            dispatch(rt, UiEvent::PlaybackBlocked);
        }
    }
}

fn fill_popup(rt: &Runtime, content: &PopupContent) -> Result<(), JsValue> {
    rt.popup.title.set_text_content(Some(&content.title));
    rt.popup
        .description
        .set_text_content(Some(&content.description));
    rt.popup.tech.set_text_content(Some(&content.tech));
    rt.popup.year.set_text_content(Some(&content.year));

    rt.popup.links.set_inner_html("");
    if content.links.is_empty() {
        dom::set_display(&rt.popup.links, "none");
        return Ok(());
    }
    for button in &content.links {
        let anchor = rt
            .document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()?;
        anchor.set_class_name("popup-link");
        anchor.set_href(&button.href);
        anchor.set_target("_blank");
        if button.download {
            anchor.set_download("");
        }
        anchor.set_text_content(Some(button.label));
        rt.popup.links.append_child(&anchor)?;
    }
    dom::set_display(&rt.popup.links, "flex");
    Ok(())
}

fn reveal_image(popup: &PopupDom, path: &str, alt: &str) {
    let _ = popup.video.pause();
    popup.video.set_src("");
    dom::set_display(&popup.video, "none");
    popup.image.set_src(path);
    popup.image.set_alt(alt);
    dom::set_display(&popup.image, "block");
}

fn show_media(rt: &Rc<Runtime>, path: &str, kind: MediaKind, alt: &str) -> Result<(), JsValue> {
    match kind {
        MediaKind::Video => {
            rt.preload.borrow_mut().take();
            let video = &rt.popup.video;
            video.set_src(path);
            video.set_muted(true);
            dom::set_display(video, "block");
            dom::set_display(&rt.popup.image, "none");
            if let Ok(promise) = video.play() {
                spawn_local(async move {
                    if let Err(err) = JsFuture::from(promise).await {
                        gloo::console::log!("popup: video autoplay prevented", err);
                    }
                });
            }
        }
        MediaKind::Image => {
            // Swap only once the image is decoded so the previous frame never
            // flashes; a failed load still shows the item.
            let image = HtmlImageElement::new()?;
            let reveal = |rt: &Rc<Runtime>| {
                let handler = Rc::clone(rt);
                let path = path.to_string();
                let alt = alt.to_string();
                move |_: &Event| reveal_image(&handler.popup, &path, &alt)
            };
            let load = EventListener::once(&image, "load", reveal(rt));
            let error = EventListener::once(&image, "error", reveal(rt));
            image.set_src(path);
            *rt.preload.borrow_mut() = Some(Preload {
                _image: image,
                _load: load,
                _error: error,
            });
        }
    }
    Ok(())
}

fn render_dots(rt: &Rc<Runtime>, count: usize, active: usize) -> Result<(), JsValue> {
    rt.popup.dots.set_inner_html("");
    let mut listeners = Vec::with_capacity(count);
    for index in 0..count {
        let dot = rt.document.create_element("button")?;
        dot.set_class_name("popup-dot");
        dot.set_attribute("aria-label", &format!("Go to slide {}", index + 1))?;
        dom::set_class(&dot, "active", index == active);
        let handler = Rc::clone(rt);
        listeners.push(EventListener::new(&dot, "click", move |event| {
            event.stop_propagation();
            event.prevent_default();
            dispatch(&handler, UiEvent::GalleryDot(index));
        }));
        rt.popup.dots.append_child(&dot)?;
    }
    *rt.dot_listeners.borrow_mut() = listeners;
    Ok(())
}

fn render_tracks(rt: &Rc<Runtime>, tracks: &[Track], active: usize) -> Result<(), JsValue> {
    let Some(list) = &rt.player.track_list else {
        return Ok(());
    };
    list.set_inner_html("");
    let mut listeners = Vec::with_capacity(tracks.len());
    for (index, track) in tracks.iter().enumerate() {
        let row = rt.document.create_element("div")?;
        row.set_class_name("audio-track");
        dom::set_class(&row, "active", index == active);

        let number = rt.document.create_element("span")?;
        number.set_class_name("audio-track-number");
        number.set_text_content(Some(&(index + 1).to_string()));
        let name = rt.document.create_element("span")?;
        name.set_class_name("audio-track-name");
        name.set_text_content(Some(&track.name));
        row.append_child(&number)?;
        row.append_child(&name)?;

        let handler = Rc::clone(rt);
        listeners.push(EventListener::new(&row, "click", move |event| {
            event.stop_propagation();
            dispatch(&handler, UiEvent::SelectTrack(index));
        }));
        list.append_child(&row)?;
    }
    *rt.track_listeners.borrow_mut() = listeners;
    Ok(())
}

fn position_popup(rt: &Runtime, anchor: ElementId) {
    let Some(element) = rt.projects.get(anchor.0) else {
        return;
    };
    let popup_rect = dom::rect_of(&rt.popup.root);
    let (left, top) = place_popup(
        dom::rect_of(element),
        Size::new(popup_rect.width(), popup_rect.height()),
        dom::viewport(&rt.window),
    );
    dom::set_style(&rt.popup.root, "left", &format!("{left}px"));
    dom::set_style(&rt.popup.root, "top", &format!("{top}px"));
}

fn layout_sub_projects(rt: &Runtime, umbrella: ElementId) -> Result<(), JsValue> {
    let Some(root) = rt.projects.get(umbrella.0) else {
        return Ok(());
    };
    let subs = dom::query_all_in::<HtmlElement>(root, ".sub-project")?;
    if subs.is_empty() {
        return Ok(());
    }
    let sizes: Vec<Size> = subs
        .iter()
        .map(|sub| Size::new(sub.offset_width() as f64, sub.offset_height() as f64))
        .collect();
    let obstacles: Vec<_> = rt
        .words
        .iter()
        .filter(|word| *word != root)
        .map(|word| dom::rect_of(word))
        .collect();
    let mut rng = js_sys::Math::random;
    let placements = place_sub_projects(
        dom::rect_of(root),
        &sizes,
        &obstacles,
        dom::viewport(&rt.window),
        &mut rng,
        &LayoutParams::default(),
    );
    for (sub, placement) in subs.iter().zip(&placements) {
        dom::set_style(sub, "left", "0");
        dom::set_style(sub, "top", "0");
        dom::set_style(sub, "--x", &placement.css_x());
        dom::set_style(sub, "--y", &placement.css_y());
    }
    Ok(())
}

fn apply_filter(rt: &Runtime, active: Option<&str>) {
    for item in &rt.legend {
        let category = item.get_attribute("data-filter");
        let mark = mark_for(active, category.as_deref());
        dom::set_class(item, "active", mark == Mark::Highlighted);
        dom::set_class(item, "dimmed", mark == Mark::Dimmed);
    }
    for project in &rt.projects {
        let category = project.get_attribute("data-category");
        let mark = mark_for(active, category.as_deref());
        dom::set_class(project, "category-highlighted", mark == Mark::Highlighted);
        dom::set_class(project, "category-dimmed", mark == Mark::Dimmed);
    }
}

fn apply_volume_ui(rt: &Runtime, ui: &VolumeUi) {
    let width = format!("{}%", ui.bar_percent);
    for controls in [&rt.player.controls, &rt.mini.controls] {
        if let Some(bar) = &controls.volume_bar {
            dom::set_style(bar, "width", &width);
        }
        if let Some(button) = &controls.volume_button {
            button.set_text_content(Some(ui.icon));
            dom::set_class(button, "muted", ui.muted);
        }
    }
}
