use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlVideoElement, KeyboardEvent,
};

use super::dom;
use crate::lightbox::{GalleryItem, Lightbox, LightboxAction, MediaKind, OverlayTarget};

const OVERLAY_MARKUP: &str = r#"
    <button class="lightbox-close">&times;</button>
    <button class="lightbox-nav lightbox-prev">&lsaquo;</button>
    <button class="lightbox-nav lightbox-next">&rsaquo;</button>
"#;

struct LightboxView {
    state: RefCell<Lightbox>,
    document: Document,
    body: HtmlElement,
    overlay: HtmlElement,
    prev: HtmlElement,
    next: HtmlElement,
}

/// Builds the overlay and hooks every `.gallery-item` thumbnail to it.
pub fn start() -> Result<(), JsValue> {
    let document = dom::document()?;
    let body = document.body().ok_or("no body")?;

    let overlay = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    overlay.set_class_name("lightbox");
    overlay.set_inner_html(OVERLAY_MARKUP);
    body.append_child(&overlay)?;
    let prev = overlay
        .query_selector(".lightbox-prev")?
        .ok_or("lightbox prev button missing")?
        .dyn_into::<HtmlElement>()?;
    let next = overlay
        .query_selector(".lightbox-next")?
        .ok_or("lightbox next button missing")?
        .dyn_into::<HtmlElement>()?;

    let view = Rc::new(LightboxView {
        state: RefCell::new(Lightbox::default()),
        document: document.clone(),
        body,
        overlay,
        prev,
        next,
    });

    for container in dom::query_all::<Element>(&document, ".gallery-item")? {
        let Some(item) = read_item(&container)? else {
            continue;
        };
        let index = view.state.borrow_mut().push(item);
        let view = Rc::clone(&view);
        EventListener::new(&container, "click", move |_| {
            let action = view.state.borrow_mut().open(index);
            view.apply(action);
        })
        .forget();
    }

    {
        let handler = Rc::clone(&view);
        EventListener::new(&view.overlay, "click", move |event| {
            let target = dom::event_element(event);
            let on_backdrop = target
                .as_ref()
                .is_some_and(|el| el == handler.overlay.unchecked_ref::<Element>());
            let on_close = target
                .as_ref()
                .is_some_and(|el| el.class_name() == "lightbox-close");
            let hit = if on_backdrop {
                OverlayTarget::Backdrop
            } else if on_close {
                OverlayTarget::CloseButton
            } else {
                OverlayTarget::Media
            };
            let action = handler.state.borrow_mut().handle_overlay_click(hit);
            handler.apply(action);
        })
        .forget();
    }

    for (button, forward) in [(view.prev.clone(), false), (view.next.clone(), true)] {
        let handler = Rc::clone(&view);
        EventListener::new(&button, "click", move |event| {
            event.stop_propagation();
            let action = {
                let mut state = handler.state.borrow_mut();
                if forward {
                    state.next()
                } else {
                    state.prev()
                }
            };
            handler.apply(action);
        })
        .forget();
    }

    let handler = Rc::clone(&view);
    EventListener::new(&document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let action = handler.state.borrow_mut().handle_key(&event.key());
        handler.apply(action);
    })
    .forget();

    Ok(())
}

fn read_item(container: &Element) -> Result<Option<GalleryItem>, JsValue> {
    if let Some(img) = container.query_selector("img")? {
        let img = img.dyn_into::<HtmlImageElement>()?;
        let alt = img.alt();
        return Ok(Some(GalleryItem::image(
            img.src(),
            (!alt.is_empty()).then_some(alt),
        )));
    }
    if let Some(video) = container.query_selector("video")? {
        let video = video.dyn_into::<HtmlVideoElement>()?;
        return Ok(Some(GalleryItem::video(video.src())));
    }
    Ok(None)
}

impl LightboxView {
    fn apply(&self, action: LightboxAction) {
        let result = match action {
            LightboxAction::None => Ok(()),
            LightboxAction::Render => self.render(),
            LightboxAction::Close => {
                dom::set_class(&self.overlay, "active", false);
                dom::set_style(&self.body, "overflow", "");
                self.remove_media()
            }
        };
        if let Err(err) = result {
            gloo::console::error!("lightbox: render failed", err);
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        self.remove_media()?;
        let state = self.state.borrow();
        let Some(item) = state.current() else {
            return Ok(());
        };
        let media: Element = match item.kind {
            MediaKind::Image => {
                let img = self
                    .document
                    .create_element("img")?
                    .dyn_into::<HtmlImageElement>()?;
                img.set_src(&item.source_url);
                img.set_alt(item.alt_text.as_deref().unwrap_or(""));
                img.into()
            }
            MediaKind::Video => {
                let video = self
                    .document
                    .create_element("video")?
                    .dyn_into::<HtmlVideoElement>()?;
                video.set_src(&item.source_url);
                video.set_controls(true);
                video.set_autoplay(true);
                video.into()
            }
        };
        self.overlay
            .insert_before(&media, self.overlay.first_child().as_ref())?;

        let nav = if state.shows_navigation() { "block" } else { "none" };
        dom::set_display(&self.prev, nav);
        dom::set_display(&self.next, nav);

        if state.is_active() {
            dom::set_class(&self.overlay, "active", true);
            dom::set_style(&self.body, "overflow", "hidden");
        }
        Ok(())
    }

    fn remove_media(&self) -> Result<(), JsValue> {
        let Some(media) = self.overlay.query_selector("img, video")? else {
            return Ok(());
        };
        let owned_by_overlay = media
            .parent_element()
            .is_some_and(|parent| parent == *self.overlay.unchecked_ref::<Element>());
        if owned_by_overlay {
            self.overlay.remove_child(&media)?;
        }
        Ok(())
    }
}
