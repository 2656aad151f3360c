//! Full-screen viewer over the page's gallery thumbnails.

use crate::cycle::{next_index, prev_index};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub kind: MediaKind,
    pub source_url: String,
    pub alt_text: Option<String>,
}

impl GalleryItem {
    pub fn image(source_url: impl Into<String>, alt_text: Option<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            source_url: source_url.into(),
            alt_text,
        }
    }

    pub fn video(source_url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            source_url: source_url.into(),
            alt_text: None,
        }
    }
}

/// What the view has to redo after an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightboxAction {
    None,
    Render,
    Close,
}

/// Where a click on the overlay landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayTarget {
    Backdrop,
    CloseButton,
    Media,
    NavButton,
}

#[derive(Debug, Default)]
pub struct Lightbox {
    items: Vec<GalleryItem>,
    index: usize,
    active: bool,
}

impl Lightbox {
    pub fn new(items: Vec<GalleryItem>) -> Self {
        Self {
            items,
            index: 0,
            active: false,
        }
    }

    /// Records an item and returns the index its thumbnail opens.
    pub fn push(&mut self, item: GalleryItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> Option<&GalleryItem> {
        self.items.get(self.index)
    }

    pub fn shows_navigation(&self) -> bool {
        self.items.len() > 1
    }

    /// Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) -> LightboxAction {
        if index >= self.items.len() {
            return LightboxAction::None;
        }
        self.index = index;
        self.active = true;
        LightboxAction::Render
    }

    pub fn close(&mut self) -> LightboxAction {
        if !self.active {
            return LightboxAction::None;
        }
        self.active = false;
        LightboxAction::Close
    }

    pub fn next(&mut self) -> LightboxAction {
        match next_index(self.index, self.items.len()) {
            Some(index) => {
                self.index = index;
                LightboxAction::Render
            }
            None => LightboxAction::None,
        }
    }

    pub fn prev(&mut self) -> LightboxAction {
        match prev_index(self.index, self.items.len()) {
            Some(index) => {
                self.index = index;
                LightboxAction::Render
            }
            None => LightboxAction::None,
        }
    }

    /// Keys only act while the overlay is showing.
    pub fn handle_key(&mut self, key: &str) -> LightboxAction {
        if !self.active {
            return LightboxAction::None;
        }
        match key {
            "Escape" => self.close(),
            "ArrowLeft" => self.prev(),
            "ArrowRight" => self.next(),
            _ => LightboxAction::None,
        }
    }

    pub fn handle_overlay_click(&mut self, target: OverlayTarget) -> LightboxAction {
        match target {
            OverlayTarget::Backdrop | OverlayTarget::CloseButton => self.close(),
            OverlayTarget::Media | OverlayTarget::NavButton => LightboxAction::None,
        }
    }
}
