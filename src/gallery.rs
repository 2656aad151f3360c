//! Popup media gallery and its slideshow stepping.

use crate::lightbox::MediaKind;
use crate::media::media_kind;

#[derive(Debug, Default)]
pub struct PopupGallery {
    items: Vec<String>,
    index: usize,
}

impl PopupGallery {
    pub fn load(&mut self, items: Vec<String>) {
        self.items = items;
        self.index = 0;
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

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.index).map(String::as_str)
    }

    pub fn current_kind(&self) -> Option<MediaKind> {
        self.current().map(media_kind)
    }

    /// Arrows, keyboard navigation and the slideshow need at least two items.
    pub fn is_navigable(&self) -> bool {
        self.items.len() > 1
    }

    /// Shows `index`, wrapping one step past either end. Returns the path now
    /// current.
    pub fn show(&mut self, index: isize) -> Option<&str> {
        let len = self.items.len() as isize;
        if len == 0 {
            return None;
        }
        let index = if index >= len {
            0
        } else if index < 0 {
            len - 1
        } else {
            index
        };
        self.index = index as usize;
        self.current()
    }

    pub fn next(&mut self) -> Option<&str> {
        self.show(self.index as isize + 1)
    }

    pub fn prev(&mut self) -> Option<&str> {
        self.show(self.index as isize - 1)
    }

    /// One slideshow interval elapsed. A video on screen swallows the step so
    /// it is never cut off; returns the new path when the gallery advanced.
    pub fn tick(&mut self) -> Option<&str> {
        if !self.is_navigable() || self.current_kind() == Some(MediaKind::Video) {
            return None;
        }
        self.next()
    }
}
