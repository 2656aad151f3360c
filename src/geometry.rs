//! Viewport-space rectangles, mirroring what `getBoundingClientRect` reports.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Box of `size` centred on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, size: Size) -> Self {
        Self::from_xywh(cx - size.width / 2.0, cy - size.height / 2.0, size.width, size.height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    pub fn inflate(&self, by: f64) -> Self {
        Self::new(
            self.left - by,
            self.top - by,
            self.right + by,
            self.bottom + by,
        )
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn fits_within(&self, viewport: Size) -> bool {
        self.left >= 0.0
            && self.top >= 0.0
            && self.right <= viewport.width
            && self.bottom <= viewport.height
    }
}
