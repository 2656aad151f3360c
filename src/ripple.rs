//! Decorative click ripple.

pub const RIPPLE_CLASS: &str = "ripple";

/// A ripple spawned at a pointer position, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub x: f64,
    pub y: f64,
}

impl Ripple {
    pub fn at(client_x: i32, client_y: i32) -> Self {
        Self {
            x: client_x as f64,
            y: client_y as f64,
        }
    }

    pub fn left(&self) -> String {
        format!("{}px", self.x)
    }

    pub fn top(&self) -> String {
        format!("{}px", self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_use_pixel_units() {
        let ripple = Ripple::at(12, 340);
        assert_eq!(ripple.left(), "12px");
        assert_eq!(ripple.top(), "340px");
    }
}
