//! Project popup content and placement.

use crate::config::{POPUP_OFFSET, VIEWPORT_PADDING};
use crate::geometry::{Rect, Size};
use crate::media::project_id_from_link;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectLinks {
    pub repository: Option<String>,
    pub document: Option<String>,
    pub social: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkButton {
    pub label: &'static str,
    pub href: String,
    pub download: bool,
}

impl ProjectLinks {
    pub fn is_empty(&self) -> bool {
        self.repository.is_none() && self.document.is_none() && self.social.is_none()
    }

    pub fn buttons(&self) -> Vec<LinkButton> {
        let mut out = Vec::new();
        if let Some(href) = &self.repository {
            out.push(LinkButton {
                label: "GitHub",
                href: href.clone(),
                download: false,
            });
        }
        if let Some(href) = &self.document {
            out.push(LinkButton {
                label: "Download PDF",
                href: href.clone(),
                download: true,
            });
        }
        if let Some(href) = &self.social {
            out.push(LinkButton {
                label: "Instagram",
                href: href.clone(),
                download: false,
            });
        }
        out
    }
}

/// Fields read from a hovered project element's `data-*` attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectDescriptor {
    pub title: String,
    pub description: String,
    pub tech: String,
    pub year: String,
    pub project_id: Option<String>,
    pub inline_media: Option<String>,
    pub category: Option<String>,
    pub links: ProjectLinks,
}

impl ProjectDescriptor {
    /// `lookup` receives attribute names such as `data-title`. Empty values
    /// count as absent for the optional fields.
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let text = |name: &str| lookup(name).unwrap_or_default();

        let project_id = optional("data-project-id")
            .or_else(|| optional("data-link").and_then(|link| project_id_from_link(&link)));

        Self {
            title: text("data-title"),
            description: text("data-description"),
            tech: text("data-tech"),
            year: text("data-year"),
            project_id,
            inline_media: optional("data-media"),
            category: optional("data-category"),
            links: ProjectLinks {
                repository: optional("data-github"),
                document: optional("data-pdf"),
                social: optional("data-instagram"),
            },
        }
    }
}

/// Top-left corner for the popup next to `anchor`: right of it by default,
/// flipped left when the right edge would overflow, then clamped into the
/// padded viewport on each axis.
pub fn place_popup(anchor: Rect, popup: Size, viewport: Size) -> (f64, f64) {
    let pad = VIEWPORT_PADDING;
    let mut left = anchor.right + POPUP_OFFSET;
    let mut top = anchor.top;

    if left + popup.width + pad > viewport.width {
        left = anchor.left - popup.width - POPUP_OFFSET;
    }
    if left + popup.width + pad > viewport.width {
        left = viewport.width - popup.width - pad;
    }
    if left < pad {
        left = pad;
    }

    if top + popup.height + pad > viewport.height {
        top = viewport.height - popup.height - pad;
    }
    if top < pad {
        top = pad;
    }
    (left, top)
}
