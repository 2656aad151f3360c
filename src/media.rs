//! Media path helpers for the popup gallery.

use crate::lightbox::MediaKind;
use crate::manifest::ImageManifest;

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "ogg"];

pub fn is_video_path(path: &str) -> bool {
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    VIDEO_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

pub fn media_kind(path: &str) -> MediaKind {
    if is_video_path(path) {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

/// Splits a `data-media` value; a value without commas is a single item.
pub fn split_inline_media(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts `<id>` from a link shaped like `.../projects/<id>.html`.
pub fn project_id_from_link(link: &str) -> Option<String> {
    const PREFIX: &str = "projects/";
    const SUFFIX: &str = ".html";
    let mut search_from = 0;
    while let Some(found) = link[search_from..].find(PREFIX) {
        let start = search_from + found + PREFIX.len();
        let rest = &link[start..];
        // The id is at least one character long.
        if let Some(first) = rest.chars().next() {
            let skip = first.len_utf8();
            if let Some(end) = rest[skip..].find(SUFFIX) {
                return Some(rest[..skip + end].to_string());
            }
        }
        search_from = search_from + found + 1;
    }
    None
}

/// Manifest entry first, then the inline attribute, then nothing.
pub fn resolve_media(
    manifest: Option<&ImageManifest>,
    project_id: Option<&str>,
    inline: Option<&str>,
) -> Vec<String> {
    if let (Some(manifest), Some(id)) = (manifest, project_id) {
        if let Some(items) = manifest.media_for(id) {
            return items.to_vec();
        }
    }
    inline.map(split_inline_media).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_video_extensions_case_insensitively() {
        assert!(is_video_path("clips/demo.MP4"));
        assert!(is_video_path("a.webm"));
        assert!(!is_video_path("a.jpg"));
        assert!(!is_video_path("mp4"));
        assert_eq!(media_kind("x.mov"), MediaKind::Video);
    }

    #[test]
    fn extracts_project_id() {
        assert_eq!(
            project_id_from_link("projects/sound-of-chess.html").as_deref(),
            Some("sound-of-chess")
        );
        assert_eq!(
            project_id_from_link("/site/projects/a.html#top").as_deref(),
            Some("a")
        );
        assert_eq!(project_id_from_link("projects/.html"), None);
        assert_eq!(project_id_from_link("about.html"), None);
    }

    #[test]
    fn manifest_wins_over_inline() {
        let manifest: ImageManifest =
            [("x".to_string(), vec!["a.jpg".to_string(), "b.mp4".to_string()])]
                .into_iter()
                .collect();
        let media = resolve_media(Some(&manifest), Some("x"), Some("inline.jpg"));
        assert_eq!(media, vec!["a.jpg", "b.mp4"]);
    }

    #[test]
    fn inline_used_without_manifest_entry() {
        let manifest = ImageManifest::default();
        assert_eq!(
            resolve_media(Some(&manifest), Some("x"), Some("one.jpg, two.png")),
            vec!["one.jpg", "two.png"]
        );
        assert_eq!(resolve_media(None, None, Some("solo.jpg")), vec!["solo.jpg"]);
        assert!(resolve_media(None, Some("x"), None).is_empty());
        assert!(resolve_media(None, None, Some("")).is_empty());
    }
}
