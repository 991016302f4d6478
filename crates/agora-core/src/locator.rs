//! Deterministic placeholder attachment URLs.
//!
//! Posts without a stored file still get a well-formed attachment link. The
//! link depends only on the post id, so the same post always yields the same URL.

use crate::domain::Attachable;

pub const DEFAULT_ORIGIN: &str = "https://example.com";

/// Placeholder file names, indexed by `post id mod 5`.
pub const PLACEHOLDER_FILES: [&str; 5] = [
    "document.pdf",
    "image.jpg",
    "spreadsheet.xlsx",
    "presentation.pptx",
    "archive.zip",
];

/// Path segment used for posts that have no id yet.
pub const UNSAVED_SEGMENT: &str = "new";

/// Builds attachment URLs for posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLocator {
    placeholder_origin: String,
    media_origin: String,
}

impl Default for AttachmentLocator {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN, DEFAULT_ORIGIN)
    }
}

impl AttachmentLocator {
    pub fn new(placeholder_origin: impl Into<String>, media_origin: impl Into<String>) -> Self {
        Self {
            placeholder_origin: trim_origin(placeholder_origin.into()),
            media_origin: trim_origin(media_origin.into()),
        }
    }

    pub fn locate(&self, post: &impl Attachable) -> String {
        if let Some(stored) = post.attachment() {
            return self.resolve_stored(stored);
        }

        match post.post_id() {
            Some(id) => format!(
                "{}/api/attachments/{}/{}",
                self.placeholder_origin,
                id,
                placeholder_file(id)
            ),
            None => format!(
                "{}/api/attachments/{}/{}",
                self.placeholder_origin, UNSAVED_SEGMENT, PLACEHOLDER_FILES[0]
            ),
        }
    }

    fn resolve_stored(&self, stored: &str) -> String {
        if stored.starts_with("http://") || stored.starts_with("https://") {
            return stored.to_string();
        }
        let path = stored.trim_start_matches('/');
        let path = path.strip_prefix("media/").unwrap_or(path);
        format!("{}/media/{}", self.media_origin, path)
    }
}

/// Placeholder file for a persisted post id.
pub fn placeholder_file(id: i64) -> &'static str {
    let index = id.rem_euclid(PLACEHOLDER_FILES.len() as i64) as usize;
    PLACEHOLDER_FILES[index]
}

fn trim_origin(origin: String) -> String {
    origin.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        id: Option<i64>,
        attachment: Option<&'static str>,
    }

    impl Attachable for Fake {
        fn post_id(&self) -> Option<i64> {
            self.id
        }

        fn attachment(&self) -> Option<&str> {
            self.attachment
        }
    }

    fn saved(id: i64) -> Fake {
        Fake {
            id: Some(id),
            attachment: None,
        }
    }

    #[test]
    fn test_placeholder_for_id_seven() {
        let locator = AttachmentLocator::default();
        assert_eq!(
            locator.locate(&saved(7)),
            "https://example.com/api/attachments/7/spreadsheet.xlsx"
        );
    }

    #[test]
    fn test_locate_is_deterministic() {
        let locator = AttachmentLocator::default();
        let post = saved(42);
        assert_eq!(locator.locate(&post), locator.locate(&post));
        assert_ne!(locator.locate(&saved(1)), locator.locate(&saved(2)));
    }

    #[test]
    fn test_distribution_over_twenty_ids() {
        let mut counts = [0usize; 5];
        for id in 1..=20 {
            let file = placeholder_file(id);
            let index = PLACEHOLDER_FILES.iter().position(|f| *f == file).unwrap();
            counts[index] += 1;
        }
        assert_eq!(counts, [4, 4, 4, 4, 4]);

        for k in 1..=10 {
            assert_eq!(placeholder_file(5 * k), "document.pdf");
        }
    }

    #[test]
    fn test_unsaved_post_uses_reserved_segment() {
        let locator = AttachmentLocator::default();
        let draft = Fake {
            id: None,
            attachment: None,
        };
        assert_eq!(
            locator.locate(&draft),
            "https://example.com/api/attachments/new/document.pdf"
        );
    }

    #[test]
    fn test_stored_attachment_wins() {
        let locator = AttachmentLocator::new("https://example.com", "https://cdn.example.org/");
        let relative = Fake {
            id: Some(3),
            attachment: Some("attachments/syllabus.pdf"),
        };
        assert_eq!(
            locator.locate(&relative),
            "https://cdn.example.org/media/attachments/syllabus.pdf"
        );

        let prefixed = Fake {
            id: Some(3),
            attachment: Some("/media/attachments/syllabus.pdf"),
        };
        assert_eq!(locator.locate(&prefixed), locator.locate(&relative));

        let absolute = Fake {
            id: Some(3),
            attachment: Some("https://files.example.net/a.zip"),
        };
        assert_eq!(locator.locate(&absolute), "https://files.example.net/a.zip");
    }

    #[test]
    fn test_negative_ids_stay_in_range() {
        assert_eq!(placeholder_file(-1), "archive.zip");
        assert_eq!(placeholder_file(-5), "document.pdf");
    }
}
