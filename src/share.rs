//! The share dispatcher. Clicking a share control never touches the platform
//! directly from here; dispatching resolves the clicked control into a
//! [`ShareAction`] value describing the outbound action, and the platform
//! adapter carries it out (opens the window, writes the clipboard) and
//! reports clipboard failures back via [`report_clipboard_error`].

use crate::html;
use crate::render::PostUnit;
use log::error;
use std::fmt;
use url::Url;

/// Confirmation presented after a successful clipboard write.
pub const COPY_CONFIRMATION: &str = "Link copied to clipboard!";

const TWITTER_INTENT: &str = "https://twitter.com/intent/tweet";
const TUMBLR_WIDGET: &str = "https://www.tumblr.com/widgets/share/tool";

/// The fixed triplet of share controls every rendered post carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareChannel {
    Twitter,
    Tumblr,
    CopyLink,
}

impl ShareChannel {
    pub const ALL: [ShareChannel; 3] =
        [ShareChannel::Twitter, ShareChannel::Tumblr, ShareChannel::CopyLink];

    /// The control's visible label.
    pub fn label(&self) -> &'static str {
        match self {
            ShareChannel::Twitter => "Twitter",
            ShareChannel::Tumblr => "Tumblr",
            ShareChannel::CopyLink => "Web",
        }
    }

    /// The control's accessible name.
    pub fn aria_label(&self) -> &'static str {
        match self {
            ShareChannel::Twitter => "Share to Twitter",
            ShareChannel::Tumblr => "Share to Tumblr",
            ShareChannel::CopyLink => "Copy link",
        }
    }
}

/// An outbound action for the platform adapter to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareAction {
    /// Open `url` in a new browsing context with `noopener,noreferrer`. When
    /// the context fails to open (pop-up blocked), navigate the current page
    /// to `url` instead.
    OpenIntent { url: String },

    /// Open `url` in a fixed-size pop-up.
    OpenPopup { url: String, features: &'static str },

    /// Write `text` to the system clipboard and present
    /// [`COPY_CONFIRMATION`] on success. On failure, call
    /// [`report_clipboard_error`]; there is no user-facing failure UI.
    CopyToClipboard { text: String },
}

/// Resolves the canonical URL for a rendered post: the unit's own title link
/// resolved against the page origin, falling back to the page URL itself when
/// the post has no title link.
pub fn canonical_post_url(unit: &PostUnit, page_url: &Url) -> String {
    match &unit.title {
        Some(link) => format!(
            "{}/{}",
            page_url.origin().ascii_serialization(),
            link.href.trim_start_matches('/')
        ),
        None => page_url.to_string(),
    }
}

/// Builds the [`ShareAction`] for a clicked control on a rendered post.
pub fn dispatch(unit: &PostUnit, channel: ShareChannel, page_url: &Url) -> ShareAction {
    let post_url = canonical_post_url(unit, page_url);
    let title = unit.title.as_ref().map(|t| t.text.as_str()).unwrap_or("");

    match channel {
        ShareChannel::Twitter => ShareAction::OpenIntent {
            url: format!(
                "{}?text={}&url={}",
                TWITTER_INTENT,
                urlencoding::encode(title),
                urlencoding::encode(&post_url)
            ),
        },
        ShareChannel::Tumblr => {
            let caption = format!(
                "<h1><strong>{}</strong></h1>{}",
                title,
                html::plain_text(&unit.body)
            );
            ShareAction::OpenPopup {
                url: format!(
                    "{}?posttype=link&canonicalUrl={}&title={}&content={}&caption={}",
                    TUMBLR_WIDGET,
                    urlencoding::encode(&post_url),
                    urlencoding::encode(title),
                    urlencoding::encode(&post_url),
                    urlencoding::encode(&caption)
                ),
                features: "width=540,height=600",
            }
        }
        ShareChannel::CopyLink => ShareAction::CopyToClipboard { text: post_url },
    }
}

/// Call-site handling for a failed clipboard write: logged, nothing surfaced.
pub fn report_clipboard_error(err: &dyn fmt::Display) {
    error!("Failed to copy link: {}", err);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::parse_posts;
    use crate::render::render_post;

    fn unit(json: &str) -> PostUnit {
        let posts = parse_posts(json.as_bytes()).unwrap();
        render_post(&posts[0], None)
    }

    fn page_url() -> Url {
        Url::parse("https://example.net/index.html").unwrap()
    }

    #[test]
    fn test_canonical_url_from_title_link() {
        let unit = unit(r#"[{"id": 9, "title": "Nine", "text": "<p>n</p>"}]"#);
        assert_eq!(
            canonical_post_url(&unit, &page_url()),
            "https://example.net/post.html?id=9"
        );
    }

    #[test]
    fn test_canonical_url_falls_back_to_page() {
        let unit = unit(r#"[{"id": 9, "text": "<p>n</p>"}]"#);
        assert_eq!(
            canonical_post_url(&unit, &page_url()),
            "https://example.net/index.html"
        );
    }

    #[test]
    fn test_twitter_intent() {
        let unit = unit(r#"[{"id": 9, "title": "Mars & back", "text": "<p>n</p>"}]"#);
        assert_eq!(
            dispatch(&unit, ShareChannel::Twitter, &page_url()),
            ShareAction::OpenIntent {
                url: "https://twitter.com/intent/tweet?text=Mars%20%26%20back\
                      &url=https%3A%2F%2Fexample.net%2Fpost.html%3Fid%3D9"
                    .to_owned(),
            }
        );
    }

    #[test]
    fn test_tumblr_popup_strips_body_markup() {
        let unit = unit(
            r#"[{"id": 9, "title": "T", "text": "<p>plain &amp; simple</p>"}]"#,
        );
        match dispatch(&unit, ShareChannel::Tumblr, &page_url()) {
            ShareAction::OpenPopup { url, features } => {
                assert_eq!(features, "width=540,height=600");
                let caption = urlencoding::encode("<h1><strong>T</strong></h1>plain & simple");
                assert!(url.starts_with(TUMBLR_WIDGET));
                assert!(url.contains("posttype=link"));
                assert!(url.ends_with(&format!("caption={}", caption)));
            }
            other => panic!("expected pop-up, got {:?}", other),
        }
    }

    #[test]
    fn test_copy_link() {
        let unit = unit(r#"[{"id": 9, "title": "Nine", "text": ""}]"#);
        assert_eq!(
            dispatch(&unit, ShareChannel::CopyLink, &page_url()),
            ShareAction::CopyToClipboard {
                text: "https://example.net/post.html?id=9".to_owned()
            }
        );
    }
}
