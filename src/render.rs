//! The renderer: converts a [`Post`] into a [`PostUnit`], a platform-free
//! description of one display unit. Nothing here touches a widget tree; a
//! platform adapter walks the unit and builds real nodes from it. Fields
//! documented as HTML carry trusted post markup (plus our injected footnote
//! anchors); every other string is a plain value the adapter must apply as
//! text, never as markup.

use crate::filter::{tag_href, FilterContext};
use crate::html;
use crate::post::Post;
use crate::share::ShareChannel;
use regex::Regex;
use std::sync::LazyLock;

static SUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<sup([^>]*)>(.*?)</sup>").unwrap());

/// A self-contained description of one rendered post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostUnit {
    /// The post's id, which namespaces the unit's footnote anchors.
    pub id: String,

    /// The title link; omitted when the post's title is empty.
    pub title: Option<TitleLink>,

    /// The post's image; omitted when the post has none.
    pub image: Option<Image>,

    /// The body HTML, after the footnote and highlight passes.
    pub body: String,

    /// The notes HTML, after the footnote and highlight passes; omitted when
    /// the notes' text content is empty after tag stripping.
    pub notes: Option<String>,

    /// One navigable filter link per tag, in post order.
    pub tags: Vec<TagLink>,

    /// The fixed share-control triplet.
    pub share: [ShareChannel; 3],
}

/// A link to a post's detail page. `text` is a plain value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleLink {
    pub href: String,
    pub text: String,
}

/// A post image. `src` and `alt` are plain values; `alt` mirrors the title
/// (possibly empty).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// A filter link for one tag. `label` is a plain value; `active` marks the
/// tag matching the view's exact-tag filter so it can be visually
/// distinguished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Renders a post into a display unit. `filter` is the tag view's active
/// filter context, if any; it drives the highlight pass (exact-tag mode only)
/// and the active-tag distinction.
pub fn render_post(post: &Post, filter: Option<&FilterContext>) -> PostUnit {
    let active_tag = match filter {
        Some(FilterContext::Tag(tag)) => Some(tag.as_str()),
        _ => None,
    };

    let mut body = post.text.clone();
    let mut notes = post.notes.clone();
    if let Some(tag) = active_tag {
        body = html::highlight(&body, tag);
        notes = html::highlight(&notes, tag);
    }
    let (body, notes) = link_footnotes(&body, &notes, post.id.as_str());

    PostUnit {
        id: post.id.to_string(),
        title: (!post.title.is_empty()).then(|| TitleLink {
            href: post.detail_href(),
            text: post.title.clone(),
        }),
        image: post.image.clone().map(|src| Image {
            src,
            alt: post.title.clone(),
        }),
        body,
        notes: (!html::strip_tags(&notes).trim().is_empty()).then_some(notes),
        tags: post
            .tags
            .iter()
            .map(|tag| TagLink {
                href: tag_href(tag),
                label: tag.clone(),
                active: active_tag == Some(tag.as_str()),
            })
            .collect(),
        share: ShareChannel::ALL,
    }
}

/// The footnote accessibility pass. The Nth `<sup>` reference marker in the
/// body pairs positionally with the Nth definition marker in the notes;
/// exactly `min(refs, defs)` pairs are linked and surplus references stay
/// untouched. Each pair gets a post-scoped id pair built from the post id and
/// the reference's visible label, with cross-links in both directions:
/// the reference becomes a `doc-noteref` link described by the definition,
/// and the definition becomes a reachable `doc-endnote`.
fn link_footnotes(body: &str, notes: &str, post_id: &str) -> (String, String) {
    let refs: Vec<_> = SUP.captures_iter(body).collect();
    let defs: Vec<_> = SUP.captures_iter(notes).collect();
    let pairs = refs.len().min(defs.len());
    if pairs == 0 {
        return (body.to_owned(), notes.to_owned());
    }

    let mut linked_body = String::with_capacity(body.len());
    let mut linked_notes = String::with_capacity(notes.len());
    let mut body_pos = 0;
    let mut notes_pos = 0;

    for (reference, definition) in refs.iter().zip(defs.iter()).take(pairs) {
        let label = html::strip_tags(&reference[2]).trim().to_owned();
        let ref_id = format!("fnref-{}-{}", post_id, label);
        let def_id = format!("fn-{}-{}", post_id, label);

        // Wrap the reference's content in a noteref link.
        let whole = reference.get(0).unwrap();
        linked_body.push_str(&body[body_pos..whole.start()]);
        linked_body.push_str(&format!(
            "<sup{attrs}><a href=\"#{def}\" role=\"doc-noteref\" \
             aria-label=\"Footnote {label}\" aria-describedby=\"{def}\" \
             id=\"{ref_id}\">{inner}</a></sup>",
            attrs = &reference[1],
            def = html::escape(&def_id),
            label = html::escape(&label),
            ref_id = html::escape(&ref_id),
            inner = &reference[2],
        ));
        body_pos = whole.end();

        // Mark the definition as the announced endnote.
        let whole = definition.get(0).unwrap();
        linked_notes.push_str(&notes[notes_pos..whole.start()]);
        linked_notes.push_str(&format!(
            "<sup{attrs} id=\"{def}\" role=\"doc-endnote\">{inner}</sup>",
            attrs = &definition[1],
            def = html::escape(&def_id),
            inner = &definition[2],
        ));
        notes_pos = whole.end();
    }

    linked_body.push_str(&body[body_pos..]);
    linked_notes.push_str(&notes[notes_pos..]);
    (linked_body, linked_notes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::parse_posts;

    fn post(json: &str) -> Post {
        parse_posts(format!("[{}]", json).as_bytes())
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_title_and_image_conditional() {
        let unit = render_post(
            &post(r#"{"id": 1, "title": "T", "text": "", "image": "m.jpg"}"#),
            None,
        );
        assert_eq!(
            unit.title,
            Some(TitleLink {
                href: "post.html?id=1".to_owned(),
                text: "T".to_owned()
            })
        );
        assert_eq!(
            unit.image,
            Some(Image {
                src: "m.jpg".to_owned(),
                alt: "T".to_owned()
            })
        );

        let unit = render_post(&post(r#"{"id": 2, "text": ""}"#), None);
        assert_eq!(unit.title, None);
        assert_eq!(unit.image, None);
    }

    #[test]
    fn test_empty_notes_omitted() {
        let unit = render_post(
            &post(r#"{"id": 1, "text": "x", "notes": "<p> \n </p>"}"#),
            None,
        );
        assert_eq!(unit.notes, None);

        let unit = render_post(
            &post(r#"{"id": 1, "text": "x", "notes": "<p>note</p>"}"#),
            None,
        );
        assert_eq!(unit.notes, Some("<p>note</p>".to_owned()));
    }

    #[test]
    fn test_tag_links() {
        let filter = FilterContext::Tag("mars".to_owned());
        let unit = render_post(
            &post(r#"{"id": 1, "text": "", "tags": ["mars", "hyper loop"]}"#),
            Some(&filter),
        );
        assert_eq!(
            unit.tags,
            [
                TagLink {
                    href: "tag.html?tag=mars".to_owned(),
                    label: "mars".to_owned(),
                    active: true,
                },
                TagLink {
                    href: "tag.html?tag=hyper%20loop".to_owned(),
                    label: "hyper loop".to_owned(),
                    active: false,
                },
            ]
        );
    }

    #[test]
    fn test_share_triplet_fixed() {
        let unit = render_post(&post(r#"{"id": 1, "text": ""}"#), None);
        assert_eq!(unit.share, ShareChannel::ALL);
    }

    #[test]
    fn test_footnote_pairing() {
        let unit = render_post(
            &post(
                r#"{"id": 7,
                    "text": "a<sup>1</sup> b<sup>2</sup>",
                    "notes": "<sup>1</sup> one <sup>2</sup> two"}"#,
            ),
            None,
        );
        assert_eq!(
            unit.body,
            "a<sup><a href=\"#fn-7-1\" role=\"doc-noteref\" \
             aria-label=\"Footnote 1\" aria-describedby=\"fn-7-1\" \
             id=\"fnref-7-1\">1</a></sup> \
             b<sup><a href=\"#fn-7-2\" role=\"doc-noteref\" \
             aria-label=\"Footnote 2\" aria-describedby=\"fn-7-2\" \
             id=\"fnref-7-2\">2</a></sup>"
        );
        assert_eq!(
            unit.notes.unwrap(),
            "<sup id=\"fn-7-1\" role=\"doc-endnote\">1</sup> one \
             <sup id=\"fn-7-2\" role=\"doc-endnote\">2</sup> two"
        );
    }

    #[test]
    fn test_footnote_surplus_references_unlinked() {
        let unit = render_post(
            &post(
                r#"{"id": 7,
                    "text": "a<sup>1</sup> b<sup>2</sup> c<sup>3</sup>",
                    "notes": "<sup>1</sup> only"}"#,
            ),
            None,
        );
        // Exactly min(3, 1) = 1 pair links; the rest stay as-is.
        assert_eq!(unit.body.matches("doc-noteref").count(), 1);
        assert!(unit.body.contains("b<sup>2</sup> c<sup>3</sup>"));
    }

    #[test]
    fn test_footnote_pairing_is_positional() {
        // Labels need not agree; pairing is by index and ids come from the
        // reference's own label.
        let unit = render_post(
            &post(
                r#"{"id": 7,
                    "text": "a<sup>9</sup>",
                    "notes": "<sup>1</sup> note"}"#,
            ),
            None,
        );
        assert!(unit.body.contains("id=\"fnref-7-9\""));
        assert!(unit.notes.unwrap().contains("id=\"fn-7-9\""));
    }

    #[test]
    fn test_highlight_only_in_exact_tag_mode() {
        let p = post(r#"{"id": 1, "text": "Mars is home", "tags": ["mars"]}"#);

        let tag = FilterContext::Tag("mars".to_owned());
        let unit = render_post(&p, Some(&tag));
        assert_eq!(
            unit.body,
            "<span class=\"highlight-tag\">Mars</span> is home"
        );

        let search = FilterContext::Search("mars".to_owned());
        let unit = render_post(&p, Some(&search));
        assert_eq!(unit.body, "Mars is home");
    }

    #[test]
    fn test_highlight_applies_to_notes() {
        let filter = FilterContext::Tag("mars".to_owned());
        let unit = render_post(
            &post(r#"{"id": 1, "text": "x", "notes": "<p>on mars</p>", "tags": ["mars"]}"#),
            Some(&filter),
        );
        assert_eq!(
            unit.notes.unwrap(),
            "<p>on <span class=\"highlight-tag\">mars</span></p>"
        );
    }
}
