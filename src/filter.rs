//! Tag filtering for the tag view. A [`FilterContext`] is parsed once from
//! the page's query string and stays immutable for the life of the view; the
//! filter runs eagerly when the post cache first populates and its result
//! becomes the working set the pagination cursor slices.

use crate::post::Post;

/// The message shown when a search-bar query matches no tag at all.
pub const SEARCH_REJECTION: &str = "Sorry. Please roll again.";

/// The active filter for a tag view. The two modes are mutually exclusive;
/// when both query parameters are present, `search` wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterContext {
    /// Exact-tag mode: case-sensitive match against stored tag casing.
    Tag(String),

    /// Substring-search mode: case-insensitive containment over tag text.
    Search(String),
}

impl FilterContext {
    /// Parses a query string (with or without the leading `?`) into a filter
    /// context. Returns `None` when neither parameter is present, which the
    /// tag view treats as an empty result set.
    pub fn from_query(query: &str) -> Option<FilterContext> {
        let mut tag = None;
        let mut search = None;
        for (key, value) in
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        {
            match &*key {
                "tag" => tag = Some(value.into_owned()),
                "search" => search = Some(value.into_owned()),
                _ => {}
            }
        }
        match (search, tag) {
            (Some(s), _) => Some(FilterContext::Search(s)),
            (None, Some(t)) => Some(FilterContext::Tag(t)),
            (None, None) => None,
        }
    }

    /// The raw query term, regardless of mode.
    pub fn term(&self) -> &str {
        match self {
            FilterContext::Tag(t) => t,
            FilterContext::Search(s) => s,
        }
    }

    /// The navigable link for this filter, per the site's `tag.html?tag=<tag>`
    /// and `tag.html?search=<term>` conventions.
    pub fn href(&self) -> String {
        match self {
            FilterContext::Tag(t) => tag_href(t),
            FilterContext::Search(s) => {
                format!("tag.html?search={}", urlencoding::encode(s))
            }
        }
    }

    /// Whether `post` belongs to this filter's result set.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            FilterContext::Tag(tag) => post.tags.iter().any(|t| t == tag),
            FilterContext::Search(term) => {
                let term = term.to_lowercase();
                post.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
        }
    }

    /// Derives the filtered working set from the full collection.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        posts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// The filter link for a single tag.
pub fn tag_href(tag: &str) -> String {
    format!("tag.html?tag={}", urlencoding::encode(tag))
}

/// Where a search-bar submission should send the reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The input named an existing post id; go straight to its detail page.
    DetailLink(String),

    /// At least one tag contains the (lower-cased) input; go to the search
    /// results view.
    SearchLink(String),

    /// Nothing matched; show [`SEARCH_REJECTION`].
    NoMatch,
}

/// Resolves raw search-bar input against the collection before navigating.
/// An all-digit input that names an existing post id short-circuits to that
/// post; otherwise the input must be a substring of some tag. Returns `None`
/// for blank input, which submits as a no-op.
pub fn search_preflight(posts: &[Post], input: &str) -> Option<SearchOutcome> {
    let raw = input.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.chars().all(|c| c.is_ascii_digit()) {
        if let Some(post) = posts.iter().find(|p| p.id.as_str() == raw) {
            return Some(SearchOutcome::DetailLink(post.detail_href()));
        }
    }

    let term = raw.to_lowercase();
    let matched = posts
        .iter()
        .flat_map(|p| p.tags.iter())
        .any(|tag| tag.to_lowercase().contains(&term));
    Some(if matched {
        SearchOutcome::SearchLink(format!(
            "tag.html?search={}",
            urlencoding::encode(&term)
        ))
    } else {
        SearchOutcome::NoMatch
    })
}
