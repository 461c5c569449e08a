//! The per-view session: one object owning all of a view's mutable state
//! (cache, working set, cursor) for the lifetime of a page view. There are no
//! process-wide singletons; a page navigation simply drops the session.
//!
//! The platform adapter drives it with [`Session::load_more`] -- once at view
//! load and again whenever the scroll controller emits
//! [`crate::scroll::Effect::LoadMore`] -- and applies whatever
//! [`LoadOutcome`] comes back.

use crate::cursor::Cursor;
use crate::filter::FilterContext;
use crate::post::Post;
use crate::render::{render_post, PostUnit};
use crate::scroll::Announcement;
use crate::store::{Order, PostCache, PostSource};

/// The inline message for a filter that matches nothing.
pub const NO_POSTS_MESSAGE: &str = "No posts found for this tag.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewKind {
    /// The main feed: every post, most recently added first.
    Main,

    /// The tag view: source order, filtered by query parameters.
    Tag,
}

/// Heading data for a tag view's result list, produced once, when the cache
/// first populates. `term` is a plain value (the adapter renders it inside
/// the marked term span). Applying a header also means pointing the page's
/// canonical link at the current page URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewHeader {
    pub term: String,
    pub document_title: String,
}

impl ViewHeader {
    fn new(filter: &FilterContext) -> ViewHeader {
        ViewHeader {
            term: filter.term().to_owned(),
            document_title: match filter {
                FilterContext::Tag(tag) => format!("Posts tagged: {}", tag),
                FilterContext::Search(term) => format!("Posts matching: {}", term),
            },
        }
    }
}

/// One materialized page of posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub units: Vec<PostUnit>,
    pub header: Option<ViewHeader>,

    /// Live-region updates for this load, in order.
    pub announcements: Vec<Announcement>,

    /// True for the batch that first paints content; the adapter follows it
    /// with the one-time footer reveal.
    pub first: bool,
}

/// What a call to [`Session::load_more`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Batch(Batch),

    /// The view's filter matched nothing (or the tag view had no query
    /// parameters). Shown once, as an inline message rather than an error.
    Empty {
        header: Option<ViewHeader>,
        message: &'static str,
    },

    /// The working set is fully materialized. In the tag view this is the
    /// signal to detach the scroll listener entirely.
    Exhausted,

    /// A load was already in flight; this call was a no-op.
    Suppressed,

    /// The collection could not be fetched. Already logged; the view stays
    /// retryable, and the next human-triggered scroll tries again.
    Failed,
}

/// Per-view state machine over a [`PostSource`].
pub struct Session<S> {
    kind: ViewKind,
    cache: PostCache<S>,
    filter: Option<FilterContext>,
    working: Option<Vec<Post>>,
    cursor: Cursor,
}

impl<S: PostSource> Session<S> {
    /// A main-feed session: unfiltered, most recently added post first.
    pub fn main_view(source: S) -> Session<S> {
        Session {
            kind: ViewKind::Main,
            cache: PostCache::new(source, Order::NewestFirst),
            filter: None,
            working: None,
            cursor: Cursor::new(),
        }
    }

    /// A tag-view session. `query` is the page's raw query string; its `tag`
    /// or `search` parameter fixes the filter context for the whole view.
    pub fn tag_view(source: S, query: &str) -> Session<S> {
        Session {
            kind: ViewKind::Tag,
            cache: PostCache::new(source, Order::Source),
            filter: FilterContext::from_query(query),
            working: None,
            cursor: Cursor::new(),
        }
    }

    pub fn filter(&self) -> Option<&FilterContext> {
        self.filter.as_ref()
    }

    /// The working set's latched exhaustion flag, for the scroll controller.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Materializes the next page. The first call fetches the collection and
    /// derives the working set; later calls only slice the cache. Guarded so
    /// an overlapping call is suppressed rather than queued.
    pub fn load_more(&mut self) -> LoadOutcome {
        if self.cursor.is_exhausted() {
            return LoadOutcome::Exhausted;
        }
        if !self.cursor.try_begin() {
            return LoadOutcome::Suppressed;
        }
        let outcome = self.load_step();
        self.cursor.finish();
        outcome
    }

    fn load_step(&mut self) -> LoadOutcome {
        let first = self.working.is_none();
        if first {
            // Fetch failures are logged by the cache; leaving `working`
            // unset keeps the view retryable.
            let posts = match self.cache.load() {
                Ok(posts) => posts,
                Err(_) => return LoadOutcome::Failed,
            };
            self.working = Some(match (self.kind, &self.filter) {
                (ViewKind::Main, _) => posts.to_vec(),
                (ViewKind::Tag, Some(filter)) => filter.apply(posts),
                (ViewKind::Tag, None) => Vec::new(),
            });
        }

        let working = self.working.as_deref().unwrap_or(&[]);
        let header = match (first, self.kind, &self.filter) {
            (true, ViewKind::Tag, Some(filter)) => {
                // Exact-tag views suppress the heading when nothing matched;
                // search views always show the term.
                let show = matches!(filter, FilterContext::Search(_)) || !working.is_empty();
                show.then(|| ViewHeader::new(filter))
            }
            _ => None,
        };

        let page = self.cursor.next(working);
        let units: Vec<PostUnit> = page
            .iter()
            .map(|post| render_post(post, self.filter.as_ref()))
            .collect();

        if units.is_empty() {
            if first && self.kind == ViewKind::Tag {
                return LoadOutcome::Empty {
                    header,
                    message: NO_POSTS_MESSAGE,
                };
            }
            return LoadOutcome::Exhausted;
        }

        let mut announcements = vec![Announcement::batch_loaded(units.len())];
        if self.cursor.is_exhausted() {
            announcements.push(Announcement::end_of_posts());
        }

        LoadOutcome::Batch(Batch {
            units,
            header,
            announcements,
            first,
        })
    }
}
