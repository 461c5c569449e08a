//! The in-memory post cache and the fetch seam behind it. A view fetches the
//! whole collection exactly once; pagination reads the cached copy for the
//! rest of the session. The fetch itself is a platform capability (the
//! browser's network stack, or the filesystem at build time), so it hides
//! behind the [`PostSource`] trait. Sources are synchronous from the engine's
//! point of view; a platform adapter that fetches asynchronously completes
//! the await before calling in.

use crate::post::{parse_posts, Post};
use log::warn;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Where a view's posts come from.
pub trait PostSource {
    fn fetch(&mut self) -> Result<Vec<Post>>;
}

/// Serving order for a cached collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// The source file appends new entries, so the main feed reverses it to
    /// serve the most recently added post first.
    NewestFirst,

    /// Natural source order, used by the tag view.
    Source,
}

/// Lazily-populated, fetch-once cache over a [`PostSource`]. A failed fetch
/// is logged and leaves the cache unpopulated, so the next demand (a
/// human-triggered scroll) retries; there is no automatic retry or backoff.
pub struct PostCache<S> {
    source: S,
    order: Order,
    posts: Option<Vec<Post>>,
}

impl<S: PostSource> PostCache<S> {
    pub fn new(source: S, order: Order) -> PostCache<S> {
        PostCache {
            source,
            order,
            posts: None,
        }
    }

    /// Whether the collection has been fetched yet.
    pub fn is_loaded(&self) -> bool {
        self.posts.is_some()
    }

    /// Returns the cached collection, fetching it on first demand.
    pub fn load(&mut self) -> Result<&[Post]> {
        if self.posts.is_none() {
            let mut posts = match self.source.fetch() {
                Ok(posts) => posts,
                Err(e) => {
                    warn!("Error loading posts: {}", e);
                    return Err(e);
                }
            };
            if self.order == Order::NewestFirst {
                posts.reverse();
            }
            self.posts = Some(posts);
        }
        Ok(self.posts.as_deref().unwrap_or_default())
    }
}

/// A [`PostSource`] that reads the collection JSON from disk. This is what
/// the feed exporter uses.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> FileSource {
        FileSource { path }
    }
}

impl PostSource for FileSource {
    fn fetch(&mut self) -> Result<Vec<Post>> {
        let file = File::open(&self.path).map_err(|err| Error::Io {
            path: self.path.clone(),
            err,
        })?;
        Ok(parse_posts(io::BufReader::new(file))?)
    }
}

/// The result of a fallible fetch.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed fetch of the post collection.
#[derive(Debug)]
pub enum Error {
    /// Returned when the collection file cannot be read.
    Io { path: PathBuf, err: io::Error },

    /// Returned when the collection is not valid JSON.
    Json(serde_json::Error),

    /// Returned by platform sources for transport problems ("network
    /// response was not ok" and friends).
    Fetch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading posts file `{}`: {}", path.display(), err)
            }
            Error::Json(err) => err.fmt(f),
            Error::Fetch(msg) => msg.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Json(err) => Some(err),
            Error::Fetch(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts [`serde_json::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible fetch operations.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::PostId;

    /// Fails a configurable number of times before succeeding, counting
    /// fetches along the way.
    struct FlakySource {
        failures: usize,
        fetches: usize,
        posts: &'static str,
    }

    impl PostSource for FlakySource {
        fn fetch(&mut self) -> Result<Vec<Post>> {
            self.fetches += 1;
            if self.failures > 0 {
                self.failures -= 1;
                return Err(Error::Fetch("Network response was not ok".to_owned()));
            }
            Ok(parse_posts(self.posts.as_bytes())?)
        }
    }

    const THREE_POSTS: &str = r#"[
        {"id": 1, "text": ""},
        {"id": 2, "text": ""},
        {"id": 3, "text": ""}
    ]"#;

    fn ids(posts: &[Post]) -> Vec<PostId> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_fetches_once() -> Result<()> {
        let mut cache = PostCache::new(
            FlakySource {
                failures: 0,
                fetches: 0,
                posts: THREE_POSTS,
            },
            Order::Source,
        );
        assert!(!cache.is_loaded());
        assert_eq!(ids(cache.load()?), ["1".into(), "2".into(), "3".into()]);
        cache.load()?;
        cache.load()?;
        assert_eq!(cache.source.fetches, 1);
        Ok(())
    }

    #[test]
    fn test_newest_first_reverses() -> Result<()> {
        let mut cache = PostCache::new(
            FlakySource {
                failures: 0,
                fetches: 0,
                posts: THREE_POSTS,
            },
            Order::NewestFirst,
        );
        assert_eq!(ids(cache.load()?), ["3".into(), "2".into(), "1".into()]);
        Ok(())
    }

    #[test]
    fn test_failure_leaves_cache_retryable() -> Result<()> {
        let mut cache = PostCache::new(
            FlakySource {
                failures: 1,
                fetches: 0,
                posts: THREE_POSTS,
            },
            Order::Source,
        );
        assert!(cache.load().is_err());
        assert!(!cache.is_loaded());
        // The next demand retries and succeeds.
        assert_eq!(cache.load()?.len(), 3);
        assert!(cache.is_loaded());
        assert_eq!(cache.source.fetches, 2);
        Ok(())
    }

    #[test]
    fn test_file_source() -> anyhow::Result<()> {
        use std::io::Write;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("posts.json");
        write!(File::create(&path)?, "{}", THREE_POSTS)?;

        let posts = FileSource::new(path).fetch()?;
        assert_eq!(posts.len(), 3);

        let missing = FileSource::new(dir.path().join("nope.json")).fetch();
        assert!(matches!(missing, Err(Error::Io { .. })));
        Ok(())
    }
}
