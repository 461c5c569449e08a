//! The [`Post`] data model and JSON loading. The post collection is owned by
//! a collaborator and consumed read-only: a single JSON array of post
//! records, most recently added entry last.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;

/// A post identifier. The collection file mixes numeric and string ids, so
/// both deserialize; the textual form is what link building and anchor
/// namespacing use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> PostId {
        PostId(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<PostId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => PostId(n.to_string()),
            Repr::Text(s) => PostId(s),
        })
    }
}

/// One blog entry. `text` and `notes` are trusted HTML fragments; everything
/// else is a plain value. `tags` is never null--an absent field deserializes
/// to an empty list.
#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub id: PostId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub date: Option<String>,
}

impl Post {
    /// The detail-page link for this post, per the site's `post.html?id=<id>`
    /// convention.
    pub fn detail_href(&self) -> String {
        format!("post.html?id={}", self.id)
    }
}

/// Parses a post collection from a JSON reader. Source order is preserved;
/// callers that want the most recently added entry first reverse afterwards
/// (see [`crate::store`]).
pub fn parse_posts(reader: impl Read) -> serde_json::Result<Vec<Post>> {
    serde_json::from_reader(reader)
}
