//! Support for generating the site's RSS feed from the post collection. This
//! runs offline at build time and always regenerates the whole document:
//! exclude the synthetic non-post entries, reverse so the most recently added
//! post leads, cap the item count, and wrap the items in the fixed channel
//! envelope with an atom self-link and an xml-stylesheet processing
//! instruction.

use crate::html;
use crate::post::Post;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::io::Write;

/// Maximum number of items in the generated feed.
pub const FEED_ITEM_CAP: usize = 20;

/// Description text is cut at this many characters, with an ellipsis marker
/// appended when anything was cut.
pub const DESCRIPTION_LIMIT: usize = 300;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Bundled configuration for generating the feed.
#[derive(Debug)]
pub struct FeedConfig {
    /// The channel title.
    pub title: String,

    /// The site root, e.g. `https://example.net` (no trailing slash). Item
    /// links are built as `{site_url}/post.html?id=<id>`.
    pub site_url: String,

    /// The channel description.
    pub description: String,

    /// The channel language code.
    pub language: String,

    /// The feed's own URL, advertised as the atom self-link.
    pub feed_url: String,

    /// The stylesheet the processing instruction points readers' browsers at.
    pub stylesheet: String,

    /// Identifiers of synthetic entries that are not real posts and must
    /// never syndicate.
    pub exclude: Vec<String>,
}

/// Generates the feed and writes it out. `now` stamps `lastBuildDate` and
/// substitutes for posts with no date of their own. Returns the number of
/// items written.
pub fn write_feed<W: Write>(
    config: &FeedConfig,
    posts: &[Post],
    now: DateTime<Utc>,
    mut w: W,
) -> std::io::Result<usize> {
    let (xml, count) = feed_xml(config, posts, now);
    w.write_all(xml.as_bytes())?;
    Ok(count)
}

/// Builds the full feed document as a string. Split from [`write_feed`] so
/// the document can be inspected without touching disk.
pub fn feed_xml(config: &FeedConfig, posts: &[Post], now: DateTime<Utc>) -> (String, usize) {
    // Exclusion happens before the reversal and the cap, so an excluded
    // entry can never displace a legitimate post from the feed.
    let items: Vec<&Post> = posts
        .iter()
        .filter(|p| !config.exclude.iter().any(|id| id == p.id.as_str()))
        .rev()
        .take(FEED_ITEM_CAP)
        .collect();

    let mut xml = String::with_capacity(4096);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<?xml-stylesheet type=\"text/xsl\" href=\"{}\"?>\n",
        html::escape(&config.stylesheet)
    ));
    xml.push_str(&format!("<rss version=\"2.0\" xmlns:atom=\"{}\">\n", ATOM_NS));
    xml.push_str("  <channel>\n");
    xml.push_str(&format!("    <title>{}</title>\n", html::escape(&config.title)));
    xml.push_str(&format!("    <link>{}</link>\n", html::escape(&config.site_url)));
    xml.push_str(&format!(
        "    <description>{}</description>\n",
        html::escape(&config.description)
    ));
    xml.push_str(&format!(
        "    <language>{}</language>\n",
        html::escape(&config.language)
    ));
    xml.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        html::escape(&config.feed_url)
    ));
    xml.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        now.to_rfc2822()
    ));

    for post in &items {
        xml.push_str(&item_xml(config, post, now));
    }

    xml.push_str("  </channel>\n");
    xml.push_str("</rss>\n");
    (xml, items.len())
}

fn item_xml(config: &FeedConfig, post: &Post, now: DateTime<Utc>) -> String {
    let link = format!("{}/{}", config.site_url, post.detail_href());
    let pub_date = post
        .date
        .as_deref()
        .and_then(parse_date)
        .map(|d| d.to_rfc2822())
        .unwrap_or_else(|| now.to_rfc2822());

    let mut item = String::new();
    item.push_str("    <item>\n");
    item.push_str(&format!(
        "      <title>{}</title>\n",
        html::escape(&post.title)
    ));
    item.push_str(&format!("      <link>{}</link>\n", html::escape(&link)));
    item.push_str(&format!("      <guid>{}</guid>\n", html::escape(&link)));
    item.push_str(&format!("      <pubDate>{}</pubDate>\n", pub_date));
    item.push_str(&format!(
        "      <description>{}</description>\n",
        html::escape(&description(&post.text))
    ));
    for tag in &post.tags {
        item.push_str(&format!("      <category>{}</category>\n", html::escape(tag)));
    }
    item.push_str("    </item>\n");
    item
}

/// A plain-text description of the post body, truncated to
/// [`DESCRIPTION_LIMIT`] characters with an ellipsis marker when longer.
fn description(text: &str) -> String {
    let plain = html::plain_text(text);
    if plain.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = plain.chars().take(DESCRIPTION_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        plain
    }
}

/// Parses a post's ISO-ish date string: a full RFC 3339 datetime or a bare
/// `YYYY-MM-DD` (taken as midnight UTC). Returns `None` for anything else,
/// which falls back to the generation time.
fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    Some(date.and_time(midnight).and_utc().fixed_offset())
}
