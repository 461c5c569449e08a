//! Project configuration for the feed exporter. A `blogroll.yaml` at the
//! site root names the channel and points at the posts file; everything else
//! has sensible defaults.

use crate::feed::FeedConfig;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "blogroll.yaml";

#[derive(Deserialize)]
struct PostsFile(PathBuf);
impl Default for PostsFile {
    fn default() -> Self {
        PostsFile(PathBuf::from("posts.json"))
    }
}

#[derive(Deserialize)]
struct FeedPath(PathBuf);
impl Default for FeedPath {
    fn default() -> Self {
        FeedPath(PathBuf::from("rss.xml"))
    }
}

#[derive(Deserialize)]
struct Stylesheet(String);
impl Default for Stylesheet {
    fn default() -> Self {
        Stylesheet("rss.xsl".to_owned())
    }
}

#[derive(Deserialize)]
struct Language(String);
impl Default for Language {
    fn default() -> Self {
        Language("en-US".to_owned())
    }
}

#[derive(Deserialize)]
struct Exclude(Vec<String>);
impl Default for Exclude {
    fn default() -> Self {
        Exclude(vec!["alert".to_owned(), "big-book".to_owned()])
    }
}

#[derive(Deserialize)]
struct Project {
    site_url: String,
    title: String,
    description: String,

    #[serde(default)]
    language: Language,

    #[serde(default)]
    posts_file: PostsFile,

    #[serde(default)]
    feed_path: FeedPath,

    #[serde(default)]
    stylesheet: Stylesheet,

    #[serde(default)]
    exclude: Exclude,
}

/// Resolved exporter configuration: the feed channel settings plus the
/// project-relative input and output paths made absolute.
#[derive(Debug)]
pub struct Config {
    pub posts_file: PathBuf,
    pub feed_path: PathBuf,
    pub feed: FeedConfig,
}

impl Config {
    /// Finds `blogroll.yaml` in `dir` or any parent directory and loads it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path `{}`",
                path.display()
            )
        })?;

        let site_url = project.site_url.trim_end_matches('/').to_owned();
        let feed_url = format!("{}/{}", site_url, project.feed_path.0.display());
        Ok(Config {
            posts_file: project_root.join(project.posts_file.0),
            feed_path: project_root.join(project.feed_path.0),
            feed: FeedConfig {
                feed_url,
                title: project.title,
                site_url,
                description: project.description,
                language: project.language.0,
                stylesheet: project.stylesheet.0,
                exclude: project.exclude.0,
            },
        })
    }
}
