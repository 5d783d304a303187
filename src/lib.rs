//! Build the RSS feed of a markdown blog.
//!
//! Posts live in a content collection (`content/blog/*.md` by default), each with a
//! YAML front matter declaring `title`, `date` and `description`. The feed lists
//! them newest first, in Korean unless the site says otherwise.

mod build;
mod collection;
mod date;
mod engine;
mod entity;
mod error;
pub mod feed;
mod helpers;
mod list;
mod locales;
mod serve;

/// The root config file of a site.
pub static BLOG_FILE: &str = "blog.toml";
/// The feed file name, both in the build dir and as the served path.
pub static FEED_FILE: &str = "rss.xml";

pub use build::{locate_root, watch_build};
pub use collection::{get_collection, load_collection};
pub use date::{format_date, sort_by_date, Dated};
pub use engine::BlogEngine;
pub use entity::{Blog, CollectionConfig, Post, PostData, Site};
pub use error::BlogError;
pub use feed::{Feed, FeedContext, FeedItem};
pub use helpers::{parse_datetime, slugify};
pub use list::{list_lines, list_posts, list_site};
pub use locales::{FluentLoader, DEFAULT_LOCALE};
pub use serve::run_serve;
