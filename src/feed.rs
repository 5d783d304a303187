use std::path::Path;

use anyhow::{Context as _, Result};
use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::{
    collection,
    date::{sort_by_date, Dated},
    entity::{Blog, CollectionConfig, Post},
    helpers,
};

static RSS_TEMPLATE: &str = include_str!("../templates/rss.jinja");

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_filter("xml_escape", xml_escape_filter);
    env.add_template("rss.jinja", RSS_TEMPLATE)
        .expect("Invalid rss.jinja template.");
    env
});

/// The projection of a [`Post`] the feed serializer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: OffsetDateTime,
    pub description: String,
    /// Root-relative link of the post, such as `/blog/{slug}/`.
    pub link: String,
}

impl Dated for FeedItem {
    fn date(&self) -> OffsetDateTime {
        self.pub_date
    }
}

impl FeedItem {
    pub fn from_post(post: &Post, config: &CollectionConfig) -> Self {
        FeedItem {
            title: post.data.title.clone(),
            pub_date: post.data.date,
            description: post.data.description.clone(),
            link: config.link(&post.slug),
        }
    }
}

/// The request context of the feed handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedContext {
    /// The absolute url of the site.
    pub site: String,
}

/// Everything the RSS document is built from.
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub site: String,
    pub items: Vec<FeedItem>,
    /// Raw XML inserted into the `<channel>` element.
    pub custom_data: String,
}

/// Sort `posts` newest first and project them into feed items.
pub fn feed_items(mut posts: Vec<Post>, config: &CollectionConfig) -> Vec<FeedItem> {
    posts.sort_by(sort_by_date);
    posts
        .iter()
        .map(|post| FeedItem::from_post(post, config))
        .collect()
}

/// Assemble the [`Feed`] of `blog` from already loaded `posts`.
pub fn build_feed(context: &FeedContext, blog: &Blog, posts: Vec<Post>) -> Feed {
    Feed {
        title: blog.site.title.clone(),
        description: blog.site.description.clone(),
        site: context.site.clone(),
        items: feed_items(posts, &blog.collection),
        custom_data: format!(
            "<language>{}</language>",
            xml_escape_filter(&blog.site.language)
        ),
    }
}

/// Handle a feed request: fetch the collection of `blog` under `root`, then sort,
/// project and serialize it into an RSS document.
pub async fn get(context: &FeedContext, root: &Path, blog: &Blog) -> Result<String> {
    let posts = collection::get_collection(root.to_owned(), blog.collection.clone()).await?;
    rss(&build_feed(context, blog, posts))
}

#[derive(Serialize)]
struct RssItem<'a> {
    title: &'a str,
    link: String,
    description: &'a str,
    pub_date: String,
}

/// Serialize `feed` into an RSS 2.0 document.
///
/// Item links are resolved against the feed's site url.
pub fn rss(feed: &Feed) -> Result<String> {
    let items = feed
        .items
        .iter()
        .map(|item| {
            let pub_date = item
                .pub_date
                .to_offset(UtcOffset::UTC)
                .format(&Rfc2822)
                .with_context(|| format!("Invalid publish date of `{}`", item.title))?;
            anyhow::Ok(RssItem {
                title: &item.title,
                link: helpers::absolute_url(&feed.site, &item.link),
                description: &item.description,
                pub_date,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let xml = ENV.get_template("rss.jinja")?.render(context! {
        title => &feed.title,
        description => &feed.description,
        site => &feed.site,
        custom_data => &feed.custom_data,
        items => &items,
    })?;
    Ok(xml)
}

fn xml_escape_filter(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
