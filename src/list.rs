use std::path::Path;

use anyhow::Result;

use crate::{
    collection,
    date::sort_by_date,
    entity::{Blog, CollectionConfig, Post},
    locales::FluentLoader,
};

/// Load the posts of `blog` under the site `root`, newest first.
pub fn list_posts(root: &Path, blog: &Blog) -> Result<Vec<Post>> {
    let mut posts = collection::load_collection(root, &blog.collection)?;
    posts.sort_by(sort_by_date);
    Ok(posts)
}

/// Render one `{date}  {title}  {link}` line per post, dates in the loader's locale.
pub fn list_lines(
    posts: &[Post],
    config: &CollectionConfig,
    loader: &FluentLoader,
) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            format!(
                "{}  {}  {}",
                loader.format_date(post.data.date),
                post.data.title,
                config.link(&post.slug)
            )
        })
        .collect()
}

/// List the posts of the site located at `root` as printable lines.
pub fn list_site(root: &Path, blog: &Blog) -> Result<Vec<String>> {
    let posts = list_posts(root, blog)?;
    let loader = FluentLoader::new(root, &blog.site.locale)?;
    Ok(list_lines(&posts, &blog.collection, &loader))
}
