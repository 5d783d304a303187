use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::{
    collection,
    entity::Blog,
    feed::{self, FeedContext},
    FEED_FILE,
};

#[derive(Debug)]
pub struct BlogEngine {
    pub source: PathBuf,
    pub dest: PathBuf,
    blog: Blog,
}

impl BlogEngine {
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>, blog: Blog) -> Result<Self> {
        let dest = dest.as_ref().to_path_buf();
        if !dest.exists() {
            fs::create_dir_all(&dest)?;
        }
        Ok(BlogEngine {
            source: source.as_ref().to_path_buf(),
            dest,
            blog,
        })
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    /// Build the feed into `dest`, returns the written file path.
    pub fn build(&mut self, reload: bool) -> Result<PathBuf> {
        if reload {
            self.blog = Blog::parse_from_toml(&self.source)?;
        }

        let posts = collection::load_collection(&self.source, &self.blog.collection)?;
        let count = posts.len();
        let context = FeedContext {
            site: self.blog.site.url.clone(),
        };
        let xml = feed::rss(&feed::build_feed(&context, &self.blog, posts))?;

        let dest = self.dest.join(FEED_FILE);
        fs::write(&dest, xml)?;
        tracing::info!("Wrote {} posts into `{}`", count, dest.display());
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::BlogEngine;
    use crate::{entity::Blog, BLOG_FILE, FEED_FILE};

    fn site(dir: &std::path::Path) -> Blog {
        fs::write(
            dir.join(BLOG_FILE),
            "[site]\nurl = \"https://pinkaru.dev\"\ntitle = \"Blog\"\n",
        )
        .unwrap();
        let posts_dir = dir.join("content/blog");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("a.md"),
            "---\ntitle: A\ndate: 2023-01-01\ndescription: old\n---\n",
        )
        .unwrap();
        fs::write(
            posts_dir.join("b.md"),
            "---\ntitle: B\ndate: 2024-01-01\ndescription: new\n---\n",
        )
        .unwrap();
        Blog::parse_from_toml(dir).unwrap()
    }

    #[test]
    fn test_build_writes_feed() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let blog = site(source.path());

        let mut engine = BlogEngine::new(source.path(), &dest.path().join("out"), blog).unwrap();
        let written = engine.build(false).unwrap();

        assert_eq!(dest.path().join("out").join(FEED_FILE), written);
        let xml = fs::read_to_string(written).unwrap();
        assert!(xml.contains("<link>https://pinkaru.dev/blog/b/</link>"));
    }

    #[test]
    fn test_build_reload_picks_up_config() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let blog = site(source.path());
        let mut engine = BlogEngine::new(source.path(), dest.path(), blog).unwrap();

        fs::write(
            source.path().join(BLOG_FILE),
            "[site]\nurl = \"https://pinkaru.dev\"\ntitle = \"Renamed\"\n",
        )
        .unwrap();
        let xml = fs::read_to_string(engine.build(true).unwrap()).unwrap();
        assert!(xml.contains("<title>Renamed</title>"));
        assert_eq!("Renamed", engine.blog().site.title);
    }
}
