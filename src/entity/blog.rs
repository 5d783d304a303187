use std::{fs, path::Path};

use anyhow::Result;
use serde::Deserialize;

use crate::{error::BlogError, BLOG_FILE};

use super::Site;

/// The root blog config.
///
/// It parsed from the root directory's `blog.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Blog {
    pub site: Site,
    #[serde(default)]
    pub collection: CollectionConfig,
}

/// Where the posts live and how their links are built.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// The content directory, relative to the site root.
    /// Default to 'content'.
    #[serde(default = "CollectionConfig::default_dir")]
    pub dir: String,
    /// The collection name, a sub directory of the content directory.
    /// Default to 'blog'.
    #[serde(default = "CollectionConfig::default_name")]
    pub name: String,
    /// The path prefix of post links.
    /// Default to '/blog'.
    #[serde(default = "CollectionConfig::default_link_prefix")]
    pub link_prefix: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            name: Self::default_name(),
            link_prefix: Self::default_link_prefix(),
        }
    }
}

impl CollectionConfig {
    fn default_dir() -> String {
        "content".to_owned()
    }

    fn default_name() -> String {
        "blog".to_owned()
    }

    fn default_link_prefix() -> String {
        "/blog".to_owned()
    }

    /// The root-relative link of the post `slug`, such as `/blog/{slug}/`.
    pub fn link(&self, slug: &str) -> String {
        let prefix = self.link_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("/{slug}/")
        } else {
            format!("/{prefix}/{slug}/")
        }
    }
}

impl Blog {
    /// Parse the root `blog.toml` in `source`.
    pub fn parse_from_toml<P: AsRef<Path>>(source: P) -> Result<Blog> {
        let content = fs::read_to_string(source.as_ref().join(BLOG_FILE))?;
        let value =
            toml::from_str::<toml::Value>(&content).map_err(BlogError::InvalidRootTomlFile)?;
        if value.get("site").is_none() {
            return Err(BlogError::NotRootTomlFile.into());
        }
        Ok(value
            .try_into::<Blog>()
            .map_err(BlogError::InvalidRootTomlFile)?)
    }
}
