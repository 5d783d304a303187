use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{date::Dated, error::BlogError, helpers};

/// The front matter data of a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostData {
    pub title: String,
    /// The publish date. Format like YYYY-MM-DD or an RFC 3339 timestamp.
    #[serde(with = "crate::helpers::serde_datetime")]
    pub date: OffsetDateTime,
    pub description: String,
}

#[derive(Deserialize)]
struct FrontMatter {
    #[serde(with = "helpers::serde_scalar")]
    title: String,
    #[serde(with = "helpers::serde_datetime")]
    date: OffsetDateTime,
    #[serde(with = "helpers::serde_scalar")]
    description: String,
    /// Overrides the slug derived from the file path.
    slug: Option<String>,
}

/// A post of a content collection.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Unique identifier of the post, used to build its url.
    pub slug: String,
    pub data: PostData,
    /// Path of the source file.
    #[serde(skip_serializing)]
    pub file: PathBuf,
}

impl Dated for PostData {
    fn date(&self) -> OffsetDateTime {
        self.date
    }
}

impl Dated for Post {
    fn date(&self) -> OffsetDateTime {
        self.data.date
    }
}

impl Post {
    /// Read and parse the post at `path` of the collection directory `collection_dir`.
    pub fn parse(collection_dir: &Path, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read post `{}`", path.display()))?;
        let (front_matter, _) = split_front_matter(&content)
            .ok_or_else(|| BlogError::MissingFrontMatter(path.to_owned()))?;
        let front_matter = serde_yaml::from_str::<FrontMatter>(front_matter).map_err(|source| {
            BlogError::InvalidFrontMatter {
                path: path.to_owned(),
                source,
            }
        })?;

        let slug = match front_matter.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().trim_matches('/').to_owned(),
            _ => slug_from_path(path.strip_prefix(collection_dir)?),
        };
        tracing::debug!("Loaded post `{}` from `{}`", slug, path.display());

        Ok(Post {
            slug,
            data: PostData {
                title: front_matter.title,
                date: front_matter.date,
                description: front_matter.description,
            },
            file: path.to_owned(),
        })
    }
}

/// Split `content` into the YAML front matter between `---` fences and the body.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Derive a slug from the file path relative to its collection directory.
///
/// `2024/Hello World.md` becomes `2024/hello-world`, a trailing `index` file
/// takes the slug of its directory.
fn slug_from_path(relative: &Path) -> String {
    let relative = relative.with_extension("");
    let mut segments = relative
        .iter()
        .map(|segment| helpers::slugify(&segment.to_string_lossy()))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }
    segments.join("/")
}
