use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Invalid format of root `blog.toml`: {0}")]
    InvalidRootTomlFile(#[from] toml::de::Error),
    #[error("Not a root `blog.toml`, the `[site]` table is missing")]
    NotRootTomlFile,
    #[error("Missing front matter in `{}`", .0.display())]
    MissingFrontMatter(PathBuf),
    #[error("Invalid front matter in `{}`: {source}", .path.display())]
    InvalidFrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error(
        "Duplicate slug `{slug}`: `{}` and `{}`",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Invalid locale `{0}`")]
    InvalidLocale(String),
}
