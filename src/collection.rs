use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Result;
use rayon::iter::{ParallelBridge, ParallelExtend, ParallelIterator};
use walkdir::{DirEntry, WalkDir};

use crate::{
    entity::{CollectionConfig, Post},
    error::BlogError,
};

// Entries starting with `_` are drafts or partials, never posts. Hidden
// directories (`.obsidian`, `.trash`) are skipped with everything inside.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && matches!(
            entry.file_name().to_str(),
            Some(name) if name.starts_with('_') || name.starts_with('.')
        )
}

fn is_post_file(path: &Path) -> bool {
    let is_markdown = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md" | "markdown")
    );
    path.is_file() && is_markdown
}

/// Load all posts of the collection declared in `config`, relative to the site `root`.
///
/// Posts are returned in file path order. A missing collection directory yields
/// no post.
pub fn load_collection(root: &Path, config: &CollectionConfig) -> Result<Vec<Post>> {
    let collection_dir = root.join(&config.dir).join(&config.name);
    if !collection_dir.exists() {
        tracing::warn!(
            "The collection `{}` doesn't exist at `{}`",
            config.name,
            collection_dir.display()
        );
        return Ok(vec![]);
    }

    // Parallelize posts dir walk
    let mut posts = WalkDir::new(&collection_dir)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .par_bridge()
        .try_fold_with(vec![], |mut posts, entry| {
            let entry = entry?;
            let path = entry.path();
            if is_post_file(path) {
                posts.push(Post::parse(&collection_dir, path)?);
            }
            anyhow::Ok(posts)
        })
        .try_reduce_with(|mut posts, chunks| {
            posts.par_extend(chunks);
            anyhow::Ok(posts)
        })
        .transpose()?
        .unwrap_or_default();
    posts.sort_by(|a, b| a.file.cmp(&b.file));

    ensure_unique_slugs(&posts)?;
    tracing::debug!("Loaded {} posts from `{}`", posts.len(), collection_dir.display());
    Ok(posts)
}

/// Load the collection on a blocking task.
pub async fn get_collection(root: PathBuf, config: CollectionConfig) -> Result<Vec<Post>> {
    tokio::task::spawn_blocking(move || load_collection(&root, &config)).await?
}

fn ensure_unique_slugs(posts: &[Post]) -> Result<()> {
    let mut seen = HashMap::<&str, &Path>::with_capacity(posts.len());
    for post in posts {
        if let Some(first) = seen.insert(&post.slug, &post.file) {
            return Err(BlogError::DuplicateSlug {
                slug: post.slug.clone(),
                first: first.to_owned(),
                second: post.file.clone(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use test_case::test_case;

    use super::{get_collection, load_collection};
    use crate::{entity::CollectionConfig, error::BlogError};

    fn write_post(root: &Path, relative: &str, title: &str, date: &str) {
        let path = root.join("content/blog").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!("---\ntitle: {title}\ndate: {date}\ndescription: about {title}\n---\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_load_collection() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "b.md", "B", "2024-01-01");
        write_post(dir.path(), "a.md", "A", "2023-01-01");
        write_post(dir.path(), "2022/c.markdown", "C", "2022-06-01");
        write_post(dir.path(), "_draft.md", "Draft", "2025-01-01");
        fs::write(dir.path().join("content/blog/cover.png"), b"png").unwrap();

        let posts = load_collection(dir.path(), &CollectionConfig::default()).unwrap();
        let slugs = posts.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["2022/c", "a", "b"], slugs);
    }

    #[test_case(".obsidian/note.md"; "hidden dir")]
    #[test_case(".trash/2024/old.md"; "nested in hidden dir")]
    #[test_case("_partials/footer.md"; "underscore dir")]
    #[test_case(".hidden.md"; "hidden file")]
    fn test_skip_hidden_entries(relative: &str) {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), relative, "Hidden", "2024-01-01");
        write_post(dir.path(), "obsidian/note.md", "Visible", "2023-01-01");

        let posts = load_collection(dir.path(), &CollectionConfig::default()).unwrap();
        let slugs = posts.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["obsidian/note"], slugs);
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let posts = load_collection(dir.path(), &CollectionConfig::default()).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_duplicate_slugs() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "Hello World.md", "A", "2023-01-01");
        write_post(dir.path(), "hello-world.md", "B", "2024-01-01");

        let err = load_collection(dir.path(), &CollectionConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BlogError>(),
            Some(BlogError::DuplicateSlug { slug, .. }) if slug == "hello-world"
        ));
    }

    #[test]
    fn test_custom_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts/notes/n.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "---\ntitle: N\ndate: 2024-05-05\ndescription: D\n---\n").unwrap();

        let config = CollectionConfig {
            dir: "posts".to_owned(),
            name: "notes".to_owned(),
            ..Default::default()
        };
        let posts = load_collection(dir.path(), &config).unwrap();
        assert_eq!(1, posts.len());
        assert_eq!("n", posts[0].slug);
    }

    #[tokio::test]
    async fn test_get_collection() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.md", "A", "2023-01-01");

        let posts = get_collection(dir.path().to_owned(), CollectionConfig::default())
            .await
            .unwrap();
        assert_eq!("A", posts[0].data.title);
    }
}
