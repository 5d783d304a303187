use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};

use crate::{engine::BlogEngine, entity::Blog, error::BlogError, BLOG_FILE};
use anyhow::{anyhow, Context, Result};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use walkdir::WalkDir;

pub async fn watch_build<P: AsRef<Path>>(source: P, dest: P, watch: bool) -> Result<()> {
    let (source, blog) = locate_root(source)?;
    let mut engine = BlogEngine::new(source, dest, blog)?;

    // Spawn the build process as a blocking task, avoid starving other tasks.
    tokio::task::spawn_blocking(move || {
        build(&mut engine, false)?;

        if watch {
            tracing::info!("Watching...");
            let (tx, rx) = mpsc::channel();
            let mut debouncer = new_debouncer(Duration::from_millis(500), None, tx)?;
            // Watch the whole source, a reloaded config may point to another
            // collection dir. The dest dir may live inside the source.
            debouncer
                .watcher()
                .watch(&engine.source, RecursiveMode::Recursive)?;
            let dest = fs::canonicalize(&engine.dest)?;

            loop {
                match rx.recv() {
                    Ok(Ok(events)) => {
                        let paths = events.iter().map(|event| event.path.as_path());
                        if !touches_inputs(paths, &dest) {
                            continue;
                        }
                        if let Err(err) = build(&mut engine, true) {
                            tracing::error!("build error: {:?}", &err);
                        }
                    }
                    Ok(Err(errors)) => tracing::error!("watch error: {:?}", &errors),
                    Err(err) => {
                        tracing::error!("watch error: {:?}", &err);
                        break;
                    }
                }
            }
        }
        anyhow::Ok(())
    })
    .await?
}

/// Whether any changed path is an input, i.e. not under the `dest` dir.
fn touches_inputs<'a>(paths: impl IntoIterator<Item = &'a Path>, dest: &Path) -> bool {
    paths.into_iter().any(|path| !path.starts_with(dest))
}

fn build(engine: &mut BlogEngine, reload: bool) -> Result<()> {
    let instant = std::time::Instant::now();
    engine.build(reload)?;
    tracing::info!("Build cost: {}ms", instant.elapsed().as_millis());
    Ok(())
}

/// Locate the site root from `source` and parse its `blog.toml`.
pub fn locate_root<P: AsRef<Path>>(source: P) -> Result<(PathBuf, Blog)> {
    locate_root_blog_folder(std::fs::canonicalize(source)?)?
        .with_context(|| format!("Failed to find the root {BLOG_FILE} file"))
}

/// Find the root blog file in current dir and try to parse it
fn parse_root_blog_file<P: AsRef<Path>>(path: P) -> Result<Option<Blog>> {
    // Find the name in current dir
    let found = WalkDir::new(&path)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_name() == BLOG_FILE);
    if found {
        // Try to parse the root blog.toml as Blog instance
        return Ok(Some(Blog::parse_from_toml(path)?));
    }

    Ok(None)
}

// Locate folder contains the root `blog.toml`, and return path info and Blog instance.
fn locate_root_blog_folder(path: PathBuf) -> Result<Option<(PathBuf, Blog)>> {
    match parse_root_blog_file(&path) {
        Ok(Some(blog)) => return Ok(Some((path, blog))),
        Err(err) => match err.downcast::<BlogError>() {
            // Found a root blog.toml, but it has invalid format
            Ok(inner_err @ BlogError::InvalidRootTomlFile(_)) => return Err(anyhow!(inner_err)),
            // Found a blog.toml, but it isn't a root blog.toml
            Ok(BlogError::NotRootTomlFile) => {}
            Ok(inner_err) => return Err(anyhow!(inner_err)),
            Err(err) => return Err(err),
        },
        _ => {}
    }

    match path.parent() {
        Some(parent_path) => locate_root_blog_folder(parent_path.to_path_buf()),
        None => Ok(None),
    }
}
