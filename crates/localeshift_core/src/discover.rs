use std::path::Path;

use anyhow::Result;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::mover::MoveRoute;
use crate::runtime::{ResolvedPaths, normalize_for_display};
use crate::wrappers::{EN_PAGE, RU_PAGE, WrapperStrategy};

const LOCALE_SEGMENT: &str = "[locale]";
const IGNORED_DIRS: &[&str] = &[LOCALE_SEGMENT, "node_modules", ".next"];
const APP_ROOT: &str = "app";

/// Project-relative folders under `app/` holding both locale variants, sorted.
pub fn discover_locale_folders(paths: &ResolvedPaths) -> Result<Vec<String>> {
    if !paths.app_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut folders = Vec::new();
    let walker = WalkDir::new(&paths.app_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .map(|path| relative_folder(paths, path))
                    .unwrap_or_else(|| relative_folder(paths, &paths.app_dir));
                warn!(path = %path, error = %error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if has_locale_pair(entry.path()) {
            folders.push(relative_folder(paths, entry.path()));
        }
    }
    folders.sort();
    Ok(folders)
}

/// Discovered folders the strategy may write to. The pathname strategy overwrites,
/// so the `app` root page is never offered to it.
pub fn discover_wrap_folders(
    paths: &ResolvedPaths,
    strategy: WrapperStrategy,
) -> Result<Vec<String>> {
    let mut folders = discover_locale_folders(paths)?;
    if strategy == WrapperStrategy::Pathname {
        folders.retain(|folder| folder != APP_ROOT);
    }
    Ok(folders)
}

/// Routes moving each folder's locale variants under `app/[locale]/`. The `app` root is left alone.
pub fn derive_move_routes(folders: &[String]) -> Vec<MoveRoute> {
    let mut routes = Vec::new();
    for folder in folders {
        let Some(rest) = folder.strip_prefix(&format!("{APP_ROOT}/")) else {
            continue;
        };
        if rest.is_empty() || rest.split('/').any(|segment| segment == LOCALE_SEGMENT) {
            continue;
        }
        for page in [EN_PAGE, RU_PAGE] {
            routes.push(MoveRoute::new(
                format!("{folder}/{page}"),
                format!("{APP_ROOT}/{LOCALE_SEGMENT}/{rest}/{page}"),
            ));
        }
    }
    routes
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

fn has_locale_pair(dir: &Path) -> bool {
    dir.join(EN_PAGE).is_file() && dir.join(RU_PAGE).is_file()
}

fn relative_folder(paths: &ResolvedPaths, dir: &Path) -> String {
    match dir.strip_prefix(&paths.project_root) {
        Ok(relative) => normalize_for_display(relative),
        Err(_) => normalize_for_display(dir),
    }
}
