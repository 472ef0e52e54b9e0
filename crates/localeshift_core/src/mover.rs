use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::report::{BatchReport, ItemReport, Operation, Outcome};
use crate::runtime::ResolvedPaths;

pub const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("app/about/page.en.tsx", "app/[locale]/about/page.en.tsx"),
    ("app/about/page.ru.tsx", "app/[locale]/about/page.ru.tsx"),
    ("app/account/page.en.tsx", "app/[locale]/account/page.en.tsx"),
    ("app/account/page.ru.tsx", "app/[locale]/account/page.ru.tsx"),
    ("app/auth/page.en.tsx", "app/[locale]/auth/page.en.tsx"),
    ("app/auth/page.ru.tsx", "app/[locale]/auth/page.ru.tsx"),
    ("app/blog/page.en.tsx", "app/[locale]/blog/page.en.tsx"),
    ("app/blog/page.ru.tsx", "app/[locale]/blog/page.ru.tsx"),
    ("app/contacts/page.en.tsx", "app/[locale]/contacts/page.en.tsx"),
    ("app/contacts/page.ru.tsx", "app/[locale]/contacts/page.ru.tsx"),
    ("app/privacy/page.en.tsx", "app/[locale]/privacy/page.en.tsx"),
    ("app/privacy/page.ru.tsx", "app/[locale]/privacy/page.ru.tsx"),
    ("app/products/page.en.tsx", "app/[locale]/products/page.en.tsx"),
    ("app/products/page.ru.tsx", "app/[locale]/products/page.ru.tsx"),
    ("app/solutions/page.en.tsx", "app/[locale]/solutions/page.en.tsx"),
    ("app/solutions/page.ru.tsx", "app/[locale]/solutions/page.ru.tsx"),
    (
        "app/fin-model/model1/page.en.tsx",
        "app/[locale]/fin-model/model1/page.en.tsx",
    ),
    (
        "app/fin-model/model1/page.ru.tsx",
        "app/[locale]/fin-model/model1/page.ru.tsx",
    ),
    (
        "app/solutions/marketResearch/page.en.tsx",
        "app/[locale]/solutions/marketResearch/page.en.tsx",
    ),
    (
        "app/solutions/marketResearch/page.ru.tsx",
        "app/[locale]/solutions/marketResearch/page.ru.tsx",
    ),
    (
        "app/solutions/openAbroad/page.en.tsx",
        "app/[locale]/solutions/openAbroad/page.en.tsx",
    ),
    (
        "app/solutions/openAbroad/page.ru.tsx",
        "app/[locale]/solutions/openAbroad/page.ru.tsx",
    ),
    (
        "app/solutions/plan/page.en.tsx",
        "app/[locale]/solutions/plan/page.en.tsx",
    ),
    (
        "app/solutions/plan/page.ru.tsx",
        "app/[locale]/solutions/plan/page.ru.tsx",
    ),
    (
        "app/solutions/socialPlanMaster/page.en.tsx",
        "app/[locale]/solutions/socialPlanMaster/page.en.tsx",
    ),
    (
        "app/solutions/socialPlanMaster/page.ru.tsx",
        "app/[locale]/solutions/socialPlanMaster/page.ru.tsx",
    ),
    (
        "app/solutions/synthFocusLab/page.en.tsx",
        "app/[locale]/solutions/synthFocusLab/page.en.tsx",
    ),
    (
        "app/solutions/synthFocusLab/page.ru.tsx",
        "app/[locale]/solutions/synthFocusLab/page.ru.tsx",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MoveRoute {
    pub from: String,
    pub to: String,
}

impl MoveRoute {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    Rename,
    CopyVerified,
}

/// Move `source` to `destination`, creating missing parent directories.
///
/// A plain rename is tried first. When that fails (typically across
/// filesystems) the file is copied, the copy is checked against the source
/// digest, and only then is the source removed.
pub fn move_file(source: &Path, destination: &Path) -> Result<MoveMethod> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(MoveMethod::Rename),
        Err(rename_error) => {
            debug!(
                source = %source.display(),
                error = %rename_error,
                "rename failed, falling back to copy"
            );
            copy_verified(source, destination)
                .with_context(|| format!("rename failed ({rename_error}) and copy fallback failed"))?;
            Ok(MoveMethod::CopyVerified)
        }
    }
}

fn copy_verified(source: &Path, destination: &Path) -> Result<()> {
    let expected = file_digest(source)?;
    fs::copy(source, destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    let actual = file_digest(destination)?;
    if expected != actual {
        let _ = fs::remove_file(destination);
        bail!(
            "digest mismatch after copying {} (expected {expected}, got {actual})",
            source.display()
        );
    }
    fs::remove_file(source).with_context(|| format!("failed to remove {}", source.display()))
}

pub fn file_digest(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let digest = Sha256::digest(&bytes);
    let mut output = String::with_capacity(64);
    for byte in digest.iter() {
        output.push_str(&format!("{byte:02x}"));
    }
    Ok(output)
}

/// Move every route in order. Missing sources are skipped; failures are recorded per route.
pub fn run_moves(paths: &ResolvedPaths, routes: &[MoveRoute]) -> BatchReport {
    let mut report = BatchReport::new(Operation::Move);
    for route in routes {
        let source = paths.resolve(&route.from);
        let destination = paths.resolve(&route.to);

        if !source.exists() {
            report.push(ItemReport::new(
                &route.from,
                &route.to,
                Outcome::SourceMissing,
            ));
            continue;
        }

        match move_file(&source, &destination) {
            Ok(method) => {
                debug!(from = %route.from, to = %route.to, ?method, "moved file");
                report.push(ItemReport::new(&route.from, &route.to, Outcome::Moved));
            }
            Err(error) => {
                warn!(from = %route.from, error = %format!("{error:#}"), "move failed");
                report.push(ItemReport::failed(&route.from, &route.to, &error));
            }
        }
    }
    report
}
