use std::fs;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::report::{BatchReport, ItemReport, Operation, Outcome};
use crate::runtime::ResolvedPaths;

pub const EN_PAGE: &str = "page.en.tsx";
pub const RU_PAGE: &str = "page.ru.tsx";
pub const WRAPPER_PAGE: &str = "page.tsx";

pub const PARAMS_FOLDERS: &[&str] = &[
    "app",
    "app/about",
    "app/account",
    "app/auth",
    "app/blog",
    "app/contacts",
    "app/privacy",
    "app/products",
    "app/solutions",
    "app/solutions/marketResearch",
    "app/solutions/openAbroad",
    "app/solutions/plan",
    "app/solutions/socialPlanMaster",
    "app/solutions/synthFocusLab",
    "app/fin-model/model1",
];

pub const PATHNAME_FOLDERS: &[&str] = &[
    "app/about",
    "app/account",
    "app/auth",
    "app/blog",
    "app/contacts",
    "app/privacy",
    "app/products",
    "app/solutions",
    "app/solutions/marketResearch",
    "app/solutions/openAbroad",
    "app/solutions/plan",
    "app/solutions/socialPlanMaster",
    "app/solutions/synthFocusLab",
    "app/fin-model/model1",
];

pub const PARAMS_TEMPLATE: &str = concat!(
    "\"use client\";\n",
    "\n",
    "import EnPage from \"./page.en\";\n",
    "import RuPage from \"./page.ru\";\n",
    "\n",
    "export default function Page({\n",
    "  params,\n",
    "}: {\n",
    "  params: { locale?: string };\n",
    "}) {\n",
    "  const locale = params?.locale || \"en\";\n",
    "  return locale === \"ru\" ? <RuPage /> : <EnPage />;\n",
    "}\n",
);

pub const PATHNAME_TEMPLATE: &str = concat!(
    "\"use client\";\n",
    "\n",
    "import { usePathname } from \"next/navigation\";\n",
    "import EnPage from \"./page.en\";\n",
    "import RuPage from \"./page.ru\";\n",
    "\n",
    "export default function Page() {\n",
    "  const pathname = usePathname();\n",
    "  const isRussian = pathname.startsWith(\"/ru\");\n",
    "  \n",
    "  return isRussian ? <RuPage /> : <EnPage />;\n",
    "}\n",
);

/// How a wrapper picks the locale variant at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperStrategy {
    /// `params.locale` from the dynamic route; never replaces an existing wrapper.
    Params,
    /// `usePathname()` prefix check; always rewrites the wrapper.
    Pathname,
}

impl WrapperStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Params => "params",
            Self::Pathname => "pathname",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::Params => PARAMS_TEMPLATE,
            Self::Pathname => PATHNAME_TEMPLATE,
        }
    }

    pub fn operation(self) -> Operation {
        match self {
            Self::Params => Operation::WrapParams,
            Self::Pathname => Operation::WrapPathname,
        }
    }

    fn overwrites(self) -> bool {
        matches!(self, Self::Pathname)
    }
}

/// Create or refresh the wrapper for one project-relative folder.
pub fn create_wrapper(paths: &ResolvedPaths, folder: &str, strategy: WrapperStrategy) -> ItemReport {
    let folder_path = paths.resolve(folder);
    let en_file = folder_path.join(EN_PAGE);
    let ru_file = folder_path.join(RU_PAGE);
    let wrapper_file = folder_path.join(WRAPPER_PAGE);
    let wrapper_display = paths.display(&wrapper_file);

    if !folder_path.exists() {
        return ItemReport::new(folder, wrapper_display, Outcome::FolderMissing);
    }

    let missing: Vec<String> = [&en_file, &ru_file]
        .into_iter()
        .filter(|sibling| !sibling.exists())
        .map(|sibling| paths.display(sibling))
        .collect();

    // An existing wrapper wins over missing siblings for the create-only strategy.
    if !strategy.overwrites() && wrapper_file.exists() {
        return ItemReport::new(folder, wrapper_display, Outcome::AlreadyExists);
    }
    if !missing.is_empty() {
        return ItemReport {
            missing,
            ..ItemReport::new(folder, wrapper_display, Outcome::MissingLocaleFiles)
        };
    }

    let outcome = if strategy.overwrites() {
        Outcome::Updated
    } else {
        Outcome::Created
    };
    let written = fs::write(&wrapper_file, strategy.template())
        .with_context(|| format!("failed to write {wrapper_display}"));
    match written {
        Ok(()) => {
            debug!(folder, strategy = strategy.as_str(), "wrote locale wrapper");
            ItemReport::new(folder, wrapper_display, outcome)
        }
        Err(error) => ItemReport::failed(folder, wrapper_display, &error),
    }
}

/// Run the wrapper strategy over every folder. Per-folder failures never stop the batch.
pub fn run_wrappers(
    paths: &ResolvedPaths,
    folders: &[String],
    strategy: WrapperStrategy,
) -> BatchReport {
    let mut report = BatchReport::new(strategy.operation());
    for folder in folders {
        report.push(create_wrapper(paths, folder, strategy));
    }
    report
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use tempfile::tempdir;

    fn seed_locale_pages(root: &Path, folder: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).expect("create folder");
        fs::write(dir.join(EN_PAGE), "export default function En() {}\n").expect("write en");
        fs::write(dir.join(RU_PAGE), "export default function Ru() {}\n").expect("write ru");
    }

    fn folders(list: &[&str]) -> Vec<String> {
        list.iter().map(|folder| folder.to_string()).collect()
    }

    #[test]
    fn params_strategy_creates_wrapper_for_about_page() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/about");

        let report = run_wrappers(&paths, &folders(&["app/about"]), WrapperStrategy::Params);

        let written = fs::read_to_string(temp.path().join("app/about/page.tsx")).expect("read");
        assert_eq!(written, PARAMS_TEMPLATE);
        assert_eq!(report.items[0].outcome, Outcome::Created);
        assert_eq!(report.items[0].target, "app/about/page.tsx");
        assert_eq!(report.summary_lines()[0], "✓ Created 1 locale wrappers");
    }

    #[test]
    fn params_strategy_skips_existing_wrapper_untouched() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/blog");
        let wrapper = temp.path().join("app/blog/page.tsx");
        fs::write(&wrapper, "// hand written\n").expect("write wrapper");

        let report = run_wrappers(&paths, &folders(&["app/blog"]), WrapperStrategy::Params);

        assert_eq!(report.items[0].outcome, Outcome::AlreadyExists);
        assert_eq!(
            fs::read_to_string(&wrapper).expect("read"),
            "// hand written\n"
        );
        assert_eq!(
            report.item_lines(&report.items[0]),
            vec!["- Already exists: app/blog/page.tsx".to_string()]
        );
    }

    #[test]
    fn pathname_strategy_overwrites_manual_edits() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/contacts");
        let wrapper = temp.path().join("app/contacts/page.tsx");
        fs::write(&wrapper, PARAMS_TEMPLATE).expect("write wrapper");

        let first = run_wrappers(&paths, &folders(&["app/contacts"]), WrapperStrategy::Pathname);
        assert_eq!(first.items[0].outcome, Outcome::Updated);
        assert_eq!(fs::read_to_string(&wrapper).expect("read"), PATHNAME_TEMPLATE);

        fs::write(&wrapper, "// edited by hand\n").expect("edit wrapper");
        let second = run_wrappers(&paths, &folders(&["app/contacts"]), WrapperStrategy::Pathname);
        assert_eq!(second.items[0].outcome, Outcome::Updated);
        assert_eq!(fs::read_to_string(&wrapper).expect("read"), PATHNAME_TEMPLATE);
        assert_eq!(second.summary_lines(), vec!["✓ Updated 1 locale wrappers".to_string()]);
    }

    #[test]
    fn missing_sibling_is_reported_and_nothing_written() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        let dir = temp.path().join("app/privacy");
        fs::create_dir_all(&dir).expect("create folder");
        fs::write(dir.join(EN_PAGE), "en\n").expect("write en");

        for strategy in [WrapperStrategy::Params, WrapperStrategy::Pathname] {
            let report = run_wrappers(&paths, &folders(&["app/privacy"]), strategy);
            assert_eq!(report.items[0].outcome, Outcome::MissingLocaleFiles);
            assert_eq!(report.items[0].missing, vec!["app/privacy/page.ru.tsx".to_string()]);
            assert!(!dir.join(WRAPPER_PAGE).exists());
        }
    }

    #[test]
    fn batch_continues_past_missing_folders() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/auth");
        seed_locale_pages(temp.path(), "app/solutions/plan");

        let report = run_wrappers(
            &paths,
            &folders(&["app/auth", "app/nowhere", "app/solutions/plan"]),
            WrapperStrategy::Params,
        );

        let outcomes: Vec<Outcome> = report.items.iter().map(|item| item.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Created, Outcome::FolderMissing, Outcome::Created]
        );
        assert_eq!(report.count(Outcome::Created), 2);
        assert_eq!(report.skipped(), 0);
        assert!(report.render_text().contains("✗ Folder not found: app/nowhere\n"));
    }

    #[test]
    fn write_failure_is_recorded_and_batch_continues() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/a");
        seed_locale_pages(temp.path(), "app/b");
        // A directory where the wrapper file has to go.
        fs::create_dir_all(temp.path().join("app/a/page.tsx")).expect("create blocker");

        let report = run_wrappers(
            &paths,
            &folders(&["app/a", "app/b"]),
            WrapperStrategy::Pathname,
        );

        assert_eq!(report.items[0].outcome, Outcome::Failed);
        let reason = report.items[0].reason.as_deref().expect("failure reason");
        assert!(reason.starts_with("failed to write app/a/page.tsx"));
        let lines = report.item_lines(&report.items[0]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("✗ Failed app/a/page.tsx: failed to write app/a/page.tsx"));

        assert_eq!(report.items[1].outcome, Outcome::Updated);
        assert_eq!(
            fs::read_to_string(temp.path().join("app/b/page.tsx")).expect("read"),
            PATHNAME_TEMPLATE
        );
        assert_eq!(report.summary_lines(), vec!["✓ Updated 1 locale wrappers".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn params_write_failure_counts_as_skipped() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app/a");
        seed_locale_pages(temp.path(), "app/b");
        // Dangling link: `exists()` is false, and writing through it fails.
        std::os::unix::fs::symlink(
            temp.path().join("gone/page.tsx"),
            temp.path().join("app/a/page.tsx"),
        )
        .expect("create dangling link");

        let report = run_wrappers(&paths, &folders(&["app/a", "app/b"]), WrapperStrategy::Params);

        assert_eq!(report.items[0].outcome, Outcome::Failed);
        assert_eq!(report.items[1].outcome, Outcome::Created);
        assert_eq!(
            report.summary_lines(),
            vec![
                "✓ Created 1 locale wrappers".to_string(),
                "- Skipped 1 (already exist or missing locale files)".to_string(),
            ]
        );
    }

    #[test]
    fn folder_path_that_is_a_file_reports_missing_siblings() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        fs::create_dir_all(temp.path().join("app")).expect("create app");
        fs::write(temp.path().join("app/blog"), "not a folder\n").expect("write file");

        let report = run_wrappers(&paths, &folders(&["app/blog"]), WrapperStrategy::Params);
        assert_eq!(report.items[0].outcome, Outcome::MissingLocaleFiles);
        assert_eq!(
            report.item_lines(&report.items[0]),
            vec![
                "✗ Missing: app/blog/page.en.tsx".to_string(),
                "✗ Missing: app/blog/page.ru.tsx".to_string(),
            ]
        );
    }

    #[test]
    fn root_app_folder_is_handled_like_any_other() {
        let temp = tempdir().expect("tempdir");
        let paths = ResolvedPaths::from_root(temp.path());
        seed_locale_pages(temp.path(), "app");

        let report = run_wrappers(&paths, &folders(&["app"]), WrapperStrategy::Params);
        assert_eq!(report.items[0].target, "app/page.tsx");
        assert!(temp.path().join("app/page.tsx").exists());
    }

    #[test]
    fn templates_branch_on_their_routing_signal() {
        assert!(PARAMS_TEMPLATE.contains("params?.locale || \"en\""));
        assert!(!PARAMS_TEMPLATE.contains("usePathname"));
        assert!(PATHNAME_TEMPLATE.contains("pathname.startsWith(\"/ru\")"));
        assert!(PATHNAME_TEMPLATE.contains("\n  \n  return isRussian"));
    }
}
