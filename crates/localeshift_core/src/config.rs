use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::inject::DEFAULT_INJECT_TARGET;
use crate::mover::{DEFAULT_ROUTES, MoveRoute};
use crate::wrappers::{PARAMS_FOLDERS, PATHNAME_FOLDERS, WrapperStrategy};

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct LocaleshiftConfig {
    #[serde(default)]
    pub inject: InjectSection,
    #[serde(default)]
    pub wrap: WrapSection,
    #[serde(default, rename = "move")]
    pub moves: MoveSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct InjectSection {
    pub target: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct WrapSection {
    pub folders: Option<Vec<String>>,
    pub pathname_folders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct MoveSection {
    pub routes: Option<Vec<MoveRoute>>,
}

impl LocaleshiftConfig {
    /// Injector target relative to the project root: config > built-in.
    pub fn inject_target(&self) -> &str {
        self.inject
            .target
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .unwrap_or(DEFAULT_INJECT_TARGET)
    }

    /// Folder list scanned by the given wrapper strategy: config > built-in.
    pub fn wrap_folders(&self, strategy: WrapperStrategy) -> Vec<String> {
        let (configured, builtin) = match strategy {
            WrapperStrategy::Params => (&self.wrap.folders, PARAMS_FOLDERS),
            WrapperStrategy::Pathname => (&self.wrap.pathname_folders, PATHNAME_FOLDERS),
        };
        match configured {
            Some(folders) => folders.clone(),
            None => builtin.iter().map(|folder| folder.to_string()).collect(),
        }
    }

    /// Move routes: config > built-in.
    pub fn move_routes(&self) -> Vec<MoveRoute> {
        match &self.moves.routes {
            Some(routes) => routes.clone(),
            None => DEFAULT_ROUTES
                .iter()
                .map(|(from, to)| MoveRoute::new(*from, *to))
                .collect(),
        }
    }

    fn validate(&self) -> Result<()> {
        let folder_lists = [&self.wrap.folders, &self.wrap.pathname_folders];
        for folders in folder_lists.into_iter().flatten() {
            if folders.iter().any(|folder| folder.trim().is_empty()) {
                bail!("wrap folder entries cannot be empty");
            }
        }
        if let Some(routes) = &self.moves.routes {
            for route in routes {
                if route.from.trim().is_empty() || route.to.trim().is_empty() {
                    bail!("move routes require non-empty `from` and `to`");
                }
            }
        }
        Ok(())
    }
}

/// Load and parse the config from a TOML file. Returns default if the file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<LocaleshiftConfig> {
    if !config_path.exists() {
        return Ok(LocaleshiftConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: LocaleshiftConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    parsed
        .validate()
        .with_context(|| format!("invalid config {}", config_path.display()))?;
    Ok(parsed)
}

/// Commented config listing every built-in default. Parses to `LocaleshiftConfig::default()`.
pub fn render_default_config() -> String {
    let mut out = String::from(
        "# localeshift configuration (materialized by `localeshift init`)\n# Uncomment a key to override the built-in list.\n\n[inject]\n",
    );
    let _ = writeln!(out, "# target = \"{DEFAULT_INJECT_TARGET}\"");

    out.push_str("\n[wrap]\n# folders = [\n");
    for folder in PARAMS_FOLDERS {
        let _ = writeln!(out, "#   \"{folder}\",");
    }
    out.push_str("# ]\n# pathname_folders = [\n");
    for folder in PATHNAME_FOLDERS {
        let _ = writeln!(out, "#   \"{folder}\",");
    }
    out.push_str("# ]\n\n[move]\n");
    for (from, to) in DEFAULT_ROUTES {
        let _ = writeln!(out, "# [[move.routes]]\n# from = \"{from}\"\n# to = \"{to}\"");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_uses_builtin_lists() {
        let config = LocaleshiftConfig::default();
        assert_eq!(
            config.inject_target(),
            "app/solutions/marketResearch/page.tsx"
        );
        let params = config.wrap_folders(WrapperStrategy::Params);
        assert_eq!(params.len(), 15);
        assert_eq!(params[0], "app");
        let pathname = config.wrap_folders(WrapperStrategy::Pathname);
        assert_eq!(pathname.len(), 14);
        assert!(!pathname.iter().any(|folder| folder == "app"));
        assert_eq!(config.move_routes().len(), 28);
    }

    #[test]
    fn load_config_returns_default_for_missing_file() {
        let config = load_config(Path::new("/nonexistent/config.toml")).expect("load config");
        assert_eq!(config, LocaleshiftConfig::default());
    }

    #[test]
    fn load_config_parses_all_sections() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[inject]
target = "app/[locale]/solutions/marketResearch/page.en.tsx"

[wrap]
folders = ["app/pricing"]
pathname_folders = ["app/pricing", "app/team"]

[[move.routes]]
from = "app/pricing/page.en.tsx"
to = "app/[locale]/pricing/page.en.tsx"
"#,
        )
        .expect("write config");

        let config = load_config(&config_path).expect("load config");
        assert_eq!(
            config.inject_target(),
            "app/[locale]/solutions/marketResearch/page.en.tsx"
        );
        assert_eq!(
            config.wrap_folders(WrapperStrategy::Params),
            vec!["app/pricing".to_string()]
        );
        assert_eq!(config.wrap_folders(WrapperStrategy::Pathname).len(), 2);
        let routes = config.move_routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].to, "app/[locale]/pricing/page.en.tsx");
    }

    #[test]
    fn blank_inject_target_falls_back_to_builtin() {
        let config: LocaleshiftConfig =
            toml::from_str("[inject]\ntarget = \"  \"\n").expect("parse");
        assert_eq!(config.inject_target(), DEFAULT_INJECT_TARGET);
    }

    #[test]
    fn load_config_returns_error_for_invalid_toml() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[wrap\nfolders = [").expect("write config");
        let error = load_config(&config_path).expect_err("must fail");
        assert!(error.to_string().contains("failed to parse"));
    }

    #[test]
    fn load_config_rejects_empty_route_fields() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            "[[move.routes]]\nfrom = \"app/a/page.en.tsx\"\nto = \"\"\n",
        )
        .expect("write config");
        let error = load_config(&config_path).expect_err("must fail");
        assert!(format!("{error:#}").contains("non-empty"));
    }

    #[test]
    fn rendered_default_config_parses_to_defaults() {
        let rendered = render_default_config();
        assert!(rendered.contains("app/solutions/synthFocusLab"));
        assert!(rendered.contains("app/[locale]/fin-model/model1/page.ru.tsx"));
        let parsed: LocaleshiftConfig = toml::from_str(&rendered).expect("parse rendered");
        assert_eq!(parsed, LocaleshiftConfig::default());
    }
}
