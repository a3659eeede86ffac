use crate::app::cli::Cli;
use crate::app::models::{IgnoreRules, KeyDirectory, RuntimeConfig, SummarizeRules, TreeRules};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_OUTPUT: &str = ".cursor/project-tree.md";
pub const ALLOWED_HIDDEN_DIR: &str = ".cursor";

const IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    ".turbo",
    ".vercel",
    "dist",
    "build",
    "out",
    "coverage",
    ".cache",
    ".husky",
    ".vscode",
    "terminals",
];

const IGNORE_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    ".env.local",
    ".env",
    ".env.development",
    ".env.production",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "tsconfig.tsbuildinfo",
];

const IGNORE_EXTENSIONS: &[&str] = &["log", "tmp", "bak"];

const SUMMARIZE_DIRS: &[&str] = &[
    "icons",
    "__tests__",
    "stories",
    "fixtures",
    "mocks",
    "__mocks__",
    "__snapshots__",
];

const KEY_DIRS: &[(&str, &str)] = &[
    ("src/app", "Next.js App Router - Pages & Routes"),
    ("src/pages", "Next.js Pages Router"),
    ("app", "Next.js App Router (root)"),
    ("pages", "Next.js Pages Router (root)"),
    ("src/components", "React components"),
    ("components", "React components"),
    ("src/components/ui", "Reusable UI components"),
    ("src/hooks", "Custom React hooks"),
    ("hooks", "Custom React hooks"),
    ("src/services", "API service layer"),
    ("services", "API service layer"),
    ("src/lib", "Shared libraries"),
    ("lib", "Shared libraries"),
    ("src/utils", "Utility functions"),
    ("utils", "Utility functions"),
    ("src/types", "TypeScript types"),
    ("types", "TypeScript types"),
    ("src/stores", "State management"),
    ("stores", "State management"),
    ("src/styles", "Global styles"),
    ("styles", "Global styles"),
    ("src/constants", "App constants"),
    ("public", "Static assets"),
    ("prisma", "Prisma schema & migrations"),
    ("api", "API routes"),
    ("src/bin", "Binary targets"),
    ("crates", "Workspace member crates"),
    ("tests", "Integration tests"),
    ("benches", "Benchmarks"),
];

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    ignore_dirs: Option<Vec<String>>,
    ignore_files: Option<Vec<String>>,
    ignore_extensions: Option<Vec<String>>,
    summarize_dirs: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    key_dirs: Option<Vec<KeyDirectory>>,
    max_depth: Option<usize>,
    output: Option<PathBuf>,
}

/// The compiled-in rule set, with nothing merged on top.
pub fn builtin_rules() -> TreeRules {
    build_rules(&PresetConfig::default(), None)
}

pub fn builtin_key_dirs() -> Vec<KeyDirectory> {
    KEY_DIRS
        .iter()
        .map(|(path, purpose)| KeyDirectory::new(path, purpose))
        .collect()
}

fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("project_tree")
        .join("presets.toml"))
}

/// A missing file is only an error when the caller named it explicitly.
fn load_presets_file(explicit: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_presets_path()?;
            if !path.exists() {
                return Ok(HashMap::new());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content).context(format!("Failed to parse {:?}", config_path))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

/// Appends `extra` to the built-in names, dropping duplicates but keeping order.
fn merge_names(builtin: &[&str], extra: Option<&[String]>) -> Vec<String> {
    let mut combined: Vec<String> = builtin.iter().map(|s| s.to_string()).collect();
    if let Some(items) = extra {
        combined.extend(items.iter().cloned());
    }
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn build_rules(preset: &PresetConfig, max_depth: Option<usize>) -> TreeRules {
    let to_set = |names: Vec<String>| names.into_iter().collect::<HashSet<_>>();

    let extensions = merge_names(IGNORE_EXTENSIONS, preset.ignore_extensions.as_deref())
        .into_iter()
        .map(|ext| ext.trim_start_matches('.').to_string());

    TreeRules {
        ignore: IgnoreRules {
            dirs: to_set(merge_names(IGNORE_DIRS, preset.ignore_dirs.as_deref())),
            files: to_set(merge_names(IGNORE_FILES, preset.ignore_files.as_deref())),
            extensions: extensions.collect(),
            allowed_hidden_dir: ALLOWED_HIDDEN_DIR.to_string(),
        },
        summarize: SummarizeRules {
            dirs: to_set(merge_names(SUMMARIZE_DIRS, preset.summarize_dirs.as_deref())),
        },
        exclude: merge_names(&[], preset.exclude.as_deref()),
        max_depth: max_depth.or(preset.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
    }
}

fn build_key_dirs(preset: &PresetConfig) -> Vec<KeyDirectory> {
    let mut key_dirs = builtin_key_dirs();
    if let Some(extra) = &preset.key_dirs {
        key_dirs.extend(extra.iter().cloned());
    }
    key_dirs
}

pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let requested_root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let root = fs::canonicalize(&requested_root)
        .context(format!("Failed to resolve project root {:?}", requested_root))?;

    let presets = load_presets_file(cli.config.as_deref())?;

    // Determine preset to use: CLI flag > folder name > None
    let folder_name = root.file_name().and_then(|n| n.to_str());
    let preset_key = cli.preset.as_deref().or(folder_name);
    let preset = match preset_key.and_then(|k| presets.get(k)) {
        Some(preset) => {
            log::info!("Using preset {:?}", preset_key.unwrap_or_default());
            preset.clone()
        }
        None => {
            if let Some(name) = &cli.preset {
                log::warn!("Preset {:?} not found, using built-in rules", name);
            }
            PresetConfig::default()
        }
    };

    let output = cli
        .output
        .or_else(|| preset.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Ok(RuntimeConfig {
        output: root.join(output),
        rules: build_rules(&preset, cli.max_depth),
        key_dirs: build_key_dirs(&preset),
        root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PRESETS: &str = r#"
[webapp]
ignore_dirs = ["storybook-static", "dist"]
ignore_extensions = [".map"]
summarize_dirs = ["locales"]
exclude = ["src/generated/**"]
max_depth = 3
output = "docs/tree.md"

[[webapp.key_dirs]]
path = "src/features"
purpose = "Feature modules"
"#;

    fn write_presets(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("presets.toml");
        fs::write(&path, PRESETS).unwrap();
        path
    }

    #[test]
    fn builtin_rules_match_defaults() {
        let rules = builtin_rules();
        assert_eq!(rules.max_depth, DEFAULT_MAX_DEPTH);
        assert!(rules.ignore.dirs.contains("node_modules"));
        assert!(rules.ignore.files.contains("pnpm-lock.yaml"));
        assert!(rules.ignore.extensions.contains("bak"));
        assert!(rules.summarize.contains("__snapshots__"));
        assert!(rules.exclude.is_empty());
    }

    #[test]
    fn merge_names_appends_and_dedups_in_order() {
        let extra = vec!["b".to_string(), "c".to_string(), "c".to_string()];
        assert_eq!(merge_names(&["a", "b"], Some(&extra)), vec!["a", "b", "c"]);
        assert_eq!(merge_names(&["a"], None), vec!["a"]);
    }

    #[test]
    fn preset_extends_builtins() {
        let presets = parse_presets(PRESETS).unwrap();
        let preset = presets.get("webapp").unwrap();
        let rules = build_rules(preset, None);

        assert!(rules.ignore.dirs.contains("storybook-static"));
        assert!(rules.ignore.dirs.contains("node_modules"));
        assert!(rules.ignore.extensions.contains("map"));
        assert!(rules.summarize.contains("locales"));
        assert_eq!(rules.exclude, vec!["src/generated/**"]);
        assert_eq!(rules.max_depth, 3);

        let key_dirs = build_key_dirs(preset);
        assert_eq!(
            key_dirs.last(),
            Some(&KeyDirectory::new("src/features", "Feature modules"))
        );
        assert_eq!(key_dirs.len(), KEY_DIRS.len() + 1);
    }

    #[test]
    fn cli_max_depth_beats_preset() {
        let presets = parse_presets(PRESETS).unwrap();
        let rules = build_rules(presets.get("webapp").unwrap(), Some(9));
        assert_eq!(rules.max_depth, 9);
    }

    #[test]
    fn malformed_presets_are_rejected() {
        assert!(parse_presets("[webapp]\nmax_depth = \"deep\"\n").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            root: Some(dir.path().to_path_buf()),
            config: Some(dir.path().join("nope.toml")),
            ..Cli::default()
        };
        assert!(resolve_config(cli).is_err());
    }

    #[test]
    fn resolve_selects_preset_by_name() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            root: Some(dir.path().to_path_buf()),
            config: Some(write_presets(&dir)),
            preset: Some("webapp".to_string()),
            ..Cli::default()
        };
        let config = resolve_config(cli).unwrap();

        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.root, root);
        assert_eq!(config.output, root.join("docs/tree.md"));
        assert_eq!(config.rules.max_depth, 3);
    }

    #[test]
    fn resolve_defaults_without_matching_preset() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            root: Some(dir.path().to_path_buf()),
            config: Some(write_presets(&dir)),
            ..Cli::default()
        };
        let config = resolve_config(cli).unwrap();

        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.output, root.join(DEFAULT_OUTPUT));
        assert_eq!(config.rules.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.key_dirs, builtin_key_dirs());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            root: Some(dir.path().join("absent")),
            config: Some(write_presets(&dir)),
            ..Cli::default()
        };
        assert!(resolve_config(cli).is_err());
    }
}
