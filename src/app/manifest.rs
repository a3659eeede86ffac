//! Project name lookup from root-level manifest files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
}

#[derive(Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    name: Option<String>,
}

fn package_json_name(content: &str) -> Option<String> {
    serde_json::from_str::<PackageJson>(content).ok()?.name
}

fn cargo_toml_name(content: &str) -> Option<String> {
    toml::from_str::<CargoManifest>(content).ok()?.package?.name
}

type NameReader = fn(&str) -> Option<String>;

/// Manifests probed in order; the first one declaring a name wins.
const MANIFESTS: &[(&str, NameReader)] = &[
    ("package.json", package_json_name),
    ("Cargo.toml", cargo_toml_name),
];

/// Never fails: falls back to the root's folder name.
pub fn resolve_project_name(root: &Path) -> String {
    for (file_name, read_name) in MANIFESTS {
        let path = root.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                log::debug!("No name from {}: {}", path.display(), err);
                continue;
            }
        };
        match read_name(&content) {
            Some(name) if !name.is_empty() => return name,
            _ => log::debug!("{} declares no usable name", path.display()),
        }
    }

    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(folder: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(folder);
        fs::create_dir(&root).unwrap();
        (dir, root)
    }

    #[test]
    fn falls_back_to_folder_name_without_manifest() {
        let (_dir, root) = project("my-site");
        assert_eq!(resolve_project_name(&root), "my-site");
    }

    #[test]
    fn reads_package_json_name() {
        let (_dir, root) = project("folder");
        fs::write(
            root.join("package.json"),
            r#"{"name": "web-frontend", "version": "1.0.0"}"#,
        )
        .unwrap();
        assert_eq!(resolve_project_name(&root), "web-frontend");
    }

    #[test]
    fn reads_cargo_package_name() {
        let (_dir, root) = project("folder");
        fs::write(
            root.join("Cargo.toml"),
            "[package]\nname = \"tree-tool\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        assert_eq!(resolve_project_name(&root), "tree-tool");
    }

    #[test]
    fn package_json_takes_precedence() {
        let (_dir, root) = project("folder");
        fs::write(root.join("package.json"), r#"{"name": "from-npm"}"#).unwrap();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"from-cargo\"\n").unwrap();
        assert_eq!(resolve_project_name(&root), "from-npm");
    }

    #[test]
    fn malformed_or_nameless_manifests_fall_back() {
        let (_dir, root) = project("fallback");
        fs::write(root.join("package.json"), "{ not json").unwrap();
        fs::write(root.join("Cargo.toml"), "[workspace]\nmembers = []\n").unwrap();
        assert_eq!(resolve_project_name(&root), "fallback");
    }

    #[test]
    fn empty_name_falls_back() {
        let (_dir, root) = project("fallback");
        fs::write(root.join("package.json"), r#"{"name": ""}"#).unwrap();
        assert_eq!(resolve_project_name(&root), "fallback");
    }
}
