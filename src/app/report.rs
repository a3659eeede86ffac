use crate::app::formatter::OutputGenerator;
use crate::app::manifest::resolve_project_name;
use crate::app::models::{KeyDirectory, RuntimeConfig};
use crate::app::scanner::Scanner;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Builds the markdown report for one project root.
pub struct ReportAssembler<'a> {
    config: &'a RuntimeConfig,
    scanner: Scanner<'a>,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(config: &'a RuntimeConfig) -> Result<Self> {
        Ok(Self {
            config,
            scanner: Scanner::new(config.root.clone(), &config.rules)?,
        })
    }

    pub fn build_document(&self, date: NaiveDate) -> String {
        let project_name = resolve_project_name(&self.config.root);

        let tree = self.scanner.scan();
        for path in &tree.unreadable {
            log::warn!("⚠️ Could not read {}, listed as empty", path.display());
        }

        let key_dirs = detect_key_directories(&self.config.root, &self.config.key_dirs);

        OutputGenerator::format_document(
            &date.format("%Y-%m-%d").to_string(),
            &project_name,
            &OutputGenerator::generate_tree(&tree),
            &key_dirs,
        )
    }
}

/// Key directories present under `root`, at most one per purpose.
pub fn detect_key_directories<'k>(
    root: &Path,
    key_dirs: &'k [KeyDirectory],
) -> Vec<&'k KeyDirectory> {
    let mut seen_purposes = HashSet::new();
    key_dirs
        .iter()
        .filter(|key_dir| root.join(&key_dir.path).exists())
        .filter(|key_dir| seen_purposes.insert(key_dir.purpose.as_str()))
        .collect()
}

/// Overwrites `path`, creating its parent directories first.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create output directory {:?}", parent))?;
    }
    fs::write(path, text).context(format!("Failed to write report to {:?}", path))?;
    Ok(())
}
