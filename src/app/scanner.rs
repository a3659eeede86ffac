use crate::app::models::{DirectoryEntry, Listing, RenderedTree, TreeRules};
use anyhow::{Context, Result};
use feruca::{Collator, Locale, Tailoring};
use globset::{Glob, GlobSet, GlobSetBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

pub struct Scanner<'a> {
    root: PathBuf,
    rules: &'a TreeRules,
    exclude_set: GlobSet,
}

impl<'a> Scanner<'a> {
    pub fn new(root: PathBuf, rules: &'a TreeRules) -> Result<Self> {
        Ok(Self {
            root,
            rules,
            exclude_set: build_globset(&rules.exclude)?,
        })
    }

    /// Renders the whole tree below the root, depth-first in display order.
    pub fn scan(&self) -> RenderedTree {
        let mut tree = RenderedTree::default();
        self.render(&self.root, "", 0, &mut tree);
        tree
    }

    fn render(&self, path: &Path, prefix: &str, depth: usize, tree: &mut RenderedTree) {
        if depth > self.rules.max_depth {
            return;
        }

        let entries = match list_entries(path) {
            Listing::Entries(entries) => entries,
            Listing::Unreadable(err) => {
                log::debug!("Cannot read {}: {}", path.display(), err);
                tree.unreadable.push(path.to_path_buf());
                return;
            }
        };

        let visible: Vec<DirectoryEntry> = entries
            .into_iter()
            .filter(|entry| self.is_visible(entry))
            .collect();
        let last = visible.len().saturating_sub(1);

        for (index, entry) in visible.iter().enumerate() {
            let is_last = index == last;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };

            if !entry.is_dir {
                tree.push(depth, format!("{}{}{}", prefix, connector, entry.name));
                continue;
            }

            if self.rules.summarize.contains(&entry.name) {
                let count = count_files(&entry.path);
                tree.push(
                    depth,
                    format!("{}{}{}/ ({} files)", prefix, connector, entry.name, count),
                );
            } else {
                tree.push(depth, format!("{}{}{}/", prefix, connector, entry.name));
                let child_prefix = format!("{}{}", prefix, if is_last { BLANK } else { PIPE });
                self.render(&entry.path, &child_prefix, depth + 1, tree);
            }
        }
    }

    fn is_visible(&self, entry: &DirectoryEntry) -> bool {
        if self.rules.ignore.should_ignore(&entry.name, entry.is_dir) {
            return false;
        }
        if self.exclude_set.is_empty() {
            return true;
        }
        match diff_paths(&entry.path, &self.root) {
            Some(relative) => !self.exclude_set.is_match(&relative),
            None => true,
        }
    }
}

/// Lists a directory with directories first, then files, each group sorted
/// by name. Entries whose metadata cannot be read (e.g. broken symlinks) are
/// dropped.
pub fn list_entries(path: &Path) -> Listing {
    let read_dir = match fs::read_dir(path) {
        Ok(read_dir) => read_dir,
        Err(err) => return Listing::Unreadable(err),
    };

    let mut entries = Vec::new();
    for result in read_dir {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!("Skipping entry in {}: {}", path.display(), err);
                continue;
            }
        };
        let entry_path = entry.path();
        // Follows symlinks, so a link to a directory is listed as one.
        match fs::metadata(&entry_path) {
            Ok(meta) => entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: meta.is_dir(),
                path: entry_path,
            }),
            Err(err) => log::debug!("Skipping {}: {}", entry_path.display(), err),
        }
    }

    let mut collator = name_collator();
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| collator.collate(a.name.as_str(), b.name.as_str()))
    });
    Listing::Entries(entries)
}

/// Root-locale Unicode collation. Punctuation is non-ignorable, so `_app`
/// sorts before `404` and both before letters.
fn name_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Counts files at any depth below `path`, ignoring no entries.
/// Unreadable directories and entries contribute nothing.
pub fn count_files(path: &Path) -> usize {
    let Ok(read_dir) = fs::read_dir(path) else {
        return 0;
    };

    read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let entry_path = entry.path();
            match fs::metadata(&entry_path) {
                Ok(meta) if meta.is_dir() => count_files(&entry_path),
                Ok(_) => 1,
                Err(_) => 0,
            }
        })
        .sum()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).context(format!("Invalid glob pattern: {}", pat))?);
    }
    Ok(builder.build()?)
}
