use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Names starting with this marker are hidden.
pub const HIDDEN_MARKER: char = '.';

/// Represents the final configuration after merging built-ins, presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    pub rules: TreeRules,
    pub key_dirs: Vec<KeyDirectory>,
}

/// Everything the scanner needs to decide what to show and how deep to go.
#[derive(Debug, Clone)]
pub struct TreeRules {
    pub ignore: IgnoreRules,
    pub summarize: SummarizeRules,
    /// Glob patterns matched against paths relative to the root.
    pub exclude: Vec<String>,
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct IgnoreRules {
    pub dirs: HashSet<String>,
    pub files: HashSet<String>,
    /// Stored without the leading dot.
    pub extensions: HashSet<String>,
    pub allowed_hidden_dir: String,
}

impl IgnoreRules {
    /// Rules are checked in order: hidden directories, ignored directory
    /// names, ignored file names, then ignored file extensions.
    pub fn should_ignore(&self, name: &str, is_dir: bool) -> bool {
        if is_dir {
            if name.starts_with(HIDDEN_MARKER) && name != self.allowed_hidden_dir {
                return true;
            }
            return self.dirs.contains(name);
        }

        if self.files.contains(name) {
            return true;
        }

        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }
}

/// Directories rendered as a file count instead of being expanded.
#[derive(Debug, Clone, Default)]
pub struct SummarizeRules {
    pub dirs: HashSet<String>,
}

impl SummarizeRules {
    pub fn contains(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }
}

/// A conventional project path and what it is for, used in the summary table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyDirectory {
    pub path: String,
    pub purpose: String,
}

impl KeyDirectory {
    pub fn new(path: &str, purpose: &str) -> Self {
        Self {
            path: path.to_string(),
            purpose: purpose.to_string(),
        }
    }
}

/// A single directory entry discovered during the scan.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Result of reading one directory.
#[derive(Debug)]
pub enum Listing {
    Entries(Vec<DirectoryEntry>),
    Unreadable(io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct RenderedTree {
    pub lines: Vec<TreeLine>,
    /// Directories that could not be read and were rendered as empty.
    pub unreadable: Vec<PathBuf>,
}

impl RenderedTree {
    pub fn push(&mut self, depth: usize, text: String) {
        self.lines.push(TreeLine { depth, text });
    }
}
