use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Write a markdown directory tree of a project for AI context"
)]
pub struct Cli {
    /// Project root to scan (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output file, relative to the project root unless absolute
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Deepest nesting level whose contents are listed
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Use a predefined set of rules from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Read presets from this file instead of ~/.config/project_tree/presets.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
