use crate::app::models::{KeyDirectory, RenderedTree};

pub struct OutputGenerator;

impl OutputGenerator {
    /// Joins the rendered lines; every line, including the last, ends in `\n`.
    pub fn generate_tree(tree: &RenderedTree) -> String {
        let mut output = String::new();
        for line in &tree.lines {
            output.push_str(&line.text);
            output.push('\n');
        }
        output
    }

    pub fn format_document(
        date: &str,
        project_name: &str,
        tree: &str,
        key_dirs: &[&KeyDirectory],
    ) -> String {
        let mut out = String::from("# Project Directory Tree\n\n");
        out.push_str(&format!("> Auto-generated on {}\n", date));
        out.push_str("> Run `project_tree` to update\n\n");

        out.push_str("```\n");
        out.push_str(&format!("{}/\n", project_name));
        out.push_str(tree);
        out.push_str("```\n\n");

        out.push_str("## Key Directories\n\n");
        out.push_str("| Directory | Purpose |\n");
        out.push_str("|-----------|---------|\n");
        for key_dir in key_dirs {
            out.push_str(&format!("| `/{}/` | {} |\n", key_dir.path, key_dir.purpose));
        }

        out
    }
}
