// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line arguments.

use crate::settings::CompilerSettings;
use clap::Parser;
use qc_graph::GraphEdit;
use std::path::PathBuf;

/// QC compiler command-line arguments.
///
/// CLI values override settings loaded from `qc_compiler.ron`.
#[derive(Parser, Debug)]
#[command(name = "qc_compiler", version, about = "Compile a QC node graph into a QC script")]
pub struct CliArgs {
    /// Graph file (RON).
    pub graph: PathBuf,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the number of LODs (0-8).
    #[arg(long)]
    pub lods: Option<usize>,

    /// Disable LOD inheritance.
    #[arg(long)]
    pub no_inherit: bool,

    /// Print the resolved LOD operations as JSON instead of a script.
    #[arg(long)]
    pub report: bool,

    /// Path to the settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Graph edits requested on the command line, in application order
    pub fn graph_edits(&self) -> Vec<GraphEdit> {
        let mut edits = Vec::new();
        if let Some(count) = self.lods {
            edits.push(GraphEdit::SetLodCount(count));
        }
        if self.no_inherit {
            edits.push(GraphEdit::SetInherit(false));
        }
        edits
    }
}

impl CompilerSettings {
    /// Apply CLI overrides to loaded settings
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_edits() {
        let args = CliArgs::parse_from(["qc_compiler", "model.ron", "--lods", "3", "--no-inherit"]);
        assert_eq!(args.graph, PathBuf::from("model.ron"));
        assert_eq!(
            args.graph_edits(),
            vec![GraphEdit::SetLodCount(3), GraphEdit::SetInherit(false)]
        );

        let plain = CliArgs::parse_from(["qc_compiler", "model.ron"]);
        assert!(plain.graph_edits().is_empty());
        assert!(!plain.report);
    }

    #[test]
    fn test_cli_override() {
        let args = CliArgs::parse_from(["qc_compiler", "m.ron", "--log-level", "trace"]);
        let mut settings = CompilerSettings::default();
        settings.apply_cli_overrides(&args);
        assert_eq!(settings.log_level, "trace");
    }
}
