// SPDX-License-Identifier: MIT OR Apache-2.0
//! One compiler run: read a graph, apply overrides, write the result.

use crate::cli::CliArgs;
use crate::report::{LodReport, ReportError};
use crate::settings::CompilerSettings;
use qc_graph::{compile_script, CompileError, EditSession, GraphError, HistoryError, QcGraph};
use std::path::Path;

/// Error from a compiler run
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Graph or output file IO failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Graph file is not a valid graph
    #[error("Invalid graph file: {0}")]
    Graph(#[from] GraphError),

    /// A command-line override was rejected
    #[error("Override rejected: {0}")]
    Edit(#[from] HistoryError),

    /// Script emission failed
    #[error("Compile failed: {0}")]
    Compile(#[from] CompileError),

    /// Report generation failed
    #[error("Report failed: {0}")]
    Report(#[from] ReportError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |source| AppError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Load the graph named on the command line and apply CLI overrides
pub fn load_graph(args: &CliArgs) -> Result<QcGraph, AppError> {
    let source = std::fs::read_to_string(&args.graph).map_err(io_error(&args.graph))?;
    let graph = QcGraph::from_ron(&source)?;
    tracing::debug!(path = %args.graph.display(), nodes = graph.node_count(), "loaded graph");

    let mut session = EditSession::new(graph);
    for edit in args.graph_edits() {
        session.apply(&edit)?;
    }
    Ok(session.into_graph())
}

/// Produce the requested output text for a graph
pub fn render(graph: &QcGraph, args: &CliArgs, settings: &CompilerSettings) -> Result<String, AppError> {
    if args.report {
        Ok(LodReport::build(graph)?.to_json()?)
    } else {
        Ok(compile_script(graph, &settings.script_options())?)
    }
}

/// Run the compiler once
pub fn run(args: &CliArgs, settings: &CompilerSettings) -> Result<(), AppError> {
    let graph = load_graph(args)?;
    let text = render(&graph, args, settings)?;

    match &args.output {
        Some(output) => {
            let path = settings.output_path(output);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
            std::fs::write(&path, text).map_err(io_error(&path))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use qc_graph::nodes::model_info::PRIMARY_MESH_PORT;
    use qc_graph::{GraphEdit, ModelInfo, Node, RefMesh};
    use qc_lod::BoneOperation;
    use std::ffi::OsStr;

    fn write_graph(dir: &Path) -> std::path::PathBuf {
        let mut graph = QcGraph::new("crate");
        let primary = Node::model_info(ModelInfo::new("props/crate.mdl"));
        let mesh_in = primary.input_endpoint(PRIMARY_MESH_PORT).unwrap();
        let mesh = Node::ref_mesh(RefMesh::new("body", "crate_ref.smd"));
        let mesh_out = mesh.output_endpoint().unwrap();
        graph.add_node(primary).unwrap();
        graph.add_node(mesh).unwrap();
        graph.connect(mesh_out, mesh_in).unwrap();
        GraphEdit::SetLodCount(1).apply(&mut graph).unwrap();
        GraphEdit::AddBoneOp { lod: 0, op: BoneOperation::collapse("lid") }
            .apply(&mut graph)
            .unwrap();

        let path = dir.join("crate.ron");
        std::fs::write(&path, graph.to_ron().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_run_writes_script() {
        let dir = tempfile::tempdir().unwrap();
        let graph_path = write_graph(dir.path());
        let output = dir.path().join("out/crate.qc");

        let args = CliArgs::parse_from([
            OsStr::new("qc_compiler"),
            graph_path.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
        ]);
        run(&args, &CompilerSettings::default()).unwrap();

        let script = std::fs::read_to_string(&output).unwrap();
        assert!(script.contains("$modelname \"props/crate.mdl\""));
        assert!(script.contains("\tbonetreecollapse \"lid\""));
    }

    #[test]
    fn test_overrides_applied() {
        let dir = tempfile::tempdir().unwrap();
        let graph_path = write_graph(dir.path());
        let args = CliArgs::parse_from([
            OsStr::new("qc_compiler"),
            graph_path.as_os_str(),
            OsStr::new("--lods"),
            OsStr::new("3"),
            OsStr::new("--report"),
        ]);

        let graph = load_graph(&args).unwrap();
        assert_eq!(graph.lod_count(), 3);
        assert_eq!(graph.primary_mesh().unwrap().lods().len(), 4);

        let json = render(&graph, &args, &CompilerSettings::default()).unwrap();
        assert!(json.contains("\"lid\""));
    }

    #[test]
    fn test_bad_override_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let graph_path = write_graph(dir.path());
        let args = CliArgs::parse_from([
            OsStr::new("qc_compiler"),
            graph_path.as_os_str(),
            OsStr::new("--lods"),
            OsStr::new("9"),
        ]);
        assert!(matches!(load_graph(&args), Err(AppError::Edit(_))));
    }

    #[test]
    fn test_tampered_graph_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let graph_path = write_graph(dir.path());
        let source = std::fs::read_to_string(&graph_path).unwrap();
        std::fs::write(&graph_path, source.replace("declared_count: 1", "declared_count: 20")).unwrap();

        let args = CliArgs::parse_from([OsStr::new("qc_compiler"), graph_path.as_os_str()]);
        assert!(matches!(load_graph(&args), Err(AppError::Graph(_))));
    }

    #[test]
    fn test_missing_graph_file() {
        let args = CliArgs::parse_from(["qc_compiler", "/nonexistent/graph.ron"]);
        assert!(matches!(load_graph(&args), Err(AppError::Io { .. })));
    }
}
