// SPDX-License-Identifier: MIT OR Apache-2.0
//! QC script emission.
//!
//! Walks the primary node, its reference mesh and connected sequences, and
//! writes one script. LOD operations are resolved per LOD at emission time;
//! if any LOD fails to resolve no script is produced.

use crate::graph::{GraphError, QcGraph};
use crate::nodes::RefMesh;
use qc_lod::{BoneOperation, ContractViolation, MaterialOperation, ResolvedLod};
use std::fmt::{self, Write};

/// Formatting options for emitted scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Write a comment line naming the source graph
    pub header: bool,
    /// Indentation used inside `$lod` blocks
    pub indent: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            header: true,
            indent: "\t".to_string(),
        }
    }
}

/// A name written between double quotes
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Quote `value`, rejecting characters that would end the token or the line
fn quoted<'a>(field: &'static str, value: &'a str) -> Result<Quoted<'a>, CompileError> {
    if value.contains(['"', '\n', '\r']) {
        return Err(CompileError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(Quoted(value))
}

/// Accumulates script lines
struct ScriptWriter<'a> {
    out: String,
    options: &'a ScriptOptions,
    depth: usize,
}

impl<'a> ScriptWriter<'a> {
    fn new(options: &'a ScriptOptions) -> Self {
        Self {
            out: String::new(),
            options,
            depth: 0,
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> Result<(), CompileError> {
        for _ in 0..self.depth {
            self.out.push_str(&self.options.indent);
        }
        self.out.write_fmt(args)?;
        self.out.push('\n');
        Ok(())
    }

    fn open_block(&mut self) -> Result<(), CompileError> {
        self.line(format_args!("{{"))?;
        self.depth += 1;
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), CompileError> {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("}}"))
    }

    fn bone_op(&mut self, op: &BoneOperation) -> Result<(), CompileError> {
        let bone = quoted("bone", &op.bone)?;
        if op.is_collapse() {
            self.line(format_args!("bonetreecollapse {bone}"))
        } else {
            let replacement = quoted("replacement bone", &op.replacement)?;
            self.line(format_args!("replacebone {bone} {replacement}"))
        }
    }

    fn material_op(&mut self, op: &MaterialOperation) -> Result<(), CompileError> {
        let material = quoted("material", op.material.as_deref().unwrap_or_default())?;
        match op.replacement.as_deref() {
            None => self.line(format_args!("removemesh {material}")),
            Some(replacement) => {
                let replacement = quoted("replacement material", replacement)?;
                self.line(format_args!("replacematerial {material} {replacement}"))
            }
        }
    }

    fn lod(&mut self, lod: &ResolvedLod, mesh: &RefMesh) -> Result<(), CompileError> {
        self.line(format_args!("$lod {}", lod.threshold))?;
        self.open_block()?;

        if let (Some(reference), Some(replacement)) = (mesh.reference(), mesh.lod_exportable(lod.index)) {
            let reference = quoted("reference mesh file", reference)?;
            let replacement = quoted("LOD mesh file", replacement)?;
            self.line(format_args!("replacemodel {reference} {replacement}"))?;
        }
        for op in &lod.bone_ops {
            self.bone_op(op)?;
        }
        for op in &lod.material_ops {
            self.material_op(op)?;
        }
        if lod.suppress_flex_animation {
            self.line(format_args!("nofacial"))?;
        }

        self.close_block()
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Compile the graph into QC script text
pub fn compile_script(graph: &QcGraph, options: &ScriptOptions) -> Result<String, CompileError> {
    graph.validate()?;
    let info = graph.model_info().ok_or(CompileError::NoPrimaryNode)?;
    let mesh = graph.primary_mesh().ok_or(CompileError::NoReferenceMesh)?;
    let reference = mesh.reference().ok_or(CompileError::MissingReferenceFile)?;

    // Resolve everything before writing so a bad LOD never yields partial output
    let lods = qc_lod::resolve_all(&info.lods)?;

    let mut writer = ScriptWriter::new(options);
    if options.header {
        let name = quoted("graph name", &graph.name)?;
        writer.line(format_args!("// Generated from QC graph {name}"))?;
    }
    let model_name = quoted("model name", &info.model_name)?;
    writer.line(format_args!("$modelname {model_name}"))?;
    let body = quoted("body name", &mesh.body_name)?;
    let reference = quoted("reference mesh file", reference)?;
    writer.line(format_args!("$model {body} {reference}"))?;

    for lod in &lods {
        writer.lod(lod, mesh)?;
    }

    for sequence in graph.sequences() {
        let name = quoted("sequence name", &sequence.name)?;
        let file = quoted("sequence file", &sequence.file)?;
        let looping = if sequence.looping { " loop" } else { "" };
        writer.line(format_args!("$sequence {name} {file} fps {}{looping}", sequence.fps))?;
    }

    tracing::info!(
        model = %info.model_name,
        lods = lods.len(),
        inherit = info.lods.inherit_enabled(),
        "compiled QC script"
    );
    Ok(writer.finish())
}

/// Error during script emission
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Graph breaks an invariant the editor maintains
    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),

    /// Graph has no model info node
    #[error("Graph has no primary QC node")]
    NoPrimaryNode,

    /// Nothing is connected to the primary mesh input
    #[error("No reference mesh connected to the primary QC node")]
    NoReferenceMesh,

    /// The reference mesh has no source file
    #[error("Reference mesh has no exported file")]
    MissingReferenceFile,

    /// A name cannot be written as a quoted script token
    #[error("{field} {value:?} contains a quote or line break")]
    InvalidName {
        /// Which name was rejected
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// LOD resolution failed
    #[error("LOD resolution failed: {0}")]
    Lod(#[from] ContractViolation),

    /// Formatting failed
    #[error("Formatting error: {0}")]
    Format(#[from] fmt::Error),
}
