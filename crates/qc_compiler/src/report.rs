// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON report of resolved LOD operations.

use qc_graph::QcGraph;
use qc_lod::ResolvedLod;
use serde::Serialize;

/// Resolved LODs of one model
#[derive(Debug, Serialize)]
pub struct LodReport<'a> {
    /// Source graph name
    pub graph: &'a str,
    /// Model output name
    pub model: &'a str,
    /// Whether inheritance was applied
    pub inherit: bool,
    /// Effective settings per LOD, index 0 first
    pub lods: Vec<ResolvedLod>,
}

impl<'a> LodReport<'a> {
    /// Resolve every LOD of the graph's primary node
    pub fn build(graph: &'a QcGraph) -> Result<Self, ReportError> {
        let info = graph.model_info().ok_or(ReportError::NoPrimaryNode)?;
        Ok(Self {
            graph: &graph.name,
            model: &info.model_name,
            inherit: info.lods.inherit_enabled(),
            lods: qc_lod::resolve_all(&info.lods)?,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Error when building a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Graph has no model info node
    #[error("Graph has no primary QC node")]
    NoPrimaryNode,

    /// LOD resolution failed
    #[error("LOD resolution failed: {0}")]
    Lod(#[from] qc_lod::ContractViolation),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
