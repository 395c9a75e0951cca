// SPDX-License-Identifier: MIT OR Apache-2.0
//! The primary node of a QC graph.

use qc_lod::LodTable;
use serde::{Deserialize, Serialize};

/// Port name of the reference mesh input
pub const PRIMARY_MESH_PORT: &str = "Primary Mesh";

/// Port name of the sequence input
pub const SEQUENCES_PORT: &str = "Sequences";

/// Model-wide settings and the LOD table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    /// Where to create compiled model files, relative to `<game_root>/models/`
    pub model_name: String,
    /// Levels of detail; holds no reference slot
    pub lods: LodTable,
}

impl ModelInfo {
    /// Create model info for `model_name`
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            lods: LodTable::new(),
        }
    }
}
