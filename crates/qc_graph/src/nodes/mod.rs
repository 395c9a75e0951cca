// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data carried by each kind of QC node.

pub mod model_info;
pub mod ref_mesh;
pub mod sequence;

pub use model_info::ModelInfo;
pub use ref_mesh::{MeshLod, RefMesh};
pub use sequence::SequenceInfo;
