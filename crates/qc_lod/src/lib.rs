// SPDX-License-Identifier: MIT OR Apache-2.0
//! Level-of-detail engine for QC compile scripts.
//!
//! This crate owns the per-model LOD data and the rules that turn it into
//! script directives:
//! - Bone collapse and material replacement operations
//! - LOD levels and the LOD table attached to a model
//! - Lockstep resizing of every LOD-shaped array
//! - Inheritance-aware operation resolution
//!
//! ## Architecture
//!
//! The table manager keeps every LOD array the same length as the declared
//! LOD count. The resolver is pure: it is invoked per LOD on demand and never
//! caches merged state, so any edit is visible on the next call.

pub mod error;
pub mod level;
pub mod ops;
pub mod resolve;
pub mod table;

pub use error::{ContractViolation, Result};
pub use level::{LodLevel, DEFAULT_THRESHOLD, MIN_THRESHOLD};
pub use ops::{BoneOperation, KeyedOperation, MaterialOperation};
pub use resolve::{resolve_all, resolve_bone_ops, resolve_lod, resolve_material_ops, ResolvedLod};
pub use table::{
    check_slot_count, resize_lod_array, set_declared_count_all, LodSlots, LodTable, MAX_LODS,
};
