// SPDX-License-Identifier: MIT OR Apache-2.0
//! QC node graph for model compile scripts.
//!
//! This crate models the graph a user builds to describe a model export:
//! - A primary QC node holding model settings and the LOD table
//! - Reference mesh nodes holding the mesh used at each LOD
//! - Sequence nodes for animations
//!
//! ## Architecture
//!
//! The graph stores typed nodes and validated connections. Edits to LOD data
//! are explicit [`GraphEdit`] values, recorded by [`EditSession`] for
//! undo/redo. [`compile_script`] resolves every LOD and writes the script.

pub mod compile;
pub mod connection;
pub mod edit;
pub mod graph;
pub mod history;
pub mod node;
pub mod nodes;
pub mod port;

pub use compile::{compile_script, CompileError, ScriptOptions};
pub use connection::{Connection, ConnectionId, Endpoint};
pub use edit::{EditError, GraphEdit};
pub use graph::{ConnectionError, GraphError, QcGraph};
pub use history::{EditSession, History, HistoryError};
pub use node::{Node, NodeId, NodeKind};
pub use nodes::{MeshLod, ModelInfo, RefMesh, SequenceInfo};
pub use port::{Port, PortDirection, PortId, PortType};
