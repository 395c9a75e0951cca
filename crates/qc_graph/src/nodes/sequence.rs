// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation sequence node.

use serde::{Deserialize, Serialize};

/// An animation sequence compiled into the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceInfo {
    /// Sequence name
    pub name: String,
    /// Animation source file
    pub file: String,
    /// Playback frame rate
    pub fps: f32,
    /// Whether the sequence loops
    pub looping: bool,
}

impl SequenceInfo {
    /// Create a sequence at 30 fps
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            fps: 30.0,
            looping: false,
        }
    }

    /// Mark the sequence as looping
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}

impl Default for SequenceInfo {
    fn default() -> Self {
        Self::new("idle", "")
    }
}
