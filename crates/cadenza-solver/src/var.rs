//! Variable handles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an integer variable in a [`crate::space::Space`].
///
/// Handles are plain indices into the space's domain store; two sections of
/// a model "share" a variable by holding the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntVar(u32);

impl IntVar {
    /// Build a handle from a raw store index
    pub fn from_index(index: usize) -> Self {
        IntVar(index as u32)
    }

    /// The raw store index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for IntVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
