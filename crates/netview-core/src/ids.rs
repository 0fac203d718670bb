use serde::{Deserialize, Serialize};

/// Identity of a process within a cooperating group.
pub type Rank = usize;

/// The coordinating process. It performs every leader-only side effect.
pub const LEADER: Rank = 0;

/// Identifier that is dense and stable across the whole distributed network.
pub type GlobalId = u64;

/// Process-local reference to a vertex (owned or ghost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexHandle(usize);

impl VertexHandle {
    /// Creates a handle from its raw local index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw local index.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// Process-local reference to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeHandle(usize);

impl EdgeHandle {
    /// Creates a handle from its raw local index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw local index.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}
