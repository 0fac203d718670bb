//! Persisted viewing preferences and rank sets.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::ids::Rank;

/// Ordered, duplicate-free set of process ranks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankSet(Box<[Rank]>);

impl RankSet {
    /// Builds a set from arbitrary ranks, sorting and removing duplicates.
    pub fn from_ranks(ranks: impl IntoIterator<Item = Rank>) -> Self {
        let set: BTreeSet<Rank> = ranks.into_iter().collect();
        Self(set.into_iter().collect())
    }

    /// Ranks in ascending order.
    pub fn as_slice(&self) -> &[Rank] {
        &self.0
    }

    /// Number of ranks in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no ranks.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Comma-joined, without spaces.
impl fmt::Display for RankSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rank) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{rank}")?;
        }
        Ok(())
    }
}

/// Persisted viewing preferences owned by a network object.
///
/// Created with defaults alongside the network and changed only through the
/// setters. The rank set is shared: the caller may keep its own handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    show_all_ranks: bool,
    show_global: bool,
    show_vertices: bool,
    show_numbering: bool,
    view_ranks: Option<Arc<RankSet>>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_all_ranks: false,
            show_global: true,
            show_vertices: true,
            show_numbering: true,
            view_ranks: None,
        }
    }
}

impl ViewOptions {
    /// View each rank's sub network individually.
    pub fn set_show_ranks(&mut self, show_ranks: bool) {
        self.show_all_ranks = show_ranks;
    }

    /// Whether to draw the combined (global) plot.
    pub fn set_show_global(&mut self, show_global: bool) {
        self.show_global = show_global;
    }

    /// Whether to draw vertices.
    pub fn set_show_vertices(&mut self, show_vertices: bool) {
        self.show_vertices = show_vertices;
    }

    /// Whether to label vertices and edges with their numbers.
    pub fn set_show_numbering(&mut self, show_numbering: bool) {
        self.show_numbering = show_numbering;
    }

    /// Replaces the set of ranks drawn individually.
    pub fn set_view_ranks(&mut self, ranks: Arc<RankSet>) {
        self.view_ranks = Some(ranks);
    }

    /// Returns whether every rank is viewed individually.
    pub fn show_all_ranks(&self) -> bool {
        self.show_all_ranks
    }

    /// Returns whether the combined plot is drawn.
    pub fn show_global(&self) -> bool {
        self.show_global
    }

    /// Returns whether vertices are drawn.
    pub fn show_vertices(&self) -> bool {
        self.show_vertices
    }

    /// Returns whether numbering is drawn.
    pub fn show_numbering(&self) -> bool {
        self.show_numbering
    }

    /// Returns the ranks viewed individually, if any were set.
    pub fn view_ranks(&self) -> Option<&Arc<RankSet>> {
        self.view_ranks.as_ref()
    }
}
