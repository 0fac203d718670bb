use std::collections::BTreeSet;

use netview_core::{GlobalId, NetError, Rank};
use serde::{Deserialize, Serialize};

use crate::graph_error;

fn default_dim() -> usize {
    2
}

/// A vertex of the global network. Its global id is its position in
/// [`NetworkDescription::vertices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexSpec {
    /// Coordinates, `dim` components.
    pub coords: Vec<f64>,
    /// Owning rank; block distribution by global id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Rank>,
}

impl VertexSpec {
    /// A planar vertex with default ownership.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            coords: vec![x, y],
            owner: None,
        }
    }

    /// Pins the vertex to a rank.
    pub fn owned_by(mut self, rank: Rank) -> Self {
        self.owner = Some(rank);
        self
    }
}

/// A directed edge between two global vertex ids of the same subnetwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Global id of endpoint 0.
    pub from: GlobalId,
    /// Global id of endpoint 1.
    pub to: GlobalId,
    /// Owning rank; the owner of `from` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Rank>,
}

impl EdgeSpec {
    /// An edge with default ownership.
    pub fn new(from: GlobalId, to: GlobalId) -> Self {
        Self {
            from,
            to,
            owner: None,
        }
    }

    /// Pins the edge to a rank.
    pub fn owned_by(mut self, rank: Rank) -> Self {
        self.owner = Some(rank);
        self
    }
}

/// A subnetwork: an ordered vertex list and its edges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubnetworkSpec {
    /// Global ids of the vertices, in subnetwork order.
    pub vertices: Vec<GlobalId>,
    /// Edges; global edge ids follow this order, subnetwork by subnetwork.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl SubnetworkSpec {
    /// Creates a subnetwork from vertex ids and edges.
    pub fn new(vertices: Vec<GlobalId>, edges: Vec<EdgeSpec>) -> Self {
        Self { vertices, edges }
    }
}

/// Whole-network description from which per-rank partitions are cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    /// Number of coordinate components per vertex (2 or 3).
    #[serde(default = "default_dim")]
    pub dim: usize,
    /// Every vertex, indexed by global id.
    pub vertices: Vec<VertexSpec>,
    /// Subnetworks in index order.
    pub subnetworks: Vec<SubnetworkSpec>,
}

impl NetworkDescription {
    /// Number of edges across all subnetworks.
    pub fn edge_count(&self) -> usize {
        self.subnetworks.iter().map(|sub| sub.edges.len()).sum()
    }

    /// Global ids of vertices listed by more than one subnetwork, ascending.
    pub fn shared_vertex_ids(&self) -> Vec<GlobalId> {
        let mut seen = BTreeSet::new();
        let mut shared = BTreeSet::new();
        for sub in &self.subnetworks {
            let unique: BTreeSet<GlobalId> = sub.vertices.iter().copied().collect();
            for id in unique {
                if !seen.insert(id) {
                    shared.insert(id);
                }
            }
        }
        shared.into_iter().collect()
    }

    /// Owner of a vertex for a group of `size` ranks.
    pub fn vertex_owner(&self, id: GlobalId, size: usize) -> Rank {
        let index = id as usize;
        match self.vertices.get(index).and_then(|vertex| vertex.owner) {
            Some(owner) => owner,
            None => block_owner(index, self.vertices.len(), size),
        }
    }

    /// Owner of an edge for a group of `size` ranks.
    pub fn edge_owner(&self, edge: &EdgeSpec, size: usize) -> Rank {
        edge.owner
            .unwrap_or_else(|| self.vertex_owner(edge.from, size))
    }

    /// Checks structural consistency against a group of `size` ranks.
    pub fn validate(&self, size: usize) -> Result<(), NetError> {
        if size == 0 {
            return Err(graph_error("empty-group", "a network needs at least one rank"));
        }
        if !(2..=3).contains(&self.dim) {
            return Err(
                graph_error("coordinate-dimension", "coordinates must have 2 or 3 components")
                    .with_context("dim", self.dim),
            );
        }
        let count = self.vertices.len() as u64;
        for (id, vertex) in self.vertices.iter().enumerate() {
            if vertex.coords.len() != self.dim {
                return Err(graph_error(
                    "coordinate-dimension",
                    "vertex coordinates do not match the network dimension",
                )
                .with_context("vertex", id)
                .with_context("components", vertex.coords.len()));
            }
            if let Some(owner) = vertex.owner.filter(|owner| *owner >= size) {
                return Err(graph_error("owner-out-of-range", "vertex owner outside the group")
                    .with_context("vertex", id)
                    .with_context("owner", owner));
            }
        }

        let mut listed = vec![false; self.vertices.len()];
        for (index, sub) in self.subnetworks.iter().enumerate() {
            let mut members = BTreeSet::new();
            for &id in &sub.vertices {
                if id >= count {
                    return Err(graph_error("vertex-out-of-range", "unknown vertex id")
                        .with_context("subnetwork", index)
                        .with_context("vertex", id));
                }
                if !members.insert(id) {
                    return Err(graph_error("duplicate-vertex", "vertex listed twice")
                        .with_context("subnetwork", index)
                        .with_context("vertex", id));
                }
                listed[id as usize] = true;
            }
            for edge in &sub.edges {
                if !members.contains(&edge.from) || !members.contains(&edge.to) {
                    return Err(graph_error(
                        "endpoint-outside-subnetwork",
                        "edge endpoint is not a vertex of its subnetwork",
                    )
                    .with_context("subnetwork", index)
                    .with_context("from", edge.from)
                    .with_context("to", edge.to));
                }
                if let Some(owner) = edge.owner.filter(|owner| *owner >= size) {
                    return Err(graph_error("owner-out-of-range", "edge owner outside the group")
                        .with_context("subnetwork", index)
                        .with_context("owner", owner));
                }
            }
        }
        if let Some(orphan) = listed.iter().position(|listed| !listed) {
            return Err(
                graph_error("orphan-vertex", "vertex belongs to no subnetwork")
                    .with_context("vertex", orphan),
            );
        }
        Ok(())
    }
}

/// Contiguous block distribution of `count` items over `size` ranks.
pub(crate) fn block_owner(index: usize, count: usize, size: usize) -> Rank {
    if count == 0 {
        return 0;
    }
    (index * size / count).min(size.saturating_sub(1))
}
