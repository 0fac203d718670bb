use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use log::debug;
use netview_core::{
    CoordinateProvider, EdgeHandle, GlobalId, LocalCounts, NetError, NetworkTotals, NetworkView,
    Occurrence, PartitionProvider, Rank, RankSet, SharedVertexInfo, SubnetworkSlice,
    VertexHandle, ViewOptions, LEADER,
};

use crate::description::NetworkDescription;
use crate::graph_error;

#[derive(Debug, Clone, Default)]
struct LocalSubnetwork {
    vertices: Vec<VertexHandle>,
    edges: Vec<EdgeHandle>,
}

/// One process's slice of a partitioned network.
///
/// Local vertex handles number owned vertices first, in global order, then
/// ghosts, also in global order. Shared-vertex cross references are kept in
/// a separate index keyed by global id.
#[derive(Debug, Clone)]
pub struct PartitionedNetwork {
    rank: Rank,
    size: usize,
    dim: usize,
    vertex_globals: Vec<GlobalId>,
    ghosts: Vec<bool>,
    coords: Vec<f64>,
    edge_globals: Vec<GlobalId>,
    edge_endpoints: Vec<[VertexHandle; 2]>,
    subnetworks: Vec<LocalSubnetwork>,
    shared: Vec<VertexHandle>,
    shared_index: BTreeMap<GlobalId, Vec<Occurrence>>,
    totals: Option<NetworkTotals>,
    view_options: ViewOptions,
}

impl PartitionedNetwork {
    /// Cuts the slice of `description` that `rank` holds in a group of `size`.
    pub fn from_description(
        description: &NetworkDescription,
        rank: Rank,
        size: usize,
    ) -> Result<Self, NetError> {
        description.validate(size)?;
        if rank >= size {
            return Err(graph_error("rank-out-of-range", "rank outside the group")
                .with_context("rank", rank)
                .with_context("size", size));
        }

        let mut local_edges: Vec<(usize, GlobalId, GlobalId, GlobalId)> = Vec::new();
        let mut next_edge: GlobalId = 0;
        for (index, sub) in description.subnetworks.iter().enumerate() {
            for edge in &sub.edges {
                if description.edge_owner(edge, size) == rank {
                    local_edges.push((index, next_edge, edge.from, edge.to));
                }
                next_edge += 1;
            }
        }

        let owned: Vec<GlobalId> = (0..description.vertices.len() as GlobalId)
            .filter(|id| description.vertex_owner(*id, size) == rank)
            .collect();
        let owned_set: BTreeSet<GlobalId> = owned.iter().copied().collect();
        let ghosts: BTreeSet<GlobalId> = local_edges
            .iter()
            .flat_map(|(_, _, from, to)| [*from, *to])
            .filter(|id| !owned_set.contains(id))
            .collect();

        let vertex_globals: Vec<GlobalId> = owned.iter().chain(ghosts.iter()).copied().collect();
        let handles: BTreeMap<GlobalId, VertexHandle> = vertex_globals
            .iter()
            .enumerate()
            .map(|(local, global)| (*global, VertexHandle::from_raw(local)))
            .collect();
        let ghost_flags: Vec<bool> = vertex_globals
            .iter()
            .map(|global| !owned_set.contains(global))
            .collect();
        let coords: Vec<f64> = vertex_globals
            .iter()
            .flat_map(|global| description.vertices[*global as usize].coords.iter().copied())
            .collect();

        let mut subnetworks = vec![LocalSubnetwork::default(); description.subnetworks.len()];
        for (index, sub) in description.subnetworks.iter().enumerate() {
            subnetworks[index].vertices = sub
                .vertices
                .iter()
                .filter_map(|global| handles.get(global).copied())
                .collect();
        }
        let mut edge_globals = Vec::with_capacity(local_edges.len());
        let mut edge_endpoints = Vec::with_capacity(local_edges.len());
        for (local, (index, global, from, to)) in local_edges.into_iter().enumerate() {
            edge_globals.push(global);
            let endpoint = |global: GlobalId| {
                handles.get(&global).copied().ok_or_else(|| {
                    graph_error("missing-endpoint", "edge endpoint has no local handle")
                        .with_context("vertex", global)
                })
            };
            edge_endpoints.push([endpoint(from)?, endpoint(to)?]);
            subnetworks[index].edges.push(EdgeHandle::from_raw(local));
        }

        let shared_ids = description.shared_vertex_ids();
        let shared: Vec<VertexHandle> = vertex_globals
            .iter()
            .enumerate()
            .filter(|(_, global)| shared_ids.binary_search(global).is_ok())
            .map(|(local, _)| VertexHandle::from_raw(local))
            .collect();
        let shared_index: BTreeMap<GlobalId, Vec<Occurrence>> = shared
            .iter()
            .map(|handle| {
                let global = vertex_globals[handle.as_raw()];
                let occurrences = description
                    .subnetworks
                    .iter()
                    .enumerate()
                    .filter_map(|(subnetwork, sub)| {
                        sub.vertices
                            .iter()
                            .position(|id| *id == global)
                            .map(|position| Occurrence {
                                subnetwork,
                                position,
                            })
                    })
                    .collect();
                (global, occurrences)
            })
            .collect();

        let totals = (rank == LEADER).then(|| NetworkTotals {
            subnetworks: description.subnetworks.len(),
            edges: description.edge_count(),
            vertices: description.vertices.len(),
            shared_vertices: shared_ids.len(),
        });

        debug!(
            "rank {rank}/{size}: {} vertices ({} ghosts), {} edges, {} shared",
            vertex_globals.len(),
            ghosts.len(),
            edge_globals.len(),
            shared.len()
        );

        Ok(Self {
            rank,
            size,
            dim: description.dim,
            vertex_globals,
            ghosts: ghost_flags,
            coords,
            edge_globals,
            edge_endpoints,
            subnetworks,
            shared,
            shared_index,
            totals,
            view_options: ViewOptions::default(),
        })
    }

    /// Rank this slice belongs to.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Size of the group the network was partitioned for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Coordinate components per vertex.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Mutable access to the persisted viewing preferences.
    pub fn view_options_mut(&mut self) -> &mut ViewOptions {
        &mut self.view_options
    }

    /// View each rank's sub network individually.
    pub fn view_set_show_ranks(&mut self, show_ranks: bool) {
        self.view_options.set_show_ranks(show_ranks);
    }

    /// Draw the combined plot.
    pub fn view_set_show_global(&mut self, show_global: bool) {
        self.view_options.set_show_global(show_global);
    }

    /// Draw vertices.
    pub fn view_set_show_vertices(&mut self, show_vertices: bool) {
        self.view_options.set_show_vertices(show_vertices);
    }

    /// Label vertices and edges.
    pub fn view_set_show_numbering(&mut self, show_numbering: bool) {
        self.view_options.set_show_numbering(show_numbering);
    }

    /// Draw the given ranks individually. The set stays shared with the caller.
    pub fn view_set_view_ranks(&mut self, ranks: Arc<RankSet>) {
        self.view_options.set_view_ranks(ranks);
    }

    fn vertex_index(&self, vertex: VertexHandle) -> Result<usize, NetError> {
        let index = vertex.as_raw();
        if index < self.vertex_globals.len() {
            Ok(index)
        } else {
            Err(graph_error("invalid-vertex-handle", "vertex handle not known locally")
                .with_context("handle", index)
                .with_context("rank", self.rank))
        }
    }

    fn edge_index(&self, edge: EdgeHandle) -> Result<usize, NetError> {
        let index = edge.as_raw();
        if index < self.edge_globals.len() {
            Ok(index)
        } else {
            Err(graph_error("invalid-edge-handle", "edge handle not known locally")
                .with_context("handle", index)
                .with_context("rank", self.rank))
        }
    }
}

impl PartitionProvider for PartitionedNetwork {
    fn subnetwork_count(&self) -> usize {
        self.subnetworks.len()
    }

    fn subnetwork(&self, index: usize) -> Result<SubnetworkSlice<'_>, NetError> {
        let sub = self.subnetworks.get(index).ok_or_else(|| {
            graph_error("invalid-subnetwork", "subnetwork index out of range")
                .with_context("subnetwork", index)
        })?;
        Ok(SubnetworkSlice {
            vertices: &sub.vertices,
            edges: &sub.edges,
        })
    }

    fn connected_vertices(&self, edge: EdgeHandle) -> Result<[VertexHandle; 2], NetError> {
        Ok(self.edge_endpoints[self.edge_index(edge)?])
    }

    fn global_vertex_index(&self, vertex: VertexHandle) -> Result<GlobalId, NetError> {
        Ok(self.vertex_globals[self.vertex_index(vertex)?])
    }

    fn global_edge_index(&self, edge: EdgeHandle) -> Result<GlobalId, NetError> {
        Ok(self.edge_globals[self.edge_index(edge)?])
    }

    fn is_ghost(&self, vertex: VertexHandle) -> Result<bool, NetError> {
        Ok(self.ghosts[self.vertex_index(vertex)?])
    }

    fn shared_vertices(&self) -> &[VertexHandle] {
        &self.shared
    }

    fn shared_vertex_info(&self, vertex: VertexHandle) -> Result<SharedVertexInfo, NetError> {
        let global = self.global_vertex_index(vertex)?;
        let occurrences = self.shared_index.get(&global).ok_or_else(|| {
            graph_error("not-shared", "vertex is not a shared vertex")
                .with_context("vertex", global)
        })?;
        Ok(SharedVertexInfo {
            global_index: global,
            occurrences: occurrences.clone(),
        })
    }

    fn local_counts(&self) -> LocalCounts {
        LocalCounts {
            edges: self.edge_globals.len(),
            vertices: self.vertex_globals.len(),
        }
    }

    fn network_totals(&self) -> Option<NetworkTotals> {
        self.totals
    }
}

impl CoordinateProvider for PartitionedNetwork {
    fn local_offset(&self, vertex: VertexHandle) -> Result<usize, NetError> {
        Ok(self.vertex_index(vertex)? * self.dim)
    }

    fn values_at(&self, indices: &[usize]) -> Result<Vec<f64>, NetError> {
        indices
            .iter()
            .map(|index| {
                self.coords.get(*index).copied().ok_or_else(|| {
                    graph_error("coordinate-out-of-range", "coordinate index out of range")
                        .with_context("index", index)
                        .with_context("len", self.coords.len())
                })
            })
            .collect()
    }
}

impl NetworkView for PartitionedNetwork {
    fn view_options(&self) -> &ViewOptions {
        &self.view_options
    }
}
