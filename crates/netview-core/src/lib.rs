#![deny(missing_docs)]
#![doc = "Core identifiers, errors and provider contracts for viewing partitioned networks."]

use serde::{Deserialize, Serialize};

pub mod errors;
mod ids;
pub mod options;
pub mod translate;

pub use errors::{ErrorInfo, NetError};
pub use ids::{EdgeHandle, GlobalId, Rank, VertexHandle, LEADER};
pub use options::{RankSet, ViewOptions};
pub use translate::{global_endpoints, global_of, LocalHandle};

/// Local vertices and edges of one subnetwork on this process.
#[derive(Debug, Clone, Copy)]
pub struct SubnetworkSlice<'a> {
    /// Local vertex handles, including shared and ghost vertices.
    pub vertices: &'a [VertexHandle],
    /// Local edge handles owned by this process.
    pub edges: &'a [EdgeHandle],
}

/// One place where a shared vertex appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Occurrence {
    /// Subnetwork index.
    pub subnetwork: usize,
    /// Position of the vertex within that subnetwork's vertex list.
    pub position: usize,
}

/// Cross-reference of a vertex that appears in more than one subnetwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedVertexInfo {
    /// Global index of the shared vertex.
    pub global_index: GlobalId,
    /// Every (subnetwork, position) pair, in subnetwork order.
    pub occurrences: Vec<Occurrence>,
}

/// Counts visible to a single process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalCounts {
    /// Edges owned by this process.
    pub edges: usize,
    /// Vertices enumerable on this process, ghosts included.
    pub vertices: usize,
}

/// Whole-network counts, known only to the coordinating process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkTotals {
    /// Number of subnetworks.
    pub subnetworks: usize,
    /// Total edges across all processes.
    pub edges: usize,
    /// Total vertices across all processes.
    pub vertices: usize,
    /// Total shared vertices.
    pub shared_vertices: usize,
}

/// Graph storage and partitioning engine as seen from one process.
pub trait PartitionProvider {
    /// Number of subnetworks in the whole network.
    fn subnetwork_count(&self) -> usize;

    /// Local vertices and edges of subnetwork `index`.
    fn subnetwork(&self, index: usize) -> Result<SubnetworkSlice<'_>, NetError>;

    /// Endpoints of a local edge; element 0 is the `from` vertex.
    fn connected_vertices(&self, edge: EdgeHandle) -> Result<[VertexHandle; 2], NetError>;

    /// Global index of a local (owned or ghost) vertex.
    fn global_vertex_index(&self, vertex: VertexHandle) -> Result<GlobalId, NetError>;

    /// Global index of a local edge.
    fn global_edge_index(&self, edge: EdgeHandle) -> Result<GlobalId, NetError>;

    /// Whether the vertex is a read-only replica owned by another process.
    fn is_ghost(&self, vertex: VertexHandle) -> Result<bool, NetError>;

    /// Local shared vertices, ghosts included.
    fn shared_vertices(&self) -> &[VertexHandle];

    /// Cross-reference for a local shared vertex.
    fn shared_vertex_info(&self, vertex: VertexHandle) -> Result<SharedVertexInfo, NetError>;

    /// Counts for this process.
    fn local_counts(&self) -> LocalCounts;

    /// Whole-network counts; `None` on every process but the coordinator.
    fn network_totals(&self) -> Option<NetworkTotals>;
}

/// Coordinate field storage.
pub trait CoordinateProvider {
    /// Offset of the vertex's first coordinate component in local storage.
    fn local_offset(&self, vertex: VertexHandle) -> Result<usize, NetError>;

    /// Scalar values at the given storage indices.
    fn values_at(&self, indices: &[usize]) -> Result<Vec<f64>, NetError>;
}

/// A network object that can be viewed: partition, coordinates and the
/// persisted viewing preferences it owns.
pub trait NetworkView: PartitionProvider + CoordinateProvider {
    /// Persisted viewing preferences.
    fn view_options(&self) -> &ViewOptions;
}
