//! Local handle to global identifier translation.

use crate::errors::NetError;
use crate::ids::{EdgeHandle, GlobalId, VertexHandle};
use crate::PartitionProvider;

/// Either kind of process-local handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalHandle {
    /// A vertex handle, owned or ghost.
    Vertex(VertexHandle),
    /// An edge handle.
    Edge(EdgeHandle),
}

impl From<VertexHandle> for LocalHandle {
    fn from(handle: VertexHandle) -> Self {
        LocalHandle::Vertex(handle)
    }
}

impl From<EdgeHandle> for LocalHandle {
    fn from(handle: EdgeHandle) -> Self {
        LocalHandle::Edge(handle)
    }
}

/// Returns the canonical global identifier of a local vertex or edge handle.
///
/// Pure lookup. An error means the caller passed a handle this process never
/// enumerated.
pub fn global_of<P>(provider: &P, handle: impl Into<LocalHandle>) -> Result<GlobalId, NetError>
where
    P: PartitionProvider + ?Sized,
{
    match handle.into() {
        LocalHandle::Vertex(vertex) => provider.global_vertex_index(vertex),
        LocalHandle::Edge(edge) => provider.global_edge_index(edge),
    }
}

/// Translates both endpoints of a local edge, in `from`, `to` order.
pub fn global_endpoints<P>(provider: &P, edge: EdgeHandle) -> Result<[GlobalId; 2], NetError>
where
    P: PartitionProvider + ?Sized,
{
    let [from, to] = provider.connected_vertices(edge)?;
    Ok([global_of(provider, from)?, global_of(provider, to)?])
}
