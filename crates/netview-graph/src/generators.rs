use netview_core::{GlobalId, NetError};

use crate::description::{EdgeSpec, NetworkDescription, SubnetworkSpec, VertexSpec};
use crate::graph_error;

/// Generates `subnets` chains of `vertices_per_subnet` vertices each.
///
/// The last vertex of chain `k` is the first vertex of chain `k + 1`, so
/// every junction is a shared vertex. Vertex `g` of chain `k` sits at
/// `(g, k)`.
pub fn gen_chain_network(
    subnets: usize,
    vertices_per_subnet: usize,
) -> Result<NetworkDescription, NetError> {
    if subnets == 0 || vertices_per_subnet < 2 {
        return Err(graph_error(
            "invalid-generator-params",
            "chains need at least one subnetwork of two vertices",
        )
        .with_context("subnets", subnets)
        .with_context("vertices_per_subnet", vertices_per_subnet));
    }
    let stride = (vertices_per_subnet - 1) as GlobalId;
    let total = subnets as GlobalId * stride + 1;
    let mut vertices = Vec::with_capacity(total as usize);
    for id in 0..total {
        let chain = (id / stride).min(subnets as GlobalId - 1);
        vertices.push(VertexSpec::at(id as f64, chain as f64));
    }
    let subnetworks = (0..subnets as GlobalId)
        .map(|chain| {
            let first = chain * stride;
            let ids: Vec<GlobalId> = (first..=first + stride).collect();
            let edges = ids
                .windows(2)
                .map(|pair| EdgeSpec::new(pair[0], pair[1]))
                .collect();
            SubnetworkSpec::new(ids, edges)
        })
        .collect();
    Ok(NetworkDescription {
        dim: 2,
        vertices,
        subnetworks,
    })
}
