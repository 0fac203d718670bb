use std::fmt::Write as _;
use std::io::Write;

use netview_comm::{unanimous, Communicator};
use netview_core::{global_endpoints, global_of, NetError, PartitionProvider, Rank};

use crate::channel::SyncChannel;

/// Writes the human readable structure dump through `channel`.
///
/// Collective. The leader prints the network totals, then every rank
/// contributes its counts, per-subnetwork edges and the shared vertices it
/// owns; the contributions appear in rank order.
pub fn write_structure<N, C, W>(
    network: &N,
    channel: &mut SyncChannel<'_, C, W>,
) -> Result<(), NetError>
where
    N: PartitionProvider + ?Sized,
    C: Communicator + ?Sized,
    W: Write,
{
    channel.leader_print(|| {
        let totals = network.network_totals().ok_or_else(|| {
            NetError::graph("missing-totals", "network totals are not available on the leader")
        })?;
        Ok(format!(
            "  NSubnets: {}; NEdges: {}; NVertices: {}; NSharedVertices: {}.\n",
            totals.subnetworks, totals.edges, totals.vertices, totals.shared_vertices
        ))
    })?;

    let rank = channel.rank();
    let body = render_rank(network, rank);
    let body = unanimous(channel.comm(), "render-structure", body)?;

    channel.push_synchronized()?;
    channel.synchronized_write(&body)?;
    channel.flush()?;
    channel.pop_synchronized()
}

fn render_rank<N>(network: &N, rank: Rank) -> Result<String, NetError>
where
    N: PartitionProvider + ?Sized,
{
    let counts = network.local_counts();
    let shared = network.shared_vertices();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  [{rank}] nEdges: {}; nVertices: {}; nSharedVertices: {}",
        counts.edges,
        counts.vertices,
        shared.len()
    );

    for index in 0..network.subnetwork_count() {
        let slice = network.subnetwork(index)?;
        if slice.edges.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "     Subnet {index}: nEdges {}, nVertices(include shared vertices) {}",
            slice.edges.len(),
            slice.vertices.len()
        );
        for &edge in slice.edges {
            let id = global_of(network, edge)?;
            let [from, to] = global_endpoints(network, edge)?;
            let _ = writeln!(out, "       edge {id}: {from} ----> {to}");
        }
    }

    let mut owned_shared = Vec::with_capacity(shared.len());
    for (position, &vertex) in shared.iter().enumerate() {
        if !network.is_ghost(vertex)? {
            owned_shared.push((position, vertex));
        }
    }
    if !owned_shared.is_empty() {
        out.push_str("     SharedVertices:\n");
        for (position, vertex) in owned_shared {
            let info = network.shared_vertex_info(vertex)?;
            let mut occurrences = info.occurrences.iter();
            if let Some(first) = occurrences.next() {
                let _ = writeln!(
                    out,
                    "       svtx {position}: global index {}, subnet[{}].{} ---->",
                    info.global_index, first.subnetwork, first.position
                );
            }
            for next in occurrences {
                let _ = writeln!(
                    out,
                    "{:>48} subnet[{}].{}",
                    "---->", next.subnetwork, next.position
                );
            }
        }
    }
    Ok(out)
}
