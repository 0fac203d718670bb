use std::thread;

use netview_comm::{Communicator, ThreadComm};
use netview_graph::{
    gen_chain_network, EdgeSpec, NetworkDescription, PartitionedNetwork, SubnetworkSpec,
    VertexSpec,
};
use netview_view::{view, AsciiFormat, ViewContext, Viewer};

fn dump(description: &NetworkDescription, size: usize) -> String {
    let members = ThreadComm::group(size);
    let outputs: Vec<Vec<u8>> = thread::scope(|scope| {
        let handles: Vec<_> = members
            .into_iter()
            .map(|comm| {
                scope.spawn(move || {
                    let network =
                        PartitionedNetwork::from_description(description, comm.rank(), comm.size())
                            .expect("partition");
                    let mut out = Vec::new();
                    view(
                        &network,
                        &comm,
                        Viewer::Ascii {
                            out: &mut out,
                            format: AsciiFormat::Default,
                        },
                        &ViewContext::default(),
                    )
                    .expect("view");
                    out
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("rank panicked"))
            .collect()
    });
    assert!(outputs[1..].iter().all(Vec::is_empty), "only the leader writes");
    String::from_utf8(outputs[0].clone()).expect("utf8 output")
}

/// Vertex 1 is shared by both subnetworks, owned by rank 0 and ghosted on
/// rank 1 through edge 1 -> 2.
fn shared_junction() -> NetworkDescription {
    NetworkDescription {
        dim: 2,
        vertices: vec![
            VertexSpec::at(0.0, 0.0),
            VertexSpec::at(1.0, 0.0),
            VertexSpec::at(2.0, 1.0),
            VertexSpec::at(3.0, 1.0),
        ],
        subnetworks: vec![
            SubnetworkSpec::new(vec![0, 1], vec![EdgeSpec::new(0, 1)]),
            SubnetworkSpec::new(
                vec![1, 2, 3],
                vec![EdgeSpec::new(2, 3), EdgeSpec::new(1, 2).owned_by(1)],
            ),
        ],
    }
}

#[test]
fn shared_vertices_are_listed_by_their_owner_only() {
    let output = dump(&shared_junction(), 2);
    let expected = concat!(
        "  NSubnets: 2; NEdges: 3; NVertices: 4; NSharedVertices: 1.\n",
        "  [0] nEdges: 1; nVertices: 2; nSharedVertices: 1\n",
        "     Subnet 0: nEdges 1, nVertices(include shared vertices) 2\n",
        "       edge 0: 0 ----> 1\n",
        "     SharedVertices:\n",
        "       svtx 0: global index 1, subnet[0].1 ---->\n",
        "                                           ----> subnet[1].0\n",
        "  [1] nEdges: 2; nVertices: 3; nSharedVertices: 1\n",
        "     Subnet 1: nEdges 2, nVertices(include shared vertices) 3\n",
        "       edge 1: 2 ----> 3\n",
        "       edge 2: 1 ----> 2\n",
    );
    assert_eq!(output, expected);
    assert_eq!(output.matches("svtx").count(), 1);
    assert_eq!(output.matches("     SharedVertices:\n").count(), 1);
}

#[test]
fn single_rank_dump_lists_every_edge() {
    let description = gen_chain_network(2, 3).expect("chain");
    let output = dump(&description, 1);
    assert!(output.starts_with("  NSubnets: 2; NEdges: 4; NVertices: 5; NSharedVertices: 1.\n"));
    assert_eq!(output.matches("       edge ").count(), 4);
    assert!(output.contains("       svtx 0: global index 2, subnet[0].2 ---->\n"));
}

#[test]
fn repeated_dumps_are_byte_identical() {
    let description = gen_chain_network(4, 5).expect("chain");
    let first = dump(&description, 3);
    let second = dump(&description, 3);
    assert_eq!(first, second);
    let rank_lines: Vec<&str> = first
        .lines()
        .filter(|line| line.starts_with("  ["))
        .collect();
    assert_eq!(rank_lines.len(), 3);
    assert!(rank_lines[0].starts_with("  [0]"));
    assert!(rank_lines[2].starts_with("  [2]"));
}
