use std::collections::BTreeSet;
use std::thread;

use netview_comm::{Communicator, SelfComm, ThreadComm};
use netview_graph::{
    gen_chain_network, EdgeSpec, NetworkDescription, PartitionedNetwork, SubnetworkSpec,
    VertexSpec,
};
use netview_view::{view, write_csv, AsciiFormat, SyncChannel, ViewContext, Viewer};
use proptest::prelude::*;

fn table(description: &NetworkDescription, size: usize) -> String {
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
                            format: AsciiFormat::Csv,
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
    String::from_utf8(outputs[0].clone()).expect("utf8 output")
}

fn two_segments() -> NetworkDescription {
    NetworkDescription {
        dim: 2,
        vertices: vec![
            VertexSpec::at(0.0, 0.0),
            VertexSpec::at(1.0, 0.0),
            VertexSpec::at(2.0, 1.0),
            VertexSpec::at(3.0, 1.5),
        ],
        subnetworks: vec![
            SubnetworkSpec::new(vec![0, 1], vec![EdgeSpec::new(0, 1)]),
            SubnetworkSpec::new(vec![2, 3], vec![EdgeSpec::new(2, 3)]),
        ],
    }
}

#[test]
fn single_process_table_has_four_nodes_and_two_edges() {
    let output = table(&two_segments(), 1);
    let expected = concat!(
        "Type,Rank,ID,X,Y,Z,Name,Color\n",
        "Node,0,0,0.000000,0.000000,0,0\n",
        "Node,0,1,1.000000,0.000000,0,1\n",
        "Edge,0,0,0,1,0,0\n",
        "Node,0,2,2.000000,1.000000,0,2\n",
        "Node,0,3,3.000000,1.500000,0,3\n",
        "Edge,0,1,2,3,0,1\n",
    );
    assert_eq!(output, expected);
}

#[test]
fn write_csv_hands_back_the_sink() {
    let network =
        PartitionedNetwork::from_description(&two_segments(), 0, 1).expect("partition");
    let comm = SelfComm;
    let sink = write_csv(&network, SyncChannel::new(&comm, Vec::new()))
        .expect("csv")
        .expect("leader keeps its sink");
    let text = String::from_utf8(sink).expect("utf8");
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn shared_vertices_are_written_once() {
    let description = gen_chain_network(3, 4).expect("chain");
    let output = table(&description, 2);
    let nodes: Vec<&str> = output.lines().filter(|line| line.starts_with("Node,")).collect();
    assert_eq!(nodes.len(), 10);
    assert_eq!(output.matches("Type,Rank").count(), 1);
}

struct Parsed {
    nodes: Vec<u64>,
    edges: Vec<(u64, u64, u64)>,
}

fn parse(output: &str) -> Parsed {
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Type,Rank,ID,X,Y,Z,Name,Color"));
    let mut parsed = Parsed {
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 7, "row {line}");
        let id: u64 = fields[2].parse().expect("id");
        assert_eq!(fields[6], fields[2]);
        match fields[0] {
            "Node" => parsed.nodes.push(id),
            "Edge" => parsed.edges.push((
                id,
                fields[3].parse().expect("from"),
                fields[4].parse().expect("to"),
            )),
            other => panic!("unexpected row kind {other}"),
        }
    }
    parsed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_vertex_is_written_exactly_once(
        subnets in 1usize..5,
        per in 2usize..6,
        size in 1usize..5,
    ) {
        let description = gen_chain_network(subnets, per).expect("chain");
        let parsed = parse(&table(&description, size));

        let mut nodes = parsed.nodes.clone();
        nodes.sort_unstable();
        let expected: Vec<u64> = (0..description.vertices.len() as u64).collect();
        prop_assert_eq!(nodes, expected);

        let mut edge_ids: Vec<u64> = parsed.edges.iter().map(|(id, _, _)| *id).collect();
        edge_ids.sort_unstable();
        let expected: Vec<u64> = (0..description.edge_count() as u64).collect();
        prop_assert_eq!(edge_ids, expected);

        let known: BTreeSet<u64> = parsed.nodes.iter().copied().collect();
        for (_, from, to) in &parsed.edges {
            prop_assert!(known.contains(from));
            prop_assert!(known.contains(to));
        }
    }
}
