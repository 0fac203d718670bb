use std::collections::BTreeSet;
use std::io::Write;

use csv::{Terminator, WriterBuilder};
use netview_comm::{unanimous, Communicator};
use netview_core::{
    global_endpoints, global_of, ErrorInfo, NetError, NetworkView, Rank, VertexHandle,
};

use crate::channel::SyncChannel;

/// Column header of the node/edge table.
pub const CSV_HEADER: [&str; 8] = ["Type", "Rank", "ID", "X", "Y", "Z", "Name", "Color"];

/// Writes the node/edge table through `channel`, then closes it.
///
/// Collective. The leader writes the header; every rank then contributes
/// one `Node` row per vertex it owns and one `Edge` row per local edge, in
/// subnetwork order. Returns the sink on the leader.
pub fn write_csv<N, C, W>(network: &N, mut channel: SyncChannel<'_, C, W>) -> Result<Option<W>, NetError>
where
    N: NetworkView + ?Sized,
    C: Communicator + ?Sized,
    W: Write,
{
    channel.leader_print(|| encode(|writer| writer.write_record(CSV_HEADER)))?;

    let rows = render_rows(network, channel.rank());
    let rows = unanimous(channel.comm(), "render-csv", rows)?;

    channel.push_synchronized()?;
    channel.synchronized_write(&rows)?;
    channel.flush()?;
    channel.pop_synchronized()?;
    channel.close()
}

fn render_rows<N>(network: &N, rank: Rank) -> Result<String, NetError>
where
    N: NetworkView + ?Sized,
{
    let rank = rank.to_string();
    let mut emitted: BTreeSet<VertexHandle> = BTreeSet::new();
    let mut records: Vec<[String; 7]> = Vec::new();

    for index in 0..network.subnetwork_count() {
        let slice = network.subnetwork(index)?;
        for &vertex in slice.vertices {
            if network.is_ghost(vertex)? || !emitted.insert(vertex) {
                continue;
            }
            let id = global_of(network, vertex)?.to_string();
            let [x, y] = planar_coordinates(network, vertex)?;
            records.push([
                "Node".into(),
                rank.clone(),
                id.clone(),
                format!("{x:.6}"),
                format!("{y:.6}"),
                "0".into(),
                id,
            ]);
        }
        for &edge in slice.edges {
            let id = global_of(network, edge)?.to_string();
            let [from, to] = global_endpoints(network, edge)?;
            records.push([
                "Edge".into(),
                rank.clone(),
                id.clone(),
                from.to_string(),
                to.to_string(),
                "0".into(),
                id,
            ]);
        }
    }

    encode(|writer| {
        for record in &records {
            writer.write_record(record)?;
        }
        Ok(())
    })
}

fn planar_coordinates<N>(network: &N, vertex: VertexHandle) -> Result<[f64; 2], NetError>
where
    N: NetworkView + ?Sized,
{
    let offset = network.local_offset(vertex)?;
    let values = network.values_at(&[offset, offset + 1])?;
    match values.as_slice() {
        [x, y] => Ok([*x, *y]),
        _ => Err(NetError::graph(
            "coordinate-count",
            "coordinate storage returned the wrong number of values",
        )
        .with_context("expected", 2)
        .with_context("actual", values.len())),
    }
}

fn encode<F>(write: F) -> Result<String, NetError>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    write(&mut writer).map_err(csv_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| NetError::Serde(ErrorInfo::new("encode-csv", err.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|err| NetError::Serde(ErrorInfo::new("encode-csv", err.to_string())))
}

fn csv_error(err: csv::Error) -> NetError {
    NetError::Serde(ErrorInfo::new("encode-csv", err.to_string()))
}
