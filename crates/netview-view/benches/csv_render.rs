use criterion::{criterion_group, criterion_main, Criterion};
use netview_comm::SelfComm;
use netview_graph::{gen_chain_network, PartitionedNetwork};
use netview_view::{write_csv, SyncChannel};

fn bench_csv(c: &mut Criterion) {
    let description = gen_chain_network(64, 128).expect("chain");
    let network = PartitionedNetwork::from_description(&description, 0, 1).expect("partition");
    let comm = SelfComm;
    c.bench_function("csv_render_chain_64x128", |b| {
        b.iter(|| {
            let sink = Vec::with_capacity(1 << 20);
            let _ = write_csv(&network, SyncChannel::new(&comm, sink)).expect("csv");
        });
    });
}

criterion_group!(benches, bench_csv);
criterion_main!(benches);
