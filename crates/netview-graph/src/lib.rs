#![deny(missing_docs)]

//! Reference partition provider: a serialisable whole-network description
//! cut into per-rank slices with owned, ghost and shared vertices.

mod description;
mod generators;
mod partition;
mod serialization;

use netview_core::NetError;

pub use description::{EdgeSpec, NetworkDescription, SubnetworkSpec, VertexSpec};
pub use generators::gen_chain_network;
pub use partition::PartitionedNetwork;
pub use serialization::{description_from_json, description_to_json, load_description};

pub(crate) fn graph_error(code: impl Into<String>, message: impl Into<String>) -> NetError {
    NetError::graph(code, message)
}
