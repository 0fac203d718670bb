//! Viewers for partitioned networks.
//!
//! Text and CSV output go through a [`SyncChannel`] that merges every rank's
//! contribution in rank order. The draw path writes the CSV into a
//! [`SharedArtifact`], hands it to an external renderer with flags from
//! [`merge_flags`] and removes it afterwards.

pub mod artifact;
mod ascii;
mod channel;
pub mod config;
mod dispatch;
pub mod flags;
mod invoke;
pub mod overrides;
mod tabular;

pub use artifact::{
    decode_artifact_path, encode_artifact_path, ArtifactRequest, SharedArtifact, MAX_PATH_LEN,
};
pub use ascii::write_structure;
pub use channel::SyncChannel;
pub use config::{DisplayMode, DisplayTarget, ViewerConfig};
pub use dispatch::{view, AsciiFormat, ViewContext, Viewer};
pub use flags::{flags_to_args, merge_flags, ViewerFlag};
pub use invoke::ViewerCommand;
pub use overrides::ProcessOverrides;
pub use tabular::{write_csv, CSV_HEADER};
