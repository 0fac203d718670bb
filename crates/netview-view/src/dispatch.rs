use std::io::Write;
use std::path::PathBuf;

use log::debug;
use netview_comm::{default_tmp_dir, unanimous, Communicator};
use netview_core::{NetError, NetworkView};

use crate::artifact::{ArtifactRequest, SharedArtifact};
use crate::ascii::write_structure;
use crate::channel::SyncChannel;
use crate::config::{DisplayTarget, ViewerConfig};
use crate::flags::merge_flags;
use crate::invoke::ViewerCommand;
use crate::overrides::ProcessOverrides;
use crate::tabular::write_csv;

/// Format of a text viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsciiFormat {
    /// Structure dump.
    #[default]
    Default,
    /// Node/edge table.
    Csv,
}

/// Output sink requested by the caller.
pub enum Viewer<'a, W: ?Sized> {
    /// Text written to `out` on the leader.
    Ascii {
        /// Leader sink.
        out: &'a mut W,
        /// What to write.
        format: AsciiFormat,
    },
    /// External renderer; its relayed output goes to `out` on the leader.
    Draw {
        /// Display the renderer should use.
        display: DisplayTarget,
        /// Leader sink for the renderer's output.
        out: &'a mut W,
    },
    /// Anything this crate cannot render.
    Unsupported {
        /// Name reported in the error.
        type_name: String,
    },
}

/// Everything a view call needs besides the network and the group.
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// Renderer configuration.
    pub config: ViewerConfig,
    /// Process-local overrides.
    pub overrides: ProcessOverrides,
    /// Default temporary directory, probed for sharing.
    pub shared_dir: PathBuf,
}

/// Default configuration, no overrides, and the default temporary
/// directory.
impl Default for ViewContext {
    fn default() -> Self {
        Self {
            config: ViewerConfig::default(),
            overrides: ProcessOverrides::default(),
            shared_dir: default_tmp_dir(),
        }
    }
}

impl ViewContext {
    /// Context with overrides from the environment and the default
    /// temporary directory.
    pub fn from_env(config: ViewerConfig) -> Result<Self, NetError> {
        Ok(Self {
            config,
            overrides: ProcessOverrides::from_env()?,
            shared_dir: default_tmp_dir(),
        })
    }
}

/// Views `network` on every rank of `comm`. Collective.
pub fn view<N, C, W>(
    network: &N,
    comm: &C,
    viewer: Viewer<'_, W>,
    context: &ViewContext,
) -> Result<(), NetError>
where
    N: NetworkView + ?Sized,
    C: Communicator + ?Sized,
    W: Write + ?Sized,
{
    match viewer {
        Viewer::Ascii {
            out,
            format: AsciiFormat::Csv,
        } => {
            write_csv(network, SyncChannel::new(comm, out))?;
            Ok(())
        }
        Viewer::Ascii {
            out,
            format: AsciiFormat::Default,
        } => {
            let mut channel = SyncChannel::new(comm, out);
            write_structure(network, &mut channel)?;
            channel.close()?;
            Ok(())
        }
        Viewer::Draw { display, out } => view_draw(network, comm, display, out, context),
        Viewer::Unsupported { type_name } => Err(NetError::config(
            "unsupported-viewer",
            format!("viewer type {type_name} not supported"),
        )
        .with_context("viewer", type_name)),
    }
}

fn view_draw<N, C, W>(
    network: &N,
    comm: &C,
    display: DisplayTarget,
    out: &mut W,
    context: &ViewContext,
) -> Result<(), NetError>
where
    N: NetworkView + ?Sized,
    C: Communicator + ?Sized,
    W: Write + ?Sized,
{
    let mut artifact = SharedArtifact::create(
        comm,
        ArtifactRequest {
            tmpdir_override: context.overrides.tmpdir.as_deref(),
            shared_dir: &context.shared_dir,
        },
    )?;
    let outcome = draw_through(network, comm, display, out, context, &mut artifact);
    let cleanup = artifact.remove(comm);
    outcome.and(cleanup)
}

fn draw_through<N, C, W>(
    network: &N,
    comm: &C,
    display: DisplayTarget,
    out: &mut W,
    context: &ViewContext,
    artifact: &mut SharedArtifact,
) -> Result<(), NetError>
where
    N: NetworkView + ?Sized,
    C: Communicator + ?Sized,
    W: Write + ?Sized,
{
    write_csv(network, SyncChannel::with_sink(comm, artifact.take_writer()))?;
    comm.barrier()?;

    let flags = merge_flags(
        network.view_options(),
        &context.overrides,
        &display,
        comm.size(),
    );
    let script = unanimous(comm, "script-path", context.config.resolve_script())?;
    let command = ViewerCommand::new(
        context.config.python.clone(),
        script,
        &flags,
        artifact.path(),
    );
    debug!("rank {} reached viewer launch", comm.rank());
    command.run(comm, out)
}
