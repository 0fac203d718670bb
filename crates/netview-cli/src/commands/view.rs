use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

use clap::Args;
use log::debug;
use netview_comm::{Communicator, ThreadComm};
use netview_core::NetError;
use netview_graph::{load_description, NetworkDescription, PartitionedNetwork};
use netview_view::{view, AsciiFormat, ProcessOverrides, ViewContext, Viewer, ViewerConfig};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// JSON network description.
    #[arg(long)]
    pub network: PathBuf,
    /// Number of simulated ranks.
    #[arg(long, default_value_t = 1)]
    pub ranks: usize,
    /// Viewer type: `ascii`, `csv` or `draw`.
    #[arg(long, default_value = "ascii")]
    pub viewer: String,
    /// Viewer configuration (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Draw every rank's subplot.
    #[arg(long)]
    pub all_ranks: bool,
    /// Ranks to draw, passed to the renderer verbatim.
    #[arg(long)]
    pub rank_range: Option<String>,
    /// Do not draw vertices.
    #[arg(long)]
    pub no_vertices: bool,
    /// Do not label vertices and edges.
    #[arg(long)]
    pub no_numbering: bool,
    /// Directory for the shared CSV artifact.
    #[arg(long)]
    pub tmpdir: Option<PathBuf>,
}

impl ViewArgs {
    fn overrides(&self) -> ProcessOverrides {
        ProcessOverrides {
            show_all_ranks: self.all_ranks.then_some(true),
            rank_range: self.rank_range.clone(),
            no_vertices: self.no_vertices.then_some(true),
            no_numbering: self.no_numbering.then_some(true),
            tmpdir: self.tmpdir.clone(),
        }
    }
}

pub fn run(args: &ViewArgs) -> Result<(), Box<dyn Error>> {
    if args.ranks == 0 {
        return Err("--ranks must be at least 1".into());
    }
    let description = load_description(&args.network)?;
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let mut context = ViewContext::from_env(config)?;
    context.overrides = context.overrides.layered(args.overrides());

    let members = ThreadComm::group(args.ranks);
    let results: Vec<Result<(), NetError>> = thread::scope(|scope| {
        let handles: Vec<_> = members
            .into_iter()
            .map(|comm| {
                let description = &description;
                let context = &context;
                scope.spawn(move || run_rank(description, &comm, &args.viewer, context))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(NetError::comm("rank-panic", "rank thread panicked")))
            })
            .collect()
    });
    for result in results {
        result?;
    }
    Ok(())
}

fn run_rank(
    description: &NetworkDescription,
    comm: &ThreadComm,
    viewer: &str,
    context: &ViewContext,
) -> Result<(), NetError> {
    let mut network = PartitionedNetwork::from_description(description, comm.rank(), comm.size())?;
    context.config.apply_view(network.view_options_mut());
    debug!("rank {} viewing with `{viewer}`", comm.rank());

    let mut out: Box<dyn Write> = if comm.is_leader() {
        Box::new(io::stdout().lock())
    } else {
        Box::new(io::sink())
    };
    let viewer = match viewer {
        "ascii" => Viewer::Ascii {
            out: &mut *out,
            format: AsciiFormat::Default,
        },
        "csv" => Viewer::Ascii {
            out: &mut *out,
            format: AsciiFormat::Csv,
        },
        "draw" => Viewer::Draw {
            display: context.config.display_target(),
            out: &mut *out,
        },
        other => Viewer::Unsupported {
            type_name: other.to_string(),
        },
    };
    view(&network, comm, viewer, context)
}
