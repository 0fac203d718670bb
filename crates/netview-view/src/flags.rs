use std::fmt;

use netview_core::ViewOptions;

use crate::config::DisplayTarget;
use crate::overrides::ProcessOverrides;

/// One option understood by the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerFlag {
    /// `-tx`: run without rendering.
    TestExecute,
    /// `-dt <seconds>`.
    Pause(f64),
    /// `-dar`: draw every rank's subplot.
    DrawAllRanks,
    /// `-ncp`: no combined plot.
    NoCombinedPlot,
    /// `-drr <ranks>`.
    DrawRankRange(String),
    /// `-nn`: no vertices.
    NoVertices,
    /// `-nnl -nel`: no vertex or edge labels.
    NoNumbering,
}

impl ViewerFlag {
    /// Command line arguments for this flag.
    pub fn args(&self) -> Vec<String> {
        match self {
            ViewerFlag::TestExecute => vec!["-tx".into()],
            ViewerFlag::Pause(seconds) => vec!["-dt".into(), format!("{seconds:.6}")],
            ViewerFlag::DrawAllRanks => vec!["-dar".into()],
            ViewerFlag::NoCombinedPlot => vec!["-ncp".into()],
            ViewerFlag::DrawRankRange(ranks) => vec!["-drr".into(), ranks.clone()],
            ViewerFlag::NoVertices => vec!["-nn".into()],
            ViewerFlag::NoNumbering => vec!["-nnl".into(), "-nel".into()],
        }
    }
}

impl fmt::Display for ViewerFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args().join(" "))
    }
}

/// Merges persisted options and process-local overrides into the ordered
/// flag list: test mode, pause, rank selection, vertices, numbering.
pub fn merge_flags(
    persisted: &ViewOptions,
    overrides: &ProcessOverrides,
    display: &DisplayTarget,
    group_size: usize,
) -> Vec<ViewerFlag> {
    let mut flags = Vec::new();
    if display.null {
        flags.push(ViewerFlag::TestExecute);
    }
    if display.pause > 0.0 {
        flags.push(ViewerFlag::Pause(display.pause));
    }

    let show_all = overrides
        .show_all_ranks
        .unwrap_or_else(|| persisted.show_all_ranks());
    let range = overrides.rank_range.as_deref();
    if show_all || range.is_some() {
        if show_all && range.is_none() && group_size != 1 {
            flags.push(ViewerFlag::DrawAllRanks);
        }
        if !persisted.show_global() || range.is_some() {
            flags.push(ViewerFlag::NoCombinedPlot);
        }
        if let Some(range) = range {
            flags.push(ViewerFlag::DrawRankRange(range.to_string()));
        } else if let Some(ranks) = persisted.view_ranks().filter(|ranks| !ranks.is_empty()) {
            flags.push(ViewerFlag::DrawRankRange(ranks.to_string()));
        }
    }

    if overrides
        .no_vertices
        .unwrap_or_else(|| !persisted.show_vertices())
    {
        flags.push(ViewerFlag::NoVertices);
    }
    if overrides
        .no_numbering
        .unwrap_or_else(|| !persisted.show_numbering())
    {
        flags.push(ViewerFlag::NoNumbering);
    }
    flags
}

/// Flattens `flags` into command line arguments, order preserved.
pub fn flags_to_args(flags: &[ViewerFlag]) -> Vec<String> {
    flags.iter().flat_map(ViewerFlag::args).collect()
}
