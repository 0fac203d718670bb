use std::env;
use std::path::PathBuf;

use netview_core::{ErrorInfo, NetError};

/// Environment variable: view every rank individually.
pub const ENV_ALL_RANKS: &str = "NETVIEW_VIEW_ALL_RANKS";
/// Environment variable: explicit rank range passed to the renderer.
pub const ENV_RANK_RANGE: &str = "NETVIEW_VIEW_RANK_RANGE";
/// Environment variable: suppress vertices.
pub const ENV_NO_VERTICES: &str = "NETVIEW_VIEW_NO_VERTICES";
/// Environment variable: suppress numbering.
pub const ENV_NO_NUMBERING: &str = "NETVIEW_VIEW_NO_NUMBERING";
/// Environment variable: artifact directory override.
pub const ENV_TMPDIR: &str = "NETVIEW_VIEW_TMPDIR";

/// Process-local options read at view time. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOverrides {
    /// Draw every rank's subplot.
    pub show_all_ranks: Option<bool>,
    /// Rank range, passed to the renderer verbatim.
    pub rank_range: Option<String>,
    /// Suppress vertices.
    pub no_vertices: Option<bool>,
    /// Suppress vertex and edge labels.
    pub no_numbering: Option<bool>,
    /// Directory for the shared artifact.
    pub tmpdir: Option<PathBuf>,
}

impl ProcessOverrides {
    /// Reads the overrides from the process environment.
    pub fn from_env() -> Result<Self, NetError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the overrides through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| get(key).map(|value| parse_bool(key, &value)).transpose();
        Ok(Self {
            show_all_ranks: flag(ENV_ALL_RANKS)?,
            rank_range: get(ENV_RANK_RANGE),
            no_vertices: flag(ENV_NO_VERTICES)?,
            no_numbering: flag(ENV_NO_NUMBERING)?,
            tmpdir: get(ENV_TMPDIR).map(PathBuf::from),
        })
    }

    /// Layers `top` over `self`; every option `top` sets wins.
    pub fn layered(self, top: ProcessOverrides) -> Self {
        Self {
            show_all_ranks: top.show_all_ranks.or(self.show_all_ranks),
            rank_range: top.rank_range.or(self.rank_range),
            no_vertices: top.no_vertices.or(self.no_vertices),
            no_numbering: top.no_numbering.or(self.no_numbering),
            tmpdir: top.tmpdir.or(self.tmpdir),
        }
    }
}

/// Parses `1/0/true/false/yes/no/on/off`, case-insensitively.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, NetError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NetError::Config(
            ErrorInfo::new("bad-option", "expected a boolean value")
                .with_context("option", key)
                .with_context("value", value)
                .with_hint("use one of 1/0, true/false, yes/no, on/off"),
        )),
    }
}
