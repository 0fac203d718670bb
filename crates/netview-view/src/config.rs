//! Persisted viewer configuration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use netview_core::{ErrorInfo, NetError, Rank, RankSet, ViewOptions};
use serde::{Deserialize, Serialize};

/// Script used when the configuration names none.
pub const DEFAULT_SCRIPT: &str = "${NETVIEW_DIR}/share/netview/network_view.py";

/// How the external renderer should display its plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Null when no display server is reachable, window otherwise.
    #[default]
    Auto,
    /// Headless; the renderer runs without drawing.
    Null,
    /// Draw into a window.
    Window,
}

/// Resolved display of a draw viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTarget {
    /// Whether drawing is a no-op.
    pub null: bool,
    /// Pause after drawing, in seconds.
    pub pause: f64,
}

impl DisplayTarget {
    /// Headless target without pause.
    pub fn null() -> Self {
        Self {
            null: true,
            pause: 0.0,
        }
    }

    /// Windowed target pausing `pause` seconds.
    pub fn window(pause: f64) -> Self {
        Self { null: false, pause }
    }
}

/// `[view]` table: seeds the persisted view options of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// See [`ViewOptions::set_show_ranks`].
    pub show_all_ranks: bool,
    /// See [`ViewOptions::set_show_global`].
    pub show_global: bool,
    /// See [`ViewOptions::set_show_vertices`].
    pub show_vertices: bool,
    /// See [`ViewOptions::set_show_numbering`].
    pub show_numbering: bool,
    /// See [`ViewOptions::set_view_ranks`].
    pub view_ranks: Option<Vec<Rank>>,
}

impl Default for ViewSection {
    fn default() -> Self {
        let defaults = ViewOptions::default();
        Self {
            show_all_ranks: defaults.show_all_ranks(),
            show_global: defaults.show_global(),
            show_vertices: defaults.show_vertices(),
            show_numbering: defaults.show_numbering(),
            view_ranks: None,
        }
    }
}

/// Viewer configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Interpreter running the renderer script.
    pub python: String,
    /// Renderer script; `${VAR}` is expanded from the environment.
    pub script: String,
    /// Display mode for draw viewers.
    pub display: DisplayMode,
    /// Pause after drawing, in seconds.
    pub pause: f64,
    /// Persisted view options.
    pub view: ViewSection,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            script: DEFAULT_SCRIPT.to_string(),
            display: DisplayMode::Auto,
            pause: 0.0,
            view: ViewSection::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, NetError> {
        let config: Self = toml::from_str(text)
            .map_err(|err| NetError::Serde(ErrorInfo::new("deserialize-toml", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, NetError> {
        let text = fs::read_to_string(path).map_err(|err| {
            NetError::Io(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_toml_str(&text).map_err(|err| err.with_context("path", path.display()))
    }

    fn validate(&self) -> Result<(), NetError> {
        if !self.pause.is_finite() || self.pause < 0.0 {
            return Err(NetError::config("bad-option", "pause must be a non-negative number")
                .with_context("pause", self.pause));
        }
        if self.python.trim().is_empty() {
            return Err(NetError::config("bad-option", "python interpreter must not be empty"));
        }
        Ok(())
    }

    /// Copies the `[view]` table into a network's persisted options.
    pub fn apply_view(&self, options: &mut ViewOptions) {
        options.set_show_ranks(self.view.show_all_ranks);
        options.set_show_global(self.view.show_global);
        options.set_show_vertices(self.view.show_vertices);
        options.set_show_numbering(self.view.show_numbering);
        if let Some(ranks) = &self.view.view_ranks {
            options.set_view_ranks(Arc::new(RankSet::from_ranks(ranks.iter().copied())));
        }
    }

    /// Resolves the display mode against the process environment.
    pub fn display_target(&self) -> DisplayTarget {
        self.display_target_with(|key| env::var_os(key).is_some_and(|value| !value.is_empty()))
    }

    /// Like [`display_target`](Self::display_target) with an injected
    /// environment check.
    pub fn display_target_with<F>(&self, is_set: F) -> DisplayTarget
    where
        F: Fn(&str) -> bool,
    {
        let headless = match self.display {
            DisplayMode::Null => true,
            DisplayMode::Window => false,
            DisplayMode::Auto => !is_set("DISPLAY") && !is_set("WAYLAND_DISPLAY"),
        };
        if headless {
            DisplayTarget {
                null: true,
                pause: self.pause,
            }
        } else {
            DisplayTarget::window(self.pause)
        }
    }

    /// Expands the script path from the process environment.
    pub fn resolve_script(&self) -> Result<PathBuf, NetError> {
        self.resolve_script_with(|key| env::var(key).ok())
    }

    /// Expands the script path through `lookup`.
    pub fn resolve_script_with<F>(&self, lookup: F) -> Result<PathBuf, NetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        expand_vars(&self.script, lookup).map(PathBuf::from)
    }
}

fn expand_vars<F>(text: &str, lookup: F) -> Result<String, NetError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            NetError::Config(
                ErrorInfo::new("script-path", "unterminated variable reference")
                    .with_context("script", text),
            )
        })?;
        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| {
            NetError::Config(
                ErrorInfo::new("script-path", "environment variable is not set")
                    .with_context("var", name)
                    .with_context("script", text)
                    .with_hint(format!("export {name} or set `script` in the viewer config")),
            )
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
