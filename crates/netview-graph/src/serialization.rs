use std::fs;
use std::path::Path;

use netview_core::{ErrorInfo, NetError};

use crate::description::NetworkDescription;

/// Serializes a description to pretty JSON.
pub fn description_to_json(description: &NetworkDescription) -> Result<String, NetError> {
    serde_json::to_string_pretty(description)
        .map_err(|err| NetError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Parses a description from JSON. Structure is not validated here; that
/// needs the group size and happens when partitioning.
pub fn description_from_json(json: &str) -> Result<NetworkDescription, NetError> {
    serde_json::from_str(json)
        .map_err(|err| NetError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
}

/// Reads and parses a JSON description file.
pub fn load_description(path: &Path) -> Result<NetworkDescription, NetError> {
    let json = fs::read_to_string(path).map_err(|err| {
        NetError::Io(
            ErrorInfo::new("read-network", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    description_from_json(&json).map_err(|err| err.with_context("path", path.display()))
}
