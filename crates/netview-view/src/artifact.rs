use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{info, warn};
use netview_comm::{leader_step, probe_shared_dir, Communicator};
use netview_core::{ErrorInfo, NetError, LEADER};

/// Width of the buffer the artifact path travels in.
pub const MAX_PATH_LEN: usize = 4096;

/// Where the artifact may be created.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactRequest<'a> {
    /// Process-local directory override; wins over the shared directory.
    pub tmpdir_override: Option<&'a Path>,
    /// Default temporary directory, probed for sharing across ranks.
    pub shared_dir: &'a Path,
}

/// A temporary file that every rank knows the path of and that the leader
/// created and later removes.
#[derive(Debug)]
pub struct SharedArtifact {
    path: PathBuf,
    file: Option<File>,
}

impl SharedArtifact {
    /// Collective. Probes the shared directory on every rank, lets the
    /// leader reserve a uniquely named file and broadcasts its path.
    pub fn create<C>(comm: &C, request: ArtifactRequest<'_>) -> Result<Self, NetError>
    where
        C: Communicator + ?Sized,
    {
        let shared = probe_shared_dir(comm, request.shared_dir)?;

        let reserved = leader_step(comm, "tmpfile-create", || {
            let dir = resolve_dir(request, shared)?;
            let (file, path) = reserve_in(&dir)?;
            match encode_artifact_path(&path) {
                Ok(buffer) => Ok((file, buffer)),
                Err(err) => {
                    drop(file);
                    Err(discard(&path, err))
                }
            }
        })?;

        let (file, mut buffer) = match reserved {
            Some((file, buffer)) => (Some(file), buffer),
            None => (None, vec![0u8; MAX_PATH_LEN]),
        };
        comm.broadcast(&mut buffer, LEADER)
            .map_err(|err| err.with_context("step", "broadcast"))?;
        let path = decode_artifact_path(&buffer)?;
        if comm.is_leader() {
            info!("created artifact {}", path.display());
        }
        Ok(Self { path, file })
    }

    /// The artifact path, identical on every rank.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open file handle; only the leader holds one.
    pub fn take_writer(&mut self) -> Option<File> {
        self.file.take()
    }

    /// Collective. The leader deletes the file; failure fails every rank.
    pub fn remove<C>(mut self, comm: &C) -> Result<(), NetError>
    where
        C: Communicator + ?Sized,
    {
        drop(self.file.take());
        let path = &self.path;
        leader_step(comm, "tmpfile-remove", || {
            fs::remove_file(path).map_err(|err| {
                NetError::Cleanup(
                    ErrorInfo::new("tmpfile-remove", err.to_string())
                        .with_context("path", path.display().to_string()),
                )
            })?;
            info!("removed artifact {}", path.display());
            Ok(())
        })?;
        Ok(())
    }
}

fn resolve_dir(request: ArtifactRequest<'_>, shared: bool) -> Result<PathBuf, NetError> {
    if let Some(dir) = request.tmpdir_override {
        return Ok(dir.to_path_buf());
    }
    if !shared {
        return Err(NetError::Config(
            ErrorInfo::new(
                "shared-tmp",
                "temporary directory is not shared by every rank",
            )
            .with_context("dir", request.shared_dir.display().to_string())
            .with_hint("set a shared directory with --tmpdir or NETVIEW_VIEW_TMPDIR"),
        ));
    }
    Ok(request.shared_dir.to_path_buf())
}

fn reserve_in(dir: &Path) -> Result<(File, PathBuf), NetError> {
    let resource = |err: &dyn ToString| {
        NetError::Resource(
            ErrorInfo::new("tmpfile-create", err.to_string())
                .with_context("dir", dir.display().to_string()),
        )
    };
    let file = tempfile::Builder::new()
        .prefix("netview-")
        .suffix(".csv")
        .tempfile_in(dir)
        .map_err(|err| resource(&err))?;
    file.keep().map_err(|err| resource(&err))
}

/// Deletes a reserved file whose path cannot be broadcast, keeping `cause`
/// as the reported error.
fn discard(path: &Path, cause: NetError) -> NetError {
    match fs::remove_file(path) {
        Ok(()) => cause,
        Err(err) => {
            warn!("cannot remove unusable artifact {}: {err}", path.display());
            cause.with_context("cleanup", err)
        }
    }
}

/// Zero-padded path buffer of `MAX_PATH_LEN` bytes.
pub fn encode_artifact_path(path: &Path) -> Result<Vec<u8>, NetError> {
    let text = path.to_str().ok_or_else(|| {
        NetError::Resource(
            ErrorInfo::new("tmpfile-path", "artifact path is not valid UTF-8")
                .with_context("path", path.display().to_string()),
        )
    })?;
    if text.len() >= MAX_PATH_LEN {
        return Err(NetError::Resource(
            ErrorInfo::new("path-too-long", "artifact path does not fit the broadcast buffer")
                .with_context("len", text.len().to_string())
                .with_context("max", (MAX_PATH_LEN - 1).to_string()),
        ));
    }
    let mut buffer = vec![0u8; MAX_PATH_LEN];
    buffer[..text.len()].copy_from_slice(text.as_bytes());
    Ok(buffer)
}

/// Inverse of [`encode_artifact_path`].
pub fn decode_artifact_path(buffer: &[u8]) -> Result<PathBuf, NetError> {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    if end == 0 {
        return Err(NetError::comm("broadcast", "received an empty artifact path"));
    }
    let text = std::str::from_utf8(&buffer[..end])
        .map_err(|err| NetError::comm("broadcast", err.to_string()))?;
    Ok(PathBuf::from(text))
}
