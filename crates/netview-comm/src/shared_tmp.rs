use std::env;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use netview_core::{NetError, LEADER};

use crate::Communicator;

const TMP_ENV: &str = "NETVIEW_TMP";

/// The process's default temporary directory: `NETVIEW_TMP`, else the
/// platform temp dir.
pub fn default_tmp_dir() -> PathBuf {
    env::var_os(TMP_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
}

/// Determines whether `dir` names the same directory on every rank.
///
/// Collective: every rank must call it, each with its own view of the
/// directory. The leader drops a marker file, every rank looks for it, and
/// the leader broadcasts the combined verdict. A marker that cannot be
/// created makes the directory count as not shared.
pub fn probe_shared_dir<C>(comm: &C, dir: &Path) -> Result<bool, NetError>
where
    C: Communicator + ?Sized,
{
    if comm.size() == 1 {
        return Ok(true);
    }

    let marker = if comm.is_leader() {
        match tempfile::Builder::new()
            .prefix(".netview-probe-")
            .tempfile_in(dir)
        {
            Ok(file) => Some(file),
            Err(err) => {
                warn!("cannot create probe file in {}: {err}", dir.display());
                None
            }
        }
    } else {
        None
    };
    let name = marker
        .as_ref()
        .and_then(|file| file.path().file_name())
        .map(|name| name.to_string_lossy().into_owned().into_bytes())
        .unwrap_or_default();
    let name = comm.broadcast_bytes(name, LEADER)?;
    if name.is_empty() {
        return Ok(false);
    }

    let name = String::from_utf8_lossy(&name).into_owned();
    let present = dir.join(&name).exists();
    let answers = comm.gather(&[u8::from(present)], LEADER)?;
    let shared = answers
        .map(|answers| answers.iter().all(|answer| answer.first() == Some(&1)))
        .unwrap_or(false);
    let shared = comm.broadcast_flag(shared, LEADER)?;
    debug!(
        "rank {} sees {} as {}",
        comm.rank(),
        dir.display(),
        if shared { "shared" } else { "not shared" }
    );
    drop(marker);
    Ok(shared)
}
