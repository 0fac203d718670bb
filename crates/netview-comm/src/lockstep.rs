use log::debug;
use netview_core::{ErrorInfo, NetError, LEADER};

use crate::Communicator;

/// Runs `step` on the leader only and makes its outcome visible everywhere.
///
/// Collective. The leader broadcasts either an empty status (success) or its
/// serialized error; every other rank then fails with the same error. On
/// success the leader gets `Some(value)` and every other rank gets `None`.
pub fn leader_step<C, T, F>(comm: &C, name: &str, step: F) -> Result<Option<T>, NetError>
where
    C: Communicator + ?Sized,
    F: FnOnce() -> Result<T, NetError>,
{
    if comm.is_leader() {
        let outcome = step();
        let status = match &outcome {
            Ok(_) => Vec::new(),
            Err(err) => encode_error(err),
        };
        comm.broadcast_bytes(status, LEADER)?;
        debug!("leader step `{name}` finished (ok: {})", outcome.is_ok());
        outcome.map(Some)
    } else {
        let status = comm.broadcast_bytes(Vec::new(), LEADER)?;
        if status.is_empty() {
            Ok(None)
        } else {
            Err(decode_error(&status, name))
        }
    }
}

/// Agrees on one outcome for a step every rank performed locally.
///
/// Collective. If any rank failed, every rank returns the error of the
/// lowest failing rank; otherwise each rank keeps its own value.
pub fn unanimous<C, T>(comm: &C, name: &str, local: Result<T, NetError>) -> Result<T, NetError>
where
    C: Communicator + ?Sized,
{
    let status = match &local {
        Ok(_) => Vec::new(),
        Err(err) => encode_error(err),
    };
    let verdict = comm
        .gather(&status, LEADER)?
        .and_then(|statuses| statuses.into_iter().find(|status| !status.is_empty()))
        .unwrap_or_default();
    let verdict = comm.broadcast_bytes(verdict, LEADER)?;
    if verdict.is_empty() {
        local
    } else {
        Err(decode_error(&verdict, name))
    }
}

fn encode_error(err: &NetError) -> Vec<u8> {
    serde_json::to_vec(err).unwrap_or_else(|_| err.to_string().into_bytes())
}

fn decode_error(status: &[u8], name: &str) -> NetError {
    serde_json::from_slice(status).unwrap_or_else(|_| {
        NetError::Comm(
            ErrorInfo::new("leader-step", String::from_utf8_lossy(status).into_owned())
                .with_context("step", name),
        )
    })
}
