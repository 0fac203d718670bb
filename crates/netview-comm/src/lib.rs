//! Collective process-group substrate.
//!
//! Every participant runs the same code path (SPMD). Collective calls block
//! until every rank of the group has arrived.

use netview_core::{NetError, Rank, LEADER};

mod lockstep;
mod self_comm;
mod shared_tmp;
mod thread;

pub use lockstep::{leader_step, unanimous};
pub use self_comm::SelfComm;
pub use shared_tmp::{default_tmp_dir, probe_shared_dir};
pub use thread::ThreadComm;

/// A group of cooperating processes.
pub trait Communicator: Send + Sync {
    /// This process's rank.
    fn rank(&self) -> Rank;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Blocks until every rank has arrived.
    fn barrier(&self) -> Result<(), NetError>;

    /// Copies `root`'s buffer into every other rank's buffer.
    ///
    /// All ranks must pass buffers of the same length.
    fn broadcast(&self, buffer: &mut [u8], root: Rank) -> Result<(), NetError>;

    /// Collects every rank's payload on `root`, in rank order.
    ///
    /// Returns `Some` on `root` and `None` elsewhere.
    fn gather(&self, payload: &[u8], root: Rank) -> Result<Option<Vec<Vec<u8>>>, NetError>;

    /// Whether this process is the coordinating process.
    fn is_leader(&self) -> bool {
        self.rank() == LEADER
    }

    /// Broadcasts a variable-length payload from `root`.
    ///
    /// Non-root ranks ignore their own `payload` and receive `root`'s.
    fn broadcast_bytes(&self, payload: Vec<u8>, root: Rank) -> Result<Vec<u8>, NetError> {
        let mut len = (payload.len() as u64).to_le_bytes();
        self.broadcast(&mut len, root)?;
        let len = u64::from_le_bytes(len) as usize;
        let mut buffer = if self.rank() == root {
            payload
        } else {
            vec![0u8; len]
        };
        self.broadcast(&mut buffer, root)?;
        Ok(buffer)
    }

    /// Broadcasts a single flag from `root`.
    fn broadcast_flag(&self, flag: bool, root: Rank) -> Result<bool, NetError> {
        let mut buffer = [u8::from(flag)];
        self.broadcast(&mut buffer, root)?;
        Ok(buffer[0] != 0)
    }
}

pub(crate) fn check_root(root: Rank, size: usize) -> Result<(), NetError> {
    if root >= size {
        return Err(NetError::comm("invalid-root", "root rank outside the group")
            .with_context("root", root)
            .with_context("size", size));
    }
    Ok(())
}
