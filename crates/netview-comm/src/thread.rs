use std::sync::{Arc, Barrier, Mutex, MutexGuard};

use log::debug;
use netview_core::{NetError, Rank};

use crate::{check_root, Communicator};

type Slots = Vec<Option<Vec<u8>>>;

#[derive(Debug)]
struct Shared {
    size: usize,
    barrier: Barrier,
    slots: Mutex<Slots>,
}

/// One rank of an in-process group whose members run on separate threads.
///
/// Each member owns one mailbox slot. A collective deposits into slots,
/// meets at the barrier, reads, and meets again before anyone may reuse a
/// slot.
#[derive(Debug, Clone)]
pub struct ThreadComm {
    rank: Rank,
    shared: Arc<Shared>,
}

impl ThreadComm {
    /// Creates the members of a group of `size` ranks, indexed by rank.
    pub fn group(size: usize) -> Vec<ThreadComm> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            size,
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![None; size]),
        });
        (0..size)
            .map(|rank| ThreadComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    fn slots(&self) -> Result<MutexGuard<'_, Slots>, NetError> {
        self.shared
            .slots
            .lock()
            .map_err(|_| NetError::comm("mailbox-poisoned", "a group member panicked"))
    }

    fn deposit(&self, payload: &[u8]) -> Result<(), NetError> {
        self.slots()?[self.rank] = Some(payload.to_vec());
        Ok(())
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn barrier(&self) -> Result<(), NetError> {
        self.shared.barrier.wait();
        Ok(())
    }

    fn broadcast(&self, buffer: &mut [u8], root: Rank) -> Result<(), NetError> {
        check_root(root, self.size())?;
        let deposited = if self.rank == root {
            self.deposit(buffer)
        } else {
            Ok(())
        };
        self.shared.barrier.wait();
        let received = if self.rank == root {
            deposited
        } else {
            self.slots().and_then(|slots| match slots[root].as_deref() {
                Some(data) if data.len() == buffer.len() => {
                    buffer.copy_from_slice(data);
                    Ok(())
                }
                Some(data) => Err(NetError::comm("broadcast", "broadcast buffer length mismatch")
                    .with_context("expected", data.len())
                    .with_context("actual", buffer.len())
                    .with_context("rank", self.rank)),
                None => Err(NetError::comm("broadcast", "root deposited no data")
                    .with_context("root", root)),
            })
        };
        self.shared.barrier.wait();
        if self.rank == root {
            self.slots()?[root] = None;
        }
        debug!("rank {} broadcast {} bytes from {}", self.rank, buffer.len(), root);
        received
    }

    fn gather(&self, payload: &[u8], root: Rank) -> Result<Option<Vec<Vec<u8>>>, NetError> {
        check_root(root, self.size())?;
        let deposited = self.deposit(payload);
        self.shared.barrier.wait();
        let collected = if self.rank == root {
            self.slots().and_then(|mut slots| {
                slots
                    .iter_mut()
                    .enumerate()
                    .map(|(rank, slot)| {
                        slot.take().ok_or_else(|| {
                            NetError::comm("gather", "rank deposited no data")
                                .with_context("rank", rank)
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some)
            })
        } else {
            Ok(None)
        };
        self.shared.barrier.wait();
        deposited?;
        collected
    }
}
