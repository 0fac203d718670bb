use netview_core::{NetError, Rank};

use crate::{check_root, Communicator};

/// Group made of the calling process alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> Rank {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<(), NetError> {
        Ok(())
    }

    fn broadcast(&self, _buffer: &mut [u8], root: Rank) -> Result<(), NetError> {
        check_root(root, 1)
    }

    fn gather(&self, payload: &[u8], root: Rank) -> Result<Option<Vec<Vec<u8>>>, NetError> {
        check_root(root, 1)?;
        Ok(Some(vec![payload.to_vec()]))
    }
}
