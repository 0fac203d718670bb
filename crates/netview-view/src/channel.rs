use std::io::Write;

use log::debug;
use netview_comm::{leader_step, Communicator};
use netview_core::{NetError, Rank, LEADER};

/// Output stream shared by every rank of a group.
///
/// Between [`push_synchronized`](Self::push_synchronized) and
/// [`pop_synchronized`](Self::pop_synchronized) each rank buffers its own
/// text; [`flush`](Self::flush) gathers the buffers on the leader, which
/// writes them to the sink in rank order. Only the leader's sink is ever
/// written, so other ranks may pass `None`.
///
/// Every method except the two synchronized writers is collective.
pub struct SyncChannel<'c, C: ?Sized, W> {
    comm: &'c C,
    sink: Option<W>,
    pending: Vec<u8>,
    synchronized: bool,
}

impl<'c, C, W> SyncChannel<'c, C, W>
where
    C: Communicator + ?Sized,
    W: Write,
{
    /// Opens a channel writing to `sink` on the leader.
    pub fn new(comm: &'c C, sink: W) -> Self {
        Self::with_sink(comm, Some(sink))
    }

    /// Opens a channel whose sink may be absent on non-leader ranks.
    pub fn with_sink(comm: &'c C, sink: Option<W>) -> Self {
        Self {
            comm,
            sink,
            pending: Vec::new(),
            synchronized: false,
        }
    }

    /// Rank of the calling process.
    pub fn rank(&self) -> Rank {
        self.comm.rank()
    }

    pub(crate) fn comm(&self) -> &'c C {
        self.comm
    }

    /// Writes text produced by the leader only. `text` runs on the leader;
    /// its failure, or a failed write, fails every rank.
    pub fn leader_print<F>(&mut self, text: F) -> Result<(), NetError>
    where
        F: FnOnce() -> Result<String, NetError>,
    {
        if self.synchronized {
            return Err(NetError::config(
                "channel-state",
                "leader output is not allowed inside a synchronized bracket",
            ));
        }
        let sink = &mut self.sink;
        leader_step(self.comm, "leader-print", || {
            let text = text()?;
            write_sink(sink, text.as_bytes())
        })?;
        Ok(())
    }

    /// Opens the synchronized bracket.
    pub fn push_synchronized(&mut self) -> Result<(), NetError> {
        if self.synchronized {
            return Err(NetError::config(
                "channel-state",
                "synchronized bracket is already open",
            ));
        }
        self.synchronized = true;
        Ok(())
    }

    /// Buffers text from this rank. Local; nothing reaches the sink until
    /// the next flush.
    pub fn synchronized_write(&mut self, text: &str) -> Result<(), NetError> {
        self.synchronized_bytes(text.as_bytes())
    }

    /// Byte variant of [`synchronized_write`](Self::synchronized_write).
    pub fn synchronized_bytes(&mut self, bytes: &[u8]) -> Result<(), NetError> {
        if !self.synchronized {
            return Err(NetError::config(
                "channel-state",
                "synchronized write outside a push/pop bracket",
            )
            .with_context("rank", self.rank()));
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    /// Emits every rank's buffered text in rank order.
    pub fn flush(&mut self) -> Result<(), NetError> {
        let pending = std::mem::take(&mut self.pending);
        let gathered = self.comm.gather(&pending, LEADER)?;
        let sink = &mut self.sink;
        leader_step(self.comm, "channel-flush", || {
            for chunk in gathered.iter().flatten() {
                write_sink(sink, chunk)?;
            }
            match sink.as_mut() {
                Some(sink) => sink.flush().map_err(|err| NetError::io("sink-flush", err)),
                None => Ok(()),
            }
        })?;
        debug!("rank {} flushed {} bytes", self.comm.rank(), pending.len());
        Ok(())
    }

    /// Closes the synchronized bracket. Output must have been flushed.
    pub fn pop_synchronized(&mut self) -> Result<(), NetError> {
        if !self.synchronized {
            return Err(NetError::config(
                "channel-state",
                "no synchronized bracket is open",
            ));
        }
        if !self.pending.is_empty() {
            return Err(NetError::config(
                "channel-state",
                "synchronized output was not flushed before pop",
            )
            .with_context("rank", self.rank())
            .with_context("pending_bytes", self.pending.len()));
        }
        self.synchronized = false;
        Ok(())
    }

    /// Flushes the sink and hands it back.
    pub fn close(mut self) -> Result<Option<W>, NetError> {
        if self.synchronized {
            return Err(NetError::config(
                "channel-state",
                "channel closed inside a synchronized bracket",
            ));
        }
        let sink = &mut self.sink;
        leader_step(self.comm, "channel-close", || match sink.as_mut() {
            Some(sink) => sink.flush().map_err(|err| NetError::io("sink-flush", err)),
            None => Ok(()),
        })?;
        Ok(self.sink)
    }
}

fn write_sink<W: Write>(sink: &mut Option<W>, bytes: &[u8]) -> Result<(), NetError> {
    let sink = sink
        .as_mut()
        .ok_or_else(|| NetError::config("missing-sink", "leader has no output sink"))?;
    sink.write_all(bytes)
        .map_err(|err| NetError::io("sink-write", err))
}
