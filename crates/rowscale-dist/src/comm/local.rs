//! In-process participant group
//!
//! Each participant runs on its own thread and owns a [`LocalComm`]. The
//! endpoints share nothing but channels: one `crossbeam-channel` queue per
//! ordered pair of participants, so every byte a participant sees was
//! copied to it through a message, and a receive from a peer that has
//! dropped its endpoint fails with [`DistError::Disconnected`] instead of
//! blocking forever.

use super::Communicator;
use crate::{DistError, DistResult};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::thread;

#[derive(Debug)]
enum Message {
    Scalar(i64),
    Bytes(Vec<u8>),
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Message::Scalar(_) => "scalar",
            Message::Bytes(_) => "bytes",
        }
    }
}

/// One participant's endpoint in a [`LocalGroup`].
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    size: usize,
    /// `to_peer[k]` sends to participant `k`; `None` at our own rank.
    to_peer: Vec<Option<Sender<Message>>>,
    /// `from_peer[k]` receives from participant `k`; `None` at our own rank.
    from_peer: Vec<Option<Receiver<Message>>>,
}

impl LocalComm {
    fn check_root(&self, root: usize) -> DistResult<()> {
        if root >= self.size {
            return Err(DistError::InvalidGroup(format!(
                "root {root} out of group of {}",
                self.size
            )));
        }
        Ok(())
    }

    fn send(&self, peer: usize, msg: Message) -> DistResult<()> {
        let tx = self.to_peer[peer].as_ref().ok_or_else(|| {
            DistError::Protocol(format!("participant {} cannot send to itself", self.rank))
        })?;
        tx.send(msg).map_err(|_| DistError::Disconnected {
            rank: self.rank,
            peer,
        })
    }

    fn recv(&self, peer: usize) -> DistResult<Message> {
        let rx = self.from_peer[peer].as_ref().ok_or_else(|| {
            DistError::Protocol(format!(
                "participant {} cannot receive from itself",
                self.rank
            ))
        })?;
        rx.recv().map_err(|_| DistError::Disconnected {
            rank: self.rank,
            peer,
        })
    }

    fn peers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&k| k != self.rank)
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_scalar(&self, value: &mut i64, root: usize) -> DistResult<()> {
        self.check_root(root)?;
        if self.rank == root {
            for peer in self.peers() {
                self.send(peer, Message::Scalar(*value))?;
            }
            return Ok(());
        }
        match self.recv(root)? {
            Message::Scalar(v) => {
                *value = v;
                Ok(())
            }
            other => Err(DistError::Protocol(format!(
                "participant {} expected scalar from {root}, got {}",
                self.rank,
                other.kind()
            ))),
        }
    }

    fn broadcast_bytes(&self, buffer: &mut [u8], root: usize) -> DistResult<()> {
        self.check_root(root)?;
        if self.rank == root {
            for peer in self.peers() {
                self.send(peer, Message::Bytes(buffer.to_vec()))?;
            }
            return Ok(());
        }
        match self.recv(root)? {
            Message::Bytes(data) if data.len() == buffer.len() => {
                buffer.copy_from_slice(&data);
                Ok(())
            }
            Message::Bytes(data) => Err(DistError::SizeMismatch {
                rank: self.rank,
                expected: buffer.len(),
                actual: data.len(),
            }),
            other => Err(DistError::Protocol(format!(
                "participant {} expected bytes from {root}, got {}",
                self.rank,
                other.kind()
            ))),
        }
    }

    fn gather_varcount(
        &self,
        local: &[u8],
        counts: &[usize],
        offsets: &[usize],
        dest: Option<&mut [u8]>,
        root: usize,
    ) -> DistResult<()> {
        self.check_root(root)?;
        if counts.len() != self.size || offsets.len() != self.size {
            return Err(DistError::InvalidPlan(format!(
                "{} counts and {} offsets for a group of {}",
                counts.len(),
                offsets.len(),
                self.size
            )));
        }
        if local.len() != counts[self.rank] {
            return Err(DistError::SizeMismatch {
                rank: self.rank,
                expected: counts[self.rank],
                actual: local.len(),
            });
        }

        if self.rank != root {
            return self.send(root, Message::Bytes(local.to_vec()));
        }

        let dest = dest.ok_or_else(|| {
            DistError::InvalidPlan("root has no destination buffer".to_string())
        })?;
        for k in 0..self.size {
            let end = offsets[k].checked_add(counts[k]);
            if end.is_none_or(|end| end > dest.len()) {
                return Err(DistError::InvalidPlan(format!(
                    "participant {k}: {} bytes at offset {} overflow a {}-byte destination",
                    counts[k],
                    offsets[k],
                    dest.len()
                )));
            }
        }

        dest[offsets[root]..offsets[root] + counts[root]].copy_from_slice(local);
        for peer in self.peers() {
            match self.recv(peer)? {
                Message::Bytes(data) if data.len() == counts[peer] => {
                    dest[offsets[peer]..offsets[peer] + counts[peer]].copy_from_slice(&data);
                }
                Message::Bytes(data) => {
                    return Err(DistError::SizeMismatch {
                        rank: peer,
                        expected: counts[peer],
                        actual: data.len(),
                    });
                }
                other => {
                    return Err(DistError::Protocol(format!(
                        "root expected bytes from {peer}, got {}",
                        other.kind()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Bootstrap for a fixed-size in-process group.
///
/// # Examples
///
/// ```
/// use rowscale_dist::{Communicator, LocalGroup};
///
/// let ranks = LocalGroup::run(3, |comm| {
///     let mut v = if comm.rank() == 0 { 42 } else { 0 };
///     comm.broadcast_scalar(&mut v, 0).map(|_| v)
/// })
/// .unwrap();
/// assert!(ranks.into_iter().all(|r| r.unwrap() == 42));
/// ```
pub struct LocalGroup;

impl LocalGroup {
    /// Create `size` connected endpoints, in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::InvalidGroup`] if `size` is zero.
    pub fn endpoints(size: usize) -> DistResult<Vec<LocalComm>> {
        if size == 0 {
            return Err(DistError::InvalidGroup("group size is 0".to_string()));
        }

        let mut comms: Vec<LocalComm> = (0..size)
            .map(|rank| LocalComm {
                rank,
                size,
                to_peer: (0..size).map(|_| None).collect(),
                from_peer: (0..size).map(|_| None).collect(),
            })
            .collect();

        for from in 0..size {
            for to in 0..size {
                if from == to {
                    continue;
                }
                let (tx, rx) = unbounded();
                comms[from].to_peer[to] = Some(tx);
                comms[to].from_peer[from] = Some(rx);
            }
        }
        Ok(comms)
    }

    /// Run `body` once per participant, each on its own thread, and return
    /// the results in rank order.
    ///
    /// Every endpoint is dropped when its `body` returns, so peers still
    /// waiting on it observe [`DistError::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns [`DistError::InvalidGroup`] for an empty group and
    /// [`DistError::ParticipantPanicked`] if a participant thread panicked.
    pub fn run<T, F>(size: usize, body: F) -> DistResult<Vec<T>>
    where
        T: Send,
        F: Fn(LocalComm) -> T + Sync,
    {
        let endpoints = Self::endpoints(size)?;
        let body = &body;

        thread::scope(|s| -> DistResult<Vec<T>> {
            let mut handles = Vec::with_capacity(size);
            for comm in endpoints {
                let rank = comm.rank;
                let handle = thread::Builder::new()
                    .name(format!("participant-{rank}"))
                    .spawn_scoped(s, move || body(comm))
                    .map_err(|e| {
                        DistError::InvalidGroup(format!("failed to spawn participant {rank}: {e}"))
                    })?;
                handles.push(handle);
            }

            handles
                .into_iter()
                .enumerate()
                .map(|(rank, h)| h.join().map_err(|_| DistError::ParticipantPanicked { rank }))
                .collect()
        })
    }
}
