//! Fixed-capacity single-producer/single-consumer message buffer.
//!
//! Sends never block: when the buffer is full the new record is dropped and
//! counted. Receives may block, either indefinitely or up to a timeout.

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PipelineError;

/// Bytes of framing an RTOS message buffer stores in front of every record.
pub const LENGTH_HEADER_BYTES: usize = 4;

/// Bytes one stored record of `T` occupies, header included.
pub const fn record_cost<T>() -> usize {
    std::mem::size_of::<T>() + LENGTH_HEADER_BYTES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    RawToSimple,
    RawToMoving,
    RawToReport,
    SimpleResult,
    MovingResult,
}

impl ChannelId {
    pub const ALL: [ChannelId; 5] = [
        ChannelId::RawToSimple,
        ChannelId::RawToMoving,
        ChannelId::RawToReport,
        ChannelId::SimpleResult,
        ChannelId::MovingResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelId::RawToSimple => "raw-to-simple",
            ChannelId::RawToMoving => "raw-to-moving",
            ChannelId::RawToReport => "raw-to-report",
            ChannelId::SimpleResult => "simple-result",
            ChannelId::MovingResult => "moving-result",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted,
    Dropped,
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Forever,
    For(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Received<T> {
    Delivered(T),
    TimedOut,
    /// The publisher is gone and nothing is left to read.
    Closed,
}

/// Counters shared between a channel's endpoints and the metrics report.
#[derive(Debug, Clone)]
pub struct ChannelStats {
    id: ChannelId,
    accepted: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl ChannelStats {
    fn new(id: ChannelId) -> Self {
        Self {
            id,
            accepted: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

pub struct MessageBuffer<T> {
    id: ChannelId,
    tx: Sender<T>,
    rx: Receiver<T>,
    stats: ChannelStats,
}

impl<T> MessageBuffer<T> {
    pub fn with_slots(id: ChannelId, slots: usize) -> Result<Self, PipelineError> {
        if slots == 0 {
            return Err(PipelineError::ZeroCapacity);
        }
        let (tx, rx) = bounded(slots);
        Ok(Self {
            id,
            tx,
            rx,
            stats: ChannelStats::new(id),
        })
    }

    /// Size the buffer from a byte budget, charging each record its payload
    /// plus a length header.
    pub fn from_bytes(id: ChannelId, capacity_bytes: usize) -> Result<Self, PipelineError> {
        let record_bytes = record_cost::<T>();
        let slots = capacity_bytes / record_bytes;
        if slots == 0 {
            return Err(PipelineError::ChannelTooSmall {
                capacity_bytes,
                record_bytes,
            });
        }
        Self::with_slots(id, slots)
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats.clone()
    }

    pub fn split(self) -> (Publisher<T>, Subscriber<T>) {
        (
            Publisher {
                id: self.id,
                tx: self.tx,
                stats: self.stats.clone(),
            },
            Subscriber {
                id: self.id,
                rx: self.rx,
            },
        )
    }
}

/// Send side. Deliberately not `Clone`: one producer per channel.
pub struct Publisher<T> {
    id: ChannelId,
    tx: Sender<T>,
    stats: ChannelStats,
}

impl<T> Publisher<T> {
    pub fn send(&self, value: T) -> SendOutcome {
        match self.tx.try_send(value) {
            Ok(()) => {
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                SendOutcome::Accepted
            }
            // A vanished consumer loses the record exactly like a full buffer.
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(channel = %self.id, "buffer full, record dropped");
                SendOutcome::Dropped
            }
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }
}

/// Receive side. Deliberately not `Clone`: one consumer per channel.
pub struct Subscriber<T> {
    id: ChannelId,
    rx: Receiver<T>,
}

impl<T> Subscriber<T> {
    pub fn receive(&self, wait: Wait) -> Received<T> {
        match wait {
            Wait::Forever => match self.rx.recv() {
                Ok(v) => Received::Delivered(v),
                Err(_) => Received::Closed,
            },
            Wait::For(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(v) => Received::Delivered(v),
                Err(RecvTimeoutError::Timeout) => Received::TimedOut,
                Err(RecvTimeoutError::Disconnected) => Received::Closed,
            },
        }
    }

    /// Block until a record arrives. `None` means the channel is closed.
    pub fn recv_blocking(&self) -> Option<T> {
        match self.receive(Wait::Forever) {
            Received::Delivered(v) => Some(v),
            Received::TimedOut | Received::Closed => None,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(0)
    }
}
