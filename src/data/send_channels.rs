use std::path::PathBuf;
use std::time::Duration;
use crossbeam_channel::{Receiver, SendError, Sender, TryRecvError, TrySendError};
use crate::common::Frame;
use crate::error::DecodeError;

/// Work handed from the UI thread to the worker.
#[derive(Debug)]
pub enum Job {
    Detect {
        epoch: u64,
        frame: Frame,
        threshold: f32,
    },
    /// Decode a file, then annotate it when `threshold` is set.
    Import {
        epoch: u64,
        path: PathBuf,
        threshold: Option<f32>,
    },
}

impl Job {
    pub fn epoch(&self) -> u64 {
        match self {
            Job::Detect { epoch, .. } | Job::Import { epoch, .. } => *epoch,
        }
    }
}

/// Results handed from the worker back to the UI thread.
#[derive(Debug)]
pub enum WorkerEvent {
    Detected {
        epoch: u64,
        frame: Frame,
        /// Wall time of the detection pass.
        elapsed: Duration,
    },
    DetectFailed {
        epoch: u64,
        reason: String,
    },
    Imported {
        epoch: u64,
        frame: Frame,
        annotated: Option<Result<Frame, String>>,
    },
    ImportFailed {
        epoch: u64,
        error: DecodeError,
    },
}

impl WorkerEvent {
    pub fn epoch(&self) -> u64 {
        match self {
            WorkerEvent::Detected { epoch, .. }
            | WorkerEvent::DetectFailed { epoch, .. }
            | WorkerEvent::Imported { epoch, .. }
            | WorkerEvent::ImportFailed { epoch, .. } => *epoch,
        }
    }
}

/// Sending half of a single-slot mailbox. A value the receiver has not taken
/// yet is replaced by the next send.
#[derive(Debug)]
pub struct LatestSender<T> {
    tx: Sender<T>,
    evict: Receiver<T>,
}

#[derive(Debug)]
pub struct LatestReceiver<T> {
    rx: Receiver<T>,
}

pub fn mailbox<T>() -> (LatestSender<T>, LatestReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        LatestSender {
            tx,
            evict: rx.clone(),
        },
        LatestReceiver { rx },
    )
}

impl<T> LatestSender<T> {
    /// Stores `value`, returning the unread value it displaced, if any.
    pub fn send(&self, mut value: T) -> Result<Option<T>, SendError<T>> {
        let mut displaced = None;
        loop {
            match self.tx.try_send(value) {
                Ok(()) => return Ok(displaced),
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(stale) = self.evict.try_recv() {
                        displaced = Some(stale);
                    }
                    value = rejected;
                }
                Err(TrySendError::Disconnected(rejected)) => return Err(SendError(rejected)),
            }
        }
    }
}

impl<T> LatestReceiver<T> {
    /// Takes the pending value without blocking.
    pub fn try_take(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until a value arrives. `None` once every sender is gone.
    pub fn take(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    pub fn take_timeout(&self, timeout: std::time::Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Worker-side ends.
#[derive(Debug)]
pub struct DetectionState {
    pub job_rx: LatestReceiver<Job>,
    pub event_tx: LatestSender<WorkerEvent>,
}

/// UI-side ends.
#[derive(Debug)]
pub struct SendState {
    pub job_tx: LatestSender<Job>,
    pub event_rx: LatestReceiver<WorkerEvent>,
}

pub fn channels() -> (SendState, DetectionState) {
    let (job_tx, job_rx) = mailbox();
    let (event_tx, event_rx) = mailbox();
    (
        SendState { job_tx, event_rx },
        DetectionState { job_rx, event_tx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_value_replaces_unread_one() {
        let (tx, rx) = mailbox();
        assert_eq!(tx.send(1).ok(), Some(None));
        assert_eq!(tx.send(2).ok(), Some(Some(1)));
        assert_eq!(rx.try_take(), Some(2));
        assert_eq!(rx.try_take(), None);
    }

    #[test]
    fn receiver_sees_end_of_stream_after_sender_drops() {
        let (tx, rx) = mailbox();
        tx.send("last").ok();
        drop(tx);
        assert_eq!(rx.take(), Some("last"));
        assert_eq!(rx.take(), None);
    }
}
