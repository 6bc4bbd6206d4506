//! Consumer-facing event delivery.
//!
//! The pipeline publishes frames, predictions, and commits over a bounded
//! channel. Delivery must never block the acquisition loop, so the sender
//! applies a drop-oldest policy: when the channel is full the oldest queued
//! event is discarded to make room. A slow consumer loses history, never
//! stalls the pipeline.

use crate::classify::classifier::Prediction;
use crate::pipeline::types::CommitAction;
use crate::video::frame::Frame;
use crossbeam_channel::{Receiver, TrySendError, bounded};

/// Events delivered to pipeline subscribers.
///
/// Ordering within each variant follows acquisition order.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A full frame, for display.
    Frame(Frame),
    /// A raw per-tick prediction.
    Prediction(Prediction),
    /// A committed action against the output buffer.
    Commit(CommitAction),
    /// A pipeline error; fatal errors stop the pipeline after this event.
    Error(String),
}

/// Sending half of the event channel, with drop-oldest overflow.
///
/// Holds a receiver clone of its own channel: crossbeam channels are MPMC,
/// so popping from that clone discards the oldest queued event.
#[derive(Clone)]
pub struct EventSender {
    tx: crossbeam_channel::Sender<PipelineEvent>,
    overflow_rx: Receiver<PipelineEvent>,
}

impl EventSender {
    /// Creates a bounded event channel.
    pub fn bounded(capacity: usize) -> (Self, Receiver<PipelineEvent>) {
        let (tx, rx) = bounded(capacity);
        let sender = Self {
            tx,
            overflow_rx: rx.clone(),
        };
        (sender, rx)
    }

    /// Publishes an event without blocking.
    ///
    /// On a full channel, one oldest event is discarded and the send is
    /// retried once. Events sent after all receivers are gone are dropped
    /// silently.
    pub fn send(&self, event: PipelineEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                let _ = self.overflow_rx.try_recv();
                let _ = self.tx.try_send(event);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}
