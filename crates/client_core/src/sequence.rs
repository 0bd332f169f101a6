//! Latest-request-wins sequencing for view controllers.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::debug;

use crate::fetch::InFlight;

struct Settled<T> {
    seq: u64,
    value: T,
}

/// Runs at most one request at a time on behalf of a view. Issuing a new
/// request aborts the previous one, and any result tagged with an older
/// sequence number is dropped instead of being handed back.
pub struct RequestSequencer<T> {
    issued: u64,
    in_flight: Option<InFlight<()>>,
    tx: mpsc::UnboundedSender<Settled<T>>,
    rx: mpsc::UnboundedReceiver<Settled<T>>,
}

impl<T: Send + 'static> Default for RequestSequencer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> RequestSequencer<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            issued: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn issue<F>(&mut self, future: F) -> u64
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.issued += 1;
        let seq = self.issued;
        // Dropping the old handle aborts whatever it was still doing.
        self.in_flight = None;
        let tx = self.tx.clone();
        self.in_flight = Some(InFlight::spawn(async move {
            let value = future.await;
            let _ = tx.send(Settled { seq, value });
        }));
        seq
    }

    pub fn cancel(&mut self) {
        if self.in_flight.take().is_some() {
            debug!(seq = self.issued, "cancelled in-flight request");
        }
    }

    /// Applies the sequence guard: only a result for the latest issued
    /// request is returned.
    pub fn accept(&mut self, seq: u64, value: T) -> Option<T> {
        if seq != self.issued {
            debug!(seq, latest = self.issued, "discarding superseded response");
            return None;
        }
        self.in_flight = None;
        Some(value)
    }

    /// Non-blocking: drains settled results and returns the current one if it
    /// has arrived.
    pub fn try_next(&mut self) -> Option<T> {
        let mut current = None;
        while let Ok(settled) = self.rx.try_recv() {
            if let Some(value) = self.accept(settled.seq, settled.value) {
                current = Some(value);
            }
        }
        current
    }

    /// Waits for the result of the latest request. Returns `None` immediately
    /// when nothing is in flight.
    pub async fn next(&mut self) -> Option<T> {
        while self.in_flight.is_some() {
            let settled = self.rx.recv().await?;
            if let Some(value) = self.accept(settled.seq, settled.value) {
                return Some(value);
            }
        }
        None
    }
}
