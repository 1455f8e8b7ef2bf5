use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender, TryRecvError},
};

use crate::buffer::Sars;

/// Outbound fire-and-forget experience channel
///
/// Batches are tagged with the channel name the remote learner expects. A
/// hung-up receiver is not an error; delivery is best effort and the frame
/// loop never blocks on the network.
pub struct ExperienceSink {
    name: String,
    tx: Sender<(String, Vec<Sars>)>,
}

impl ExperienceSink {
    pub fn new(name: impl Into<String>, tx: Sender<(String, Vec<Sars>)>) -> Self {
        Self {
            name: name.into(),
            tx,
        }
    }

    pub fn send(&self, batch: Vec<Sars>) {
        let n = batch.len();
        if self.tx.send((self.name.clone(), batch)).is_ok() {
            log::debug!("sent {n} tuples on `{}`", self.name);
        } else {
            log::debug!("experience channel disconnected, dropped {n} tuples");
        }
    }
}

/// Inbound table-replacement channel
///
/// The learner pushes whole tables at arbitrary times. The collector drains
/// this slot at tick entry, before the tick's first lookup, so a replacement
/// never lands mid-lookup.
pub struct TableUpdates {
    rx: Receiver<HashMap<String, Vec<f32>>>,
}

impl TableUpdates {
    pub fn new(rx: Receiver<HashMap<String, Vec<f32>>>) -> Self {
        Self { rx }
    }

    /// Most recent pending replacement, discarding anything older
    pub fn latest(&self) -> Option<HashMap<String, Vec<f32>>> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(table) => latest = Some(table),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}
