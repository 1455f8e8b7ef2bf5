use crate::{link::ExperienceSink, state::GridState};

/// One grid-world transition: state, action, reward, next state
#[derive(Clone, PartialEq, Debug)]
pub struct Sars {
    pub state: GridState,
    pub action: usize,
    pub reward: f32,
    pub next_state: GridState,
}

/// Bounded batch queue for completed transitions
///
/// A tuple that repeats the previously accepted one (same action, reward,
/// and both coordinate pairs) is discarded, so idle no-op frames do not
/// flood the learner. When the buffer reaches capacity the whole batch is
/// handed downstream within the same `add` call and the buffer is cleared,
/// so the capacity is never exceeded, even transiently.
pub struct DispatchBuffer {
    buffer: Vec<Sars>,
    capacity: usize,
    last_accepted: Option<Sars>,
    sink: Option<ExperienceSink>,
}

impl DispatchBuffer {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be at least 1");
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            last_accepted: None,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: ExperienceSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue a transition, flushing the whole batch downstream at capacity
    pub fn add(&mut self, item: Sars) {
        if self.last_accepted.as_ref() == Some(&item) {
            return;
        }
        self.buffer.push(item.clone());
        self.last_accepted = Some(item);
        if self.buffer.len() >= self.capacity {
            self.flush();
        }
    }

    /// Discard all queued transitions
    pub fn empty(&mut self) {
        self.buffer.clear();
    }

    fn flush(&mut self) {
        let batch = std::mem::take(&mut self.buffer);
        match &self.sink {
            Some(sink) => sink.send(batch),
            // delivery is best effort: without a sink the batch is dropped
            None => log::debug!("no experience sink registered, dropping {} tuples", batch.len()),
        }
    }
}
