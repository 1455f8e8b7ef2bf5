use std::collections::HashMap;

use rand::{seq::SliceRandom, thread_rng, Rng};

/// Sparse mapping from state keys to per-action Q-values
///
/// Absent keys stand for all-zero value vectors and are never materialized
/// locally. The only writer is the sync path, which replaces the whole table
/// at once; there is no partial merge.
pub struct QTable {
    table: HashMap<String, Vec<f32>>,
    num_actions: usize,
}

impl QTable {
    /// **Panics** if `num_actions` is zero
    pub fn new(num_actions: usize) -> Self {
        assert!(num_actions > 0, "action space must not be empty");
        Self {
            table: HashMap::new(),
            num_actions,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of states received from the learner
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Index of the highest-valued action for a state, breaking ties
    /// uniformly at random among the maximizers
    ///
    /// Unknown states fall back to a uniform random action, since all their
    /// Q-values are implicitly zero anyway.
    pub fn best_action(&self, key: &str) -> usize {
        let mut rng = thread_rng();
        match self.table.get(key) {
            Some(values) => {
                let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                let best = values
                    .iter()
                    .enumerate()
                    .filter(|&(_, &q)| q == max)
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>();
                *best
                    .choose(&mut rng)
                    .expect("value vectors are never empty")
            }
            None => rng.gen_range(0..self.num_actions),
        }
    }

    /// Replace the entire table from a learner sync
    ///
    /// The payload is validated up front: every value vector must have
    /// exactly `num_actions` finite entries. On any malformed entry the
    /// previous contents are kept untouched and an error is returned.
    pub fn replace(&mut self, table: HashMap<String, Vec<f32>>) -> Result<(), String> {
        for (key, values) in &table {
            if values.len() != self.num_actions {
                return Err(format!(
                    "table sync rejected: `{key}` has {} values, expected {}",
                    values.len(),
                    self.num_actions
                ));
            }
            if let Some(q) = values.iter().find(|q| !q.is_finite()) {
                return Err(format!(
                    "table sync rejected: `{key}` contains non-finite value {q}"
                ));
            }
        }
        self.table = table;
        Ok(())
    }
}
