use rand::{thread_rng, Rng};

use crate::{
    decay,
    exploration::{Choice, EpsilonGreedy},
    table::QTable,
};

/// Epsilon-greedy action selection over a remotely synced Q-table
///
/// Annealing is driven by the caller: the step controller invokes [`anneal`]
/// once per decision tick, not per frame, so after `K` decisions epsilon sits
/// at `max(floor, init - K * rate)`.
///
/// [`anneal`]: QPolicy::anneal
pub struct QPolicy {
    table: QTable,
    exploration: EpsilonGreedy<decay::Linear>,
    decision_ticks: u32,
}

impl QPolicy {
    pub fn new(table: QTable, schedule: decay::Linear) -> Self {
        Self {
            table,
            exploration: EpsilonGreedy::new(schedule),
            decision_ticks: 0,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    /// Current exploration rate, exposed for display
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.decision_ticks as f32)
    }

    /// Advance the anneal schedule by one decision tick
    pub fn anneal(&mut self) {
        self.decision_ticks += 1;
    }

    /// Choose an action index for a state key
    ///
    /// Exploitation delegates to the table's best-action query; exploration
    /// draws a uniform random action. Unknown keys never fail, the table
    /// falls back to a random action for them.
    pub fn select_action(&self, key: &str, epsilon_override: Option<f32>) -> usize {
        match self
            .exploration
            .choose(self.decision_ticks as f32, epsilon_override)
        {
            Choice::Exploit => self.table.best_action(key),
            Choice::Explore => thread_rng().gen_range(0..self.table.num_actions()),
        }
    }
}
