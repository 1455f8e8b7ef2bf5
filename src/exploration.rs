use rand::{thread_rng, Rng};

use crate::decay::Decay;

/// Exploration policy result
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold at decision tick `t`
    pub fn epsilon(&self, t: f32) -> f32 {
        self.epsilon.evaluate(t)
    }

    /// Invoke epsilon greedy policy for decision tick `t`
    ///
    /// A sample at or above epsilon exploits; below it explores. An explicit
    /// `epsilon_override` takes precedence over the decay schedule.
    pub fn choose(&self, t: f32, epsilon_override: Option<f32>) -> Choice {
        let epsilon = epsilon_override.unwrap_or_else(|| self.epsilon.evaluate(t));
        if thread_rng().gen::<f32>() >= epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}
