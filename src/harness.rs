use crate::collector::Event;

/// Score and episode bookkeeping owned by the surrounding harness
///
/// The collector reports outcomes as [`Event`]s; this context accumulates
/// them for display. It replaces the page-global score counters of the
/// original demo so all mutable state has a single owner.
#[derive(Default, Debug)]
pub struct Scoreboard {
    total: f32,
    episodes: u32,
    average: f32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::Reward(r) => self.total += r,
                Event::EpisodeComplete => {
                    self.episodes += 1;
                    self.average = self.total / self.episodes as f32;
                }
            }
        }
    }

    /// Total accumulated reward
    pub fn total(&self) -> f32 {
        self.total
    }

    /// Completed episodes
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Average reward per completed episode
    pub fn average(&self) -> f32 {
        self.average
    }
}
