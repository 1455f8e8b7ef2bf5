use crate::{
    action::Action,
    buffer::{DispatchBuffer, Sars},
    link::TableUpdates,
    policy::QPolicy,
    state::{Discretizer, GridState},
};

/// Pressed state of the directional inputs, refreshed before each tick
#[derive(Clone, Copy, Default, Debug)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    // direct key-to-action mapping used under human control
    fn action(&self) -> Action {
        if self.left {
            Action::Left
        } else if self.right {
            Action::Right
        } else if self.up {
            Action::Up
        } else if self.down {
            Action::Down
        } else {
            Action::Nothing
        }
    }
}

/// Collision classification delivered by the engine
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hit {
    Obstacle,
    Goal,
}

/// Outcome notifications consumed by the surrounding harness
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Event {
    /// Reward delta of a completed tuple, zero rewards included so the
    /// score display stays consistent
    Reward(f32),
    /// A goal was reached and the agent was reset to its start position
    EpisodeComplete,
}

/// Continuous motion state of the agent
///
/// Lifecycle: idle, then stepping once an action is chosen, then idle again
/// when the countdown expires or a collision aborts the step.
#[derive(Clone, Copy, Debug)]
pub struct Kinematics {
    x: f32,
    y: f32,
    dest_x: f32,
    dest_y: f32,
    diff_x: f32,
    diff_y: f32,
    orig_x: f32,
    orig_y: f32,
    start_x: f32,
    start_y: f32,
    step_wait: f32,
    step_delay: f32,
    stepping: bool,
}

impl Kinematics {
    fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            dest_x: x,
            dest_y: y,
            diff_x: 0.0,
            diff_y: 0.0,
            orig_x: x,
            orig_y: y,
            start_x: x,
            start_y: y,
            step_wait: 0.0,
            step_delay: 0.0,
            stepping: false,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn destination(&self) -> (f32, f32) {
        (self.dest_x, self.dest_y)
    }

    pub fn is_stepping(&self) -> bool {
        self.stepping
    }
}

/// Step controller configuration
///
/// Defaults match the original maze demo: 32px tiles on a 9x9 board with a
/// 20px border, playable bounds 10..280 per axis, and the autonomous agent
/// stepping much faster than a human player.
#[derive(Clone, Debug)]
pub struct StepConfig {
    pub step_distance: f32,
    pub human_step_delay: f32,
    pub auto_step_delay: f32,
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    /// Autonomous decisions happen only every this-many ticks
    pub frame_skip: u32,
    /// Seconds without human input before the policy may act
    pub quiet_period: f32,
    pub step_reward: f32,
    pub obstacle_reward: f32,
    pub goal_reward: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub discretizer: Discretizer,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step_distance: 32.0,
            human_step_delay: 0.2,
            auto_step_delay: 0.07,
            x_min: 10.0,
            x_max: 280.0,
            y_min: 10.0,
            y_max: 280.0,
            frame_skip: 4,
            quiet_period: 5.0,
            step_reward: 0.0,
            obstacle_reward: -1.0,
            goal_reward: 100.0,
            start_x: 64.0,
            start_y: 32.0,
            discretizer: Discretizer::default(),
        }
    }
}

/// Per-frame state machine driving one agent and assembling transitions
///
/// Each [`tick`] arbitrates control (human input wins until the quiet period
/// elapses), advances any step in flight with linear interpolation, completes
/// the open SARS tuple when a step finishes, and chooses the next action.
/// Collisions arrive out of band through [`collide`]. Completed tuples go to
/// the dispatch buffer; outcome [`Event`]s are returned to the caller.
///
/// Exactly one open tuple (the pending state) exists at any time. A
/// completion attempt without one is a defect: it is logged, the malformed
/// slot is discarded, and collection restarts at the current state so the
/// control loop keeps running.
///
/// [`tick`]: StepController::tick
/// [`collide`]: StepController::collide
pub struct StepController {
    config: StepConfig,
    kin: Kinematics,
    policy: QPolicy,
    buffer: DispatchBuffer,
    updates: Option<TableUpdates>,
    open: Option<GridState>,
    action: Action,
    frame_count: u64,
    since_input: f32,
}

impl StepController {
    /// **Panics** if `config.frame_skip` is zero
    pub fn new(config: StepConfig, policy: QPolicy, buffer: DispatchBuffer) -> Self {
        assert!(config.frame_skip > 0, "frame skip must be at least 1");
        let kin = Kinematics::at(config.start_x, config.start_y);
        let open = Some(config.discretizer.discretize(kin.x, kin.y));
        // autonomy is allowed right away, until the first human input
        let since_input = config.quiet_period;
        Self {
            config,
            kin,
            policy,
            buffer,
            updates: None,
            open,
            action: Action::Nothing,
            frame_count: 0,
            since_input,
        }
    }

    /// Attach the inbound table-replacement channel
    pub fn with_table_updates(mut self, updates: TableUpdates) -> Self {
        self.updates = Some(updates);
        self
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kin
    }

    pub fn policy(&self) -> &QPolicy {
        &self.policy
    }

    pub fn buffer(&self) -> &DispatchBuffer {
        &self.buffer
    }

    /// Current exploration rate, exposed for display
    pub fn epsilon(&self) -> f32 {
        self.policy.epsilon()
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32, inputs: InputState) -> Vec<Event> {
        let mut events = Vec::new();

        // learner pushes land between frames, before the first lookup
        self.apply_pending_sync();

        self.frame_count += 1;
        if inputs.any() {
            self.since_input = 0.0;
        } else {
            self.since_input += dt;
        }
        let autonomous = self.since_input >= self.config.quiet_period;

        // smooth stepping part
        self.kin.step_wait -= dt;
        if self.kin.stepping {
            self.kin.x += self.kin.diff_x * dt / self.kin.step_delay;
            self.kin.y += self.kin.diff_y * dt / self.kin.step_delay;
        }
        if self.kin.step_wait > 0.0 {
            return events;
        }

        // countdown expired: finish the step in one leap, snapping onto the
        // destination to avoid accumulated float drift
        if self.kin.stepping {
            self.kin.x = self.kin.dest_x;
            self.kin.y = self.kin.dest_y;
            self.kin.stepping = false;
            let next = self.state();
            self.complete(self.config.step_reward, next, &mut events);
        }

        // decide the action for this tick
        if autonomous {
            if self.frame_count % u64::from(self.config.frame_skip) != 0 {
                return events;
            }
            self.kin.step_delay = self.config.auto_step_delay;
            let key = self.state().key();
            self.policy.anneal();
            let a = self.policy.select_action(&key, None);
            self.action = match Action::from_index(a) {
                Some(action) => action,
                None => {
                    log::error!("policy returned out-of-range action {a}");
                    Action::Nothing
                }
            };
        } else {
            self.kin.step_delay = self.config.human_step_delay;
            self.action = inputs.action();
        }

        // no-op: no motion happens, the transition is complete right away
        if self.action.is_noop() {
            let next = self.state();
            self.complete(self.config.step_reward, next, &mut events);
            return events;
        }

        let (dx, dy) = self.action.displacement();
        self.kin.diff_x = dx * self.config.step_distance;
        self.kin.diff_y = dy * self.config.step_distance;
        self.kin.orig_x = self.kin.x;
        self.kin.orig_y = self.kin.y;
        self.kin.dest_x = (self.kin.x + self.kin.diff_x).clamp(self.config.x_min, self.config.x_max);
        self.kin.dest_y = (self.kin.y + self.kin.diff_y).clamp(self.config.y_min, self.config.y_max);
        self.kin.stepping = true;
        self.kin.step_wait = self.kin.step_delay;

        events
    }

    /// Deliver a collision or goal event from the engine
    pub fn collide(&mut self, hit: Hit) -> Vec<Event> {
        let mut events = Vec::new();
        match hit {
            Hit::Goal => {
                self.kin.x = self.kin.start_x;
                self.kin.y = self.kin.start_y;
                self.kin.dest_x = self.kin.start_x;
                self.kin.dest_y = self.kin.start_y;
                self.kin.stepping = false;
                let next = self.state();
                self.complete(self.config.goal_reward, next, &mut events);
                events.push(Event::EpisodeComplete);
            }
            // a wall only matters mid-step; roll the agent back to where
            // the aborted step began
            Hit::Obstacle if self.kin.stepping => {
                self.kin.stepping = false;
                self.kin.x = self.kin.orig_x;
                self.kin.y = self.kin.orig_y;
                self.kin.dest_x = self.kin.orig_x;
                self.kin.dest_y = self.kin.orig_y;
                let next = self.state();
                self.complete(self.config.obstacle_reward, next, &mut events);
            }
            Hit::Obstacle => {}
        }
        events
    }

    fn state(&self) -> GridState {
        self.config.discretizer.discretize(self.kin.x, self.kin.y)
    }

    // complete the open tuple with `reward` and `next`, then start a fresh
    // tuple at `next`
    fn complete(&mut self, reward: f32, next: GridState, events: &mut Vec<Event>) {
        match self.open.take() {
            Some(state) => {
                self.buffer.add(Sars {
                    state,
                    action: self.action.index(),
                    reward,
                    next_state: next,
                });
            }
            None => {
                log::error!(
                    "no open tuple to complete, restarting collection at {}",
                    next.key()
                );
            }
        }
        self.open = Some(next);
        events.push(Event::Reward(reward));
    }

    fn apply_pending_sync(&mut self) {
        let Some(updates) = &self.updates else {
            return;
        };
        if let Some(table) = updates.latest() {
            if let Err(e) = self.policy.table_mut().replace(table) {
                log::warn!("{e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::mpsc};

    use crate::{decay, table::QTable};

    use super::*;

    const DT: f32 = 0.1;

    fn policy() -> QPolicy {
        QPolicy::new(
            QTable::new(5),
            decay::Linear::new(0.0004, 1.0, 0.0).unwrap(),
        )
    }

    fn controller(config: StepConfig) -> StepController {
        StepController::new(config, policy(), DispatchBuffer::new(50))
    }

    fn right() -> InputState {
        InputState {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn destination_clamps_to_bounds() {
        let config = StepConfig {
            start_x: 64.0,
            start_y: 20.0,
            ..Default::default()
        };
        let mut c = controller(config);

        let inputs = InputState {
            up: true,
            ..Default::default()
        };
        c.tick(DT, inputs);

        assert!(c.kinematics().is_stepping(), "step scheduled");
        assert_eq!(
            c.kinematics().destination().1,
            10.0,
            "up from y=20 clamps to y_min"
        );
    }

    #[test]
    fn full_step_cycle_emits_one_tuple() {
        let mut c = controller(StepConfig::default());

        // schedule the step, then hold the key through the animation
        let events = c.tick(DT, right());
        assert!(events.is_empty(), "nothing completed while scheduling");
        assert!(c.kinematics().is_stepping());

        assert!(c.tick(DT, right()).is_empty(), "mid-step tick is silent");

        // third tick expires the 0.2s countdown
        let events = c.tick(DT, right());
        assert_eq!(events, vec![Event::Reward(0.0)], "one zero-reward event");
        assert_eq!(c.buffer().len(), 1, "exactly one tuple collected");
        assert_eq!(
            c.kinematics().position().0,
            96.0,
            "position snapped to the destination"
        );
        assert!(
            c.kinematics().is_stepping(),
            "held key schedules the next step in the same tick"
        );
    }

    #[test]
    fn idle_noop_completes_and_dedups() {
        let mut c = controller(StepConfig::default());

        c.tick(DT, right());
        c.tick(DT, InputState::default());
        // step finishes and the subsequent idle frame records a no-op
        let events = c.tick(DT, InputState::default());
        assert_eq!(
            events,
            vec![Event::Reward(0.0), Event::Reward(0.0)],
            "step tuple plus no-op tuple"
        );
        assert_eq!(c.buffer().len(), 2);

        // further idle frames keep reporting rewards for the display but the
        // repeated no-op transition is not buffered again
        let events = c.tick(DT, InputState::default());
        assert_eq!(events, vec![Event::Reward(0.0)]);
        assert_eq!(c.buffer().len(), 2, "duplicate no-op discarded");
    }

    #[test]
    fn obstacle_aborts_step_and_rolls_back() {
        let mut c = controller(StepConfig::default());

        c.tick(DT, right());
        c.tick(DT, InputState::default()); // mid-step

        let events = c.collide(Hit::Obstacle);
        assert_eq!(events, vec![Event::Reward(-1.0)]);
        assert!(!c.kinematics().is_stepping(), "back to idle");
        assert_eq!(
            c.kinematics().position(),
            (64.0, 32.0),
            "rolled back to the pre-step position"
        );
        assert_eq!(c.buffer().len(), 1, "one terminal tuple collected");
    }

    #[test]
    fn obstacle_while_idle_is_ignored() {
        let mut c = controller(StepConfig::default());
        let events = c.collide(Hit::Obstacle);
        assert!(events.is_empty());
        assert!(c.buffer().is_empty());
    }

    #[test]
    fn goal_resets_to_start_and_ends_episode() {
        let config = StepConfig {
            start_x: 64.0,
            start_y: 32.0,
            ..Default::default()
        };
        let mut c = controller(config);

        c.tick(DT, right());
        c.tick(DT, InputState::default());
        c.tick(DT, InputState::default()); // at (96, 32) now

        let events = c.collide(Hit::Goal);
        assert_eq!(
            events,
            vec![Event::Reward(100.0), Event::EpisodeComplete],
            "terminal reward then episode signal"
        );
        assert_eq!(c.kinematics().position(), (64.0, 32.0), "reset to start");
        assert!(!c.kinematics().is_stepping());
    }

    #[test]
    fn autonomy_waits_for_quiet_period() {
        let mut c = controller(StepConfig::default());

        // human input pins control to the keyboard
        c.tick(DT, right());
        for _ in 0..10 {
            c.tick(DT, InputState::default());
        }
        let epsilon_before = c.epsilon();
        assert_eq!(epsilon_before, 1.0, "no decisions made, no annealing");

        // 5 seconds of silence hand control back to the policy
        for _ in 0..50 {
            c.tick(DT, InputState::default());
        }
        assert!(c.epsilon() < 1.0, "policy is deciding again");
    }

    #[test]
    fn autonomous_decisions_respect_frame_skip() {
        // a synced table makes the greedy choice deterministic once epsilon
        // bottoms out immediately
        let mut table = QTable::new(5);
        let values = vec![0.0, 0.0, 10.0, 0.0, 0.0];
        let mut synced = HashMap::new();
        for x in 0..8 {
            for y in 0..8 {
                synced.insert(GridState::new(x, y).key(), values.clone());
            }
        }
        table.replace(synced).unwrap();
        let policy = QPolicy::new(table, decay::Linear::new(1.0, 1.0, 0.0).unwrap());
        let mut c = StepController::new(StepConfig::default(), policy, DispatchBuffer::new(50));

        // frames 1-3 are gated off by the frame skip
        for _ in 0..3 {
            c.tick(0.01, InputState::default());
            assert!(!c.kinematics().is_stepping(), "no decision before frame 4");
        }

        c.tick(0.01, InputState::default());
        assert!(c.kinematics().is_stepping(), "frame 4 decides");
        assert_eq!(
            c.kinematics().destination().0,
            96.0,
            "greedy action moves right"
        );
        assert_eq!(c.epsilon(), 0.0, "annealed exactly once, on the decision tick");
    }

    #[test]
    fn pending_sync_applies_before_the_tick() {
        let (tx, rx) = mpsc::channel();
        let mut c = StepController::new(StepConfig::default(), policy(), DispatchBuffer::new(50))
            .with_table_updates(TableUpdates::new(rx));

        tx.send(HashMap::from([(
            String::from("(0, 0)"),
            vec![0.0; 5],
        )]))
        .unwrap();
        tx.send(HashMap::from([
            (String::from("(1, 1)"), vec![0.0; 5]),
            (String::from("(2, 2)"), vec![0.0; 5]),
        ]))
        .unwrap();

        c.tick(DT, InputState::default());
        assert_eq!(c.policy().table().len(), 2, "latest push won");
    }

    #[test]
    fn malformed_sync_keeps_running() {
        let (tx, rx) = mpsc::channel();
        let mut c = StepController::new(StepConfig::default(), policy(), DispatchBuffer::new(50))
            .with_table_updates(TableUpdates::new(rx));

        tx.send(HashMap::from([(String::from("(0, 0)"), vec![1.0])]))
            .unwrap();
        c.tick(DT, right());

        assert!(c.policy().table().is_empty(), "corrupt payload rejected");
        assert!(c.kinematics().is_stepping(), "tick proceeded normally");
    }

    #[test]
    fn missing_open_tuple_is_reported_and_recovered() {
        let mut c = controller(StepConfig::default());
        c.tick(DT, right());
        c.open = None; // corrupt the slot mid-step
        c.tick(DT, InputState::default());

        // step completion finds no open tuple, then the idle no-op records
        // a fresh one
        let events = c.tick(DT, InputState::default());
        assert_eq!(
            events,
            vec![Event::Reward(0.0), Event::Reward(0.0)],
            "rewards still reported to the display"
        );
        assert_eq!(c.buffer().len(), 1, "malformed tuple not collected");
        assert_eq!(
            c.open,
            Some(GridState::new(2, 0)),
            "collection restarted at the current state"
        );

        // the defect does not wedge the loop
        c.tick(DT, right());
        assert!(c.kinematics().is_stepping());
    }
}
