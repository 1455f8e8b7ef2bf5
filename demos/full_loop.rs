//! Headless wiring demo: a scripted player, a goal tile, and a stub learner
//! thread exchanging experience batches and table syncs with the collector.
//!
//! Run with `RUST_LOG=debug` to watch flushes and sync applications.

use std::{collections::HashMap, sync::mpsc, thread};

use gridstep::{
    buffer::{DispatchBuffer, Sars},
    collector::{Hit, InputState, StepConfig, StepController},
    decay,
    harness::Scoreboard,
    link::{ExperienceSink, TableUpdates},
    policy::QPolicy,
    state::{Discretizer, GridState},
    table::QTable,
};

fn main() {
    env_logger::init();

    let (batch_tx, batch_rx) = mpsc::channel::<(String, Vec<Sars>)>();
    let (table_tx, table_rx) = mpsc::channel();

    // stub learner: acknowledges every batch by pushing back a table that
    // favors walking right everywhere
    let learner = thread::spawn(move || {
        let mut batches = 0u32;
        while let Ok((name, batch)) = batch_rx.recv() {
            batches += 1;
            println!("learner received {} tuples on `{name}`", batch.len());
            let mut table = HashMap::new();
            for x in 0..8 {
                for y in 0..8 {
                    table.insert(GridState::new(x, y).key(), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
                }
            }
            let _ = table_tx.send(table);
        }
        batches
    });

    let policy = QPolicy::new(
        QTable::new(5),
        decay::Linear::new(0.0004, 1.0, 0.0).expect("valid schedule"),
    );
    let buffer = DispatchBuffer::new(50).with_sink(ExperienceSink::new("maze_runner", batch_tx));
    let mut controller = StepController::new(StepConfig::default(), policy, buffer)
        .with_table_updates(TableUpdates::new(table_rx));
    let mut board = Scoreboard::new();

    let discretizer = Discretizer::default();
    let goal = GridState::new(7, 4);
    let dt = 0.016;

    for frame in 0..20_000u32 {
        // a short burst of human input at the start, then the quiet period
        // expires and the policy drives
        let inputs = if frame < 60 {
            InputState {
                right: frame % 20 < 10,
                ..Default::default()
            }
        } else {
            InputState::default()
        };

        let events = controller.tick(dt, inputs);
        board.apply(&events);

        let (x, y) = controller.kinematics().position();
        if discretizer.discretize(x, y) == goal {
            board.apply(&controller.collide(Hit::Goal));
        }
    }

    let epsilon = controller.epsilon();
    // hang up the experience channel so the learner thread exits
    drop(controller);
    let batches = learner.join().expect("learner thread");

    println!(
        "episodes: {}, total reward: {}, avg reward: {:.2}, epsilon: {:.4}, batches: {batches}",
        board.episodes(),
        board.total(),
        board.average(),
        epsilon,
    );
}
