/// Discrete action space of the grid world
pub mod action;

/// Experience tuples and the bounded dispatch buffer
pub mod buffer;

/// Agent step controller and experience assembly
pub mod collector;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Exploration policies
pub mod exploration;

/// Score and episode bookkeeping for the surrounding harness
pub mod harness;

/// Channel endpoints toward the remote learner
pub mod link;

/// Epsilon-greedy action selection over the Q-table
pub mod policy;

/// Discretized grid states and their canonical string keys
pub mod state;

/// Sparse Q-value table
pub mod table;
