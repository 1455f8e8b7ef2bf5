/// A discretized agent state: tile coordinates on the grid
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GridState {
    pub x: i32,
    pub y: i32,
}

impl GridState {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical table key, e.g. `(3, 5)`
    ///
    /// This is the exact string form the remote learner uses to key its
    /// table, so it must stay stable across versions.
    pub fn key(&self) -> String {
        format!("({}, {})", self.x, self.y)
    }

    /// Parse a canonical key back into a state
    pub fn from_key(key: &str) -> Option<Self> {
        let inner = key.strip_prefix('(')?.strip_suffix(')')?;
        let (x, y) = inner.split_once(',')?;
        Some(Self {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }
}

/// Maps continuous positions to tile coordinates
///
/// Each axis is `trunc((p - origin) / tile_size)`, clamped to
/// `[0, max_index]` so the far edge tile folds back onto the last playable
/// index (the original 9-column grid folded index 8 to 7).
#[derive(Clone, Copy, Debug)]
pub struct Discretizer {
    pub origin: f32,
    pub tile_size: f32,
    pub max_index: i32,
}

impl Discretizer {
    pub fn discretize(&self, x: f32, y: f32) -> GridState {
        GridState::new(self.axis(x), self.axis(y))
    }

    fn axis(&self, p: f32) -> i32 {
        (((p - self.origin) / self.tile_size) as i32).clamp(0, self.max_index)
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        Self {
            origin: 20.0,
            tile_size: 32.0,
            max_index: 7,
        }
    }
}
