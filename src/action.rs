use strum::{EnumIter, FromRepr};

/// Discrete actions available to the grid-world agent
///
/// The repr values are shared with the remote learner: Q-value vectors are
/// indexed by them and dispatched tuples carry them, so the numbering is part
/// of the wire contract. `Nothing` is the canonical no-op.
#[derive(EnumIter, FromRepr, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Nothing = 0,
    Up = 1,
    Right = 2,
    Down = 3,
    Left = 4,
}

impl Action {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(ix: usize) -> Option<Self> {
        Self::from_repr(ix)
    }

    /// Unit displacement in tile units, screen convention (up is negative y)
    pub fn displacement(self) -> (f32, f32) {
        match self {
            Action::Nothing => (0.0, 0.0),
            Action::Up => (0.0, -1.0),
            Action::Right => (1.0, 0.0),
            Action::Down => (0.0, 1.0),
            Action::Left => (-1.0, 0.0),
        }
    }

    pub fn is_noop(self) -> bool {
        matches!(self, Action::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn index_round_trip() {
        for action in Action::iter() {
            assert_eq!(
                Action::from_index(action.index()),
                Some(action),
                "repr round-trips"
            );
        }
        assert!(
            Action::from_index(Action::COUNT).is_none(),
            "out-of-range index is rejected"
        );
    }

    #[test]
    fn displacements() {
        assert_eq!(Action::Nothing.displacement(), (0.0, 0.0));
        assert_eq!(Action::Up.displacement(), (0.0, -1.0));
        assert_eq!(Action::Right.displacement(), (1.0, 0.0));
        assert_eq!(Action::Down.displacement(), (0.0, 1.0));
        assert_eq!(Action::Left.displacement(), (-1.0, 0.0));
    }
}
