/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(init - rate * t, floor)
///
/// The anneal schedule used for epsilon: one unit of `t` per decision tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f32,
    init: f32,
    floor: f32,
}

impl Linear {
    pub fn new(rate: f32, init: f32, floor: f32) -> Result<Self, String> {
        if rate < 0.0 || init < floor {
            return Err(String::from("`rate` must be non-negative and `init` must not be below `floor`"));
        }
        Ok(Self { rate, init, floor })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, init, floor } = self;
        (init - rate * t).max(floor)
    }
}
