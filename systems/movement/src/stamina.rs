//! Stamina pool shared by sprinting, wall-running and jumping.

/// Normalised stamina in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stamina {
    value: f32,
}

impl Stamina {
    pub(crate) const fn full() -> Self {
        Self { value: 1.0 }
    }

    pub(crate) const fn level(self) -> f32 {
        self.value
    }

    pub(crate) fn is_empty(self) -> bool {
        self.value <= 0.0
    }

    /// Reports whether `cost` can be paid without going negative.
    pub(crate) fn can_afford(self, cost: f32) -> bool {
        self.value > 0.0 && self.value >= cost
    }

    /// Pays `cost` if affordable; otherwise leaves the pool untouched.
    pub(crate) fn spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.set(self.value - cost);
        true
    }

    pub(crate) fn drain(&mut self, amount: f32) {
        self.set(self.value - amount);
    }

    pub(crate) fn regenerate(&mut self, amount: f32) {
        self.set(self.value + amount);
    }

    fn set(&mut self, value: f32) {
        self.value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

impl Default for Stamina {
    fn default() -> Self {
        Self::full()
    }
}
