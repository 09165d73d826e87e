//! Step index bookkeeping
//!
//! The navigator knows nothing about documents or sessions; callers pass in
//! the current gate result and the in-flight flag.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNavigator {
    index: usize,
    len: usize,
}

impl StepNavigator {
    /// A navigator over `len` steps, positioned on the first. `len` is at least one.
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    pub fn can_advance(&self, gate_passes: bool, in_flight: bool) -> bool {
        !self.is_last() && gate_passes && !in_flight
    }

    pub fn can_retreat(&self, in_flight: bool) -> bool {
        !self.is_first() && !in_flight
    }

    /// Revisiting the current or an earlier step is allowed; skipping ahead is not
    pub fn can_jump_to(&self, target: usize, in_flight: bool) -> bool {
        target <= self.index && !in_flight
    }

    pub fn advance(&mut self, gate_passes: bool, in_flight: bool) -> bool {
        if !self.can_advance(gate_passes, in_flight) {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn retreat(&mut self, in_flight: bool) -> bool {
        if !self.can_retreat(in_flight) {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn jump_to(&mut self, target: usize, in_flight: bool) -> bool {
        if !self.can_jump_to(target, in_flight) {
            return false;
        }
        self.index = target;
        true
    }
}
