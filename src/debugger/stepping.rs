/// Step budget shared between the controller and the context being advanced.
///
/// The controller arms it before each `step` call; the context consumes one
/// unit per executed command and reports back through the remaining count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepBudget {
    move_steps: u32,
    is_step_over: bool,
    /// Scope depth recorded when a step-over was requested. `None` = not tracking.
    step_over_depth: Option<usize>,
}

impl StepBudget {
    pub fn new(steps: u32) -> Self {
        Self {
            move_steps: steps,
            ..Self::default()
        }
    }

    pub fn step_over(steps: u32, depth: usize) -> Self {
        Self {
            move_steps: steps,
            is_step_over: true,
            step_over_depth: Some(depth),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.move_steps
    }

    pub fn is_exhausted(&self) -> bool {
        self.move_steps == 0
    }

    pub fn is_step_over(&self) -> bool {
        self.is_step_over
    }

    pub fn step_over_depth(&self) -> Option<usize> {
        self.step_over_depth
    }

    /// Spend one unit. Returns false if nothing was left to spend.
    pub fn consume(&mut self) -> bool {
        if self.move_steps == 0 {
            return false;
        }
        self.move_steps -= 1;
        true
    }

    /// Whether a command running at `depth` runs through without pausing.
    pub fn runs_through(&self, depth: usize) -> bool {
        match self.step_over_depth {
            Some(target) if self.is_step_over => depth > target,
            _ => false,
        }
    }

    pub(crate) fn set_steps(&mut self, steps: u32) {
        self.move_steps = steps;
    }

    pub(crate) fn arm_step_over(&mut self, depth: usize) {
        self.is_step_over = true;
        self.step_over_depth = Some(depth);
    }

    pub(crate) fn disarm_step_over(&mut self) {
        self.is_step_over = false;
        self.step_over_depth = None;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_stops_at_zero() {
        let mut budget = StepBudget::new(2);
        assert!(budget.consume());
        assert!(budget.consume());
        assert!(!budget.consume(), "empty budget must not go negative");
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_runs_through_only_strictly_deeper() {
        let budget = StepBudget::step_over(1, 2);
        assert!(!budget.runs_through(1));
        assert!(!budget.runs_through(2));
        assert!(budget.runs_through(3));

        let plain = StepBudget::new(1);
        assert!(!plain.runs_through(10), "plain step never runs through");
    }
}
