#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep<A> {
    /// Yields the action for exactly one tick.
    Do(A),
    /// Yields the action on each of `ticks` consecutive ticks.
    Hold { ticks: u32, action: A },
    Wait(u32),
}

/// Tick-driven step sequence. Each call to [`Script::resume`] advances by one
/// tick and returns that tick's action, if any.
#[derive(Debug, Clone)]
pub struct Script<A> {
    steps: Vec<ScriptStep<A>>,
    looping: bool,
    index: usize,
    ticks_in_step: u32,
}

impl<A: Clone> Script<A> {
    pub fn new(steps: Vec<ScriptStep<A>>) -> Self {
        Self {
            steps,
            looping: false,
            index: 0,
            ticks_in_step: 0,
        }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn is_finished(&self) -> bool {
        !self.looping && self.index >= self.steps.len()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.ticks_in_step = 0;
    }

    pub fn resume(&mut self) -> Option<A> {
        if self.steps.is_empty() {
            return None;
        }
        // Zero-length holds and waits take no ticks; skip them so every
        // resume lands on a step that consumes one.
        for _ in 0..=self.steps.len() {
            if self.index >= self.steps.len() {
                if !self.looping {
                    return None;
                }
                self.index = 0;
            }
            let duration = step_duration(&self.steps[self.index]);
            if duration == 0 {
                self.index += 1;
                continue;
            }

            let action = match &self.steps[self.index] {
                ScriptStep::Do(action) | ScriptStep::Hold { action, .. } => Some(action.clone()),
                ScriptStep::Wait(_) => None,
            };
            self.ticks_in_step += 1;
            if self.ticks_in_step >= duration {
                self.ticks_in_step = 0;
                self.index += 1;
            }
            return action;
        }
        None
    }
}

fn step_duration<A>(step: &ScriptStep<A>) -> u32 {
    match step {
        ScriptStep::Do(_) => 1,
        ScriptStep::Hold { ticks, .. } => *ticks,
        ScriptStep::Wait(ticks) => *ticks,
    }
}
