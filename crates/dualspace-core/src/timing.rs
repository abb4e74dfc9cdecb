//! Cycle pacing: clock sources and the step scheduler.

use std::time::{Duration, Instant};

use crate::execute::{step_one, Tracer};
use crate::{
    Console, MachineConfig, MachineState, RunOutcome, StepOutcome, TraceEvent, TraceSink,
};

/// Monotonic time source measured from an arbitrary epoch.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;

    /// Blocks (or advances virtual time) until `now() >= deadline`.
    fn wait_until(&mut self, deadline: Duration);
}

/// Wall clock that sleeps instead of spinning.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn wait_until(&mut self, deadline: Duration) {
        let remaining = deadline.saturating_sub(self.now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

/// Virtual clock for deterministic tests. Time only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock reading `now`.
    #[must_use]
    pub const fn starting_at(now: Duration) -> Self {
        Self { now }
    }

    /// Moves virtual time forward.
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn wait_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

/// Retires at most one instruction per elapsed cycle interval.
///
/// The last-step timestamp is taken after the step completes, so time spent
/// blocked on console input is not charged to the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    cycle: Duration,
    last_step_at: Duration,
}

impl Scheduler {
    /// Creates a scheduler whose first step is due one cycle from now.
    #[must_use]
    pub fn new(config: &MachineConfig, clock: &dyn Clock) -> Self {
        Self {
            cycle: config.cycle_duration,
            last_step_at: clock.now(),
        }
    }

    /// Time at which the previous step finished.
    #[must_use]
    pub const fn last_step_at(&self) -> Duration {
        self.last_step_at
    }

    /// Earliest time the next step may run.
    #[must_use]
    pub const fn next_due(&self) -> Duration {
        self.last_step_at.saturating_add(self.cycle)
    }

    /// Returns true when a full cycle has elapsed since the previous step.
    #[must_use]
    pub fn is_due(&self, clock: &dyn Clock) -> bool {
        clock.now().saturating_sub(self.last_step_at) >= self.cycle
    }

    /// Runs one step if it is due; `None` when it is not. A halted machine
    /// reports its cause without waiting for the cycle.
    pub fn poll(
        &mut self,
        state: &mut MachineState,
        console: &mut dyn Console,
        sink: &mut dyn TraceSink,
        config: &MachineConfig,
        clock: &dyn Clock,
    ) -> Option<StepOutcome> {
        if !state.run_state.is_halted() && !self.is_due(clock) {
            return None;
        }
        let outcome = step_one(state, console, sink, config);
        self.last_step_at = clock.now();
        Some(outcome)
    }

    /// Drives the machine until it halts, waiting on `clock` between steps.
    pub fn run(
        &mut self,
        state: &mut MachineState,
        console: &mut dyn Console,
        sink: &mut dyn TraceSink,
        config: &MachineConfig,
        clock: &mut dyn Clock,
    ) -> RunOutcome {
        Tracer::new(sink, config, state.pc, state.mode).emit(TraceEvent::Started {
            pc: state.pc,
            mode: state.mode,
        });

        let mut steps = 0;
        loop {
            if !state.run_state.is_halted() {
                clock.wait_until(self.next_due());
            }
            match self.poll(state, console, sink, config, clock) {
                Some(StepOutcome::Retired { .. }) => steps += 1,
                Some(final_step @ StepOutcome::Halted { .. }) => {
                    return RunOutcome { steps, final_step };
                }
                None => {}
            }
        }
    }
}
