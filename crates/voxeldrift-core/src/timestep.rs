//! Step scheduling
//!
//! Turns host `tick(now)` calls into a number of simulation steps. Without a
//! fixed step every tick is exactly one step. With one, wall time accumulates
//! and is spent in fixed-size steps, capped per tick so a stalled host does
//! not trigger a burst of catch-up work.

use crate::settings::TimestepSettings;

#[derive(Debug, Clone)]
pub struct StepClock {
    fixed_step_ms: Option<f64>,
    max_steps_per_tick: u32,
    last_tick_ms: Option<f64>,
    accumulator_ms: f64,
}

impl StepClock {
    pub fn new(settings: &TimestepSettings) -> Self {
        Self {
            fixed_step_ms: settings.fixed_step_ms.filter(|step| *step > 0.0),
            max_steps_per_tick: settings.max_steps_per_tick.max(1),
            last_tick_ms: None,
            accumulator_ms: 0.0,
        }
    }

    /// Forget accumulated time; the next tick re-primes the clock
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
        self.accumulator_ms = 0.0;
    }

    /// Number of steps to run for a tick at `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(step) = self.fixed_step_ms else {
            self.last_tick_ms = Some(now_ms);
            return 1;
        };

        let Some(last) = self.last_tick_ms.replace(now_ms) else {
            return 0;
        };

        // A clock that runs backwards contributes nothing
        self.accumulator_ms += (now_ms - last).max(0.0);

        let mut steps = 0;
        while self.accumulator_ms >= step && steps < self.max_steps_per_tick {
            self.accumulator_ms -= step;
            steps += 1;
        }

        // Drop backlog beyond the cap instead of carrying it forever
        if self.accumulator_ms >= step {
            log::debug!(
                "Step clock behind by {:.1}ms, dropping backlog",
                self.accumulator_ms
            );
            self.accumulator_ms %= step;
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(step: f64, cap: u32) -> StepClock {
        StepClock::new(&TimestepSettings {
            fixed_step_ms: Some(step),
            max_steps_per_tick: cap,
        })
    }

    #[test]
    fn test_variable_mode_one_step_per_tick() {
        let mut clock = StepClock::new(&TimestepSettings::default());
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(1000.0), 1);
    }

    #[test]
    fn test_fixed_mode_primes_then_accumulates() {
        let mut clock = fixed(10.0, 4);
        assert_eq!(clock.advance(100.0), 0);
        assert_eq!(clock.advance(105.0), 0);
        assert_eq!(clock.advance(115.0), 1);
        assert_eq!(clock.advance(135.0), 2);
    }

    #[test]
    fn test_fixed_mode_caps_and_drops_backlog() {
        let mut clock = fixed(10.0, 3);
        clock.advance(0.0);
        assert_eq!(clock.advance(1000.0), 3);
        // Backlog was dropped, so a short gap yields no burst
        assert_eq!(clock.advance(1005.0), 0);
    }

    #[test]
    fn test_backwards_clock_is_ignored() {
        let mut clock = fixed(10.0, 3);
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0);
        assert_eq!(clock.advance(60.0), 1);
    }

    #[test]
    fn test_reset_reprimes() {
        let mut clock = fixed(10.0, 3);
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(500.0), 0);
        assert_eq!(clock.advance(510.0), 1);
    }

    #[test]
    fn test_non_positive_step_falls_back_to_variable() {
        let mut clock = fixed(0.0, 3);
        assert_eq!(clock.advance(0.0), 1);
    }
}
