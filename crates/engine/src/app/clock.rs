use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

/// Turns variable frame times into a whole number of fixed physics ticks.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl FixedStepClock {
    pub fn new(config: ClockConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / f64::from(target_tps)),
            max_frame_delta: if config.max_frame_delta.is_zero() {
                ClockConfig::default().max_frame_delta
            } else {
                config.max_frame_delta
            },
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn fixed_dt_seconds(&self) -> f32 {
        self.fixed_dt.as_secs_f32()
    }

    /// Feeds one frame's elapsed time and returns how many ticks to run now.
    pub fn advance(&mut self, frame_dt: Duration) -> StepPlan {
        let backlog = self
            .accumulator
            .saturating_add(frame_dt.min(self.max_frame_delta));
        let plan = split_backlog(backlog, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = plan.remaining_accumulator;

        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }
        plan
    }
}

/// Splits `backlog` into whole ticks, at most `max_ticks`. A remainder still
/// worth a full tick after the cap is dropped instead of carried.
fn split_backlog(backlog: Duration, fixed_dt: Duration, max_ticks: u32) -> StepPlan {
    let whole_ticks = backlog.as_nanos() / fixed_dt.as_nanos().max(1);
    let ticks_to_run = u32::try_from(whole_ticks)
        .unwrap_or(u32::MAX)
        .min(max_ticks);
    let remainder = backlog.saturating_sub(fixed_dt.saturating_mul(ticks_to_run));

    if remainder >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: remainder,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: remainder,
            dropped_backlog: Duration::ZERO,
        }
    }
}
