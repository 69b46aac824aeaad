use std::collections::VecDeque;
use std::process::ExitCode;
use std::time::Duration;

use engine::{ClockConfig, FixedStepClock};
use tracing::{debug, error, info, warn};

use super::bootstrap::{build_app, AppWiring};
use super::script::{InputScript, ScriptFrame};
use super::session::Session;

/// Wall time handed to the clock per simulated render frame.
const RENDER_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) quit_requested: bool,
}

pub(crate) fn run() -> ExitCode {
    let app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let AppWiring {
        mut session,
        script,
        clock,
    } = app;
    let summary = drive(&mut session, &script, clock);
    let position = session.player_position();
    info!(
        ticks = summary.ticks,
        quit_requested = summary.quit_requested,
        map = ?session.current_map(),
        player_x = position.x,
        player_y = position.y,
        selected = ?session.selected_entities(),
        "script_finished"
    );
    ExitCode::SUCCESS
}

/// Replays `script` through a fixed-step clock, one render frame at a time.
///
/// Every frame gets at least one tick. A frame too short for the clock to
/// tick is deferred and runs its first-tick input on the next tick, ahead of
/// the frame that follows it.
pub(crate) fn drive(session: &mut Session, script: &InputScript, clock: ClockConfig) -> RunSummary {
    let mut clock = FixedStepClock::new(clock);
    let fixed_dt_seconds = clock.fixed_dt_seconds();
    let mut ticks = 0u64;
    let mut deferred: VecDeque<&ScriptFrame> = VecDeque::new();

    for frame in &script.frames {
        let mut remaining = frame.duration();
        let mut first_tick = true;
        while !remaining.is_zero() {
            let frame_dt = remaining.min(RENDER_FRAME);
            remaining -= frame_dt;

            let plan = clock.advance(frame_dt);
            for _ in 0..plan.ticks_to_run {
                let input = match deferred.pop_front() {
                    Some(earlier) => earlier.snapshot(true),
                    None => {
                        let input = frame.snapshot(first_tick);
                        first_tick = false;
                        input
                    }
                };
                if input.quit_requested() {
                    info!(ticks, "quit_requested");
                    return RunSummary {
                        ticks,
                        quit_requested: true,
                    };
                }
                session.tick(&input, fixed_dt_seconds);
                ticks += 1;
            }
        }
        if first_tick {
            debug!(duration_ms = frame.duration_ms, "script_frame_deferred");
            deferred.push_back(frame);
        }
    }

    if !deferred.is_empty() {
        warn!(frames = deferred.len(), "script_frames_never_ticked");
    }
    RunSummary {
        ticks,
        quit_requested: false,
    }
}
