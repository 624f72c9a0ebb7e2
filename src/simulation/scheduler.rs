//! Wall-clock cadence for automatic stepping.
//!
//! The scheduler never sleeps or spawns threads: the host feeds it elapsed wall
//! time through [`SimulationScheduler::advance`] and it runs as many frames as
//! the cadence `1 / (frequency * time_scale)` allows. The time step inside a
//! frame is always the graph's fixed `1 / frequency`.

use std::time::Duration;

use tracing::info;

use super::error::ConfigError;
use super::graph::{EntityGraph, FrameReport};

/// Upper bound of frames run by a single [`SimulationScheduler::advance`] call.
///
/// Backlog beyond this is dropped.
pub const MAX_CATCH_UP_FRAMES: usize = 10;

/// Start/stop state and cadence of automatic stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationScheduler {
    time_scale: f64,
    running: bool,
    backlog: Duration,
}

impl Default for SimulationScheduler {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            running: false,
            backlog: Duration::ZERO,
        }
    }
}

impl SimulationScheduler {
    /// Creates a stopped scheduler running at real time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stopped scheduler with a time scale.
    pub fn with_time_scale(time_scale: f64) -> Result<Self, ConfigError> {
        let mut scheduler = Self::new();
        scheduler.set_time_scale(time_scale)?;
        Ok(scheduler)
    }

    /// Speed of simulated time relative to wall time; `0` pauses stepping.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Sets the time scale.
    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), ConfigError> {
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(ConfigError::invalid(
                "time_scale",
                format!("must be finite and non-negative, got {time_scale}"),
            ));
        }
        self.time_scale = time_scale;
        Ok(())
    }

    /// Whether automatic stepping is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wall time between two automatic frames, `None` when paused by a zero
    /// time scale.
    pub fn interval(&self, graph: &EntityGraph) -> Option<Duration> {
        let rate = graph.simulation_frequency() * self.time_scale;
        (rate > 0.0).then(|| Duration::from_secs_f64(1.0 / rate))
    }

    /// Starts automatic stepping, optionally resetting the graph clock.
    pub fn start(&mut self, graph: &mut EntityGraph, reset: bool) {
        if reset {
            graph.reset_time();
        }
        if !self.running {
            info!(
                frequency = graph.simulation_frequency(),
                time_scale = self.time_scale,
                reset,
                "simulation started"
            );
        }
        self.running = true;
        self.backlog = Duration::ZERO;
    }

    /// Stops automatic stepping.
    pub fn stop(&mut self) {
        if self.running {
            info!("simulation stopped");
        }
        self.running = false;
        self.backlog = Duration::ZERO;
    }

    /// Runs exactly one frame, whether or not the scheduler is running.
    pub fn step(&mut self, graph: &mut EntityGraph) -> FrameReport {
        graph.simulate_frame()
    }

    /// Accounts for `elapsed` wall time and runs the frames that became due.
    pub fn advance(&mut self, graph: &mut EntityGraph, elapsed: Duration) -> Vec<FrameReport> {
        let Some(interval) = self.interval(graph).filter(|_| self.running) else {
            return Vec::new();
        };

        self.backlog += elapsed;
        let mut reports = Vec::new();
        while self.backlog >= interval && reports.len() < MAX_CATCH_UP_FRAMES {
            self.backlog -= interval;
            reports.push(graph.simulate_frame());
        }
        if reports.len() == MAX_CATCH_UP_FRAMES {
            self.backlog = self.backlog.min(interval);
        }
        reports
    }
}
