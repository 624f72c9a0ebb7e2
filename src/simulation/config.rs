//! Configuration of a road simulation run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::controllers::CarPhysicsParameters;
use super::error::ConfigError;
use super::parameters::CarParameterSet;

/// A traffic car cruising in a lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficCar {
    /// Lane index counted from the left.
    pub lane: usize,
    /// Starting Y position in meters.
    pub start: f32,
    /// Cruise speed in m/s.
    pub speed: f32,
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Nominal simulation frequency in Hz; each frame advances `1 / frequency` seconds.
    pub simulation_frequency: f64,
    /// Speed of simulated time relative to wall time when stepping in real time.
    pub time_scale: f64,
    /// Number of road lanes.
    pub lane_count: usize,
    /// Width of one lane in meters.
    pub lane_width: f32,
    /// Traffic cars. When empty, `random_traffic` cars are placed at random.
    pub traffic: Vec<TrafficCar>,
    /// Number of randomly placed traffic cars when `traffic` is empty.
    pub random_traffic: usize,
    /// Lane the network driven cars start in.
    pub start_lane: usize,
    /// Number of network driven cars.
    pub population: usize,
    /// Hidden layer widths of every car network.
    pub hidden_layers: Vec<usize>,
    /// Mutation applied to copies of a loaded network, in `[0, 1]`.
    pub mutation_amount: f64,
    /// Range of every distance sensor in meters.
    pub sensor_range: f32,
    /// Car dimensions.
    pub car: CarParameterSet,
    /// Car physics tuning.
    pub physics: CarPhysicsParameters,
    /// Seed for network initialisation and traffic placement.
    pub seed: Option<u64>,
    /// Frame limit of a headless run.
    pub max_frames: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation_frequency: 60.0,
            time_scale: 1.0,
            lane_count: 3,
            lane_width: 3.0,
            traffic: vec![TrafficCar {
                lane: 0,
                start: 10.0,
                speed: 10.0,
            }],
            random_traffic: 0,
            start_lane: 1,
            population: 1,
            hidden_layers: vec![6],
            mutation_amount: 0.1,
            sensor_range: 8.0,
            car: CarParameterSet::default(),
            physics: CarPhysicsParameters::default(),
            seed: None,
            max_frames: 3600,
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// Missing fields take their default values.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.simulation_frequency.is_finite() || self.simulation_frequency <= 0.0 {
            return Err(ConfigError::invalid(
                "simulation_frequency",
                format!("must be positive, got {}", self.simulation_frequency),
            ));
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::invalid(
                "time_scale",
                format!("must be non-negative, got {}", self.time_scale),
            ));
        }
        if self.lane_count == 0 {
            return Err(ConfigError::invalid("lane_count", "a road needs at least one lane"));
        }
        if !positive(self.lane_width) {
            return Err(ConfigError::invalid(
                "lane_width",
                format!("must be positive, got {}", self.lane_width),
            ));
        }
        if self.start_lane >= self.lane_count {
            return Err(ConfigError::invalid(
                "start_lane",
                format!("lane {} does not exist on a {}-lane road", self.start_lane, self.lane_count),
            ));
        }
        if let Some(car) = self.traffic.iter().find(|car| car.lane >= self.lane_count) {
            return Err(ConfigError::invalid(
                "traffic",
                format!("lane {} does not exist on a {}-lane road", car.lane, self.lane_count),
            ));
        }
        if self.hidden_layers.contains(&0) {
            return Err(ConfigError::invalid("hidden_layers", "layers need at least one neuron"));
        }
        if !(0.0..=1.0).contains(&self.mutation_amount) {
            return Err(ConfigError::invalid(
                "mutation_amount",
                format!("must be within [0, 1], got {}", self.mutation_amount),
            ));
        }
        if !positive(self.sensor_range) {
            return Err(ConfigError::invalid(
                "sensor_range",
                format!("must be positive, got {}", self.sensor_range),
            ));
        }
        if !(positive(self.car.width) && positive(self.car.length)) {
            return Err(ConfigError::invalid("car", "width and length must be positive"));
        }
        self.physics.validate()
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
