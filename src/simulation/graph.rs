//! The entity graph: owns every entity and steps the simulation frame by frame.

use std::fmt;

use tracing::{trace, warn};

use super::entity::{Entity, EntityId, FrameTime, Others};
use super::error::{ConfigError, SimulationError};

/// Default nominal simulation frequency in Hz.
pub const DEFAULT_SIMULATION_FREQUENCY: f64 = 60.0;

/// A fault raised by one entity during a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFault {
    /// The entity whose update failed.
    pub entity: EntityId,
    /// What went wrong.
    pub error: SimulationError,
}

/// Outcome of one [`EntityGraph::simulate_frame`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Simulation time after the frame, in seconds.
    pub simulation_time: f64,
    /// Number of frames simulated so far, including this one.
    pub frame_count: u64,
    /// Fault that aborted the rest of the frame, if any.
    pub fault: Option<FrameFault>,
}

impl FrameReport {
    /// Whether every entity was simulated.
    pub fn is_ok(&self) -> bool {
        self.fault.is_none()
    }
}

type FrameObserver = Box<dyn FnMut(&FrameReport)>;

/// Ordered collection of entities plus the simulation clock.
///
/// Entities are simulated in insertion order; within an entity all sensors run
/// before all controllers. Entities updated earlier in a frame are seen by
/// later ones in their new pose.
pub struct EntityGraph {
    entities: Vec<Entity>,
    frame_count: u64,
    simulation_time: f64,
    simulation_frequency: f64,
    observers: Vec<FrameObserver>,
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGraph")
            .field("entities", &self.entities)
            .field("frame_count", &self.frame_count)
            .field("simulation_time", &self.simulation_time)
            .field("simulation_frequency", &self.simulation_frequency)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EntityGraph {
    /// Creates an empty graph running at [`DEFAULT_SIMULATION_FREQUENCY`].
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            frame_count: 0,
            simulation_time: 0.0,
            simulation_frequency: DEFAULT_SIMULATION_FREQUENCY,
            observers: Vec::new(),
        }
    }

    /// Creates an empty graph with the given nominal frequency.
    pub fn with_frequency(simulation_frequency: f64) -> Result<Self, ConfigError> {
        let mut graph = Self::new();
        graph.set_simulation_frequency(simulation_frequency)?;
        Ok(graph)
    }

    /// Adds an entity and returns its handle.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.set_id(id);
        self.entities.push(entity);
        id
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entity by handle.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Entity by handle, mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    /// Number of simulated frames.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total simulated time in seconds.
    pub fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    /// Nominal simulation frequency in Hz.
    pub fn simulation_frequency(&self) -> f64 {
        self.simulation_frequency
    }

    /// Fixed time step of every frame, `1 / simulation_frequency`.
    pub fn time_delta(&self) -> f64 {
        1.0 / self.simulation_frequency
    }

    /// Sets the nominal simulation frequency.
    pub fn set_simulation_frequency(&mut self, frequency: f64) -> Result<(), ConfigError> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(ConfigError::invalid(
                "simulation_frequency",
                format!("must be positive, got {frequency}"),
            ));
        }
        self.simulation_frequency = frequency;
        Ok(())
    }

    /// Resets frame count and simulation time to zero.
    pub fn reset_time(&mut self) {
        self.frame_count = 0;
        self.simulation_time = 0.0;
    }

    /// Registers a callback invoked after every simulated frame.
    pub fn on_frame_simulated(&mut self, observer: impl FnMut(&FrameReport) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Simulates one frame.
    ///
    /// The clock always advances by one step. A fault in one entity skips the
    /// remaining entities of this frame and is returned in the report; changes
    /// made before the fault are kept.
    pub fn simulate_frame(&mut self) -> FrameReport {
        self.frame_count += 1;
        let time_delta = self.time_delta();
        self.simulation_time += time_delta;

        let time = FrameTime {
            simulation_time: self.simulation_time,
            time_delta,
        };

        let fault = self.simulate_entities(time).err();
        if let Some(fault) = &fault {
            warn!(
                frame = self.frame_count,
                entity = %fault.entity,
                error = %fault.error,
                "frame aborted"
            );
        } else {
            trace!(frame = self.frame_count, time = self.simulation_time, "frame simulated");
        }

        let report = FrameReport {
            simulation_time: self.simulation_time,
            frame_count: self.frame_count,
            fault,
        };

        for observer in &mut self.observers {
            observer(&report);
        }

        report
    }

    fn simulate_entities(&mut self, time: FrameTime) -> Result<(), FrameFault> {
        for index in 0..self.entities.len() {
            let (before, rest) = self.entities.split_at_mut(index);
            let Some((entity, after)) = rest.split_first_mut() else {
                break;
            };
            entity
                .simulate(Others::new(before, after), time)
                .map_err(|error| FrameFault {
                    entity: EntityId(index),
                    error,
                })?;
        }
        Ok(())
    }
}
