//! Entities and the component traits they are composed of.
//!
//! An entity is a positioned, headed bag of components. Components are owned by
//! exactly one entity and never hold a reference back to it: whenever a
//! component runs it is handed a context describing its owner (pose, sibling
//! components and, once the entity is part of a graph, its [`EntityId`]).

use std::any::Any;
use std::fmt;

use super::colliders::Collider;
use super::controllers::{Controller, DrivingInput};
use super::error::SimulationError;
use super::geometry::Point;
use super::sensors::Sensor;

/// Handle of an entity inside an [`EntityGraph`](super::graph::EntityGraph).
///
/// Handles are insertion indices; entities are never removed from a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Insertion index of the entity.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position in meters and heading in radians (`0` faces `+Y`, clockwise positive).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Position in meters.
    pub position: Point,
    /// Heading in radians.
    pub angle: f32,
}

impl Pose {
    /// Creates a pose.
    pub fn new(position: Point, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Whether both position and heading are finite.
    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite() && self.angle.is_finite()
    }
}

/// Simulation clock values for the frame being simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Simulation time at the end of this frame, in seconds.
    pub simulation_time: f64,
    /// Fixed step of this frame, in seconds.
    pub time_delta: f64,
}

/// Upcast helper so components can be looked up by concrete type.
pub trait AsAny: Any {
    /// Returns `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as mutable [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Static per-entity data such as car dimensions or road layout.
pub trait ParameterSet: AsAny + fmt::Debug {}

/// The other entities of the graph while one entity is being simulated.
#[derive(Debug, Clone, Copy)]
pub struct Others<'a> {
    before: &'a [Entity],
    after: &'a [Entity],
}

impl<'a> Others<'a> {
    pub(crate) fn new(before: &'a [Entity], after: &'a [Entity]) -> Self {
        Self { before, after }
    }

    /// No other entities.
    pub fn none() -> Self {
        Self {
            before: &[],
            after: &[],
        }
    }

    /// Iterates the other entities in graph order.
    pub fn iter(self) -> impl Iterator<Item = &'a Entity> {
        self.before.iter().chain(self.after.iter())
    }

    /// Number of other entities.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Whether there are no other entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a collider sees of its owner when asked for geometry.
#[derive(Debug, Clone, Copy)]
pub struct ColliderOwner<'a> {
    /// Current pose of the owner.
    pub pose: Pose,
    /// Parameter sets of the owner.
    pub parameters: &'a [Box<dyn ParameterSet>],
}

impl ColliderOwner<'_> {
    /// First parameter set of type `T`.
    pub fn parameter_set<T: ParameterSet>(&self) -> Option<&T> {
        first_of(self.parameters)
    }
}

/// Context handed to sensors.
#[derive(Debug, Clone, Copy)]
pub struct SensorContext<'a> {
    /// Owner handle.
    pub owner: Option<EntityId>,
    /// Owner pose at the start of its update.
    pub pose: Pose,
    /// Every other entity of the graph.
    pub others: Others<'a>,
    /// Frame clock.
    pub time: FrameTime,
}

/// Context handed to controllers.
#[derive(Debug)]
pub struct ControllerContext<'a> {
    /// Owner handle.
    pub owner: Option<EntityId>,
    /// Owner pose; controllers move the entity by writing to it.
    pub pose: &'a mut Pose,
    /// Owner parameter sets.
    pub parameters: &'a [Box<dyn ParameterSet>],
    /// Owner colliders.
    pub colliders: &'a [Box<dyn Collider>],
    /// Owner sensors, already simulated this frame.
    pub sensors: &'a [Box<dyn Sensor>],
    /// Input of the owner's first input controller, if any.
    pub driving_input: Option<DrivingInput>,
    /// Every other entity of the graph.
    pub others: Others<'a>,
    /// Frame clock.
    pub time: FrameTime,
}

impl ControllerContext<'_> {
    /// The owner as seen by its colliders.
    pub fn collider_owner(&self) -> ColliderOwner<'_> {
        ColliderOwner {
            pose: *self.pose,
            parameters: self.parameters,
        }
    }

    /// First owner parameter set of type `T`.
    pub fn parameter_set<T: ParameterSet>(&self) -> Option<&T> {
        first_of(self.parameters)
    }

    /// First owner collider of type `T`.
    pub fn collider<T: Collider>(&self) -> Option<&T> {
        first_of(self.colliders)
    }

    /// Normalized readings of all owner sensors in attachment order.
    pub fn sensor_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.sensors.iter().map(|sensor| sensor.normalized_value())
    }
}

fn first_of<T: Any, C: AsAny + ?Sized>(items: &[Box<C>]) -> Option<&T> {
    items.iter().find_map(|item| (**item).as_any().downcast_ref::<T>())
}

fn first_of_mut<T: Any, C: AsAny + ?Sized>(items: &mut [Box<C>]) -> Option<&mut T> {
    items
        .iter_mut()
        .find_map(|item| (**item).as_any_mut().downcast_mut::<T>())
}

fn all_of<T: Any, C: AsAny + ?Sized>(items: &[Box<C>]) -> impl Iterator<Item = &T> {
    items
        .iter()
        .filter_map(|item| (**item).as_any().downcast_ref::<T>())
}

/// A simulated object composed of controllers, colliders, sensors and
/// parameter sets.
#[derive(Debug, Default)]
pub struct Entity {
    id: Option<EntityId>,
    /// Position and heading.
    pub pose: Pose,
    parameters: Vec<Box<dyn ParameterSet>>,
    controllers: Vec<Box<dyn Controller>>,
    colliders: Vec<Box<dyn Collider>>,
    sensors: Vec<Box<dyn Sensor>>,
}

impl Entity {
    /// Creates an entity at the origin facing `+Y`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity at `position` with heading `angle`.
    pub fn at(position: Point, angle: f32) -> Self {
        Self {
            pose: Pose::new(position, angle),
            ..Self::default()
        }
    }

    /// Handle inside the owning graph, once added.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.pose.position
    }

    /// Current heading.
    pub fn angle(&self) -> f32 {
        self.pose.angle
    }

    /// Attaches a parameter set.
    #[must_use]
    pub fn with_parameter_set(mut self, parameter_set: impl ParameterSet) -> Self {
        self.parameters.push(Box::new(parameter_set));
        self
    }

    /// Attaches a controller. Controllers run in attachment order.
    #[must_use]
    pub fn with_controller(mut self, controller: impl Controller) -> Self {
        self.controllers.push(Box::new(controller));
        self
    }

    /// Attaches a collider.
    #[must_use]
    pub fn with_collider(mut self, collider: impl Collider) -> Self {
        self.colliders.push(Box::new(collider));
        self
    }

    /// Attaches a sensor. Sensors run in attachment order, before controllers.
    #[must_use]
    pub fn with_sensor(mut self, sensor: impl Sensor) -> Self {
        self.sensors.push(Box::new(sensor));
        self
    }

    /// First parameter set of type `T`.
    pub fn parameter_set<T: ParameterSet>(&self) -> Option<&T> {
        first_of(&self.parameters)
    }

    /// First controller of type `T`.
    pub fn controller<T: Controller>(&self) -> Option<&T> {
        first_of(&self.controllers)
    }

    /// First controller of type `T`, mutably.
    pub fn controller_mut<T: Controller>(&mut self) -> Option<&mut T> {
        first_of_mut(&mut self.controllers)
    }

    /// All controllers of type `T`.
    pub fn controllers<T: Controller>(&self) -> impl Iterator<Item = &T> {
        all_of(&self.controllers)
    }

    /// Whether a controller of type `T` is attached.
    pub fn has_controller<T: Controller>(&self) -> bool {
        self.controller::<T>().is_some()
    }

    /// First collider of type `T`.
    pub fn collider<T: Collider>(&self) -> Option<&T> {
        first_of(&self.colliders)
    }

    /// All colliders of type `T`.
    pub fn colliders<T: Collider>(&self) -> impl Iterator<Item = &T> {
        all_of(&self.colliders)
    }

    /// First sensor of type `T`.
    pub fn sensor<T: Sensor>(&self) -> Option<&T> {
        first_of(&self.sensors)
    }

    /// First sensor of type `T`, mutably.
    pub fn sensor_mut<T: Sensor>(&mut self) -> Option<&mut T> {
        first_of_mut(&mut self.sensors)
    }

    /// All sensors of type `T`.
    pub fn sensors<T: Sensor>(&self) -> impl Iterator<Item = &T> {
        all_of(&self.sensors)
    }

    /// Every attached controller.
    pub fn controller_components(&self) -> &[Box<dyn Controller>] {
        &self.controllers
    }

    /// Every attached collider.
    pub fn collider_components(&self) -> &[Box<dyn Collider>] {
        &self.colliders
    }

    /// Every attached sensor.
    pub fn sensor_components(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    /// First driving input offered by an input controller.
    pub fn driving_input(&self) -> Option<DrivingInput> {
        self.controllers.iter().find_map(|c| c.driving_input())
    }

    /// This entity as seen by its colliders.
    pub fn collider_owner(&self) -> ColliderOwner<'_> {
        ColliderOwner {
            pose: self.pose,
            parameters: &self.parameters,
        }
    }

    /// Simulates all sensors, then all controllers, for one frame.
    pub fn simulate(&mut self, others: Others<'_>, time: FrameTime) -> Result<(), SimulationError> {
        let Self {
            id,
            pose,
            parameters,
            controllers,
            colliders,
            sensors,
        } = self;

        let sensor_ctx = SensorContext {
            owner: *id,
            pose: *pose,
            others,
            time,
        };
        for sensor in sensors.iter_mut() {
            sensor.simulate(&sensor_ctx)?;
        }

        for index in 0..controllers.len() {
            let driving_input = controllers.iter().find_map(|c| c.driving_input());
            let mut ctx = ControllerContext {
                owner: *id,
                pose: &mut *pose,
                parameters: parameters.as_slice(),
                colliders: colliders.as_slice(),
                sensors: sensors.as_slice(),
                driving_input,
                others,
                time,
            };
            controllers[index].simulate(&mut ctx)?;
        }

        Ok(())
    }
}
