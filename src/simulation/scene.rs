//! Builds a populated road scene from a [`SimulationConfig`].
//!
//! A scene holds one road entity, the cruise traffic, and the network driven
//! cars whose progress decides which brain is kept.

use geo::coord;
use ndarray_rand::rand::SeedableRng as _;
use ndarray_rand::rand::rngs::StdRng as NetworkRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::colliders::{CarCollider, RoadCollider};
use super::config::{SimulationConfig, TrafficCar};
use super::controllers::{
    CarCruiseController, CarPhysicsController, INTENT_OUTPUTS, NetworkCarInputController,
    RoadController,
};
use super::entity::{Entity, EntityId};
use super::error::ConfigError;
use super::graph::EntityGraph;
use super::math::deg_to_rad;
use super::network::NeuronalNetwork;
use super::parameters::RoadParameterSet;
use super::sensors::DistanceSensor;

/// Mounts of the sensor fan as `(x, y, angle in degrees)` relative to the car.
const SENSOR_FAN: [(f32, f32, f32); 5] = [
    (0.0, 2.0, 0.0),
    (-0.9, 2.0, -22.5),
    (0.9, 2.0, 22.5),
    (-0.9, 1.7, -45.0),
    (0.9, 1.7, 45.0),
];

/// Number of sensors, which is also the input width of every car network.
pub const SENSOR_COUNT: usize = SENSOR_FAN.len();

/// Span ahead of the start line in which random traffic is placed.
const RANDOM_TRAFFIC_START: std::ops::Range<f32> = 10.0..60.0;
const RANDOM_TRAFFIC_SPEED: std::ops::Range<f32> = 4.0..12.0;

/// A graph plus the ids of the entities the runner cares about.
#[derive(Debug)]
pub struct Scene {
    /// The simulated entities.
    pub graph: EntityGraph,
    road: EntityId,
    traffic: Vec<EntityId>,
    cars: Vec<EntityId>,
    seed: u64,
}

impl Scene {
    /// Builds a scene with freshly initialised networks.
    pub fn build(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::build_with_network(config, None)
    }

    /// Builds a scene whose cars drive copies of `base`.
    ///
    /// The first car keeps `base` unchanged; every other copy is mutated by
    /// `config.mutation_amount`. Without a base network every car gets a random one.
    pub fn build_with_network(
        config: &SimulationConfig,
        base: Option<&NeuronalNetwork>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut traffic_rng = StdRng::seed_from_u64(seed);
        let mut network_rng = NetworkRng::seed_from_u64(seed);

        let mut graph = EntityGraph::with_frequency(config.simulation_frequency)?;
        let road_parameters = RoadParameterSet::new(config.lane_count, config.lane_width);
        let road = graph.add(
            Entity::new()
                .with_parameter_set(road_parameters)
                .with_collider(RoadCollider::new())
                .with_controller(RoadController::new()),
        );

        let traffic_cars = if config.traffic.is_empty() {
            random_traffic(config, &mut traffic_rng)
        } else {
            config.traffic.clone()
        };
        let traffic = traffic_cars
            .iter()
            .map(|car| {
                let x = road_parameters.lane_position(car.lane);
                graph.add(
                    Entity::at(coord! { x: x, y: car.start }, 0.0)
                        .with_parameter_set(config.car)
                        .with_collider(CarCollider::new())
                        .with_controller(CarCruiseController::new(car.speed)),
                )
            })
            .collect();

        let mut layers = Vec::with_capacity(config.hidden_layers.len() + 2);
        layers.push(SENSOR_COUNT);
        layers.extend_from_slice(&config.hidden_layers);
        layers.push(INTENT_OUTPUTS);

        let start = coord! { x: road_parameters.lane_position(config.start_lane), y: 0.0 };
        let mut cars = Vec::with_capacity(config.population);
        for index in 0..config.population {
            let network = match base {
                Some(base) => {
                    let mut network = base.clone();
                    if index > 0 {
                        network.mutate_using(config.mutation_amount, &mut network_rng);
                    }
                    network
                }
                None => NeuronalNetwork::new_using(&layers, &mut network_rng)?,
            };
            let input = NetworkCarInputController::with_network(network)?;
            let mut car = Entity::at(start, 0.0)
                .with_parameter_set(config.car)
                .with_collider(CarCollider::new())
                .with_controller(input)
                .with_controller(CarPhysicsController::new(config.physics));
            for (x, y, angle) in SENSOR_FAN {
                car = car.with_sensor(DistanceSensor::new(
                    coord! { x: x, y: y },
                    deg_to_rad(angle),
                    config.sensor_range,
                ));
            }
            cars.push(graph.add(car));
        }

        info!(
            seed,
            lanes = config.lane_count,
            traffic = traffic_cars.len(),
            cars = cars.len(),
            "scene built"
        );

        Ok(Self {
            graph,
            road,
            traffic,
            cars,
            seed,
        })
    }

    /// Seed the scene was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The road entity.
    pub fn road(&self) -> EntityId {
        self.road
    }

    /// Cruise traffic entities.
    pub fn traffic(&self) -> &[EntityId] {
        &self.traffic
    }

    /// Network driven cars.
    pub fn cars(&self) -> &[EntityId] {
        &self.cars
    }

    fn physics(&self, id: EntityId) -> Option<&CarPhysicsController> {
        self.graph.entity(id)?.controller::<CarPhysicsController>()
    }

    /// Number of network driven cars that have not crashed.
    pub fn alive_count(&self) -> usize {
        self.cars
            .iter()
            .filter_map(|&id| self.physics(id))
            .filter(|physics| !physics.is_dead())
            .count()
    }

    /// Whether every network driven car has crashed.
    pub fn all_dead(&self) -> bool {
        self.alive_count() == 0
    }

    /// The car that got farthest along the road.
    pub fn best_car(&self) -> Option<EntityId> {
        self.cars
            .iter()
            .copied()
            .filter_map(|id| self.graph.entity(id).map(|entity| (id, entity.position().y)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Network of a car.
    pub fn network(&self, id: EntityId) -> Option<&NeuronalNetwork> {
        self.graph
            .entity(id)?
            .controller::<NetworkCarInputController>()
            .map(NetworkCarInputController::network)
    }
}

fn random_traffic(config: &SimulationConfig, rng: &mut StdRng) -> Vec<TrafficCar> {
    let cars: Vec<TrafficCar> = (0..config.random_traffic)
        .map(|_| TrafficCar {
            lane: rng.random_range(0..config.lane_count),
            start: rng.random_range(RANDOM_TRAFFIC_START),
            speed: rng.random_range(RANDOM_TRAFFIC_SPEED),
        })
        .collect();
    debug!(count = cars.len(), "placed random traffic");
    cars
}
