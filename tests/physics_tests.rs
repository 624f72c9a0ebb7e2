#![allow(missing_docs)]

use geo::coord;
use roadsim::simulation::colliders::{CarCollider, RoadCollider};
use roadsim::simulation::controllers::{
    CarCruiseController, CarPhysicsController, CarPhysicsParameters,
};
use roadsim::simulation::entity::{Entity, EntityId};
use roadsim::simulation::error::SimulationError;
use roadsim::simulation::graph::EntityGraph;
use roadsim::simulation::parameters::{CarParameterSet, RoadParameterSet};

fn car_with(x: f32, y: f32, physics: CarPhysicsController) -> Entity {
    Entity::at(coord! { x: x, y: y }, 0.0)
        .with_parameter_set(CarParameterSet::default())
        .with_collider(CarCollider::new())
        .with_controller(physics)
}

fn car(x: f32, y: f32, throttle: f32) -> Entity {
    let mut physics = CarPhysicsController::new(CarPhysicsParameters::default());
    physics.throttle = throttle;
    car_with(x, y, physics)
}

fn road() -> Entity {
    Entity::new()
        .with_parameter_set(RoadParameterSet::new(3, 3.0))
        .with_collider(RoadCollider::new())
}

fn physics(graph: &EntityGraph, id: EntityId) -> &CarPhysicsController {
    graph
        .entity(id)
        .and_then(|entity| entity.controller::<CarPhysicsController>())
        .unwrap()
}

fn physics_mut(graph: &mut EntityGraph, id: EntityId) -> &mut CarPhysicsController {
    graph
        .entity_mut(id)
        .and_then(|entity| entity.controller_mut::<CarPhysicsController>())
        .unwrap()
}

#[test]
fn full_throttle_converges_to_top_speed() {
    let mut graph = EntityGraph::new();
    let id = graph.add(car(0.0, 0.0, 1.0));

    for _ in 0..300 {
        graph.simulate_frame();
        assert!(physics(&graph, id).current_speed() <= 15.0);
    }
    assert_eq!(physics(&graph, id).current_speed(), 15.0);
    assert!(graph.entity(id).unwrap().position().y > 0.0);
}

#[test]
fn pulling_away_from_rest_uses_braking_acceleration() {
    let mut graph = EntityGraph::new();
    let id = graph.add(car(0.0, 0.0, 1.0));

    graph.simulate_frame();
    assert_eq!(physics(&graph, id).acceleration(), 30.0);

    graph.simulate_frame();
    let moving = physics(&graph, id);
    assert!(moving.current_speed() > 0.0);
    assert!(moving.acceleration() < 20.0);
}

#[test]
fn coasting_stops_exactly() {
    let mut graph = EntityGraph::new();
    let id = graph.add(car(0.0, 0.0, 1.0));
    for _ in 0..120 {
        graph.simulate_frame();
    }

    physics_mut(&mut graph, id).throttle = 0.0;
    let mut previous = physics(&graph, id).current_speed();
    for _ in 0..3000 {
        graph.simulate_frame();
        let speed = physics(&graph, id).current_speed();
        assert!(speed <= previous && speed >= 0.0);
        previous = speed;
    }
    assert_eq!(previous, 0.0);

    let parked = graph.entity(id).unwrap().position();
    graph.simulate_frame();
    assert_eq!(graph.entity(id).unwrap().position(), parked);
}

#[test]
fn reverse_is_limited() {
    let mut graph = EntityGraph::new();
    let id = graph.add(car(0.0, 0.0, -1.0));
    for _ in 0..300 {
        graph.simulate_frame();
    }
    assert_eq!(physics(&graph, id).current_speed(), -5.0);
    assert!(graph.entity(id).unwrap().position().y < 0.0);
    assert!(physics(&graph, id).distance_moved() < 0.0);
}

#[test]
fn steering_right_turns_clockwise() {
    let mut graph = EntityGraph::new();
    let mut controller = CarPhysicsController::new(CarPhysicsParameters::default());
    controller.throttle = 1.0;
    controller.steering_input = 1.0;
    let id = graph.add(car_with(0.0, 0.0, controller));

    for _ in 0..30 {
        graph.simulate_frame();
    }
    let entity = graph.entity(id).unwrap();
    assert!(entity.angle() > 0.0);
    assert!(entity.position().x > 0.0);
}

#[test]
fn touching_the_border_kills_once() {
    let mut graph = EntityGraph::new();
    graph.add(road());
    let id = graph.add(car(-4.5, 0.0, 1.0));

    graph.simulate_frame();
    let time_of_death = physics(&graph, id).time_of_death();
    assert_eq!(time_of_death, Some(graph.time_delta()));
    let pose = graph.entity(id).unwrap().pose;

    for _ in 0..10 {
        graph.simulate_frame();
    }
    let dead = physics(&graph, id);
    assert!(dead.is_dead());
    assert_eq!(dead.time_of_death(), time_of_death);
    assert_eq!(graph.entity(id).unwrap().pose, pose);
}

#[test]
fn car_inside_its_lane_survives() {
    let mut graph = EntityGraph::new();
    graph.add(road());
    let id = graph.add(car(0.0, 0.0, 1.0));
    for _ in 0..120 {
        graph.simulate_frame();
    }
    assert!(!physics(&graph, id).is_dead());
    assert!(physics(&graph, id).distance_traveled() > 0.0);
    assert!(physics(&graph, id).average_speed() > 0.0);
}

#[test]
fn physics_cars_pass_through_each_other() {
    let mut graph = EntityGraph::new();
    let a = graph.add(car(0.0, 0.0, 1.0));
    let b = graph.add(car(0.5, 1.0, 0.0));
    for _ in 0..60 {
        graph.simulate_frame();
    }
    assert!(!physics(&graph, a).is_dead());
    assert!(!physics(&graph, b).is_dead());
}

#[test]
fn cruising_traffic_rear_ends_a_parked_car() {
    let mut graph = EntityGraph::new();
    graph.add(road());
    graph.add(
        Entity::at(coord! { x: 0.0, y: 0.0 }, 0.0)
            .with_parameter_set(CarParameterSet::default())
            .with_collider(CarCollider::new())
            .with_controller(CarCruiseController::new(10.0)),
    );
    let parked = graph.add(car(0.0, 10.0, 0.0));

    for _ in 0..30 {
        graph.simulate_frame();
    }
    assert!(!physics(&graph, parked).is_dead());

    for _ in 0..60 {
        graph.simulate_frame();
    }
    assert!(physics(&graph, parked).is_dead());
}

#[test]
fn missing_car_dimensions_fault_the_frame() {
    let mut graph = EntityGraph::new();
    let id = graph.add(
        Entity::new()
            .with_collider(CarCollider::new())
            .with_controller(CarPhysicsController::new(CarPhysicsParameters::default())),
    );

    let report = graph.simulate_frame();
    let fault = report.fault.unwrap();
    assert_eq!(fault.entity, id);
    assert_eq!(
        fault.error,
        SimulationError::MissingComponent {
            component: "CarParameterSet"
        }
    );
}

#[test]
fn non_finite_motion_faults_the_frame() {
    let parameters = CarPhysicsParameters {
        max_braking_acceleration: f32::INFINITY,
        max_forward_speed: f32::INFINITY,
        ..CarPhysicsParameters::default()
    };
    let mut controller = CarPhysicsController::new(parameters);
    controller.throttle = 1.0;

    let mut graph = EntityGraph::new();
    graph.add(car_with(0.0, 0.0, controller));
    let report = graph.simulate_frame();
    assert!(matches!(
        report.fault.map(|fault| fault.error),
        Some(SimulationError::NonFinitePose { .. })
    ));
}

#[test]
fn reset_revives_a_dead_car() {
    let mut graph = EntityGraph::new();
    graph.add(road());
    let id = graph.add(car(-4.5, 0.0, 0.0));
    graph.simulate_frame();
    assert!(physics(&graph, id).is_dead());

    physics_mut(&mut graph, id).reset();
    let revived = physics(&graph, id);
    assert!(!revived.is_dead());
    assert_eq!(revived.current_speed(), 0.0);
    assert_eq!(revived.distance_traveled(), 0.0);
}
