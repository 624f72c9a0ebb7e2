//! # Roadsim - Car Simulation on a Straight Road
//!
//! A frame-stepped simulation of cars on a straight multi-lane road. Cars are
//! driven by a keyboard or by a small perceptron network that reads a fan of
//! distance sensors, and die when they touch the road border or traffic.
//!
//! ## Features
//!
//! - Entity/component model: controllers, colliders, sensors and parameter sets
//! - Approximate car physics with drag, speed scaled steering and crash detection
//! - Ray distance sensors against line and polygon colliders
//! - Binary-threshold neural network with random mutation
//! - Fixed-step frame loop with per-frame reports and a wall-clock scheduler
//! - JSON configuration and network persistence
//!
//! ## Core Modules
//!
//! - [`simulation::graph`] - Entity container and frame loop
//! - [`simulation::entity`] - Entities and component lookup
//! - [`simulation::controllers`] - Physics, traffic, road and input controllers
//! - [`simulation::sensors`] - Distance sensors
//! - [`simulation::network`] - Neural network used by network driven cars
//! - [`simulation::scene`] - Assembles a road, traffic and a car population

/// Core simulation logic and data structures.
pub mod simulation {
    /// Collision geometry attached to entities.
    pub mod colliders;
    /// Run configuration loaded from JSON.
    pub mod config;
    /// Per-frame behaviour of entities.
    pub mod controllers;
    /// Entities, poses and the component traits' shared plumbing.
    ///
    /// An [`entity::Entity`] owns its components; typed lookup goes through
    /// [`entity::AsAny`].
    pub mod entity;
    /// Configuration errors and per-frame faults.
    pub mod error;
    /// Line and polygon intersection.
    pub mod geometry;
    /// Entity container and the frame loop.
    pub mod graph;
    /// Scalar and vector helpers.
    pub mod math;
    /// Perceptron network with random mutation.
    pub mod network;
    /// Static per-entity data such as car dimensions and lane layout.
    pub mod parameters;
    /// Scene assembly from a configuration.
    pub mod scene;
    /// Wall-clock pacing of the frame loop.
    pub mod scheduler;
    /// Environment measurements taken before controllers run.
    pub mod sensors;
}
