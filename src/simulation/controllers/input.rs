//! Driving input sources consulted by [`CarPhysicsController`](super::CarPhysicsController).

use std::fmt;

use super::super::entity::ControllerContext;
use super::super::error::{ConfigError, SimulationError};
use super::super::network::NeuronalNetwork;
use super::{Controller, DrivingInput, DrivingIntent};

/// Number of network outputs read as driving intents: accelerate, steer left,
/// steer right and decelerate.
pub const INTENT_OUTPUTS: usize = 4;

/// Driving input from externally polled key states.
pub struct KeyboardCarInputController {
    poll: Box<dyn FnMut() -> DrivingIntent>,
    input: DrivingInput,
}

impl KeyboardCarInputController {
    /// Creates a controller polling `poll` once per frame.
    pub fn new(poll: impl FnMut() -> DrivingIntent + 'static) -> Self {
        Self {
            poll: Box::new(poll),
            input: DrivingInput::default(),
        }
    }

    /// Input resolved in the last frame.
    pub fn input(&self) -> DrivingInput {
        self.input
    }
}

impl fmt::Debug for KeyboardCarInputController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardCarInputController")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl Controller for KeyboardCarInputController {
    fn simulate(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError> {
        self.input = (self.poll)().to_input();
        Ok(())
    }

    fn driving_input(&self) -> Option<DrivingInput> {
        Some(self.input)
    }
}

/// Driving input decided by a [`NeuronalNetwork`] fed with the normalized
/// readings of all sensors of the entity.
///
/// Outputs `0..4` are read as accelerate, steer left, steer right and decelerate.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkCarInputController {
    network: NeuronalNetwork,
    input: DrivingInput,
}

impl NetworkCarInputController {
    /// Creates a controller with a random `[sensor_count, 6, 4]` network.
    pub fn new(sensor_count: usize) -> Result<Self, ConfigError> {
        Self::with_hidden_layers(sensor_count, &[6])
    }

    /// Creates a controller with a random network with the given hidden layers.
    pub fn with_hidden_layers(sensor_count: usize, hidden: &[usize]) -> Result<Self, ConfigError> {
        let mut counts = Vec::with_capacity(hidden.len() + 2);
        counts.push(sensor_count);
        counts.extend_from_slice(hidden);
        counts.push(INTENT_OUTPUTS);
        Self::with_network(NeuronalNetwork::new(&counts)?)
    }

    /// Wraps an existing network, which must have at least four outputs.
    pub fn with_network(network: NeuronalNetwork) -> Result<Self, ConfigError> {
        if network.output_count() < INTENT_OUTPUTS {
            return Err(ConfigError::InvalidTopology(format!(
                "driving needs {} outputs, network has {}",
                INTENT_OUTPUTS,
                network.output_count()
            )));
        }
        Ok(Self {
            network,
            input: DrivingInput::default(),
        })
    }

    /// The network.
    pub fn network(&self) -> &NeuronalNetwork {
        &self.network
    }

    /// The network, mutably (for mutation between runs).
    pub fn network_mut(&mut self) -> &mut NeuronalNetwork {
        &mut self.network
    }

    /// Input decided in the last frame.
    pub fn input(&self) -> DrivingInput {
        self.input
    }
}

impl Controller for NetworkCarInputController {
    fn simulate(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError> {
        let inputs: Vec<f64> = ctx.sensor_values().map(f64::from).collect();
        let outputs = self.network.feed_forward(&inputs);

        if outputs.len() >= INTENT_OUTPUTS {
            let intent = DrivingIntent {
                accelerate: outputs[0] > 0.0,
                steer_left: outputs[1] > 0.0,
                steer_right: outputs[2] > 0.0,
                decelerate: outputs[3] > 0.0,
            };
            self.input = intent.to_input();
        }

        Ok(())
    }

    fn driving_input(&self) -> Option<DrivingInput> {
        Some(self.input)
    }
}
