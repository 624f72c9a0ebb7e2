//! Minimal feed-forward network with binary-threshold neurons.
//!
//! The network has a fixed topology and adapts only through random mutation;
//! there is no gradient based training.

use std::path::Path;

use ndarray::Array1;
use ndarray_rand::rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub mod level;

pub use level::Level;

/// A chain of [`Level`]s, each consuming the previous level's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronalNetwork {
    /// Ordered levels from input to output.
    pub levels: Vec<Level>,
}

impl NeuronalNetwork {
    /// Creates a randomly initialised network.
    ///
    /// `neuron_counts` lists the width of every layer including the input layer,
    /// so the network has `neuron_counts.len() - 1` levels.
    pub fn new(neuron_counts: &[usize]) -> Result<Self, ConfigError> {
        Self::new_using(neuron_counts, &mut thread_rng())
    }

    /// Creates a network drawing its initial weights from `rng`.
    pub fn new_using<R: Rng + ?Sized>(
        neuron_counts: &[usize],
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if neuron_counts.len() < 2 {
            return Err(ConfigError::InvalidTopology(format!(
                "need at least an input and an output layer, got {} layer(s)",
                neuron_counts.len()
            )));
        }
        if let Some(index) = neuron_counts.iter().position(|&count| count == 0) {
            return Err(ConfigError::InvalidTopology(format!(
                "layer {index} has no neurons"
            )));
        }

        let levels = neuron_counts
            .windows(2)
            .map(|pair| Level::new_using(pair[0], pair[1], rng))
            .collect();

        Ok(Self { levels })
    }

    /// Builds a network from existing levels, checking that adjacent widths agree.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, ConfigError> {
        let network = Self { levels };
        network.validate()?;
        Ok(network)
    }

    /// Width of the input layer.
    pub fn input_count(&self) -> usize {
        self.levels.first().map_or(0, Level::input_count)
    }

    /// Width of the output layer.
    pub fn output_count(&self) -> usize {
        self.levels.last().map_or(0, Level::output_count)
    }

    /// Feeds `inputs` through every level and returns the final outputs.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Array1<f64> {
        let mut outputs = inputs.to_vec();
        for level in &mut self.levels {
            outputs = level.feed_forward(&outputs).to_vec();
        }
        Array1::from_vec(outputs)
    }

    /// Mutates every level by `amount`, clamped into `[0, 1]`.
    pub fn mutate(&mut self, amount: f64) {
        self.mutate_using(amount, &mut thread_rng());
    }

    /// Like [`mutate`](Self::mutate) but draws from `rng`.
    pub fn mutate_using<R: Rng + ?Sized>(&mut self, amount: f64, rng: &mut R) {
        let amount = amount.clamp(0.0, 1.0);
        for level in &mut self.levels {
            level.mutate_using(amount, rng);
        }
    }

    /// Saves the network to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a network from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let network: Self = serde_json::from_str(&json)?;
        network.validate()?;
        Ok(network)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::InvalidTopology("network has no levels".into()));
        }
        for level in &self.levels {
            level.validate()?;
        }
        for (index, pair) in self.levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(ConfigError::InvalidTopology(format!(
                    "level {} outputs {} values but level {} expects {}",
                    index,
                    pair[0].output_count(),
                    index + 1,
                    pair[1].input_count()
                )));
            }
        }
        Ok(())
    }
}
