//! A single fully connected level of binary-threshold neurons.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use super::super::error::ConfigError;
use super::super::math::lerp;

/// One level of the network: a set of input neurons densely connected to a set
/// of output neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Last values fed into the level.
    pub inputs: Array1<f64>,
    /// Last computed outputs, each `0.0` or `1.0`.
    pub outputs: Array1<f64>,
    /// Activation threshold of every output neuron.
    pub biases: Array1<f64>,
    /// Connection weights (`input_count` × `output_count`).
    pub weights: Array2<f64>,
}

fn unit_range() -> Uniform<f64> {
    Uniform::new_inclusive(-1.0, 1.0)
}

impl Level {
    /// Creates a level with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new_using<R: Rng + ?Sized>(input_count: usize, output_count: usize, rng: &mut R) -> Self {
        Self {
            inputs: Array1::zeros(input_count),
            outputs: Array1::zeros(output_count),
            biases: Array1::random_using(output_count, unit_range(), rng),
            weights: Array2::random_using((input_count, output_count), unit_range(), rng),
        }
    }

    /// Creates a level from explicit weights and biases.
    pub fn from_parts(weights: Array2<f64>, biases: Array1<f64>) -> Result<Self, ConfigError> {
        let (input_count, output_count) = weights.dim();
        if biases.len() != output_count {
            return Err(ConfigError::InvalidTopology(format!(
                "{} biases for {} outputs",
                biases.len(),
                output_count
            )));
        }
        Ok(Self {
            inputs: Array1::zeros(input_count),
            outputs: Array1::zeros(output_count),
            biases,
            weights,
        })
    }

    /// Number of input neurons.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output neurons.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Feeds new values through the level.
    ///
    /// Only the first `min(given, input_count)` inputs are replaced; the rest
    /// keep their previous values. An output fires (`1.0`) when the weighted
    /// input sum is strictly above its bias.
    pub fn feed_forward(&mut self, given_inputs: &[f64]) -> &Array1<f64> {
        for (input, &given) in self.inputs.iter_mut().zip(given_inputs) {
            *input = given;
        }

        let sums = self.inputs.dot(&self.weights);
        Zip::from(&mut self.outputs)
            .and(&sums)
            .and(&self.biases)
            .for_each(|output, &sum, &bias| {
                *output = if sum > bias { 1.0 } else { 0.0 };
            });

        &self.outputs
    }

    /// Moves every weight and bias towards a fresh random value in `[-1, 1]`.
    ///
    /// `amount == 0` leaves the level unchanged, `amount == 1` replaces every
    /// value.
    pub fn mutate_using<R: Rng + ?Sized>(&mut self, amount: f64, rng: &mut R) {
        let fresh_biases = Array1::random_using(self.biases.len(), unit_range(), rng);
        Zip::from(&mut self.biases)
            .and(&fresh_biases)
            .for_each(|bias, &target| *bias = lerp(*bias, target, amount));

        let fresh_weights = Array2::random_using(self.weights.dim(), unit_range(), rng);
        Zip::from(&mut self.weights)
            .and(&fresh_weights)
            .for_each(|weight, &target| *weight = lerp(*weight, target, amount));
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let (input_count, output_count) = self.weights.dim();
        if self.inputs.len() != input_count
            || self.outputs.len() != output_count
            || self.biases.len() != output_count
        {
            return Err(ConfigError::InvalidTopology(format!(
                "level buffers ({} in, {} out, {} biases) do not match {}x{} weights",
                self.inputs.len(),
                self.outputs.len(),
                self.biases.len(),
                input_count,
                output_count
            )));
        }
        Ok(())
    }
}
