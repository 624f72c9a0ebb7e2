//! Error types for configuration and per-frame simulation faults.

use thiserror::Error;

/// A fault raised while simulating one entity.
///
/// Faults abort the rest of the frame and are reported through the frame's
/// [`FrameReport`](super::graph::FrameReport); they never reach the caller of
/// [`EntityGraph::simulate_frame`](super::graph::EntityGraph::simulate_frame).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// A component needs another component that its entity does not carry.
    #[error("entity is missing required component `{component}`")]
    MissingComponent {
        /// Name of the missing component type.
        component: &'static str,
    },
    /// A controller produced a position or heading that is not finite.
    #[error("{controller} produced a non-finite pose ({x}, {y}) at angle {angle}")]
    NonFinitePose {
        /// Name of the controller that moved the entity.
        controller: &'static str,
        /// X coordinate after the step.
        x: f32,
        /// Y coordinate after the step.
        y: f32,
        /// Heading after the step.
        angle: f32,
    },
    /// Any other controller or sensor failure.
    #[error("{0}")]
    Component(String),
}

/// Errors raised while building or configuring a simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric parameter is out of its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A neural network layout or weight matrix is unusable.
    #[error("invalid network topology: {0}")]
    InvalidTopology(String),
    /// File system errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
