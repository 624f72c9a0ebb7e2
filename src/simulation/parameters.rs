//! Parameter sets: static per-entity data read by colliders and controllers.

use serde::{Deserialize, Serialize};

use super::entity::ParameterSet;
use super::math::lerp_f32;

/// Physical dimensions of a car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarParameterSet {
    /// Width in meters.
    pub width: f32,
    /// Length in meters.
    pub length: f32,
}

impl Default for CarParameterSet {
    fn default() -> Self {
        Self {
            width: 1.8,
            length: 4.0,
        }
    }
}

impl ParameterSet for CarParameterSet {}

/// Lane layout of a straight road centred on `x = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadParameterSet {
    lane_count: usize,
    lane_width: f32,
}

impl RoadParameterSet {
    /// Creates a road of `lane_count` lanes, each `lane_width` meters wide.
    pub fn new(lane_count: usize, lane_width: f32) -> Self {
        Self {
            lane_count,
            lane_width,
        }
    }

    /// Number of lanes.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Width of one lane in meters.
    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    /// X coordinate of the right road border.
    pub fn right_border(&self) -> f32 {
        self.lane_width * self.lane_count as f32 / 2.0
    }

    /// X coordinate of the left road border.
    pub fn left_border(&self) -> f32 {
        -self.right_border()
    }

    /// X coordinate of the centre of lane `index`, counted from the left.
    pub fn lane_position(&self, index: usize) -> f32 {
        if self.lane_count == 0 {
            return 0.0;
        }
        let half_lane = self.lane_width / 2.0;
        lerp_f32(
            self.left_border() + half_lane,
            self.right_border() + half_lane,
            index as f32 / self.lane_count as f32,
        )
    }
}

impl ParameterSet for RoadParameterSet {}
