/// Tunable constants of the collide-and-slide pipeline
///
/// All distances are in ellipsoid space, where the collider is a unit sphere.
/// The defaults are tuned for human-scale geometry measured in metres.
use serde::Deserialize;

use crate::error::ConfigError;

/// Collision tuning shared by every query against one World.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Floor for both the squared triangle bounding radius and the squared
    /// speed in the broad phase. Keeps slivers and near-still movers from
    /// culling triangles they are resting on.
    pub smallest_distance_approximation: f32,
    /// Gap the slide resolver keeps between the mover and a contact surface.
    pub accuracy_epsilon: f32,
    /// Maximum distance from the mover centre to its projection along gravity
    /// onto a triangle for the two to count as touching. Includes the unit
    /// collider radius.
    pub ground_contact_distance: f32,
    /// Number of slide steps after the first before the resolver gives up.
    pub max_slide_depth: u32,
}

impl CollisionConfig {
    pub const DEFAULT_SMALLEST_DISTANCE_APPROXIMATION: f32 = 1.0;
    pub const DEFAULT_ACCURACY_EPSILON: f32 = 0.005;
    pub const DEFAULT_GROUND_CONTACT_DISTANCE: f32 = 1.1;
    pub const DEFAULT_MAX_SLIDE_DEPTH: u32 = 5;

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(
            "smallest_distance_approximation",
            self.smallest_distance_approximation,
        )?;
        positive("accuracy_epsilon", self.accuracy_epsilon)?;
        positive("ground_contact_distance", self.ground_contact_distance)?;
        if self.max_slide_depth == 0 {
            return Err(ConfigError::ZeroSlideDepth);
        }
        Ok(())
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            smallest_distance_approximation: Self::DEFAULT_SMALLEST_DISTANCE_APPROXIMATION,
            accuracy_epsilon: Self::DEFAULT_ACCURACY_EPSILON,
            ground_contact_distance: Self::DEFAULT_GROUND_CONTACT_DISTANCE,
            max_slide_depth: Self::DEFAULT_MAX_SLIDE_DEPTH,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
