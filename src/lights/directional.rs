use nalgebra::Vector3;

use crate::lights::LightTrait;

/// Light arriving from infinitely far away. `direction` points from the
/// surface towards the light and is kept unnormalized, the lighting model
/// divides by its length.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    direction: Vector3<f64>,
    intensity: f64,
}

impl LightTrait for DirectionalLight {
    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn light_vector(&self, _point: Vector3<f64>) -> Option<Vector3<f64>> {
        Some(self.direction)
    }
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f64>, intensity: f64) -> Self {
        Self {
            direction,
            intensity,
        }
    }
}
