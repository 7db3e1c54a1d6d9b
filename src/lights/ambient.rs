use nalgebra::Vector3;

use crate::lights::LightTrait;

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    intensity: f64,
}

impl LightTrait for AmbientLight {
    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn light_vector(&self, _point: Vector3<f64>) -> Option<Vector3<f64>> {
        None
    }
}

impl AmbientLight {
    pub fn new(intensity: f64) -> Self {
        Self { intensity }
    }
}
