use nalgebra::Vector3;

use crate::lights::LightTrait;
use crate::vector::subtract;

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vector3<f64>,
    intensity: f64,
}

impl LightTrait for PointLight {
    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn light_vector(&self, point: Vector3<f64>) -> Option<Vector3<f64>> {
        Some(subtract(self.position, point))
    }
}

impl PointLight {
    pub fn new(position: Vector3<f64>, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
