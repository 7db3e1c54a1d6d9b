use nalgebra::Vector3;

use crate::lights::ambient::AmbientLight;
use crate::lights::directional::DirectionalLight;
use crate::lights::point::PointLight;
use crate::scene::SceneError;

pub mod ambient;
pub mod directional;
pub mod point;

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Point(PointLight),
    Directional(DirectionalLight),
}

pub trait LightTrait {
    fn intensity(&self) -> f64;

    /// Vector from `point` towards the light, `None` for lights that have no
    /// direction and only add a constant term.
    fn light_vector(&self, point: Vector3<f64>) -> Option<Vector3<f64>>;
}

impl Light {
    pub fn ambient(intensity: f64) -> Result<Light, SceneError> {
        Ok(Light::Ambient(AmbientLight::new(check_intensity(
            intensity,
        )?)))
    }

    pub fn point(intensity: f64, position: Vector3<f64>) -> Result<Light, SceneError> {
        Ok(Light::Point(PointLight::new(
            position,
            check_intensity(intensity)?,
        )))
    }

    pub fn directional(intensity: f64, direction: Vector3<f64>) -> Result<Light, SceneError> {
        Ok(Light::Directional(DirectionalLight::new(
            direction,
            check_intensity(intensity)?,
        )))
    }

    pub fn to_string(&self) -> String {
        match self {
            Light::Ambient(_) => "ambient".to_string(),
            Light::Point(_) => "point".to_string(),
            Light::Directional(_) => "directional".to_string(),
        }
    }
}

impl LightTrait for Light {
    fn intensity(&self) -> f64 {
        match self {
            Light::Ambient(x) => x.intensity(),
            Light::Point(x) => x.intensity(),
            Light::Directional(x) => x.intensity(),
        }
    }

    fn light_vector(&self, point: Vector3<f64>) -> Option<Vector3<f64>> {
        match self {
            Light::Ambient(x) => x.light_vector(point),
            Light::Point(x) => x.light_vector(point),
            Light::Directional(x) => x.light_vector(point),
        }
    }
}

fn check_intensity(intensity: f64) -> Result<f64, SceneError> {
    if !(intensity.is_finite() && intensity >= 0.0) {
        return Err(SceneError::InvalidIntensity(intensity));
    }

    Ok(intensity)
}
