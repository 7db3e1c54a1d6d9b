use nalgebra::Vector3;

use crate::objects::Intersection;
use crate::scene::SceneError;
use crate::vector::{dot, subtract};

pub const MAX_COLOR_CHANNEL: f64 = 255.0;

// SPHERE
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f64>,
    pub radius: f64,
    pub color: Vector3<f64>,
    /// Specular exponent, `<= 0` disables the highlight.
    pub specular: f64,
}

impl Sphere {
    pub fn new(
        center: Vector3<f64>,
        radius: f64,
        color: Vector3<f64>,
        specular: f64,
    ) -> Result<Self, SceneError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }

        if let Some(channel) = color
            .iter()
            .find(|c| !(c.is_finite() && (0.0..=MAX_COLOR_CHANNEL).contains(*c)))
        {
            return Err(SceneError::InvalidColor(*channel));
        }

        if specular.is_nan() {
            return Err(SceneError::InvalidSpecular);
        }

        Ok(Sphere {
            center,
            radius,
            color,
            specular,
        })
    }

    /// Solve `|O + tD - C|^2 = r^2` for `t`. Both roots are returned whatever
    /// their sign; filtering on the valid range is left to the caller.
    ///
    /// Returns `None` when the ray misses, and for a zero `direction` which
    /// does not describe a ray at all.
    pub fn intersect(&self, origin: Vector3<f64>, direction: Vector3<f64>) -> Option<Intersection> {
        let center_to_origin = subtract(origin, self.center);

        let a = dot(direction, direction);
        let b = 2.0 * dot(center_to_origin, direction);
        let c = dot(center_to_origin, center_to_origin) - self.radius * self.radius;

        if a == 0.0 {
            return None;
        }

        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();

        Some(Intersection {
            t1: (-b + root) / (2.0 * a),
            t2: (-b - root) / (2.0 * a),
        })
    }
}
