use nalgebra::Vector3;

use crate::lights::{Light, LightTrait};
use crate::vector::{cosine, dot, scale, subtract};

/// Phong style local illumination at `point`.
///
/// Sums, for every light in order, the ambient term or the diffuse and
/// specular terms. `normal`, the light vector and `view` don't need to be
/// unit length. A term whose cosine would divide by a zero length
/// contributes nothing. The result is unbounded and used directly as a color
/// multiplier.
pub fn compute_lighting(
    lights: &[Light],
    normal: Vector3<f64>,
    point: Vector3<f64>,
    view: Vector3<f64>,
    specular: f64,
) -> f64 {
    let mut intensity = 0.0;

    for light in lights {
        let light_vector = match light.light_vector(point) {
            Some(light_vector) => light_vector,
            None => {
                intensity += light.intensity();
                continue;
            }
        };

        // diffuse
        let normal_dot_light = dot(normal, light_vector);
        if normal_dot_light > 0.0 {
            if let Some(cos) = cosine(normal_dot_light, normal, light_vector) {
                intensity += light.intensity() * cos;
            }
        }

        // specular
        if specular > 0.0 {
            let reflection = subtract(scale(normal, 2.0 * normal_dot_light), light_vector);
            let reflection_dot_view = dot(reflection, view);

            if reflection_dot_view > 0.0 {
                if let Some(cos) = cosine(reflection_dot_view, reflection, view) {
                    intensity += light.intensity() * cos.powf(specular);
                }
            }
        }
    }

    intensity
}
