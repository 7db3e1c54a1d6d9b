use std::str::FromStr;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::lighting::compute_lighting;
use crate::objects::Hit;
use crate::scene::{Scene, SceneError};
use crate::vector::{add, normal_at, scale, subtract};

/// Which formulas are used for the shaded point and the view direction.
///
/// `AsWritten` reproduces the reference renders: the hit point is
/// `O + t(D - O)` and the view direction `-D - camera`. `Standard` uses
/// `O + tD` and `camera - P`. Both agree for rays leaving a camera placed at
/// the origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GeometryMode {
    #[default]
    AsWritten,
    Standard,
}

impl FromStr for GeometryMode {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "as_written" | "as-written" => Ok(GeometryMode::AsWritten),
            "standard" => Ok(GeometryMode::Standard),
            _ => Err(SceneError::UnknownGeometryMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tracer {
    scene: Arc<Scene>,
    geometry: GeometryMode,
}

impl Tracer {
    pub fn new(scene: Arc<Scene>, geometry: GeometryMode) -> Self {
        Tracer { scene, geometry }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Color seen along the ray, or the background when nothing is hit with
    /// `min_t < t < max_t`. Channels are not clamped.
    pub fn trace_ray(
        &self,
        origin: Vector3<f64>,
        direction: Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> Vector3<f64> {
        let hit = match self.closest_intersection(origin, direction, min_t, max_t) {
            Some(hit) => hit,
            None => return self.scene.background,
        };

        let point = self.intersection_point(origin, direction, hit.distance);
        let normal = normal_at(point, hit.sphere.center);
        let view = self.view_direction(direction, point);

        let intensity = compute_lighting(
            &self.scene.lights,
            normal,
            point,
            view,
            hit.sphere.specular,
        );

        hit.sphere.color * intensity
    }

    /// Linear scan over the spheres in scene order. A root only replaces the
    /// current one when strictly closer, so exact ties keep the earlier
    /// sphere.
    pub fn closest_intersection(
        &self,
        origin: Vector3<f64>,
        direction: Vector3<f64>,
        min_t: f64,
        max_t: f64,
    ) -> Option<Hit<'_>> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = max_t;

        for sphere in &self.scene.spheres {
            let intersection = match sphere.intersect(origin, direction) {
                Some(intersection) => intersection,
                None => continue,
            };

            for t in intersection.roots() {
                if t > min_t && t < closest_t {
                    closest_t = t;
                    closest = Some(Hit {
                        distance: t,
                        sphere,
                    });
                }
            }
        }

        closest
    }

    fn intersection_point(&self, origin: Vector3<f64>, direction: Vector3<f64>, t: f64) -> Vector3<f64> {
        match self.geometry {
            GeometryMode::AsWritten => add(origin, scale(subtract(direction, origin), t)),
            GeometryMode::Standard => add(origin, scale(direction, t)),
        }
    }

    fn view_direction(&self, direction: Vector3<f64>, point: Vector3<f64>) -> Vector3<f64> {
        let camera = self.scene.camera_position;

        match self.geometry {
            GeometryMode::AsWritten => subtract(scale(direction, -1.0), camera),
            GeometryMode::Standard => subtract(camera, point),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::camera::Viewport;
    use crate::lights::Light;
    use crate::objects::sphere::Sphere;
    use crate::scene::Scene;

    fn sphere(center: [f64; 3], radius: f64, color: [f64; 3], specular: f64) -> Sphere {
        Sphere::new(
            Vector3::from(center),
            radius,
            Vector3::from(color),
            specular,
        )
        .unwrap()
    }

    fn tracer(spheres: Vec<Sphere>, lights: Vec<Light>, geometry: GeometryMode) -> Tracer {
        let scene = Scene::new(
            spheres,
            lights,
            Vector3::new(255.0, 255.0, 255.0),
            Vector3::zeros(),
            Viewport::default(),
            1.0,
            f64::INFINITY,
        )
        .unwrap();

        Tracer::new(Arc::new(scene), geometry)
    }

    #[test]
    fn miss_returns_background() {
        let tracer = tracer(
            vec![sphere([0.0, 0.0, 3.0], 1.0, [255.0, 0.0, 0.0], 500.0)],
            vec![Light::ambient(1.0).unwrap()],
            GeometryMode::AsWritten,
        );

        assert_eq!(
            Vector3::new(255.0, 255.0, 255.0),
            tracer.trace_ray(Vector3::zeros(), Vector3::new(0.0, 5.0, 1.0), 1.0, f64::INFINITY)
        );
        // sphere lies behind the ray
        assert_eq!(
            Vector3::new(255.0, 255.0, 255.0),
            tracer.trace_ray(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0), 1.0, f64::INFINITY)
        );
    }

    #[test]
    fn range_bounds_are_exclusive() {
        let tracer = tracer(
            vec![sphere([0.0, 0.0, 3.0], 1.0, [255.0, 0.0, 0.0], 500.0)],
            vec![Light::ambient(1.0).unwrap()],
            GeometryMode::AsWritten,
        );
        let direction = Vector3::new(0.0, 0.0, 1.0);

        // roots are 2 and 4
        let hit = tracer
            .closest_intersection(Vector3::zeros(), direction, 1.0, f64::INFINITY)
            .unwrap();
        assert_relative_eq!(2.0, hit.distance);

        let hit = tracer
            .closest_intersection(Vector3::zeros(), direction, 2.0, f64::INFINITY)
            .unwrap();
        assert_relative_eq!(4.0, hit.distance);

        assert!(tracer
            .closest_intersection(Vector3::zeros(), direction, 1.0, 2.0)
            .is_none());
        assert!(tracer
            .closest_intersection(Vector3::zeros(), direction, 4.0, f64::INFINITY)
            .is_none());
    }

    #[test]
    fn nearest_sphere_wins_regardless_of_order() {
        let tracer = tracer(
            vec![
                sphere([0.0, 0.0, 10.0], 1.0, [0.0, 0.0, 255.0], -1.0),
                sphere([0.0, 0.0, 4.0], 1.0, [0.0, 255.0, 0.0], -1.0),
            ],
            vec![Light::ambient(1.0).unwrap()],
            GeometryMode::AsWritten,
        );

        let hit = tracer
            .closest_intersection(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
            .unwrap();
        assert!(std::ptr::eq(&tracer.scene().spheres[1], hit.sphere));
        assert_relative_eq!(3.0, hit.distance);

        assert_eq!(
            Vector3::new(0.0, 255.0, 0.0),
            tracer.trace_ray(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
        );
    }

    #[test]
    fn exact_tie_picks_first_sphere() {
        let red = sphere([0.0, 0.0, 5.0], 1.0, [255.0, 0.0, 0.0], -1.0);
        let blue = sphere([0.0, 0.0, 5.0], 1.0, [0.0, 0.0, 255.0], -1.0);
        let lights = vec![Light::ambient(1.0).unwrap()];

        let red_first = tracer(
            vec![red.clone(), blue.clone()],
            lights.clone(),
            GeometryMode::AsWritten,
        );
        let blue_first = tracer(vec![blue, red], lights, GeometryMode::AsWritten);

        for _ in 0..3 {
            let hit = red_first
                .closest_intersection(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
                .unwrap();
            assert!(std::ptr::eq(&red_first.scene().spheres[0], hit.sphere));
            assert_eq!(
                Vector3::new(255.0, 0.0, 0.0),
                red_first.trace_ray(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
            );
            assert_eq!(
                Vector3::new(0.0, 0.0, 255.0),
                blue_first.trace_ray(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
            );
        }
    }

    #[test]
    fn color_is_not_clamped() {
        let tracer = tracer(
            vec![sphere([0.0, 0.0, 3.0], 1.0, [200.0, 100.0, 0.0], -1.0)],
            vec![Light::ambient(1.5).unwrap(), Light::ambient(0.5).unwrap()],
            GeometryMode::AsWritten,
        );

        assert_eq!(
            Vector3::new(400.0, 200.0, 0.0),
            tracer.trace_ray(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY)
        );
    }

    #[test]
    fn diffuse_shading_facing_the_light() {
        // light behind the camera, front of the sphere faces it
        let tracer = tracer(
            vec![sphere([0.0, 0.0, 3.0], 1.0, [100.0, 50.0, 10.0], -1.0)],
            vec![
                Light::ambient(0.2).unwrap(),
                Light::point(0.6, Vector3::new(0.0, 0.0, -5.0)).unwrap(),
            ],
            GeometryMode::Standard,
        );

        let color = tracer.trace_ray(Vector3::zeros(), Vector3::z(), 1.0, f64::INFINITY);

        assert_relative_eq!(Vector3::new(80.0, 40.0, 8.0), color, epsilon = 1e-9);
    }

    #[test]
    fn modes_agree_for_rays_from_origin() {
        let spheres = vec![sphere([0.5, -0.5, 4.0], 1.5, [255.0, 128.0, 0.0], 200.0)];
        let lights = vec![
            Light::ambient(0.2).unwrap(),
            Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)).unwrap(),
            Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0)).unwrap(),
        ];
        let as_written = tracer(spheres.clone(), lights.clone(), GeometryMode::AsWritten);
        let standard = tracer(spheres, lights, GeometryMode::Standard);

        for direction in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.2, -0.1, 1.0),
            Vector3::new(0.4, 0.1, 1.0),
        ] {
            assert_relative_eq!(
                as_written.trace_ray(Vector3::zeros(), direction, 1.0, f64::INFINITY),
                standard.trace_ray(Vector3::zeros(), direction, 1.0, f64::INFINITY),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn modes_differ_for_offset_origin() {
        let spheres = vec![sphere([0.0, 0.0, 5.0], 1.0, [255.0, 255.0, 255.0], -1.0)];
        let as_written = tracer(spheres.clone(), vec![], GeometryMode::AsWritten);
        let standard = tracer(spheres, vec![], GeometryMode::Standard);

        let origin = Vector3::new(0.0, 1.0, 0.0);
        let direction = Vector3::new(0.0, 0.0, 1.0);

        assert_eq!(
            Vector3::new(0.0, 1.0, 2.0),
            standard.intersection_point(origin, direction, 2.0)
        );
        assert_eq!(
            Vector3::new(0.0, -1.0, 2.0),
            as_written.intersection_point(origin, direction, 2.0)
        );

        let point = Vector3::new(0.0, 1.0, 2.0);
        assert_eq!(
            Vector3::new(0.0, -1.0, -2.0),
            standard.view_direction(direction, point)
        );
        assert_eq!(
            Vector3::new(0.0, 0.0, -1.0),
            as_written.view_direction(direction, point)
        );
    }

    #[test]
    fn geometry_mode_from_str() {
        assert_eq!(
            GeometryMode::AsWritten,
            "as_written".parse::<GeometryMode>().unwrap()
        );
        assert_eq!(
            GeometryMode::Standard,
            "standard".parse::<GeometryMode>().unwrap()
        );
        assert!(matches!(
            "textbook".parse::<GeometryMode>(),
            Err(SceneError::UnknownGeometryMode(_))
        ));
    }
}
