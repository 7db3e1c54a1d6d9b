use log::{debug, info};
use nalgebra::Vector3;
use thiserror::Error;
use yaml_rust::Yaml;

use crate::camera::Viewport;
use crate::helpers::{load_yaml_str, or_default, yaml_array_into_vector3, yaml_into_f64};
use crate::lights::Light;
use crate::objects::sphere::{Sphere, MAX_COLOR_CHANNEL};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("sphere radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error("light intensity must be non-negative, got {0}")]
    InvalidIntensity(f64),
    #[error("color channel must be within 0..=255, got {0}")]
    InvalidColor(f64),
    #[error("specular exponent must be a number")]
    InvalidSpecular,
    #[error("viewport dimensions must be positive, got {0}")]
    InvalidViewport(f64),
    #[error("invalid ray range, min {min} must be below max {max}")]
    InvalidRange { min: f64, max: f64 },
    #[error("unknown light type `{0}`")]
    UnknownLightType(String),
    #[error("unknown geometry mode `{0}`")]
    UnknownGeometryMode(String),
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("invalid value for `{0}`")]
    InvalidValue(String),
    #[error("unable to parse yaml: {0}")]
    Yaml(#[from] yaml_rust::ScanError),
    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Everything a render reads and nothing changes while it runs.
#[derive(Debug, Clone)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub background: Vector3<f64>,
    pub camera_position: Vector3<f64>,
    pub viewport: Viewport,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Scene {
    pub fn new(
        spheres: Vec<Sphere>,
        lights: Vec<Light>,
        background: Vector3<f64>,
        camera_position: Vector3<f64>,
        viewport: Viewport,
        min_distance: f64,
        max_distance: f64,
    ) -> Result<Scene, SceneError> {
        if let Some(channel) = background
            .iter()
            .find(|c| !(c.is_finite() && (0.0..=MAX_COLOR_CHANNEL).contains(*c)))
        {
            return Err(SceneError::InvalidColor(*channel));
        }

        if min_distance.is_nan() || max_distance.is_nan() || min_distance >= max_distance {
            return Err(SceneError::InvalidRange {
                min: min_distance,
                max: max_distance,
            });
        }

        Ok(Scene {
            spheres,
            lights,
            background,
            camera_position,
            viewport,
            min_distance,
            max_distance,
        })
    }

    /// Red, blue and green spheres resting on a large yellow one, lit by an
    /// ambient, a point and a directional light.
    pub fn default_scene() -> Result<Scene, SceneError> {
        let spheres = vec![
            Sphere::new(
                Vector3::new(0.0, -1.0, 3.0),
                1.0,
                Vector3::new(255.0, 0.0, 0.0),
                500.0,
            )?,
            Sphere::new(
                Vector3::new(2.0, 0.0, 4.0),
                1.0,
                Vector3::new(0.0, 0.0, 255.0),
                500.0,
            )?,
            Sphere::new(
                Vector3::new(-2.0, 0.0, 4.0),
                1.0,
                Vector3::new(0.0, 255.0, 0.0),
                10.0,
            )?,
            Sphere::new(
                Vector3::new(0.0, -5001.0, 0.0),
                5000.0,
                Vector3::new(255.0, 255.0, 0.0),
                1000.0,
            )?,
        ];

        let lights = vec![
            Light::ambient(0.2)?,
            Light::point(0.6, Vector3::new(2.0, 1.0, 0.0))?,
            Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0))?,
        ];

        Scene::new(
            spheres,
            lights,
            Vector3::new(255.0, 255.0, 255.0),
            Vector3::zeros(),
            Viewport::default(),
            1.0,
            f64::INFINITY,
        )
    }

    pub fn load_from_str(contents: &str) -> Result<Scene, SceneError> {
        Scene::from_yaml(&load_yaml_str(contents)?)
    }

    /// Build a scene from a parsed scene document. Sections other than
    /// `spheres` and `lights` fall back to the default scene's values.
    pub fn from_yaml(scene_yaml: &Yaml) -> Result<Scene, SceneError> {
        let defaults = Scene::default_scene()?;

        let mut spheres = vec![];
        for sphere_config in yaml_list(&scene_yaml["spheres"], "spheres")? {
            spheres.push(Sphere::new(
                yaml_array_into_vector3(&sphere_config["center"], "spheres.center")?,
                yaml_into_f64(&sphere_config["radius"], "spheres.radius")?,
                yaml_array_into_vector3(&sphere_config["color"], "spheres.color")?,
                or_default(
                    yaml_into_f64(&sphere_config["specular"], "spheres.specular"),
                    -1.0,
                )?,
            )?);
        }

        let mut lights = vec![];
        for light_config in yaml_list(&scene_yaml["lights"], "lights")? {
            lights.push(light_from_yaml(light_config)?);
        }

        let viewport_yaml = &scene_yaml["viewport"];
        let viewport = Viewport::new(
            or_default(
                yaml_into_f64(&viewport_yaml["width"], "viewport.width"),
                defaults.viewport.width,
            )?,
            or_default(
                yaml_into_f64(&viewport_yaml["height"], "viewport.height"),
                defaults.viewport.height,
            )?,
            or_default(
                yaml_into_f64(&viewport_yaml["distance"], "viewport.distance"),
                defaults.viewport.distance,
            )?,
        )?;

        let tracer_yaml = &scene_yaml["tracer"];

        let scene = Scene::new(
            spheres,
            lights,
            or_default(
                yaml_array_into_vector3(&scene_yaml["background"], "background"),
                defaults.background,
            )?,
            or_default(
                yaml_array_into_vector3(&scene_yaml["camera"]["position"], "camera.position"),
                defaults.camera_position,
            )?,
            viewport,
            or_default(
                yaml_into_f64(&tracer_yaml["min_distance"], "tracer.min_distance"),
                defaults.min_distance,
            )?,
            or_default(
                yaml_into_f64(&tracer_yaml["max_distance"], "tracer.max_distance"),
                defaults.max_distance,
            )?,
        )?;

        info!(
            "Scene loaded, {} spheres, {} lights.",
            scene.spheres.len(),
            scene.lights.len()
        );

        for light in &scene.lights {
            debug!("light: {}", light.to_string());
        }

        Ok(scene)
    }
}

fn yaml_list<'a>(yaml: &'a Yaml, key: &str) -> Result<&'a [Yaml], SceneError> {
    match yaml {
        Yaml::Array(list) => Ok(list.as_slice()),
        Yaml::BadValue => Err(SceneError::MissingKey(key.to_string())),
        _ => Err(SceneError::InvalidValue(key.to_string())),
    }
}

fn light_from_yaml(light_config: &Yaml) -> Result<Light, SceneError> {
    let l_type = light_config["type"]
        .as_str()
        .ok_or_else(|| SceneError::MissingKey("lights.type".to_string()))?;
    let l_intensity = yaml_into_f64(&light_config["intensity"], "lights.intensity")?;

    match l_type {
        "ambient" => Light::ambient(l_intensity),
        "point" => Light::point(
            l_intensity,
            yaml_array_into_vector3(&light_config["position"], "lights.position")?,
        ),
        "directional" => {
            // older scene files store the direction under `position`
            let direction = if light_config["direction"].is_badvalue() {
                yaml_array_into_vector3(&light_config["position"], "lights.direction")?
            } else {
                yaml_array_into_vector3(&light_config["direction"], "lights.direction")?
            };

            Light::directional(l_intensity, direction)
        }
        other => Err(SceneError::UnknownLightType(other.to_string())),
    }
}
