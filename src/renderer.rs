use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, RwLock};
use std::thread;
use std::thread::JoinHandle;
use std::time::Instant;

use indicatif::ProgressBar;
use log::{debug, info};
use nalgebra::{Point2, Vector3};
use yaml_rust::Yaml;

use crate::camera::Camera;
use crate::film::{Film, SampleResult};
use crate::helpers::{or_default, yaml_into_u32};
use crate::scene::SceneError;
use crate::tracer::{GeometryMode, Tracer};

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub point: Vector3<f64>,
    pub direction: Vector3<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Settings {
    pub thread_count: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub bucket_width: u32,
    pub bucket_height: u32,
    pub geometry: GeometryMode,
}

impl Default for Settings {
    fn default() -> Self {
        let thread_count = thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4);

        Settings {
            thread_count,
            image_width: 600,
            image_height: 600,
            bucket_width: 32,
            bucket_height: 32,
            geometry: GeometryMode::default(),
        }
    }
}

impl Settings {
    /// Read the `renderer`, `film` and `tracer.geometry` entries of a scene
    /// document, keeping the defaults for anything left out.
    pub fn from_yaml(settings_yaml: &Yaml) -> Result<Settings, SceneError> {
        let defaults = Settings::default();
        let film_yaml = &settings_yaml["film"];

        let geometry = match settings_yaml["tracer"]["geometry"].as_str() {
            Some(geometry) => geometry.parse()?,
            None => defaults.geometry,
        };

        let settings = Settings {
            thread_count: or_default(
                yaml_into_u32(&settings_yaml["renderer"]["threads"], "renderer.threads"),
                defaults.thread_count,
            )?,
            image_width: or_default(
                yaml_into_u32(&film_yaml["image_width"], "film.image_width"),
                defaults.image_width,
            )?,
            image_height: or_default(
                yaml_into_u32(&film_yaml["image_height"], "film.image_height"),
                defaults.image_height,
            )?,
            bucket_width: or_default(
                yaml_into_u32(&film_yaml["bucket_width"], "film.bucket_width"),
                defaults.bucket_width,
            )?,
            bucket_height: or_default(
                yaml_into_u32(&film_yaml["bucket_height"], "film.bucket_height"),
                defaults.bucket_height,
            )?,
            geometry,
        };

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        for (key, value) in [
            ("renderer.threads", self.thread_count),
            ("film.image_width", self.image_width),
            ("film.image_height", self.image_height),
            ("film.bucket_width", self.bucket_width),
            ("film.bucket_height", self.bucket_height),
        ] {
            if value == 0 {
                return Err(SceneError::InvalidValue(key.to_string()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ThreadMessage {
    pub thread_id: u32,
    pub finished: bool,
}

/// Spawn `settings.thread_count` workers that pull buckets from the film
/// until none are left. The scene is only read, the film is locked while a
/// finished bucket is written back.
pub fn render(
    tracer: Arc<Tracer>,
    camera: Camera,
    film: Arc<RwLock<Film>>,
    settings: Settings,
    progress: ProgressBar,
) -> (Vec<JoinHandle<()>>, Receiver<ThreadMessage>) {
    let mut threads: Vec<JoinHandle<()>> = vec![];
    let (sender, receiver) = channel::<ThreadMessage>();

    info!(
        "Start render, w{} px, h{} px, {} threads",
        settings.image_width, settings.image_height, settings.thread_count
    );

    for thread_id in 0..settings.thread_count {
        let tracer = tracer.clone();
        let film = film.clone();
        let progress = progress.clone();
        let sender = sender.clone();

        let thread = thread::spawn(move || {
            let start_time = Instant::now();
            let min_t = tracer.scene().min_distance;
            let max_t = tracer.scene().max_distance;
            let mut pixels_done: u64 = 0;

            // use loop to split getting work and executing work. Else the lock
            // would be retained during execution.
            loop {
                let bucket = film.write().expect("film lock poisoned").get_bucket(); // drop lock
                let mut bucket = match bucket {
                    Some(bucket) => bucket,
                    None => break,
                };

                bucket.samples.reserve(bucket.pixel_count() as usize);

                for y in bucket.start.y..bucket.end.y {
                    for x in bucket.start.x..bucket.end.x {
                        let (canvas_x, canvas_y) = camera.raster_to_canvas(x, y);
                        let ray = camera.generate_ray(canvas_x, canvas_y);

                        bucket.add_sample(SampleResult {
                            canvas_point: Point2::new(canvas_x, canvas_y),
                            color: tracer.trace_ray(ray.point, ray.direction, min_t, max_t),
                        });
                    }
                }

                pixels_done += bucket.pixel_count() as u64;

                film.write()
                    .expect("film lock poisoned")
                    .update_image_buffer(&bucket);
                progress.inc(1);
            }

            debug!(
                "Thread {} done, {} pixels in {:.2?}",
                thread_id,
                pixels_done,
                start_time.elapsed()
            );

            // the receiver may be gone if the caller stopped listening
            let _ = sender.send(ThreadMessage {
                thread_id,
                finished: true,
            });
        });

        threads.push(thread);
    }

    (threads, receiver)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use image::Rgba;
    use indicatif::ProgressBar;
    use nalgebra::{Vector2, Vector3};

    use super::*;
    use crate::camera::{Camera, Viewport};
    use crate::helpers::load_yaml_str;
    use crate::lights::Light;
    use crate::objects::sphere::Sphere;
    use crate::scene::Scene;

    #[test]
    fn settings_from_yaml() {
        let yaml = load_yaml_str(
            "film: { image_width: 320, image_height: 200, bucket_width: 16 }\nrenderer: { threads: 3 }\ntracer: { geometry: standard }",
        )
        .unwrap();

        let settings = Settings::from_yaml(&yaml).unwrap();

        assert_eq!(3, settings.thread_count);
        assert_eq!(320, settings.image_width);
        assert_eq!(200, settings.image_height);
        assert_eq!(16, settings.bucket_width);
        assert_eq!(32, settings.bucket_height);
        assert_eq!(GeometryMode::Standard, settings.geometry);
    }

    #[test]
    fn settings_reject_zero_sizes() {
        let yaml = load_yaml_str("film: { image_width: 0 }").unwrap();

        assert!(matches!(
            Settings::from_yaml(&yaml),
            Err(SceneError::InvalidValue(_))
        ));

        let yaml = load_yaml_str("tracer: { geometry: sideways }").unwrap();
        assert!(matches!(
            Settings::from_yaml(&yaml),
            Err(SceneError::UnknownGeometryMode(_))
        ));
    }

    #[test]
    fn render_small_image() {
        let scene = Scene::new(
            vec![Sphere::new(
                Vector3::new(0.0, 0.0, 3.0),
                1.0,
                Vector3::new(255.0, 0.0, 0.0),
                -1.0,
            )
            .unwrap()],
            vec![Light::ambient(1.0).unwrap()],
            Vector3::new(255.0, 255.0, 255.0),
            Vector3::zeros(),
            Viewport::default(),
            1.0,
            f64::INFINITY,
        )
        .unwrap();

        let settings = Settings {
            thread_count: 3,
            image_width: 20,
            image_height: 20,
            bucket_width: 7,
            bucket_height: 5,
            geometry: GeometryMode::AsWritten,
        };

        let film = Arc::new(RwLock::new(Film::new(
            Vector2::new(settings.image_width, settings.image_height),
            Vector2::new(settings.bucket_width, settings.bucket_height),
        )));
        let camera = Camera::new(
            scene.camera_position,
            scene.viewport,
            settings.image_width,
            settings.image_height,
        );
        let tracer = Arc::new(Tracer::new(Arc::new(scene), settings.geometry));

        let (threads, receiver) = render(
            tracer,
            camera,
            film.clone(),
            settings,
            ProgressBar::hidden(),
        );

        for thread in threads {
            thread.join().unwrap();
        }

        let finished = receiver.try_iter().filter(|m| m.finished).count();
        assert_eq!(3, finished);

        let film = film.read().unwrap();
        assert_eq!(0, film.bucket_count());
        assert_eq!(&Rgba([255, 0, 0, 255]), film.image_buffer.get_pixel(10, 10));
        assert_eq!(&Rgba([255, 255, 255, 255]), film.image_buffer.get_pixel(0, 0));
        assert_eq!(&Rgba([255, 255, 255, 255]), film.image_buffer.get_pixel(19, 19));
        // every pixel was written
        assert!(film.image_buffer.pixels().all(|p| p.0[3] == 255));
    }
}
