#![warn(clippy::all, clippy::cargo)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use clap::Parser;
use indicatif::ProgressBar;
use log::{debug, info};
use nalgebra::Vector2;

use film::Film;
use renderer::Settings;
use scene::Scene;
use tracer::{GeometryMode, Tracer};

use crate::camera::Camera;
use crate::helpers::load_yaml_file;

mod camera;
mod film;
mod helpers;
mod lighting;
mod lights;
mod objects;
mod renderer;
mod scene;
mod tracer;
mod vector;

#[derive(Parser, Debug)]
struct Args {
    /// Scene file, the built-in scene is rendered when left out
    scene_file: Option<PathBuf>,
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
    #[arg(short, long)]
    threads: Option<u32>,
    #[arg(short, long, value_enum)]
    geometry: Option<GeometryMode>,
    #[arg(short = 'W', long)]
    width: Option<u32>,
    #[arg(short = 'H', long)]
    height: Option<u32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Load scene and settings from yaml file
    let (scene, mut settings) = match &args.scene_file {
        Some(path) => {
            info!("Load scene from {}", path.display());
            let scene_yaml = load_yaml_file(path)?;
            (Scene::from_yaml(&scene_yaml)?, Settings::from_yaml(&scene_yaml)?)
        }
        None => {
            info!("No scene file given, using the built-in scene");
            (Scene::default_scene()?, Settings::default())
        }
    };

    if let Some(threads) = args.threads {
        settings.thread_count = threads;
    }
    if let Some(geometry) = args.geometry {
        settings.geometry = geometry;
    }
    if let Some(width) = args.width {
        settings.image_width = width;
    }
    if let Some(height) = args.height {
        settings.image_height = height;
    }
    settings.validate()?;

    debug!("{:?}", settings);

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

    let progress = ProgressBar::new(film.read().expect("film lock poisoned").bucket_count() as u64);

    // Start the render threads
    let start_time = Instant::now();
    let (threads, receiver) = renderer::render(tracer, camera, film.clone(), settings, progress.clone());

    let mut running_threads = threads.len();
    while running_threads > 0 {
        match receiver.recv() {
            Ok(message) if message.finished => {
                debug!("Thread {} finished", message.thread_id);
                running_threads -= 1;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    for thread in threads {
        thread.join().map_err(|_| "render thread panicked")?;
    }

    progress.finish();
    info!("All work is done in {:.2?}.", start_time.elapsed());

    save(&film, &args.output)?;

    Ok(())
}

fn save(film: &RwLock<Film>, output: &Path) -> Result<(), Box<dyn Error>> {
    film.read().expect("film lock poisoned").save(output)?;
    info!("Image written to {}", output.display());

    Ok(())
}
