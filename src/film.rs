use std::cmp;
use std::path::Path;

use image::{ImageBuffer, ImageResult, Rgba};
use nalgebra::{Point2, Vector2, Vector3};
use rand::seq::SliceRandom;

use crate::camera::translate_to_center;

/// A traced color at a centered canvas coordinate.
#[derive(Debug, Copy, Clone)]
pub struct SampleResult {
    pub canvas_point: Point2<f64>,
    pub color: Vector3<f64>,
}

/// Rectangle of raster pixels, `end` exclusive.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub start: Point2<u32>,
    pub end: Point2<u32>,
    pub samples: Vec<SampleResult>,
}

impl Bucket {
    pub fn add_sample(&mut self, sample: SampleResult) {
        self.samples.push(sample);
    }

    pub fn pixel_count(&self) -> u32 {
        (self.end.x - self.start.x) * (self.end.y - self.start.y)
    }
}

pub struct Film {
    pub image_size: Vector2<u32>,
    pub image_buffer: ImageBuffer<Rgba<u8>, Vec<u8>>,
    buckets: Vec<Bucket>,
}

impl Film {
    pub fn new(image_size: Vector2<u32>, bucket_size: Vector2<u32>) -> Film {
        Film {
            image_size,
            image_buffer: ImageBuffer::new(image_size.x, image_size.y),
            buckets: init_buckets(image_size, bucket_size),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn get_bucket(&mut self) -> Option<Bucket> {
        self.buckets.pop()
    }

    pub fn update_image_buffer(&mut self, bucket: &Bucket) {
        for sample in &bucket.samples {
            self.put_pixel(sample.canvas_point, sample.color);
        }
    }

    /// Write `color` at a centered canvas coordinate. Points outside the
    /// image are ignored.
    pub fn put_pixel(&mut self, canvas_point: Point2<f64>, color: Vector3<f64>) {
        let (x, y) = translate_to_center(
            self.image_size.x as f64,
            self.image_size.y as f64,
            canvas_point.x,
            canvas_point.y,
        );
        let (x, y) = (x.floor(), y.floor());

        if x < 0.0 || y < 0.0 || x >= self.image_size.x as f64 || y >= self.image_size.y as f64 {
            return;
        }

        self.image_buffer
            .put_pixel(x as u32, y as u32, color_to_rgba(color));
    }

    pub fn save(&self, path: &Path) -> ImageResult<()> {
        self.image_buffer.save(path)
    }
}

/// Colors are unbounded while tracing, channels are only clamped here.
pub fn color_to_rgba(color: Vector3<f64>) -> Rgba<u8> {
    let channel = |c: f64| c.round().clamp(0.0, 255.0) as u8;

    Rgba([channel(color.x), channel(color.y), channel(color.z), 255])
}

fn init_buckets(image_size: Vector2<u32>, bucket_size: Vector2<u32>) -> Vec<Bucket> {
    let mut buckets = Vec::new();

    for x in 0..image_size.x.div_ceil(bucket_size.x) {
        for y in 0..image_size.y.div_ceil(bucket_size.y) {
            let start = Point2::new(x * bucket_size.x, y * bucket_size.y);

            // prevent rounding error, cap at image size
            let x_end = cmp::min(start.x + bucket_size.x, image_size.x);
            let y_end = cmp::min(start.y + bucket_size.y, image_size.y);

            buckets.push(Bucket {
                start,
                end: Point2::new(x_end, y_end),
                samples: vec![],
            });
        }
    }

    buckets.shuffle(&mut rand::rng());

    buckets
}
