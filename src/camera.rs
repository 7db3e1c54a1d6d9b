use nalgebra::Vector3;

use crate::renderer::Ray;
use crate::scene::SceneError;

/// Canvas coordinates centered on the canvas (x right, y up) to raster
/// coordinates (origin top left, y down).
pub fn translate_to_center(width: f64, height: f64, x: f64, y: f64) -> (f64, f64) {
    (width / 2.0 + x, height / 2.0 - y)
}

/// Inverse of [`translate_to_center`].
pub fn translate_from_center(width: f64, height: f64, x: f64, y: f64) -> (f64, f64) {
    (x - width / 2.0, height / 2.0 - y)
}

/// The rectangle at `distance` in front of the camera the canvas is
/// projected onto.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, distance: f64) -> Result<Self, SceneError> {
        for value in [width, height, distance] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidViewport(value));
            }
        }

        Ok(Viewport {
            width,
            height,
            distance,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1.0,
            height: 1.0,
            distance: 1.0,
        }
    }
}

/// World space -> camera sits at `position` looking down +z
/// Canvas space -> centered pixel coordinates, x right, y up
/// Raster space -> x and y range from (0,0) to (canvas_width, canvas_height)
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub position: Vector3<f64>,
    pub viewport: Viewport,
    canvas_width: u32,
    canvas_height: u32,
}

impl Camera {
    pub fn new(
        position: Vector3<f64>,
        viewport: Viewport,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Camera {
        Camera {
            position,
            viewport,
            canvas_width,
            canvas_height,
        }
    }

    /// Direction from the camera through the centered canvas point `(x, y)`.
    pub fn canvas_to_viewport(&self, x: f64, y: f64) -> Vector3<f64> {
        Vector3::new(
            x * self.viewport.width / self.canvas_width as f64,
            y * self.viewport.height / self.canvas_height as f64,
            self.viewport.distance,
        )
    }

    pub fn raster_to_canvas(&self, raster_x: u32, raster_y: u32) -> (f64, f64) {
        translate_from_center(
            self.canvas_width as f64,
            self.canvas_height as f64,
            raster_x as f64,
            raster_y as f64,
        )
    }

    /// Primary ray through the centered canvas point `(x, y)`.
    pub fn generate_ray(&self, x: f64, y: f64) -> Ray {
        Ray {
            point: self.position,
            direction: self.canvas_to_viewport(x, y),
        }
    }
}
