use crate::objects::sphere::Sphere;

pub mod sphere;

/// The two parameters at which a ray crosses a surface. `t1` is the root
/// with the added square root, `t2` the one with it subtracted, so
/// `t1 >= t2` for any ray with a non-zero direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub t1: f64,
    pub t2: f64,
}

impl Intersection {
    pub fn roots(&self) -> [f64; 2] {
        [self.t1, self.t2]
    }
}

/// The closest hit found while scanning the scene.
#[derive(Debug, Copy, Clone)]
pub struct Hit<'a> {
    pub distance: f64,
    pub sphere: &'a Sphere,
}
