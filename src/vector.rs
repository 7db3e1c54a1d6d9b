use nalgebra::Vector3;

pub fn add(a: Vector3<f64>, b: Vector3<f64>) -> Vector3<f64> {
    a + b
}

pub fn subtract(a: Vector3<f64>, b: Vector3<f64>) -> Vector3<f64> {
    a - b
}

/// Multiply every component of `v` by `s`.
pub fn scale(v: Vector3<f64>, s: f64) -> Vector3<f64> {
    v * s
}

pub fn dot(a: Vector3<f64>, b: Vector3<f64>) -> f64 {
    a.dot(&b)
}

pub fn magnitude(v: Vector3<f64>) -> f64 {
    dot(v, v).sqrt()
}

/// Outward normal of a sphere at `point`. Not normalized, its length is the
/// distance between `point` and `center`.
pub fn normal_at(point: Vector3<f64>, center: Vector3<f64>) -> Vector3<f64> {
    subtract(point, center)
}

/// Cosine of the angle between `a` and `b` for an already computed
/// `a_dot_b`. Returns `None` when either vector has zero length.
pub fn cosine(a_dot_b: f64, a: Vector3<f64>, b: Vector3<f64>) -> Option<f64> {
    let denominator = magnitude(a) * magnitude(b);

    if denominator == 0.0 {
        return None;
    }

    Some(a_dot_b / denominator)
}
