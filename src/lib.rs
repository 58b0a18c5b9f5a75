pub mod consts;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod bounds;
pub mod shape;
pub mod intersect;
pub mod prepared;

pub mod color;
pub mod light;
pub mod world;

pub mod canvas;
pub mod config;
pub mod render;
pub mod logger;

use crate::consts::EPSILON;

/// Compares two floats within `EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}
