use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;

/// A ray: an origin point and a direction vector.
///
/// Rays are values; moving a ray into another space produces a new ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    /// Creates a ray, coercing `origin` to a point and `direction` to a vector.
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        origin.w = 1.0;
        direction.w = 0.0;

        Ray4D { origin, direction }
    }

    /// The point at parametric distance `t` along the ray.
    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + t * self.direction
    }

    /// Applies `m` to both the origin and the direction.
    ///
    /// The direction is not renormalized, so a `t` found in the transformed
    /// space is also valid for the untransformed ray.
    pub fn transform(&self, m: &Matrix4D) -> Ray4D {
        Ray4D {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }
}

#[test]
fn position_along_ray() {
    let r = Ray4D::new(Tuple4D::point(2.0, 3.0, 4.0), Tuple4D::vector(1.0, 0.0, 0.0));

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn constructor_fixes_w_components() {
    let r = Ray4D::new(Tuple4D::tuple(1.0, 2.0, 3.0, 0.0),
        Tuple4D::tuple(0.0, 1.0, 0.0, 1.0));

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}

#[test]
fn translating_a_ray_keeps_direction() {
    let r = Ray4D::new(Tuple4D::point(1.0, 2.0, 3.0), Tuple4D::vector(0.0, 1.0, 0.0));
    let moved = r.transform(&Matrix4D::translation(3.0, 4.0, 5.0));

    assert_eq!(moved.origin, Tuple4D::point(4.0, 6.0, 8.0));
    assert_eq!(moved.direction, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn scaling_a_ray_stretches_direction() {
    let r = Ray4D::new(Tuple4D::point(1.0, 2.0, 3.0), Tuple4D::vector(0.0, 1.0, 0.0));
    let scaled = r.transform(&Matrix4D::scaling(2.0, 3.0, 4.0));

    assert_eq!(scaled.origin, Tuple4D::point(2.0, 6.0, 12.0));
    assert_eq!(scaled.direction, Tuple4D::vector(0.0, 3.0, 0.0));
}
