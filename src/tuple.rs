use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A homogeneous 4D tuple.
///
/// Points carry `w == 1.0` and vectors carry `w == 0.0`. The arithmetic below
/// keeps `w` consistent on its own: point minus point is a vector, point plus
/// vector is a point, and so on. Vector-only operations (`cross`,
/// `normalize`, `magnitude`) check their operands in debug builds.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

/// Tuples are compared component-wise within `EPSILON`.
impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    /// The object-space origin.
    pub fn origin() -> Tuple4D {
        Tuple4D::point(0.0, 0.0, 0.0)
    }

    pub fn is_point(&self) -> bool {
        feq(self.w, 1.0)
    }

    pub fn is_vector(&self) -> bool {
        feq(self.w, 0.0)
    }

    /// Drops the `w` component, turning any tuple into a vector.
    pub fn as_vector(&self) -> Tuple4D {
        Tuple4D { w: 0.0, ..*self }
    }

    pub fn magnitude(&self) -> f64 {
        debug_assert!(self.is_vector(), "magnitude of a point: {:?}", self);

        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    pub fn normalize(&self) -> Tuple4D {
        let mag = self.magnitude();

        Tuple4D::vector(self.x / mag, self.y / mag, self.z / mag)
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        debug_assert!(self.is_vector() && other.is_vector(),
            "cross product needs two vectors");

        Tuple4D::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Tuple4D) -> Tuple4D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Tuple4D::tuple(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Tuple4D::tuple(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        Tuple4D::tuple(-self.x, -self.y, -self.z, -self.w)
    }
}

/// Scalar right-multiplication.
///
/// ```
/// use ray_kernel::tuple::Tuple4D;
///
/// let v = Tuple4D::vector(1.0, -2.0, 3.0);
/// assert_eq!(v * 2.0, Tuple4D::vector(2.0, -4.0, 6.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Tuple4D::tuple(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

/// Scalar left-multiplication, so `t * ray.direction` reads naturally.
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        t * self
    }
}

#[test]
fn point_plus_vector_is_point() {
    let p = Tuple4D::point(3.0, -2.0, 5.0);
    let v = Tuple4D::vector(-2.0, 3.0, 1.0);

    let sum = p + v;
    assert!(sum.is_point());
    assert_eq!(sum, Tuple4D::point(1.0, 1.0, 6.0));
}

#[test]
fn point_minus_point_is_vector() {
    let a = Tuple4D::point(3.0, 2.0, 1.0);
    let b = Tuple4D::point(5.0, 6.0, 7.0);

    let diff = a - b;
    assert!(diff.is_vector());
    assert_eq!(diff, Tuple4D::vector(-2.0, -4.0, -6.0));
}

#[test]
fn point_minus_vector_is_point() {
    let p = Tuple4D::point(3.0, 2.0, 1.0);
    let v = Tuple4D::vector(5.0, 6.0, 7.0);

    assert_eq!(p - v, Tuple4D::point(-2.0, -4.0, -6.0));
}

#[test]
fn negating_flips_every_component() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(-a, Tuple4D::tuple(-1.0, 2.0, -3.0, 4.0));
}

#[test]
fn scalar_multiplication_commutes() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 0.5, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
    assert_eq!(3.5 * a, a * 3.5);
}

#[test]
fn magnitude_ignores_sign() {
    let v = Tuple4D::vector(-1.0, 2.0, -3.0);

    approx::assert_abs_diff_eq!(v.magnitude(), 14.0f64.sqrt());
}

#[test]
fn normalized_vector_has_unit_length() {
    let v = Tuple4D::vector(1.0, 2.0, 3.0);
    let n = v.normalize();
    let root = 14.0f64.sqrt();

    assert_eq!(n, Tuple4D::vector(1.0 / root, 2.0 / root, 3.0 / root));
    approx::assert_abs_diff_eq!(n.magnitude(), 1.0, epsilon = 1e-12);
}

#[test]
fn dot_and_cross() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple4D::vector(1.0, -2.0, 1.0));
}

#[test]
fn reflect_off_slanted_surface() {
    let v = Tuple4D::vector(0.0, -1.0, 0.0);
    let half = 2.0f64.sqrt() / 2.0;
    let n = Tuple4D::vector(half, half, 0.0);

    assert_eq!(v.reflect(&n), Tuple4D::vector(1.0, 0.0, 0.0));
}

#[test]
fn equality_tolerates_rounding() {
    let a = Tuple4D::point(1.0, 2.0, 3.0);
    let b = Tuple4D::point(1.0 + 1e-7, 2.0 - 1e-7, 3.0);
    let c = Tuple4D::point(1.001, 2.0, 3.0);

    assert_eq!(a, b);
    assert_ne!(a, c);
}
