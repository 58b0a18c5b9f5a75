use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::consts::EPSILON;
use crate::tuple::Tuple4D;

/// Sign applied to a minor to turn it into a cofactor.
fn cofactor_sign(row: usize, col: usize) -> f64 {
    if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
}

/// Panics unless `(row, col)` lies inside an `n`-by-`n` grid.
fn check_index(n: usize, row: usize, col: usize) {
    assert!(row < n && col < n,
        "matrix index ({}, {}) out of range for a {}x{} matrix", row, col, n, n);
}

/// A 2x2 matrix. Only exists as the base case of cofactor expansion.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix2D {
    data: [f64; 4],
}

impl From<[f64; 4]> for Matrix2D {
    fn from(data: [f64; 4]) -> Matrix2D {
        Matrix2D { data }
    }
}

impl Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        check_index(2, row, col);
        &self.data[row * 2 + col]
    }
}

impl Matrix2D {
    fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

/// A 3x3 matrix, produced by removing a row and column from a `Matrix4D`.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix3D {
    data: [f64; 9],
}

impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        check_index(3, row, col);
        &self.data[row * 3 + col]
    }
}

impl Matrix3D {
    /// Removes `row` and `col`, leaving a 2x2 matrix.
    fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        check_index(3, row, col);

        let mut buf = [0.0; 4];
        let kept = (0..3).filter(|&r| r != row)
            .flat_map(|r| (0..3).filter(move |&c| c != col).map(move |c| (r, c)));
        for (slot, (r, c)) in buf.iter_mut().zip(kept) {
            *slot = self[(r, c)];
        }

        Matrix2D { data: buf }
    }

    fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        cofactor_sign(row, col) * self.minor(row, col)
    }

    fn determinant(&self) -> f64 {
        (0..3).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }
}

/// A 4x4 matrix.
///
/// Every transform in the kernel is one of these: shapes own one, rays are
/// moved between spaces with one, and normals are carried back to world space
/// with the transpose of an inverse one.
///
/// Element access is by `(row, col)` and is bounds-checked; indexing outside
/// the 4x4 grid panics. Equality is element-wise within `EPSILON`.
///
/// # Examples
///
/// ```
/// # use ray_kernel::tuple::Tuple4D;
/// # use ray_kernel::matrix::Matrix4D;
/// let m = Matrix4D::translation(1.0, 2.0, 3.0) * Matrix4D::scaling(2.0, 2.0, 2.0);
/// let p = Tuple4D::point(1.0, 1.0, 1.0);
/// assert_eq!(m * p, Tuple4D::point(3.0, 4.0, 5.0));
/// assert_eq!(m.inverse() * (m * p), p);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix4D {
    /// Creates a zero matrix.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    pub fn identity() -> Matrix4D {
        let mut m = Self::new();
        for i in 0..4 {
            m[(i, i)] = 1.0;
        }

        m
    }

    /// Offsets points by `x`, `y` and `z`. Vectors are unaffected.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;

        m
    }

    /// Scales along each axis. A negative factor reflects.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 0)] = x;
        m[(1, 1)] = y;
        m[(2, 2)] = z;

        m
    }

    /// Rotates `r` radians about the X axis.
    pub fn rotation_x(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(1, 1)] = cos;
        m[(1, 2)] = -sin;
        m[(2, 1)] = sin;
        m[(2, 2)] = cos;

        m
    }

    /// Rotates `r` radians about the Y axis.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(0, 0)] = cos;
        m[(0, 2)] = sin;
        m[(2, 0)] = -sin;
        m[(2, 2)] = cos;

        m
    }

    /// Rotates `r` radians about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();
        let mut m = Self::identity();
        m[(0, 0)] = cos;
        m[(0, 1)] = -sin;
        m[(1, 0)] = sin;
        m[(1, 1)] = cos;

        m
    }

    /// Shears each axis in proportion to the other two.
    ///
    /// `xy` moves `x` in proportion to `y`, `xz` moves `x` in proportion to
    /// `z`, and so on.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 1)] = xy;
        m[(0, 2)] = xz;
        m[(1, 0)] = yx;
        m[(1, 2)] = yz;
        m[(2, 0)] = zx;
        m[(2, 1)] = zy;

        m
    }

    /// Orients the world as seen from `from`, looking at `to`.
    pub fn view_transform(from: Tuple4D, to: Tuple4D, up: Tuple4D) -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4D = [
             left.x,     left.y,     left.z,    0.0,
             true_up.x,  true_up.y,  true_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
             0.0,        0.0,        0.0,       1.0,
        ].into();

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }

    /// Returns a new matrix with rows and columns swapped.
    pub fn transposition(&self) -> Matrix4D {
        let mut t = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                t[(c, r)] = self[(r, c)];
            }
        }

        t
    }

    /// Removes `row` and `col`, leaving a 3x3 matrix.
    fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        check_index(4, row, col);

        let mut buf = [0.0; 9];
        let kept = (0..4).filter(|&r| r != row)
            .flat_map(|r| (0..4).filter(move |&c| c != col).map(move |c| (r, c)));
        for (slot, (r, c)) in buf.iter_mut().zip(kept) {
            *slot = self[(r, c)];
        }

        Matrix3D { data: buf }
    }

    /// The determinant of the submatrix at `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// The minor at `row` and `col`, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        cofactor_sign(row, col) * self.minor(row, col)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        self.determinant_along(0)
    }

    /// Determinant by cofactor expansion along `row`.
    ///
    /// Every row gives the same value up to rounding.
    pub fn determinant_along(&self, row: usize) -> f64 {
        (0..4).map(|c| self[(row, c)] * self.cofactor(row, c)).sum()
    }

    /// A matrix is treated as singular when `|det| < EPSILON`.
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= EPSILON
    }

    /// The inverse (adjugate over determinant), or `None` if singular.
    pub fn try_inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }

        let mut inv = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }

    /// The inverse of this matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is singular. Shapes must never be given a
    /// degenerate transform; callers holding untrusted input should check
    /// with `try_inverse` or `is_invertible` first.
    pub fn inverse(&self) -> Matrix4D {
        match self.try_inverse() {
            Some(inv) => inv,
            None => panic!("attempted to invert a singular matrix:\n{}", self),
        }
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        check_index(4, row, col);
        &self.data[row * 4 + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        check_index(4, row, col);
        &mut self.data[row * 4 + col]
    }
}

/// Matrix product. Not commutative: `a * b` applies `b` first.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = (0..4).map(|i| self[(r, i)] * other[(i, c)]).sum();
            }
        }

        res
    }
}

/// Applies a matrix to a tuple, treated as a column.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        let row = |r: usize| {
            self[(r, 0)] * t.x + self[(r, 1)] * t.y
                + self[(r, 2)] * t.z + self[(r, 3)] * t.w
        };

        Tuple4D::tuple(row(0), row(1), row(2), row(3))
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn identity_is_neutral() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        5.0, 6.0, 7.0, 8.0,
                        9.0, 8.0, 7.0, 6.0,
                        5.0, 4.0, 3.0, 2.0, ].into();

    assert_eq!(Matrix4D::identity() * a, a);
    assert_eq!(a * Matrix4D::identity(), a);
}

#[test]
fn product_of_two_matrices() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        5.0, 6.0, 7.0, 8.0,
                        9.0, 8.0, 7.0, 6.0,
                        5.0, 4.0, 3.0, 2.0, ].into();
    let b: Matrix4D = [ -2.0, 1.0, 2.0,  3.0,
                         3.0, 2.0, 1.0, -1.0,
                         4.0, 3.0, 6.0,  5.0,
                         1.0, 2.0, 7.0,  8.0, ].into();
    let ab: Matrix4D = [ 20.0, 22.0,  50.0,  48.0,
                         44.0, 54.0, 114.0, 108.0,
                         40.0, 58.0, 110.0, 102.0,
                         16.0, 26.0,  46.0,  42.0, ].into();

    assert_eq!(a * b, ab);
    assert_ne!(b * a, ab);
}

#[test]
fn matrix_times_tuple() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        2.0, 4.0, 4.0, 2.0,
                        8.0, 6.0, 4.0, 1.0,
                        0.0, 0.0, 0.0, 1.0, ].into();
    let t = Tuple4D::tuple(1.0, 2.0, 3.0, 1.0);

    assert_eq!(a * t, Tuple4D::tuple(18.0, 24.0, 33.0, 1.0));
}

#[test]
#[should_panic(expected = "out of range")]
fn indexing_past_the_grid_panics() {
    let m = Matrix4D::identity();
    let _ = m[(0, 4)];
}

#[test]
fn transposition_swaps_rows_and_columns() {
    let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                        9.0, 8.0, 0.0, 8.0,
                        1.0, 8.0, 5.0, 3.0,
                        0.0, 0.0, 5.0, 8.0, ].into();
    let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                        9.0, 8.0, 8.0, 0.0,
                        3.0, 0.0, 5.0, 5.0,
                        0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(a.transposition(), t);
    assert_eq!(t.transposition(), a);
    assert_eq!(Matrix4D::identity().transposition(), Matrix4D::identity());
}

#[test]
fn submatrices_drop_one_row_and_column() {
    let a: Matrix3D = [  1.0, 5.0,  0.0,
                        -3.0, 2.0,  7.0,
                         0.0, 6.0, -3.0, ].into();
    let b: Matrix4D = [ -6.0, 1.0,  1.0, 6.0,
                        -8.0, 5.0,  8.0, 6.0,
                        -1.0, 0.0,  8.0, 2.0,
                        -7.0, 1.0, -1.0, 1.0, ].into();

    assert_eq!(a.submatrix(0, 2), Matrix2D::from([-3.0, 2.0, 0.0, 6.0]));
    assert_eq!(b.submatrix(2, 1), Matrix3D::from([ -6.0,  1.0, 6.0,
                                                   -8.0,  8.0, 6.0,
                                                   -7.0, -1.0, 1.0, ]));
}

#[test]
fn cofactors_of_a_3x3() {
    let a: Matrix3D = [ 3.0,  5.0,  0.0,
                        2.0, -1.0, -7.0,
                        6.0, -1.0,  5.0, ].into();

    assert_eq!(a.minor(0, 0), -12.0);
    assert_eq!(a.cofactor(0, 0), -12.0);
    assert_eq!(a.minor(1, 0), 25.0);
    assert_eq!(a.cofactor(1, 0), -25.0);
}

#[test]
fn determinant_of_a_3x3() {
    let a: Matrix3D = [  1.0, 2.0,  6.0,
                        -5.0, 8.0, -4.0,
                         2.0, 6.0,  4.0, ].into();

    assert_eq!(a.cofactor(0, 2), -46.0);
    assert_eq!(a.determinant(), -196.0);
}

#[test]
fn determinant_of_a_4x4_along_any_row() {
    let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                        -3.0,  1.0,  7.0,  3.0,
                         1.0,  2.0, -9.0,  6.0,
                        -6.0,  7.0,  7.0, -9.0, ].into();

    assert_eq!(a.cofactor(0, 0), 690.0);
    assert_eq!(a.cofactor(0, 3), 51.0);
    assert_eq!(a.determinant(), -4071.0);
    for row in 1..4 {
        approx::assert_abs_diff_eq!(a.determinant_along(row), -4071.0,
            epsilon = 1e-9);
    }
}

#[test]
fn singular_matrix_has_no_inverse() {
    let a: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                         9.0,  6.0,  2.0,  6.0,
                         0.0, -5.0,  1.0, -5.0,
                         0.0,  0.0,  0.0,  0.0, ].into();

    assert!(!a.is_invertible());
    assert_eq!(a.try_inverse(), None);
}

#[test]
#[should_panic(expected = "singular")]
fn inverting_a_singular_matrix_panics() {
    Matrix4D::scaling(1.0, 0.0, 1.0).inverse();
}

#[test]
fn inverse_by_adjugate() {
    let a: Matrix4D = [  8.0, -5.0,  9.0,  2.0,
                         7.0,  5.0,  6.0,  1.0,
                        -6.0,  0.0,  9.0,  6.0,
                        -3.0,  0.0, -9.0, -4.0, ].into();
    let expected: Matrix4D = [ -0.15385, -0.15385, -0.28205, -0.53846,
                               -0.07692,  0.12308,  0.02564,  0.03077,
                                0.35897,  0.35897,  0.43590,  0.92308,
                               -0.69231, -0.69231, -0.76923, -1.92308, ].into();

    assert_eq!(a.inverse(), expected);
    assert_eq!(a * a.inverse(), Matrix4D::identity());
}

#[test]
fn product_times_inverse_restores_factor() {
    let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                         3.0,  8.0,  2.0, -9.0,
                        -4.0,  4.0,  4.0,  1.0,
                        -6.0,  5.0, -1.0,  1.0, ].into();
    let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                        3.0, -1.0, 7.0, 0.0,
                        7.0,  0.0, 5.0, 4.0,
                        6.0, -2.0, 0.0, 5.0, ].into();

    assert_eq!((a * b) * b.inverse(), a);
}

#[test]
fn inverse_round_trips_points() {
    let transforms = [
        Matrix4D::translation(5.0, -3.0, 2.0),
        Matrix4D::scaling(2.0, 3.0, 4.0),
        Matrix4D::rotation_x(0.3) * Matrix4D::rotation_y(1.1),
        Matrix4D::shearing(1.0, 0.5, 0.0, 2.0, 0.25, 0.0),
        Matrix4D::translation(1.0, 2.0, 3.0)
            * Matrix4D::rotation_z(2.5)
            * Matrix4D::scaling(0.5, 7.0, 1.5),
    ];
    let points = [
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::point(-3.0, 4.0, 5.0),
        Tuple4D::point(12.5, -0.125, 9.0),
    ];

    for m in transforms.iter() {
        for p in points.iter() {
            assert_eq!(m.inverse() * (*m * *p), *p);
        }
    }
}

#[test]
fn translation_moves_points_not_vectors() {
    let m = Matrix4D::translation(5.0, -3.0, 2.0);

    assert_eq!(m * Tuple4D::point(-3.0, 4.0, 5.0), Tuple4D::point(2.0, 1.0, 7.0));
    assert_eq!(m.inverse() * Tuple4D::point(-3.0, 4.0, 5.0),
        Tuple4D::point(-8.0, 7.0, 3.0));
    assert_eq!(m * Tuple4D::vector(-3.0, 4.0, 5.0),
        Tuple4D::vector(-3.0, 4.0, 5.0));
}

#[test]
fn scaling_and_its_inverse() {
    let m = Matrix4D::scaling(2.0, 3.0, 4.0);
    let v = Tuple4D::vector(-4.0, 6.0, 8.0);

    assert_eq!(m * v, Tuple4D::vector(-8.0, 18.0, 32.0));
    assert_eq!(m.inverse() * v, Tuple4D::vector(-2.0, 2.0, 2.0));
    assert_eq!(Matrix4D::scaling(-1.0, 1.0, 1.0) * Tuple4D::point(2.0, 3.0, 4.0),
        Tuple4D::point(-2.0, 3.0, 4.0));
}

#[test]
fn quarter_turns_about_each_axis() {
    let quarter = std::f64::consts::FRAC_PI_2;

    assert_eq!(Matrix4D::rotation_x(quarter) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(Matrix4D::rotation_y(quarter) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(1.0, 0.0, 0.0));
    assert_eq!(Matrix4D::rotation_z(quarter) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0));
}

#[test]
fn eighth_turn_about_x() {
    let eighth = Matrix4D::rotation_x(std::f64::consts::FRAC_PI_4);
    let half = 2.0f64.sqrt() / 2.0;

    assert_eq!(eighth * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, half, half));
}

#[test]
fn shearing_each_pair_of_axes() {
    let p = Tuple4D::point(2.0, 3.0, 4.0);
    let cases = [
        (Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0), Tuple4D::point(5.0, 3.0, 4.0)),
        (Matrix4D::shearing(0.0, 1.0, 0.0, 0.0, 0.0, 0.0), Tuple4D::point(6.0, 3.0, 4.0)),
        (Matrix4D::shearing(0.0, 0.0, 1.0, 0.0, 0.0, 0.0), Tuple4D::point(2.0, 5.0, 4.0)),
        (Matrix4D::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0), Tuple4D::point(2.0, 7.0, 4.0)),
        (Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 1.0, 0.0), Tuple4D::point(2.0, 3.0, 6.0)),
        (Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0), Tuple4D::point(2.0, 3.0, 7.0)),
    ];

    for (m, expected) in cases.iter() {
        assert_eq!(*m * p, *expected);
    }
}

#[test]
fn chained_transforms_apply_right_to_left() {
    let a = Matrix4D::rotation_x(std::f64::consts::FRAC_PI_2);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);

    assert_eq!((c * b * a) * Tuple4D::point(1.0, 0.0, 1.0),
        Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn view_transforms() {
    let up = Tuple4D::vector(0.0, 1.0, 0.0);
    let origin = Tuple4D::origin();

    assert_eq!(Matrix4D::view_transform(origin, Tuple4D::point(0.0, 0.0, -1.0), up),
        Matrix4D::identity());
    assert_eq!(Matrix4D::view_transform(origin, Tuple4D::point(0.0, 0.0, 1.0), up),
        Matrix4D::scaling(-1.0, 1.0, -1.0));
    assert_eq!(Matrix4D::view_transform(Tuple4D::point(0.0, 0.0, 8.0), origin, up),
        Matrix4D::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view_transform() {
    let from = Tuple4D::point(1.0, 3.0, 2.0);
    let to = Tuple4D::point(4.0, -2.0, 8.0);
    let up = Tuple4D::vector(1.0, 1.0, 0.0);

    let expected: Matrix4D = [ -0.50709, 0.50709,  0.67612, -2.36643,
                                0.76772, 0.60609,  0.12122, -2.82843,
                               -0.35857, 0.59761, -0.71714,  0.00000,
                                0.00000, 0.00000,  0.00000,  1.00000, ].into();

    assert_eq!(Matrix4D::view_transform(from, to, up), expected);
}
