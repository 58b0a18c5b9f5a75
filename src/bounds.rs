use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;

/// An axis-aligned bounding box in some shape's object space.
///
/// An empty box has its minimum above its maximum on every axis, so merging
/// anything into it yields that thing. Unbounded shapes (planes) use
/// infinite extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub minimum: Tuple4D,
    pub maximum: Tuple4D,
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::empty()
    }
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, min_z: f64,
        max_x: f64, max_y: f64, max_z: f64) -> Bounds {
        Bounds {
            minimum: Tuple4D::point(min_x, min_y, min_z),
            maximum: Tuple4D::point(max_x, max_y, max_z),
        }
    }

    /// A box containing nothing.
    pub fn empty() -> Bounds {
        let inf = f64::INFINITY;
        Bounds::new(inf, inf, inf, -inf, -inf, -inf)
    }

    /// A box containing everything.
    pub fn infinite() -> Bounds {
        let inf = f64::INFINITY;
        Bounds::new(-inf, -inf, -inf, inf, inf, inf)
    }

    /// The `[-1, 1]` cube around the object-space origin.
    pub fn unit() -> Bounds {
        Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.minimum.x > self.maximum.x
            || self.minimum.y > self.maximum.y
            || self.minimum.z > self.maximum.z
    }

    pub fn is_finite(&self) -> bool {
        [self.minimum, self.maximum].iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }

    /// Grows the box to contain `p`.
    pub fn add_point(&mut self, p: Tuple4D) {
        self.minimum.x = self.minimum.x.min(p.x);
        self.minimum.y = self.minimum.y.min(p.y);
        self.minimum.z = self.minimum.z.min(p.z);
        self.maximum.x = self.maximum.x.max(p.x);
        self.maximum.y = self.maximum.y.max(p.y);
        self.maximum.z = self.maximum.z.max(p.z);
    }

    /// Grows the box to contain `other`.
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }

        self.add_point(other.minimum);
        self.add_point(other.maximum);
    }

    pub fn contains_point(&self, p: &Tuple4D) -> bool {
        (self.minimum.x..=self.maximum.x).contains(&p.x)
            && (self.minimum.y..=self.maximum.y).contains(&p.y)
            && (self.minimum.z..=self.maximum.z).contains(&p.z)
    }

    /// The axis-aligned box enclosing this box after `m` is applied.
    ///
    /// All eight corners are transformed and re-boxed. A box with an infinite
    /// extent becomes fully infinite, as its corners cannot be transformed.
    pub fn transform(&self, m: &Matrix4D) -> Bounds {
        if self.is_empty() {
            return Bounds::empty();
        }
        if !self.is_finite() {
            return Bounds::infinite();
        }

        let (lo, hi) = (self.minimum, self.maximum);
        let mut out = Bounds::empty();
        for &x in [lo.x, hi.x].iter() {
            for &y in [lo.y, hi.y].iter() {
                for &z in [lo.z, hi.z].iter() {
                    out.add_point(*m * Tuple4D::point(x, y, z));
                }
            }
        }

        out
    }

    /// Entry and exit offsets of a ray crossing the slab `[min, max]` on one
    /// axis, smaller offset first.
    ///
    /// Only a direction of exactly zero counts as parallel; such a ray either
    /// stays inside the slab forever or never enters it. A tiny but nonzero
    /// direction still divides, so far-off crossings are never rejected.
    pub fn check_axis(min: f64, max: f64, origin: f64, direction: f64)
        -> (f64, f64) {
        if direction == 0.0 {
            return if origin < min || origin > max {
                (f64::INFINITY, f64::NEG_INFINITY)
            } else {
                (f64::NEG_INFINITY, f64::INFINITY)
            };
        }

        let t0 = (min - origin) / direction;
        let t1 = (max - origin) / direction;
        if t0 > t1 { (t1, t0) } else { (t0, t1) }
    }

    /// Slab test against a ray in the same space as the box.
    ///
    /// Returns the `(tmin, tmax)` span the ray spends inside the box, or
    /// `None` if the ray misses it or the box lies entirely behind the origin.
    pub fn intersects(&self, ray: &Ray4D) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }

        let (o, d) = (ray.origin, ray.direction);
        let (xtmin, xtmax) =
            Self::check_axis(self.minimum.x, self.maximum.x, o.x, d.x);
        let (ytmin, ytmax) =
            Self::check_axis(self.minimum.y, self.maximum.y, o.y, d.y);
        let (ztmin, ztmax) =
            Self::check_axis(self.minimum.z, self.maximum.z, o.z, d.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin > tmax || tmax < 0.0 {
            None
        } else {
            Some((tmin, tmax))
        }
    }
}

#[test]
fn merging_into_empty_box() {
    let mut b = Bounds::empty();
    assert!(b.is_empty());

    b.merge(&Bounds::new(-1.0, -2.0, -3.0, 3.0, 2.0, 1.0));
    b.merge(&Bounds::empty());
    assert_eq!(b, Bounds::new(-1.0, -2.0, -3.0, 3.0, 2.0, 1.0));
}

#[test]
fn add_point_only_grows() {
    let mut b = Bounds::unit();
    b.add_point(Tuple4D::point(0.5, 4.0, -7.0));

    assert_eq!(b, Bounds::new(-1.0, -1.0, -7.0, 1.0, 4.0, 1.0));
    assert!(b.contains_point(&Tuple4D::point(0.0, 3.0, -6.0)));
    assert!(!b.contains_point(&Tuple4D::point(0.0, 5.0, 0.0)));
}

#[test]
fn transformed_box_encloses_rotated_corners() {
    let m = Matrix4D::rotation_x(std::f64::consts::FRAC_PI_4)
        * Matrix4D::rotation_y(std::f64::consts::FRAC_PI_4);
    let b = Bounds::unit().transform(&m);

    assert_eq!(b, Bounds::new(-1.41421, -1.70711, -1.70711,
        1.41421, 1.70711, 1.70711));
}

#[test]
fn infinite_box_survives_transform() {
    let b = Bounds::new(f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY,
        f64::INFINITY, 0.0, f64::INFINITY);
    let t = b.transform(&Matrix4D::rotation_z(0.5));

    assert!(!t.is_finite());
    assert!(!t.is_empty());
    assert_eq!(t.minimum.y, f64::NEG_INFINITY);
}

#[test]
fn slab_test_hits_and_misses() {
    let b = Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0);
    let hits = [
        (Tuple4D::point(15.0, 1.0, 2.0), Tuple4D::vector(-1.0, 0.0, 0.0)),
        (Tuple4D::point(-5.0, -1.0, 4.0), Tuple4D::vector(1.0, 0.0, 0.0)),
        (Tuple4D::point(7.0, 6.0, 5.0), Tuple4D::vector(0.0, -1.0, 0.0)),
        (Tuple4D::point(9.0, -5.0, 6.0), Tuple4D::vector(0.0, 1.0, 0.0)),
        (Tuple4D::point(8.0, 2.0, 12.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(8.0, 1.0, 3.5), Tuple4D::vector(0.0, 0.0, 1.0)),
    ];
    let misses = [
        (Tuple4D::point(9.0, -1.0, -8.0), Tuple4D::vector(2.0, 4.0, 6.0)),
        (Tuple4D::point(8.0, 3.0, -4.0), Tuple4D::vector(6.0, 2.0, 4.0)),
        (Tuple4D::point(12.0, 5.0, 4.0), Tuple4D::vector(4.0, 6.0, 2.0)),
        (Tuple4D::point(12.0, 0.0, 3.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(8.0, -1.0, -2.0), Tuple4D::vector(0.0, 1.0, 0.0)),
    ];

    for (o, d) in hits.iter() {
        let r = Ray4D::new(*o, d.normalize());
        assert!(b.intersects(&r).is_some(), "expected hit from {:?}", o);
    }
    for (o, d) in misses.iter() {
        let r = Ray4D::new(*o, d.normalize());
        assert!(b.intersects(&r).is_none(), "expected miss from {:?}", o);
    }
}

#[test]
fn box_behind_ray_is_missed() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(Bounds::unit().intersects(&r), None);
}

#[test]
fn ray_starting_inside_box_reports_negative_entry() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let (tmin, tmax) = Bounds::unit().intersects(&r).unwrap();

    approx::assert_abs_diff_eq!(tmin, -1.0);
    approx::assert_abs_diff_eq!(tmax, 1.0);
}

#[test]
fn empty_box_is_never_hit() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(Bounds::empty().intersects(&r), None);
}

#[test]
fn tiny_direction_still_crosses_slab() {
    let (t0, t1) = Bounds::check_axis(-1.0, 1.0, 1.5, -1.5e-6);

    approx::assert_relative_eq!(t0, 1.0 / 3.0 * 1e6, max_relative = 1e-9);
    approx::assert_relative_eq!(t1, 5.0 / 3.0 * 1e6, max_relative = 1e-9);
}

#[test]
fn grazing_ray_enters_box_far_away() {
    let r = Ray4D::new(Tuple4D::point(0.0, 1.5, -1e6), Tuple4D::vector(0.0, -1.5e-6, 1.0));

    assert!(Bounds::unit().intersects(&r).is_some());
}

#[test]
fn zero_direction_outside_slab_misses() {
    let r = Ray4D::new(Tuple4D::point(0.0, 1.5, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(Bounds::unit().intersects(&r), None);
}
