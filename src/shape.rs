use log::{ debug, trace };

use crate::consts::EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::light::Material;
use crate::matrix::Matrix4D;
use crate::bounds::Bounds;
use crate::intersect::{ Intersection, Intersections };

/// The geometry a `Shape` carries, in its own object space.
#[derive(Debug, Clone)]
pub enum ShapeType {
    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// The object-space XZ plane, with its normal pointing up along +Y.
    Plane,

    /// An axis-aligned cube spanning `[-1, 1]` on every axis.
    Cube,

    /// A group of shapes. Can include other groups of shapes.
    Group(GroupInfo),

    /// A unit-cube-bounded shape that panics if its geometry is ever queried.
    #[cfg(test)]
    Tripwire,
}

/// The children of a group and the box enclosing them.
///
/// `bounds` lives in the group's object space and only ever grows: each child
/// added merges its own bounds, carried through the child's transform.
#[derive(Debug, Clone, Default)]
pub struct GroupInfo {
    children: Vec<Shape>,
    bounds: Bounds,
}

/// A shape placed in a scene.
///
/// Every shape owns a transform (object space to parent space) and a
/// material. Intersection and normal queries arrive in world or parent space
/// and are converted to object space before the geometry in `ty` is
/// consulted.
///
/// Besides its own inverse, a shape caches the inverse of its full
/// world-space transform: the product of every ancestor group's transform and
/// its own. The cache is refreshed whenever a transform changes or the shape
/// is moved into a group, so `transform` only changes through `set_transform`.
/// A clone starts out as a top-level shape, detached from any ancestors.
#[derive(Debug)]
pub struct Shape {
    ty: ShapeType,
    material: Material,

    transform: Matrix4D,
    inverse: Matrix4D,
    world_inverse: Matrix4D,
}

impl Clone for Shape {
    fn clone(&self) -> Shape {
        let mut copy = Shape {
            ty: self.ty.clone(),
            material: self.material,
            transform: self.transform,
            inverse: self.inverse,
            world_inverse: self.inverse,
        };

        copy.propagate_parent_inverse(&Matrix4D::identity());
        copy
    }
}

impl Shape {
    fn with_type(ty: ShapeType) -> Shape {
        Shape {
            ty,
            material: Default::default(),
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
            world_inverse: Matrix4D::identity(),
        }
    }

    /// Creates a unit sphere with identity transform and default material.
    pub fn sphere() -> Shape {
        Self::with_type(ShapeType::Sphere)
    }

    /// Creates the XZ plane.
    pub fn plane() -> Shape {
        Self::with_type(ShapeType::Plane)
    }

    /// Creates a cube spanning `[-1, 1]` on each axis.
    pub fn cube() -> Shape {
        Self::with_type(ShapeType::Cube)
    }

    /// Creates an empty group.
    pub fn group() -> Shape {
        Self::with_type(ShapeType::Group(Default::default()))
    }

    #[cfg(test)]
    fn tripwire() -> Shape {
        Self::with_type(ShapeType::Tripwire)
    }

    pub fn ty(&self) -> &ShapeType {
        &self.ty
    }

    pub fn is_group(&self) -> bool {
        matches!(self.ty, ShapeType::Group(_))
    }

    /// Returns the children of this shape if it is a group.
    pub fn children(&self) -> Option<&[Shape]> {
        match self.ty {
            ShapeType::Group(ref info) => Some(&info.children),
            _ => None,
        }
    }

    /// Moves `child` into this group and grows the group's bounds.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a group.
    pub fn add_child(&mut self, mut child: Shape) {
        let parent_inverse = self.world_inverse;
        let info = match self.ty {
            ShapeType::Group(ref mut info) => info,
            _ => panic!("Cannot add child to non-group shape."),
        };

        child.propagate_parent_inverse(&parent_inverse);

        let child_bounds = child.bounds().transform(&child.transform);
        info.bounds.merge(&child_bounds);
        info.children.push(child);

        debug!("group now has {} children, bounds {:?} .. {:?}",
            info.children.len(), info.bounds.minimum, info.bounds.maximum);
    }

    /// Deduces whether `other` is this very shape or one of its descendants.
    pub fn includes(&self, other: &Shape) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match self.ty {
            ShapeType::Group(ref info) =>
                info.children.iter().any(|c| c.includes(other)),
            _ => false,
        }
    }

    /// Object-space bounds of this shape.
    pub fn bounds(&self) -> Bounds {
        match self.ty {
            ShapeType::Sphere | ShapeType::Cube => Bounds::unit(),
            ShapeType::Plane => Bounds::new(
                f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY,
                f64::INFINITY, 0.0, f64::INFINITY,
            ),
            ShapeType::Group(ref info) => info.bounds,
            #[cfg(test)]
            ShapeType::Tripwire => Bounds::unit(),
        }
    }

    /// Returns a reference to the Shape transform.
    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Sets the transform, refreshing cached inverses here and below.
    ///
    /// # Panics
    ///
    /// Panics if `transform` is singular, meaning its determinant is within
    /// `EPSILON` of zero. The threshold is absolute, so very small but valid
    /// scalings are rejected too: `scaling(0.02, 0.02, 0.02)` has determinant
    /// `8e-6` and panics.
    pub fn set_transform(&mut self, transform: Matrix4D) {
        let parent_inverse = self.world_inverse_of_parent();

        self.inverse = transform.inverse();
        self.transform = transform;
        self.propagate_parent_inverse(&parent_inverse);
    }

    /// Recovers the parent's world inverse from the cached values.
    ///
    /// `world_inverse == inverse * parent_world_inverse`, so the parent part
    /// is `transform * world_inverse`.
    fn world_inverse_of_parent(&self) -> Matrix4D {
        self.transform * self.world_inverse
    }

    /// Recomputes the world inverse of this shape and every descendant.
    ///
    /// `parent_inverse` maps world space into the parent's object space.
    fn propagate_parent_inverse(&mut self, parent_inverse: &Matrix4D) {
        self.world_inverse = self.inverse * *parent_inverse;

        let own = self.world_inverse;
        if let ShapeType::Group(ref mut info) = self.ty {
            for child in info.children.iter_mut() {
                child.propagate_parent_inverse(&own);
            }
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Converts a world-space point into this shape's object space, passing
    /// through every ancestor group.
    pub fn world_to_object(&self, point: Tuple4D) -> Tuple4D {
        self.world_inverse * point
    }

    /// Converts an object-space normal to a unit world-space normal.
    ///
    /// Normals travel by the transpose of the inverse transform. The
    /// translation row of that matrix leaks into `w`, which is dropped before
    /// renormalizing.
    pub fn normal_to_world(&self, normal: Tuple4D) -> Tuple4D {
        (self.world_inverse.transposition() * normal).as_vector().normalize()
    }

    /// Intersects a ray given in this shape's parent space.
    ///
    /// For a top-level shape the parent space is world space. The returned
    /// offsets are valid on `ray` itself.
    pub fn intersect(&self, ray: &Ray4D) -> Intersections {
        self.local_intersect(&ray.transform(&self.inverse))
    }

    /// The unit world-space surface normal at `world_point`.
    pub fn normal_at(&self, world_point: Tuple4D) -> Tuple4D {
        let local_point = self.world_to_object(world_point);
        let local_normal = self.local_normal_at(&local_point);
        self.normal_to_world(local_normal)
    }

    /// Intersects a ray already in object space.
    pub fn local_intersect(&self, ray: &Ray4D) -> Intersections {
        match self.ty {
            ShapeType::Sphere => self.intersect_sphere(ray),
            ShapeType::Plane => self.intersect_plane(ray),
            ShapeType::Cube => self.intersect_cube(ray),
            ShapeType::Group(ref info) => self.intersect_group(info, ray),
            #[cfg(test)]
            ShapeType::Tripwire => panic!("tripwire shape was intersected"),
        }
    }

    /// The object-space normal at an object-space point.
    ///
    /// # Panics
    ///
    /// Panics on a group. Groups have no surface of their own; intersections
    /// always name the leaf shape that was hit.
    pub fn local_normal_at(&self, at: &Tuple4D) -> Tuple4D {
        match self.ty {
            ShapeType::Sphere => at.as_vector(),
            ShapeType::Plane => Tuple4D::vector(0.0, 1.0, 0.0),
            ShapeType::Cube => Self::normal_at_cube(at),
            ShapeType::Group(_) => panic!(
                "Local normal calculations should never occur on groups."
            ),
            #[cfg(test)]
            ShapeType::Tripwire => panic!("tripwire shape was asked for a normal"),
        }
    }

    /// Solves `|origin + t * direction|^2 = 1` for `t`.
    ///
    /// Yields nothing or exactly two records (equal for a tangent ray), even
    /// when they lie behind the ray origin.
    fn intersect_sphere(&self, ray: &Ray4D) -> Intersections {
        let sphere_to_ray = ray.origin - Tuple4D::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - 4.0 * a * c;
        if discriminant < 0.0 {
            return Intersections::new();
        }

        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);

        vec![Intersection::new(t1, self), Intersection::new(t2, self)].into()
    }

    /// A ray with no Y motion is parallel to (or inside) the plane and misses.
    fn intersect_plane(&self, ray: &Ray4D) -> Intersections {
        if ray.direction.y.abs() < EPSILON {
            return Intersections::new();
        }

        let t = -ray.origin.y / ray.direction.y;
        vec![Intersection::new(t, self)].into()
    }

    fn intersect_cube(&self, ray: &Ray4D) -> Intersections {
        let (o, d) = (ray.origin, ray.direction);
        let (xtmin, xtmax) = Bounds::check_axis(-1.0, 1.0, o.x, d.x);
        let (ytmin, ytmax) = Bounds::check_axis(-1.0, 1.0, o.y, d.y);
        let (ztmin, ztmax) = Bounds::check_axis(-1.0, 1.0, o.z, d.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);
        if tmin > tmax {
            return Intersections::new();
        }

        vec![Intersection::new(tmin, self), Intersection::new(tmax, self)].into()
    }

    /// The face normal is the axis of the largest point component.
    fn normal_at_cube(p: &Tuple4D) -> Tuple4D {
        let (xa, ya, za) = (p.x.abs(), p.y.abs(), p.z.abs());
        let max_component = xa.max(ya).max(za);

        if max_component == xa {
            Tuple4D::vector(p.x, 0.0, 0.0)
        } else if max_component == ya {
            Tuple4D::vector(0.0, p.y, 0.0)
        } else {
            Tuple4D::vector(0.0, 0.0, p.z)
        }
    }

    /// Checks the group's bounds, then gathers every child's intersections.
    ///
    /// Children are visited in insertion order and their records are
    /// concatenated in that order, unsorted.
    fn intersect_group<'a>(&'a self, info: &'a GroupInfo, ray: &Ray4D)
        -> Intersections<'a> {
        if info.children.is_empty() || info.bounds.intersects(ray).is_none() {
            trace!("ray {:?} pruned by group bounds", ray.origin);
            return Intersections::new();
        }

        Intersections::aggregate(
            info.children.iter().map(|child| child.intersect(ray)).collect()
        )
    }
}

#[cfg(test)]
fn ray(origin: Tuple4D, direction: Tuple4D) -> Ray4D {
    Ray4D::new(origin, direction)
}

#[cfg(test)]
fn ts(is: &Intersections) -> Vec<f64> {
    is.iter().map(|i| i.t).collect()
}

#[test]
fn default_shape_state() {
    let s = Shape::sphere();

    assert_eq!(*s.transform(), Matrix4D::identity());
    assert_eq!(*s.material(), Material::default());
    assert!(s.children().is_none());
}

#[test]
fn ray_pierces_sphere() {
    let s = Shape::sphere();
    let xs = s.intersect(&ray(Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(ts(&xs), vec![4.0, 6.0]);
    assert!(std::ptr::eq(xs[0].what, &s));
    assert!(std::ptr::eq(xs[1].what, &s));
}

#[test]
fn tangent_ray_gives_two_equal_offsets() {
    let s = Shape::sphere();
    let xs = s.intersect(&ray(Tuple4D::point(0.0, 1.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(ts(&xs), vec![5.0, 5.0]);
}

#[test]
fn ray_misses_sphere() {
    let s = Shape::sphere();
    let xs = s.intersect(&ray(Tuple4D::point(0.0, 2.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));

    assert!(xs.is_empty());
}

#[test]
fn ray_from_inside_sphere() {
    let s = Shape::sphere();
    let xs = s.intersect(&ray(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(ts(&xs), vec![-1.0, 1.0]);
}

#[test]
fn sphere_behind_ray_still_reports_offsets() {
    let s = Shape::sphere();
    let xs = s.intersect(&ray(Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(ts(&xs), vec![-6.0, -4.0]);
    assert_eq!(xs.hit(), None);
}

#[test]
fn scaled_sphere_hits_are_symmetric_and_on_surface() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let xs = s.intersect(&r);
    assert_eq!(ts(&xs), vec![3.0, 7.0]);

    // Symmetric about the center, which the ray reaches at t = 5.
    approx::assert_abs_diff_eq!(5.0 - xs[0].t, xs[1].t - 5.0, epsilon = 1e-9);
    for i in xs.iter() {
        let p = r.position(i.t);
        approx::assert_abs_diff_eq!((p - Tuple4D::origin()).magnitude(), 2.0,
            epsilon = EPSILON);
    }
}

#[test]
fn translated_sphere_is_missed() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0));

    let xs = s.intersect(&ray(Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(xs.is_empty());
}

#[test]
fn identity_transform_matches_object_space_queries() {
    let rays = [
        ray(Tuple4D::point(0.0, 3.0, -5.0), Tuple4D::vector(0.1, -0.5, 1.0)),
        ray(Tuple4D::point(0.5, 0.5, -5.0), Tuple4D::vector(0.0, 0.0, 1.0)),
        ray(Tuple4D::point(-4.0, 2.0, 0.25), Tuple4D::vector(1.0, -0.5, 0.0)),
    ];
    let points = [
        Tuple4D::point(1.0, 0.0, 0.0),
        Tuple4D::point(0.0, 0.0, -1.0),
        Tuple4D::point(0.3, 1.0, 0.2),
    ];

    for shape in [Shape::sphere(), Shape::plane(), Shape::cube()].iter() {
        for r in rays.iter() {
            assert_eq!(ts(&shape.intersect(r)), ts(&shape.local_intersect(r)));
        }
        for p in points.iter() {
            assert_eq!(shape.normal_at(*p),
                shape.local_normal_at(p).normalize());
        }
    }
}

#[test]
fn sphere_normals_on_each_axis() {
    let s = Shape::sphere();

    assert_eq!(s.normal_at(Tuple4D::point(1.0, 0.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 1.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn sphere_normal_off_axis_is_unit_length() {
    let s = Shape::sphere();
    let k = 3.0f64.sqrt() / 3.0;
    let n = s.normal_at(Tuple4D::point(k, k, k));

    assert_eq!(n, Tuple4D::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn normal_on_translated_sphere() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(0.0, 1.0, 0.0));
    let half = 2.0f64.sqrt() / 2.0;

    let n = s.normal_at(Tuple4D::point(0.0, 1.0 + half, -half));
    assert_eq!(n, Tuple4D::vector(0.0, half, -half));
}

#[test]
fn normal_on_squashed_rotated_sphere() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
        * Matrix4D::rotation_z(std::f64::consts::PI / 5.0));
    let half = 2.0f64.sqrt() / 2.0;

    let n = s.normal_at(Tuple4D::point(0.0, half, -half));
    assert_eq!(n, Tuple4D::vector(0.0, 0.97014, -0.24254));
}

#[test]
fn plane_normal_is_constant() {
    let p = Shape::plane();

    for at in [Tuple4D::origin(), Tuple4D::point(10.0, 0.0, -10.0),
        Tuple4D::point(-5.0, 0.0, 150.0)].iter() {
        assert_eq!(p.local_normal_at(at), Tuple4D::vector(0.0, 1.0, 0.0));
    }
}

#[test]
fn parallel_and_coplanar_rays_miss_plane() {
    let p = Shape::plane();

    let above = ray(Tuple4D::point(0.0, 10.0, 0.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let inside = ray(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let nearly = ray(Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::vector(1.0, EPSILON / 10.0, 0.0));

    assert!(p.local_intersect(&above).is_empty());
    assert!(p.local_intersect(&inside).is_empty());
    assert!(p.local_intersect(&nearly).is_empty());
}

#[test]
fn plane_hit_from_above_and_below() {
    let p = Shape::plane();

    let from_above = ray(Tuple4D::point(0.0, 1.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let from_below = ray(Tuple4D::point(0.0, -1.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));

    for r in [from_above, from_below].iter() {
        let xs = p.local_intersect(r);
        assert_eq!(ts(&xs), vec![1.0]);
        assert!(std::ptr::eq(xs[0].what, &p));
    }
}

#[test]
fn tilted_plane_through_transform() {
    let mut p = Shape::plane();
    p.set_transform(Matrix4D::translation(0.0, -2.0, 0.0));

    let xs = p.intersect(&ray(Tuple4D::origin(), Tuple4D::vector(0.0, -1.0, 0.0)));
    assert_eq!(ts(&xs), vec![2.0]);

    p.set_transform(Matrix4D::rotation_x(std::f64::consts::FRAC_PI_2));
    assert_eq!(p.normal_at(Tuple4D::point(3.0, 0.0, 0.0)),
        Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn ray_strikes_each_cube_face() {
    let c = Shape::cube();
    let cases = [
        (Tuple4D::point(5.0, 0.5, 0.0), Tuple4D::vector(-1.0, 0.0, 0.0), 4.0, 6.0),
        (Tuple4D::point(-5.0, 0.5, 0.0), Tuple4D::vector(1.0, 0.0, 0.0), 4.0, 6.0),
        (Tuple4D::point(0.5, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0), 4.0, 6.0),
        (Tuple4D::point(0.5, -5.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0), 4.0, 6.0),
        (Tuple4D::point(0.5, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, -1.0), 4.0, 6.0),
        (Tuple4D::point(0.5, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 4.0, 6.0),
        (Tuple4D::point(0.0, 0.5, 0.0), Tuple4D::vector(0.0, 0.0, 1.0), -1.0, 1.0),
    ];

    for (o, d, t1, t2) in cases.iter() {
        let xs = c.local_intersect(&ray(*o, *d));
        assert_eq!(ts(&xs), vec![*t1, *t2]);
    }
}

#[test]
fn ray_misses_cube() {
    let c = Shape::cube();
    let cases = [
        (Tuple4D::point(-2.0, 0.0, 0.0), Tuple4D::vector(0.2673, 0.5345, 0.8018)),
        (Tuple4D::point(0.0, -2.0, 0.0), Tuple4D::vector(0.8018, 0.2673, 0.5345)),
        (Tuple4D::point(2.0, 0.0, 2.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(0.0, 2.0, 2.0), Tuple4D::vector(0.0, -1.0, 0.0)),
        (Tuple4D::point(2.0, 2.0, 0.0), Tuple4D::vector(-1.0, 0.0, 0.0)),
    ];

    for (o, d) in cases.iter() {
        assert!(c.local_intersect(&ray(*o, *d)).is_empty());
    }
}

#[test]
fn cube_normals_follow_largest_component() {
    let c = Shape::cube();
    let cases = [
        (Tuple4D::point(1.0, 0.5, -0.8), Tuple4D::vector(1.0, 0.0, 0.0)),
        (Tuple4D::point(-0.4, 1.0, -0.1), Tuple4D::vector(0.0, 1.0, 0.0)),
        (Tuple4D::point(0.4, 0.4, -1.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(1.0, 1.0, 1.0), Tuple4D::vector(1.0, 0.0, 0.0)),
    ];

    for (p, n) in cases.iter() {
        assert_eq!(c.local_normal_at(p), *n);
    }
}

#[test]
fn new_group_is_empty() {
    let g = Shape::group();

    assert!(g.is_group());
    assert_eq!(g.children().unwrap().len(), 0);
    assert!(g.bounds().is_empty());

    let xs = g.local_intersect(&ray(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(xs.is_empty());
}

#[test]
fn group_bounds_grow_with_transformed_children() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(2.0, 5.0, -3.0)
        * Matrix4D::scaling(2.0, 2.0, 2.0));
    let mut c = Shape::cube();
    c.set_transform(Matrix4D::translation(-4.0, -1.0, 4.0)
        * Matrix4D::scaling(0.5, 1.0, 0.5));

    let mut g = Shape::group();
    g.add_child(s);
    assert_eq!(g.bounds(), Bounds::new(0.0, 3.0, -5.0, 4.0, 7.0, -1.0));

    g.add_child(c);
    assert_eq!(g.bounds(), Bounds::new(-4.5, -2.0, -5.0, 4.0, 7.0, 4.5));
    assert_eq!(g.children().unwrap().len(), 2);
}

#[test]
fn group_bounds_ignore_group_transform() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::scaling(10.0, 10.0, 10.0));
    g.add_child(Shape::sphere());

    assert_eq!(g.bounds(), Bounds::unit());
}

#[test]
fn group_with_plane_is_unbounded() {
    let mut g = Shape::group();
    g.add_child(Shape::plane());

    assert!(!g.bounds().is_finite());

    let xs = g.intersect(&ray(Tuple4D::point(100.0, 5.0, 100.0),
        Tuple4D::vector(0.0, -1.0, 0.0)));
    assert_eq!(ts(&xs), vec![5.0]);
}

#[test]
fn group_records_follow_child_order() {
    let mut g = Shape::group();
    let s1 = Shape::sphere();
    let mut s2 = Shape::sphere();
    s2.set_transform(Matrix4D::translation(0.0, 0.0, -3.0));
    let mut s3 = Shape::sphere();
    s3.set_transform(Matrix4D::translation(5.0, 0.0, 0.0));

    g.add_child(s1);
    g.add_child(s2);
    g.add_child(s3);

    let xs = g.local_intersect(&ray(Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    let children = g.children().unwrap();

    assert_eq!(ts(&xs), vec![4.0, 6.0, 1.0, 3.0]);
    assert!(std::ptr::eq(xs[0].what, &children[0]));
    assert!(std::ptr::eq(xs[1].what, &children[0]));
    assert!(std::ptr::eq(xs[2].what, &children[1]));
    assert!(std::ptr::eq(xs[3].what, &children[1]));

    let hit = xs.hit().unwrap();
    assert_eq!(hit.t, 1.0);
    assert!(std::ptr::eq(hit.what, &children[1]));
}

#[test]
fn transformed_group_passes_ray_through_both_transforms() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0));
    g.add_child(s);

    let xs = g.intersect(&ray(Tuple4D::point(10.0, 0.0, -10.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(ts(&xs), vec![8.0, 12.0]);
}

#[test]
fn missed_bounds_never_visit_children() {
    let mut g = Shape::group();
    g.add_child(Shape::tripwire());
    let mut far = Shape::tripwire();
    far.set_transform(Matrix4D::translation(0.0, 0.0, 10.0));
    g.add_child(far);

    let xs = g.intersect(&ray(Tuple4D::point(5.0, 5.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(xs.is_empty());

    // A box entirely behind the ray is pruned as well.
    let xs = g.intersect(&ray(Tuple4D::point(0.0, 0.0, 20.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(xs.is_empty());
}

#[test]
fn nested_group_bounds_prune_through_transforms() {
    let mut inner = Shape::group();
    inner.set_transform(Matrix4D::translation(0.0, 3.0, 0.0));
    inner.add_child(Shape::tripwire());

    let mut outer = Shape::group();
    outer.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    outer.add_child(inner);
    outer.add_child(Shape::sphere());

    // Passes through the sphere at y = 0 but well below the tripwire at y = 6.
    let xs = outer.intersect(&ray(Tuple4D::point(0.0, 0.0, -10.0),
        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(ts(&xs), vec![8.0, 12.0]);
}

#[test]
#[should_panic(expected = "tripwire")]
fn hitting_bounds_visits_children() {
    let mut g = Shape::group();
    g.add_child(Shape::tripwire());

    g.intersect(&ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0)));
}

#[test]
#[should_panic(expected = "groups")]
fn group_normal_fails_fast() {
    let mut g = Shape::group();
    g.add_child(Shape::sphere());

    g.normal_at(Tuple4D::point(1.0, 0.0, 0.0));
}

#[test]
#[should_panic(expected = "non-group")]
fn adding_child_to_leaf_panics() {
    let mut s = Shape::sphere();
    s.add_child(Shape::cube());
}

#[test]
#[should_panic(expected = "singular")]
fn singular_transform_is_rejected() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(0.0, 1.0, 1.0));
}

#[cfg(test)]
fn nested_sphere(g2_scaling: Matrix4D) -> Shape {
    let mut g1 = Shape::group();
    g1.set_transform(Matrix4D::rotation_y(std::f64::consts::FRAC_PI_2));

    let mut g2 = Shape::group();
    g2.set_transform(g2_scaling);

    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0));

    g2.add_child(s);
    g1.add_child(g2);
    g1
}

#[cfg(test)]
fn leaf(g1: &Shape) -> &Shape {
    &g1.children().unwrap()[0].children().unwrap()[0]
}

#[test]
fn world_point_to_nested_object_space() {
    let g1 = nested_sphere(Matrix4D::scaling(2.0, 2.0, 2.0));

    let p = leaf(&g1).world_to_object(Tuple4D::point(-2.0, 0.0, -10.0));
    assert_eq!(p, Tuple4D::point(0.0, 0.0, -1.0));
}

#[test]
fn nested_normal_to_world_space() {
    let g1 = nested_sphere(Matrix4D::scaling(1.0, 2.0, 3.0));
    let k = 3.0f64.sqrt() / 3.0;

    let n = leaf(&g1).normal_to_world(Tuple4D::vector(k, k, k));
    assert_eq!(n, Tuple4D::vector(0.28571, 0.42857, -0.85714));
}

#[test]
fn normal_on_nested_child() {
    let g1 = nested_sphere(Matrix4D::scaling(1.0, 2.0, 3.0));
    let g2 = &g1.children().unwrap()[0];
    let s = leaf(&g1);
    let k = 3.0f64.sqrt() / 3.0;

    let world = *g1.transform() * *g2.transform() * *s.transform();
    let world_point = world * Tuple4D::point(k, k, k);

    assert_eq!(s.normal_at(world_point), Tuple4D::vector(0.28571, 0.42857, -0.85714));
}

#[test]
fn retransforming_parent_updates_descendants() {
    let mut g1 = nested_sphere(Matrix4D::scaling(2.0, 2.0, 2.0));
    g1.set_transform(Matrix4D::identity());

    // Now only the scaling and translation remain between world and leaf.
    let p = leaf(&g1).world_to_object(Tuple4D::point(10.0, 0.0, -2.0));
    assert_eq!(p, Tuple4D::point(0.0, 0.0, -1.0));
}

#[test]
fn retransforming_child_keeps_parent_chain() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::translation(0.0, 10.0, 0.0));
    g.add_child(Shape::sphere());

    let mut copy = g.clone();
    if let ShapeType::Group(ref mut info) = copy.ty {
        info.children[0].set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    }

    let s = &copy.children().unwrap()[0];
    assert_eq!(s.world_to_object(Tuple4D::point(0.0, 12.0, 0.0)),
        Tuple4D::point(0.0, 1.0, 0.0));
}

#[test]
fn group_includes_descendants_by_identity() {
    let g1 = nested_sphere(Matrix4D::identity());
    let s = leaf(&g1);
    let stranger = Shape::sphere();

    assert!(g1.includes(s));
    assert!(g1.includes(&g1.children().unwrap()[0]));
    assert!(!g1.includes(&stranger));
    assert!(s.includes(s));
}

#[test]
fn cloned_child_is_detached_from_old_group() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::translation(0.0, 10.0, 0.0));
    g.add_child(Shape::sphere());

    let lone = g.children().unwrap()[0].clone();
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = lone.intersect(&r);
    let hit = xs.hit().unwrap();
    let p = r.position(hit.t);

    assert_eq!(hit.t, 4.0);
    assert_eq!(lone.world_to_object(p), Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(lone.normal_at(p), Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn cloned_group_keeps_its_own_chain() {
    let mut outer = Shape::group();
    outer.set_transform(Matrix4D::translation(0.0, 10.0, 0.0));
    let mut inner = Shape::group();
    inner.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    inner.add_child(Shape::sphere());
    outer.add_child(inner);

    let copy = outer.children().unwrap()[0].clone();
    let s = &copy.children().unwrap()[0];

    // Only the inner scaling remains between world and leaf.
    assert_eq!(s.world_to_object(Tuple4D::point(0.0, 0.0, -2.0)),
        Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 2.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn hugely_scaled_group_keeps_its_hits() {
    let mut lone = Shape::sphere();
    lone.set_transform(Matrix4D::scaling(1e6, 1e6, 1e6));
    let mut g = Shape::group();
    g.set_transform(Matrix4D::scaling(1e6, 1e6, 1e6));
    g.add_child(Shape::sphere());

    let r = ray(Tuple4D::point(0.0, 0.0, -5e6), Tuple4D::vector(0.0, 0.0, 1.0));
    let expected = ts(&lone.intersect(&r));
    let actual = ts(&g.intersect(&r));

    assert_eq!(actual.len(), 2);
    for (a, e) in actual.iter().zip(expected.iter()) {
        approx::assert_relative_eq!(*a, *e, max_relative = 1e-9);
    }
    approx::assert_relative_eq!(actual[0], 4e6, max_relative = 1e-9);
}

#[test]
fn grazing_ray_reaches_grouped_sphere() {
    let lone = Shape::sphere();
    let mut g = Shape::group();
    g.add_child(Shape::sphere());

    let r = ray(Tuple4D::point(0.0, 1.5, -1e6), Tuple4D::vector(0.0, -1.5e-6, 1.0));

    assert_eq!(lone.intersect(&r).len(), 2);
    assert_eq!(ts(&g.intersect(&r)), ts(&lone.intersect(&r)));
}

#[test]
fn hugely_scaled_cube_is_hit() {
    let mut c = Shape::cube();
    c.set_transform(Matrix4D::scaling(1e6, 1e6, 1e6));

    let xs = c.intersect(&ray(Tuple4D::point(0.5e6, 0.0, -5e6),
        Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(xs.len(), 2);
    approx::assert_relative_eq!(xs[0].t, 4e6, max_relative = 1e-9);
    approx::assert_relative_eq!(xs[1].t, 6e6, max_relative = 1e-9);
}

#[test]
#[should_panic(expected = "singular")]
fn tiny_uniform_scale_counts_as_singular() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(0.02, 0.02, 0.02));
}

#[test]
fn small_uniform_scale_above_threshold_is_accepted() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(0.05, 0.05, 0.05));

    let xs = s.intersect(&ray(Tuple4D::point(0.0, 0.0, -1.0), Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(xs.len(), 2);
    approx::assert_abs_diff_eq!(xs[0].t, 0.95, epsilon = EPSILON);
    approx::assert_abs_diff_eq!(xs[1].t, 1.05, epsilon = EPSILON);
}
