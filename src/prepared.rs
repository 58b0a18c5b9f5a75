use crate::consts::EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::shape::Shape;
use crate::intersect::Intersection;

/// Everything shading needs to know about a single hit.
///
/// `normal_vector` always faces the eye: when the ray starts inside the shape
/// the surface normal is flipped and `inside` is set. `over_point` sits a hair
/// above the surface along that normal, so shadow rays cast from it do not
/// re-intersect the surface they leave.
#[derive(Copy, Clone, Debug)]
pub struct PreparedComputation<'a> {
    pub t: f64,
    pub object: &'a Shape,
    pub point: Tuple4D,
    pub eye_vector: Tuple4D,
    pub normal_vector: Tuple4D,
    pub inside: bool,
    pub over_point: Tuple4D,
}

impl<'a> PreparedComputation<'a> {
    pub fn new(i: &Intersection<'a>, r: &Ray4D) -> PreparedComputation<'a> {
        let point = r.position(i.t);
        let eye_vector = -r.direction;
        let mut normal_vector = i.what.normal_at(point);

        let inside = normal_vector.dot(&eye_vector) < 0.0;
        if inside {
            normal_vector = -normal_vector;
        }

        PreparedComputation {
            t: i.t,
            object: i.what,
            point,
            eye_vector,
            normal_vector,
            inside,
            over_point: point + normal_vector * EPSILON,
        }
    }
}

#[cfg(test)]
use crate::matrix::Matrix4D;

#[test]
fn hit_from_outside() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let i = Intersection::new(4.0, &s);

    let comps = PreparedComputation::new(&i, &r);
    assert_eq!(comps.t, 4.0);
    assert!(std::ptr::eq(comps.object, &s));
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eye_vector, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normal_vector, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn hit_from_inside_flips_normal() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let i = Intersection::new(1.0, &s);

    let comps = PreparedComputation::new(&i, &r);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eye_vector, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(comps.inside);
    assert_eq!(comps.normal_vector, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn over_point_on_unit_sphere_hit() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let i = Intersection::new(4.0, &s);

    let comps = PreparedComputation::new(&i, &r);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert!(comps.over_point.z < comps.point.z - EPSILON / 2.0);
}

#[test]
fn over_point_sits_above_surface() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(0.0, 0.0, 1.0));
    let i = Intersection::new(5.0, &s);

    let comps = PreparedComputation::new(&i, &r);
    assert!(comps.over_point.z < -EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
}

#[test]
fn hit_on_grouped_shape_uses_leaf_normal() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::translation(0.0, 2.0, 0.0));
    g.add_child(Shape::sphere());

    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = g.intersect(&r);
    let hit = xs.hit().unwrap();

    let comps = PreparedComputation::new(&hit, &r);
    assert_eq!(comps.point, Tuple4D::point(0.0, 2.0, -1.0));
    assert_eq!(comps.normal_vector, Tuple4D::vector(0.0, 0.0, -1.0));
}
