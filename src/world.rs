use log::trace;

use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::light::{ PointLight, Material };
use crate::shape::Shape;
use crate::intersect::Intersections;
use crate::prepared::PreparedComputation;

/// A world with objects and light.
///
/// Worlds collect all objects as well as light for rendering. Top-level
/// objects are intersected with world-space rays; groups among them carry
/// their children along.
#[derive(Clone, Debug)]
pub struct World {
    pub objects: Vec<Shape>,
    pub light: PointLight,
}

/// Two concentric spheres lit from the upper left, in front of the eye.
impl Default for World {
    fn default() -> World {
        let light = PointLight::new(
            Color::white(),
            Tuple4D::point(-10.0, 10.0, -10.0)
        );

        let mut s1 = Shape::sphere();
        s1.set_material(Material {
            color: Color::rgb(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        });

        let mut s2 = Shape::sphere();
        s2.set_transform(Matrix4D::scaling(0.5, 0.5, 0.5));

        World { objects: vec![s1, s2], light }
    }
}

impl World {
    /// Creates an empty world with no objects and the default light source.
    pub fn empty() -> World {
        World { objects: Vec::new(), light: Default::default() }
    }

    /// Intersects a ray against all objects in a world.
    ///
    /// Records come back grouped by object, in object order.
    pub fn intersect(&self, r: &Ray4D) -> Intersections {
        Intersections::aggregate(
            self.objects.iter().map(|obj| obj.intersect(r)).collect()
        )
    }

    /// Determines whether something sits between `p` and the light.
    pub fn is_shadowed(&self, p: Tuple4D) -> bool {
        let v = self.light.position - p;
        let distance = v.magnitude();

        let r = Ray4D::new(p, v.normalize());
        match self.intersect(&r).hit() {
            Some(i) => i.t < distance,
            None => false,
        }
    }

    /// Calculates the color for a hit, based on shadows and light.
    pub fn shade_hit(&self, comps: &PreparedComputation) -> Color {
        let in_shadow = self.is_shadowed(comps.over_point);
        trace!("shading t={} at {:?}, in_shadow={}", comps.t, comps.point, in_shadow);

        comps.object.material().shade(&self.light, comps.point,
            comps.eye_vector, comps.normal_vector, in_shadow)
    }

    /// The color seen along `r`, or `None` if the ray hits nothing.
    pub fn color_at(&self, r: &Ray4D) -> Option<Color> {
        let is = self.intersect(r);
        let hit = is.hit()?;

        let comps = PreparedComputation::new(&hit, r);
        Some(self.shade_hit(&comps))
    }
}

#[cfg(test)]
use crate::intersect::Intersection;

#[test]
fn default_world_contents() {
    let w = World::default();

    assert_eq!(w.objects.len(), 2);
    assert_eq!(w.light.position, Tuple4D::point(-10.0, 10.0, -10.0));
    assert_eq!(w.objects[0].material().color, Color::rgb(0.8, 1.0, 0.6));
    assert_eq!(*w.objects[1].transform(), Matrix4D::scaling(0.5, 0.5, 0.5));
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let is = w.intersect(&r);
    let ts: Vec<f64> = is.iter().map(|i| i.t).collect();

    // Outer sphere first, then inner, no sorting between them.
    assert_eq!(ts, vec![4.0, 6.0, 4.5, 5.5]);
    assert_eq!(is.hit().unwrap().t, 4.0);
}

#[test]
fn shade_intersection_from_outside() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let i = Intersection::new(4.0, &w.objects[0]);
    let comps = PreparedComputation::new(&i, &r);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w = World::default();
    w.light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.25, 0.0));
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    let i = Intersection::new(0.5, &w.objects[1]);
    let comps = PreparedComputation::new(&i, &r);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let mut w = World::empty();
    w.light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    w.objects.push(Shape::sphere());
    let mut s2 = Shape::sphere();
    s2.set_transform(Matrix4D::translation(0.0, 0.0, 10.0));
    w.objects.push(s2);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, &w.objects[1]);
    let comps = PreparedComputation::new(&i, &r);

    assert_eq!(w.shade_hit(&comps), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn color_ray_miss() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(w.color_at(&r), None);
}

#[test]
fn color_ray_hit() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r), Some(Color::rgb(0.38066, 0.47583, 0.2855)));
}

#[test]
fn color_behind_ray() {
    let mut w = World::default();
    w.objects[0].material_mut().ambient = 1.0;
    w.objects[1].material_mut().ambient = 1.0;

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.75), Tuple4D::vector(0.0, 0.0, -1.0));

    assert_eq!(w.color_at(&r), Some(w.objects[1].material().color));
}

#[test]
fn color_of_grouped_sphere() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::translation(0.0, 0.0, 5.0));
    g.add_child(Shape::sphere());

    let mut w = World::empty();
    w.light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));
    w.objects.push(g);

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    // Head-on: ambient plus full diffuse plus full specular.
    assert_eq!(w.color_at(&r), Some(Color::rgb(1.9, 1.9, 1.9)));
}

#[test]
fn shadow_collinear_point_and_light() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(0.0, 10.0, 0.0)));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w = World::default();

    assert!(w.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn shadow_object_behind_light() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(-20.0, 20.0, -20.0)));
}

#[test]
fn shadow_object_behind_point() {
    let w = World::default();

    assert!(!w.is_shadowed(Tuple4D::point(-2.0, 2.0, -2.0)));
}
