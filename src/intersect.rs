use std::ops::Index;

use crate::shape::Shape;

/// A single ray-shape crossing.
///
/// `t` is the offset along the ray that produced it; `what` borrows the leaf
/// shape that was crossed (never a group).
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Shape,
}

/// Two intersections are equal when their offsets match exactly and they
/// refer to the very same shape.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.what, other.what)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, what: &'a Shape) -> Intersection<'a> {
        Intersection { t, what }
    }
}

/// An unsorted collection of intersections.
///
/// Records are kept in the order traversal produced them. Nothing here sorts;
/// `hit` scans for the nearest visible record instead.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    pub intersections: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn push(&mut self, i: Intersection<'a>) {
        self.intersections.push(i);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection<'a>> {
        self.intersections.iter()
    }

    /// Moves every record of `other` onto the end of this collection.
    pub fn append(&mut self, mut other: Intersections<'a>) {
        self.intersections.append(&mut other.intersections);
    }

    /// Concatenates several collections, preserving their order.
    pub fn aggregate(all: Vec<Intersections<'a>>) -> Intersections<'a> {
        let mut out = Intersections::new();
        for is in all {
            out.append(is);
        }

        out
    }

    /// The nearest intersection at or in front of the ray origin.
    ///
    /// Records with negative (or non-finite) `t` are never chosen. Ties keep
    /// the record seen first. `None` means the ray hits nothing it can see,
    /// which is an ordinary outcome.
    pub fn hit(&self) -> Option<Intersection<'a>> {
        let mut best: Option<Intersection<'a>> = None;
        for i in self.intersections.iter() {
            if !i.t.is_finite() || i.t < 0.0 {
                continue;
            }

            match best {
                Some(b) if b.t <= i.t => (),
                _ => best = Some(*i),
            }
        }

        best
    }
}

impl<'a> Index<usize> for Intersections<'a> {
    type Output = Intersection<'a>;

    fn index(&self, index: usize) -> &Intersection<'a> {
        &self.intersections[index]
    }
}

impl<'a> From<Vec<Intersection<'a>>> for Intersections<'a> {
    fn from(intersections: Vec<Intersection<'a>>) -> Intersections<'a> {
        Intersections { intersections }
    }
}

#[test]
fn hit_when_all_positive() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(1.0, &s),
        Intersection::new(2.0, &s),
    ].into();

    assert_eq!(is.hit(), Some(is[0]));
}

#[test]
fn hit_skips_negative_offsets() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(-1.0, &s),
        Intersection::new(1.0, &s),
    ].into();

    assert_eq!(is.hit(), Some(is[1]));
}

#[test]
fn hit_is_absent_when_all_negative() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(-2.0, &s),
        Intersection::new(-1.0, &s),
    ].into();

    assert_eq!(is.hit(), None);
}

#[test]
fn hit_is_lowest_nonnegative_in_unsorted_list() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(5.0, &s),
        Intersection::new(7.0, &s),
        Intersection::new(-3.0, &s),
        Intersection::new(2.0, &s),
    ].into();

    let hit = is.hit().unwrap();
    assert_eq!(hit.t, 2.0);
    assert_eq!(hit, is[3]);

    // Order is untouched by the query.
    assert_eq!(is[0].t, 5.0);
}

#[test]
fn hit_ties_go_to_first_seen() {
    let a = Shape::sphere();
    let b = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(3.0, &a),
        Intersection::new(3.0, &b),
    ].into();

    assert!(std::ptr::eq(is.hit().unwrap().what, &a));
}

#[test]
fn hit_accepts_zero_and_ignores_nan() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(f64::NAN, &s),
        Intersection::new(0.0, &s),
    ].into();

    assert_eq!(is.hit().unwrap().t, 0.0);
}

#[test]
fn aggregate_keeps_insertion_order() {
    let s = Shape::sphere();
    let first: Intersections = vec![Intersection::new(9.0, &s)].into();
    let second: Intersections = vec![
        Intersection::new(1.0, &s),
        Intersection::new(4.0, &s),
    ].into();

    let all = Intersections::aggregate(vec![first, second]);
    let ts: Vec<f64> = all.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![9.0, 1.0, 4.0]);
}
