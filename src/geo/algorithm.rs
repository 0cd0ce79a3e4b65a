//! Predicates over coordinates: orientation, area, and point location.

use itertools::Itertools;

use super::{Coordinate, Envelope, Geometry, LineString, Polygon};

/// Where a point lies relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// Which way a point turns relative to a directed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    /// -1, 0 or 1: handy for "same side" comparisons.
    pub fn signum(self) -> i32 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }
}

const DP_SAFE_EPSILON: f64 = 1e-15;

/// Returns the orientation of `q` relative to the directed segment `p1`->`p2`.
///
/// The determinant is computed in f64 and accepted when it clears an error
/// bound. Near-degenerate cases are recomputed with fused multiply-adds, which
/// recover the rounding error of the products.
pub fn orientation_index(p1: &Coordinate, p2: &Coordinate, q: &Coordinate) -> Orientation {
    let detleft = (p1.x - q.x) * (p2.y - q.y);
    let detright = (p1.y - q.y) * (p2.x - q.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return orientation_of(det);
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return orientation_of(det);
        }
        -detleft - detright
    } else {
        return orientation_of(det);
    };

    let errbound = DP_SAFE_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        return orientation_of(det);
    }

    // Translate so p1 is the origin, then evaluate a*b - c*d with the
    // product error folded back in.
    let a = p2.x - p1.x;
    let b = q.y - p1.y;
    let c = p2.y - p1.y;
    let d = q.x - p1.x;
    let cd = c * d;
    let cd_err = c.mul_add(d, -cd);
    orientation_of(a.mul_add(b, -cd) - cd_err)
}

fn orientation_of(det: f64) -> Orientation {
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns twice the signed area. Positive iff the ring is counter-clockwise.
///
/// Assumes the first and last Coordinates are identical.
pub fn signed_area2(ring: &[Coordinate]) -> f64 {
    // https://en.wikipedia.org/wiki/Shoelace_formula
    let mut a = 0.0;
    for (p1, p2) in ring.iter().tuple_windows() {
        a += p1.x * p2.y - p2.x * p1.y;
    }
    a
}

pub fn signed_area(ring: &[Coordinate]) -> f64 {
    signed_area2(ring) / 2.0
}

/// Returns true iff the closed ring runs counter-clockwise.
///
/// A zero-area ring is not counter-clockwise.
pub fn is_ccw(ring: &[Coordinate]) -> bool {
    signed_area2(ring) > 0.0
}

/// Drops each Coordinate that equals its predecessor.
pub fn remove_repeated_points(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut ret = coords.to_vec();
    ret.dedup();
    ret
}

/// Locates `p` relative to a closed ring by counting ray crossings.
///
/// Points on any ring segment are on the Boundary.
pub fn locate_in_ring(p: &Coordinate, ring: &[Coordinate]) -> Location {
    let mut crossings = 0;

    for (p1, p2) in ring.iter().tuple_windows() {
        if p1.x < p.x && p2.x < p.x {
            continue;
        }

        if p.equals_2d(p2) {
            return Location::Boundary;
        }

        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                return Location::Boundary;
            }
            continue;
        }

        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, p).signum();
            if orient == 0 {
                return Location::Boundary;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                crossings += 1;
            }
        }
    }

    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// True iff `p` is inside or on the ring.
pub fn is_in_ring(p: &Coordinate, ring: &[Coordinate]) -> bool {
    locate_in_ring(p, ring) != Location::Exterior
}

/// True iff `p` lies on some segment of `line`.
pub fn is_on_line(p: &Coordinate, line: &[Coordinate]) -> bool {
    line.iter().tuple_windows().any(|(p0, p1)| {
        Envelope::of_segment(p0, p1).contains_coordinate(p)
            && orientation_index(p0, p1, p) == Orientation::Collinear
    })
}

/// Decides whether a point touched by `boundary_count` line endpoints is on
/// the boundary of a lineal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryNodeRule {
    /// Odd counts are boundary (the OGC rule).
    Mod2,
    /// Every endpoint is boundary.
    EndPoint,
    /// Endpoints shared by more than one line are boundary.
    MultiValentEndPoint,
    /// Only endpoints of exactly one line are boundary.
    MonoValentEndPoint,
}

impl Default for BoundaryNodeRule {
    fn default() -> BoundaryNodeRule {
        BoundaryNodeRule::Mod2
    }
}

impl BoundaryNodeRule {
    pub fn is_in_boundary(&self, boundary_count: u32) -> bool {
        match *self {
            BoundaryNodeRule::Mod2 => boundary_count % 2 == 1,
            BoundaryNodeRule::EndPoint => boundary_count > 0,
            BoundaryNodeRule::MultiValentEndPoint => boundary_count > 1,
            BoundaryNodeRule::MonoValentEndPoint => boundary_count == 1,
        }
    }
}

/// Locates points against arbitrary geometries, counting line endpoints with
/// a BoundaryNodeRule.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLocator {
    pub boundary_rule: BoundaryNodeRule,
}

#[derive(Default)]
struct LocationTally {
    is_in: bool,
    num_boundaries: u32,
}

impl LocationTally {
    fn update(&mut self, loc: Location) {
        match loc {
            Location::Interior => self.is_in = true,
            Location::Boundary => self.num_boundaries += 1,
            Location::Exterior => {}
        }
    }
}

impl PointLocator {
    pub fn new(boundary_rule: BoundaryNodeRule) -> PointLocator {
        PointLocator { boundary_rule: boundary_rule }
    }

    /// Returns true iff `p` is not in the exterior of `geom`.
    pub fn intersects(&self, p: &Coordinate, geom: &Geometry) -> bool {
        self.locate(p, geom) != Location::Exterior
    }

    pub fn locate(&self, p: &Coordinate, geom: &Geometry) -> Location {
        if geom.is_empty() {
            return Location::Exterior;
        }

        match geom {
            &Geometry::LineString(ref l) => return locate_on_line_string(p, &l.0),
            &Geometry::LinearRing(ref r) => return locate_on_line_string(p, &r.0),
            &Geometry::Polygon(ref poly) => return locate_in_polygon(p, poly),
            _ => {}
        }

        let mut tally = LocationTally::default();
        self.compute_location(p, geom, &mut tally);

        if self.boundary_rule.is_in_boundary(tally.num_boundaries) {
            Location::Boundary
        } else if tally.num_boundaries > 0 || tally.is_in {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn compute_location(&self, p: &Coordinate, geom: &Geometry, tally: &mut LocationTally) {
        match geom {
            &Geometry::Point(ref pt) => tally.update(locate_on_point(p, &pt.0)),
            &Geometry::MultiPoint(ref pts) => {
                for pt in pts.iter() {
                    tally.update(locate_on_point(p, &pt.0));
                }
            }
            &Geometry::LineString(ref l) => tally.update(locate_on_line_string(p, &l.0)),
            &Geometry::LinearRing(ref r) => tally.update(locate_on_line_string(p, &r.0)),
            &Geometry::MultiLineString(ref ls) => {
                for &LineString(ref coords) in ls.iter() {
                    tally.update(locate_on_line_string(p, coords));
                }
            }
            &Geometry::Polygon(ref poly) => tally.update(locate_in_polygon(p, poly)),
            &Geometry::MultiPolygon(ref polys) => {
                for poly in polys.iter() {
                    tally.update(locate_in_polygon(p, poly));
                }
            }
            &Geometry::GeometryCollection(ref gs) => {
                for g in gs.iter() {
                    self.compute_location(p, g, tally);
                }
            }
        }
    }
}

fn locate_on_point(p: &Coordinate, pt: &Coordinate) -> Location {
    if p.equals_2d(pt) { Location::Interior } else { Location::Exterior }
}

fn locate_on_line_string(p: &Coordinate, coords: &[Coordinate]) -> Location {
    if coords.is_empty() || !Envelope::from_coordinates(coords).contains_coordinate(p) {
        return Location::Exterior;
    }

    let first = &coords[0];
    let last = &coords[coords.len() - 1];
    if first != last && (p == first || p == last) {
        return Location::Boundary;
    }

    if is_on_line(p, coords) { Location::Interior } else { Location::Exterior }
}

fn locate_in_polygon_ring(p: &Coordinate, ring: &[Coordinate]) -> Location {
    if !Envelope::from_coordinates(ring).contains_coordinate(p) {
        return Location::Exterior;
    }
    locate_in_ring(p, ring)
}

fn locate_in_polygon(p: &Coordinate, poly: &Polygon) -> Location {
    if poly.exterior.is_empty() {
        return Location::Exterior;
    }

    match locate_in_polygon_ring(p, &poly.exterior.0) {
        Location::Exterior => return Location::Exterior,
        Location::Boundary => return Location::Boundary,
        Location::Interior => {}
    }

    for hole in poly.interiors.iter() {
        match locate_in_polygon_ring(p, &hole.0) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }

    Location::Interior
}

/// Locates `p` against only the polygonal parts of `geom`. Lines and points
/// are ignored.
pub fn locate_point_in_area(p: &Coordinate, geom: &Geometry) -> Location {
    if geom.is_empty() || !geom.envelope().contains_coordinate(p) {
        return Location::Exterior;
    }

    match geom {
        &Geometry::Polygon(ref poly) => locate_in_polygon(p, poly),
        &Geometry::MultiPolygon(ref polys) => polys.iter()
            .map(|poly| locate_in_polygon(p, poly))
            .find(|&loc| loc != Location::Exterior)
            .unwrap_or(Location::Exterior),
        &Geometry::GeometryCollection(ref gs) => gs.iter()
            .map(|g| locate_point_in_area(p, g))
            .find(|&loc| loc != Location::Exterior)
            .unwrap_or(Location::Exterior),
        _ => Location::Exterior,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LinearRing, Point};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    // (0,4)----(4,4)
    //   |        |
    // (0,0)----(4,0)
    fn square_cw() -> Vec<Coordinate> {
        vec![ c(0.0, 0.0), c(0.0, 4.0), c(4.0, 4.0), c(4.0, 0.0), c(0.0, 0.0) ]
    }

    #[test]
    fn orientation() {
        assert_eq!(Orientation::CounterClockwise, orientation_index(&c(0.0, 0.0), &c(1.0, 0.0), &c(1.0, 1.0)));
        assert_eq!(Orientation::Clockwise, orientation_index(&c(0.0, 0.0), &c(1.0, 0.0), &c(1.0, -1.0)));
        assert_eq!(Orientation::Collinear, orientation_index(&c(0.0, 0.0), &c(1.0, 0.0), &c(5.0, 0.0)));
    }

    #[test]
    fn orientation_near_collinear() {
        let p1 = c(0.1, 0.1);
        let p2 = c(0.3, 0.3);
        let q = c(0.7, 0.7);
        assert_eq!(Orientation::Collinear, orientation_index(&p1, &p2, &q));
    }

    #[test]
    fn winding() {
        let mut ring = square_cw();
        assert!(!is_ccw(&ring));
        assert_eq!(-16.0, signed_area(&ring));
        ring.reverse();
        assert!(is_ccw(&ring));
    }

    #[test]
    fn flat_ring_is_not_ccw() {
        assert!(!is_ccw(&[ c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(0.0, 0.0) ]));
    }

    #[test]
    fn locate_in_square() {
        let ring = square_cw();
        assert_eq!(Location::Interior, locate_in_ring(&c(1.0, 1.0), &ring));
        assert_eq!(Location::Boundary, locate_in_ring(&c(4.0, 2.0), &ring));
        assert_eq!(Location::Boundary, locate_in_ring(&c(0.0, 0.0), &ring));
        assert_eq!(Location::Exterior, locate_in_ring(&c(5.0, 2.0), &ring));
        assert_eq!(Location::Exterior, locate_in_ring(&c(-1.0, 4.0), &ring));
    }

    #[test]
    fn remove_repeated() {
        let coords = vec![ c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0) ];
        assert_eq!(vec![ c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0) ], remove_repeated_points(&coords));
    }

    #[test]
    fn boundary_rules() {
        assert!(BoundaryNodeRule::Mod2.is_in_boundary(1));
        assert!(!BoundaryNodeRule::Mod2.is_in_boundary(2));
        assert!(BoundaryNodeRule::EndPoint.is_in_boundary(2));
        assert!(!BoundaryNodeRule::MultiValentEndPoint.is_in_boundary(1));
        assert!(!BoundaryNodeRule::MonoValentEndPoint.is_in_boundary(2));
    }

    #[test]
    fn point_locator_mod2_on_lines() {
        let locator = PointLocator::default();
        // Two lines meeting end to end: the shared endpoint is interior.
        let lines = Geometry::MultiLineString(vec![
            LineString(vec![ c(0.0, 0.0), c(1.0, 0.0) ]),
            LineString(vec![ c(1.0, 0.0), c(2.0, 0.0) ]),
        ]);
        assert_eq!(Location::Boundary, locator.locate(&c(0.0, 0.0), &lines));
        assert_eq!(Location::Interior, locator.locate(&c(1.0, 0.0), &lines));
        assert_eq!(Location::Interior, locator.locate(&c(1.5, 0.0), &lines));
        assert_eq!(Location::Exterior, locator.locate(&c(1.5, 1.0), &lines));
    }

    #[test]
    fn point_locator_polygon_with_hole() {
        let poly = Geometry::Polygon(Polygon::new(
            LinearRing(square_cw()),
            vec![ LinearRing(vec![ c(1.0, 1.0), c(2.0, 1.0), c(2.0, 2.0), c(1.0, 2.0), c(1.0, 1.0) ]) ],
        ));
        let locator = PointLocator::default();
        assert_eq!(Location::Exterior, locator.locate(&c(1.5, 1.5), &poly));
        assert_eq!(Location::Boundary, locator.locate(&c(1.0, 1.5), &poly));
        assert_eq!(Location::Interior, locator.locate(&c(3.0, 3.0), &poly));
        assert_eq!(Location::Interior, locate_point_in_area(&c(3.0, 3.0), &poly));
        assert_eq!(Location::Exterior, locate_point_in_area(&c(3.0, 3.0), &Geometry::Point(Point(c(3.0, 3.0)))));
    }
}
