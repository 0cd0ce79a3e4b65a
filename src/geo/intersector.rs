//! Segment/segment intersection.

use super::{Coordinate, Envelope};
use super::algorithm::orientation_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    None,
    /// The segments meet at exactly one point.
    Point,
    /// The segments overlap along a stretch of both.
    Collinear,
}

/// Computes the intersection of two segments and remembers the answer, so
/// callers can ask follow-up questions (is it proper? how far along each
/// segment?).
///
/// # Examples
///
/// ```
/// use topograph::geo::Coordinate;
/// use topograph::geo::intersector::LineIntersector;
///
/// let mut li = LineIntersector::new();
/// li.compute_intersection(
///     &Coordinate::new(0.0, 0.0), &Coordinate::new(2.0, 2.0),
///     &Coordinate::new(0.0, 2.0), &Coordinate::new(2.0, 0.0),
/// );
/// assert!(li.is_proper());
/// assert_eq!(Coordinate::new(1.0, 1.0), li.intersection(0));
/// ```
#[derive(Debug, Clone)]
pub struct LineIntersector {
    kind: IntersectionKind,
    input: [[Coordinate; 2]; 2],
    int_pt: [Coordinate; 2],
    is_proper: bool,
}

impl Default for LineIntersector {
    fn default() -> LineIntersector {
        LineIntersector::new()
    }
}

impl LineIntersector {
    pub fn new() -> LineIntersector {
        let origin = Coordinate::new(0.0, 0.0);
        LineIntersector {
            kind: IntersectionKind::None,
            input: [[origin; 2]; 2],
            int_pt: [origin; 2],
            is_proper: false,
        }
    }

    pub fn compute_intersection(&mut self, p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) {
        self.input = [[*p1, *p2], [*q1, *q2]];
        self.kind = self.compute_intersect(p1, p2, q1, q2);
    }

    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    /// 0, 1 or 2.
    pub fn intersection_num(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    pub fn intersection(&self, int_index: usize) -> Coordinate {
        self.int_pt[int_index]
    }

    /// True iff the segments cross at a single point interior to both.
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.is_proper
    }

    /// True iff some intersection point is not an endpoint of either input.
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    /// True iff some intersection point is not an endpoint of input segment
    /// `input_index`.
    pub fn is_interior_intersection_of(&self, input_index: usize) -> bool {
        (0..self.intersection_num()).any(|i| {
            let pt = &self.int_pt[i];
            !(pt.equals_2d(&self.input[input_index][0]) || pt.equals_2d(&self.input[input_index][1]))
        })
    }

    /// True iff `pt` is one of the computed intersection points.
    pub fn is_intersection(&self, pt: &Coordinate) -> bool {
        (0..self.intersection_num()).any(|i| self.int_pt[i].equals_2d(pt))
    }

    /// Returns the "edge distance" of intersection `int_index` along input
    /// segment `segment_index`. See `compute_edge_distance`.
    pub fn edge_distance(&self, segment_index: usize, int_index: usize) -> f64 {
        let seg = &self.input[segment_index];
        compute_edge_distance(&self.int_pt[int_index], &seg[0], &seg[1])
    }

    fn compute_intersect(&mut self, p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) -> IntersectionKind {
        self.is_proper = false;

        if !Envelope::of_segment(p1, p2).intersects(&Envelope::of_segment(q1, q2)) {
            return IntersectionKind::None;
        }

        let pq1 = orientation_index(p1, p2, q1).signum();
        let pq2 = orientation_index(p1, p2, q2).signum();
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return IntersectionKind::None;
        }

        let qp1 = orientation_index(q1, q2, p1).signum();
        let qp2 = orientation_index(q1, q2, p2).signum();
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return IntersectionKind::None;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return self.compute_collinear_intersection(p1, p2, q1, q2);
        }

        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint touches the other segment. Prefer an exact
            // endpoint over a computed one.
            self.int_pt[0] = if p1.equals_2d(q1) || p1.equals_2d(q2) {
                *p1
            } else if p2.equals_2d(q1) || p2.equals_2d(q2) {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
        } else {
            self.is_proper = true;
            self.int_pt[0] = intersection(p1, p2, q1, q2);
        }

        IntersectionKind::Point
    }

    fn compute_collinear_intersection(&mut self, p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) -> IntersectionKind {
        let p_env = Envelope::of_segment(p1, p2);
        let q_env = Envelope::of_segment(q1, q2);
        let q1_in_p = p_env.contains_coordinate(q1);
        let q2_in_p = p_env.contains_coordinate(q2);
        let p1_in_q = q_env.contains_coordinate(p1);
        let p2_in_q = q_env.contains_coordinate(p2);

        let (a, b, single) = if q1_in_p && q2_in_p {
            (*q1, *q2, false)
        } else if p1_in_q && p2_in_q {
            (*p1, *p2, false)
        } else if q1_in_p && p1_in_q {
            (*q1, *p1, q1 == p1 && !q2_in_p && !p2_in_q)
        } else if q1_in_p && p2_in_q {
            (*q1, *p2, q1 == p2 && !q2_in_p && !p1_in_q)
        } else if q2_in_p && p1_in_q {
            (*q2, *p1, q2 == p1 && !q1_in_p && !p2_in_q)
        } else if q2_in_p && p2_in_q {
            (*q2, *p2, q2 == p2 && !q1_in_p && !p1_in_q)
        } else {
            return IntersectionKind::None;
        };

        self.int_pt = [a, b];
        if single { IntersectionKind::Point } else { IntersectionKind::Collinear }
    }
}

/// Computes the crossing point of two properly-intersecting segments.
///
/// Coordinates are translated to the middle of the envelope overlap for
/// precision. If rounding pushes the answer outside either segment's
/// envelope, the nearest input endpoint is used instead.
fn intersection(p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) -> Coordinate {
    let mid_x = (p1.x.min(p2.x).max(q1.x.min(q2.x)) + p1.x.max(p2.x).min(q1.x.max(q2.x))) / 2.0;
    let mid_y = (p1.y.min(p2.y).max(q1.y.min(q2.y)) + p1.y.max(p2.y).min(q1.y.max(q2.y))) / 2.0;

    let (px, py) = (p1.x - mid_x, p1.y - mid_y);
    let (rx, ry) = (p2.x - p1.x, p2.y - p1.y);
    let (qx, qy) = (q1.x - mid_x, q1.y - mid_y);
    let (sx, sy) = (q2.x - q1.x, q2.y - q1.y);

    let denom = rx * sy - ry * sx;
    let mut int_pt = if denom == 0.0 {
        nearest_endpoint(p1, p2, q1, q2)
    } else {
        let t = ((qx - px) * sy - (qy - py) * sx) / denom;
        Coordinate::new(px + t * rx + mid_x, py + t * ry + mid_y)
    };

    let p_env = Envelope::of_segment(p1, p2);
    let q_env = Envelope::of_segment(q1, q2);
    if !(p_env.contains_coordinate(&int_pt) && q_env.contains_coordinate(&int_pt)) {
        int_pt = nearest_endpoint(p1, p2, q1, q2);
    }
    int_pt
}

fn nearest_endpoint(p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) -> Coordinate {
    let candidates = [
        (*p1, point_to_segment_distance(p1, q1, q2)),
        (*p2, point_to_segment_distance(p2, q1, q2)),
        (*q1, point_to_segment_distance(q1, p1, p2)),
        (*q2, point_to_segment_distance(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for &candidate in candidates[1..].iter() {
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best.0
}

fn point_to_segment_distance(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    if a.equals_2d(b) {
        return p.distance(a);
    }
    let len2 = (b.x - a.x) * (b.x - a.x) + (b.y - a.y) * (b.y - a.y);
    let r = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len2;
    if r <= 0.0 {
        p.distance(a)
    } else if r >= 1.0 {
        p.distance(b)
    } else {
        let projected = Coordinate::new(a.x + r * (b.x - a.x), a.y + r * (b.y - a.y));
        p.distance(&projected)
    }
}

/// Returns a monotonic "distance" of `p` along segment `p0`->`p1`.
///
/// It is not Euclidean: it is the offset along the segment's dominant axis.
/// That is cheaper and exact for points computed on the segment, which is
/// all EdgeIntersectionList needs to order them.
pub fn compute_edge_distance(p: &Coordinate, p0: &Coordinate, p1: &Coordinate) -> f64 {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();

    if p.equals_2d(p0) {
        0.0
    } else if p.equals_2d(p1) {
        dx.max(dy)
    } else {
        let pdx = (p.x - p0.x).abs();
        let pdy = (p.y - p0.y).abs();
        let dist = if dx > dy { pdx } else { pdy };
        // Only p0 may sit at distance 0.
        if dist == 0.0 { pdx.max(pdy) } else { dist }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn disjoint() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(1.0, 0.0), &c(0.0, 1.0), &c(1.0, 1.0));
        assert!(!li.has_intersection());
        assert_eq!(0, li.intersection_num());
    }

    #[test]
    fn proper_crossing() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(4.0, 0.0), &c(1.0, -1.0), &c(1.0, 3.0));
        assert_eq!(IntersectionKind::Point, li.kind());
        assert!(li.is_proper());
        assert!(li.is_interior_intersection());
        assert_eq!(c(1.0, 0.0), li.intersection(0));
        assert_eq!(1.0, li.edge_distance(0, 0));
        assert_eq!(1.0, li.edge_distance(1, 0));
    }

    #[test]
    fn touching_at_endpoint_is_not_proper() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(2.0, 0.0), &c(2.0, 0.0), &c(2.0, 5.0));
        assert_eq!(IntersectionKind::Point, li.kind());
        assert!(!li.is_proper());
        assert!(!li.is_interior_intersection());
        assert_eq!(c(2.0, 0.0), li.intersection(0));
    }

    #[test]
    fn t_junction_is_interior_to_one_segment() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(4.0, 0.0), &c(2.0, 0.0), &c(2.0, 5.0));
        assert!(!li.is_proper());
        assert!(li.is_interior_intersection_of(0));
        assert!(!li.is_interior_intersection_of(1));
    }

    #[test]
    fn collinear_overlap() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(4.0, 0.0), &c(2.0, 0.0), &c(6.0, 0.0));
        assert_eq!(IntersectionKind::Collinear, li.kind());
        assert_eq!(2, li.intersection_num());
        assert!(li.is_intersection(&c(2.0, 0.0)));
        assert!(li.is_intersection(&c(4.0, 0.0)));
    }

    #[test]
    fn collinear_touching_end_to_end() {
        let mut li = LineIntersector::new();
        li.compute_intersection(&c(0.0, 0.0), &c(2.0, 0.0), &c(2.0, 0.0), &c(6.0, 0.0));
        assert_eq!(IntersectionKind::Point, li.kind());
        assert_eq!(c(2.0, 0.0), li.intersection(0));
    }

    #[test]
    fn edge_distance_uses_dominant_axis() {
        assert_eq!(0.0, compute_edge_distance(&c(0.0, 0.0), &c(0.0, 0.0), &c(4.0, 1.0)));
        assert_eq!(2.0, compute_edge_distance(&c(2.0, 0.5), &c(0.0, 0.0), &c(4.0, 1.0)));
        assert_eq!(4.0, compute_edge_distance(&c(4.0, 1.0), &c(0.0, 0.0), &c(4.0, 1.0)));
    }
}
