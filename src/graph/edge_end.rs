use std::cmp::Ordering;
use std::fmt;

use crate::geo::Coordinate;
use crate::geo::algorithm::orientation_index;
use super::label::Label;
use super::{EdgeId, NodeId};

/// The quadrant a direction vector points into.
///
/// Counter-clockwise from the positive x axis. A vector on an axis belongs
/// to the quadrant it starts: (1,0) is NE, (0,1) is NE, (-1,0) is NW, (0,-1)
/// is SE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    /// Returns the Quadrant of a non-zero direction vector.
    pub fn of(dx: f64, dy: f64) -> Quadrant {
        if dx >= 0.0 {
            if dy >= 0.0 { Quadrant::NorthEast } else { Quadrant::SouthEast }
        } else {
            if dy >= 0.0 { Quadrant::NorthWest } else { Quadrant::SouthWest }
        }
    }

    pub fn is_northern(self) -> bool {
        self == Quadrant::NorthEast || self == Quadrant::NorthWest
    }
}

/// One end of an Edge, as seen from the Node it leaves.
///
/// EdgeEnds are ordered by the angle their direction makes with the positive
/// x axis, counter-clockwise. The comparison uses quadrants and an
/// orientation test, never an angle, so it is exact.
#[derive(Debug, Clone)]
pub struct EdgeEnd {
    pub edge: EdgeId,
    pub node: Option<NodeId>,
    pub label: Label,
    p0: Coordinate,
    p1: Coordinate,
    dx: f64,
    dy: f64,
    quadrant: Quadrant,
}

impl EdgeEnd {
    /// Builds the end of `edge` leaving `p0` towards `p1`. The two points
    /// must differ.
    pub fn new(edge: EdgeId, p0: Coordinate, p1: Coordinate, label: Label) -> EdgeEnd {
        debug_assert!(p0 != p1, "EdgeEnd with zero-length direction at {}", p0);
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        EdgeEnd {
            edge: edge,
            node: None,
            label: label,
            p0: p0,
            p1: p1,
            dx: dx,
            dy: dy,
            quadrant: Quadrant::of(dx, dy),
        }
    }

    /// The Node coordinate.
    pub fn coordinate(&self) -> &Coordinate {
        &self.p0
    }

    /// The next coordinate along the edge; it fixes the direction.
    pub fn directed_coordinate(&self) -> &Coordinate {
        &self.p1
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Orders by direction: quadrant first, then which side of `other`
    /// this end's direction lies on. Ends pointing the same way compare
    /// Equal whatever their length.
    pub fn compare_direction(&self, other: &EdgeEnd) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => orientation_index(&other.p0, &other.p1, &self.p1).signum().cmp(&0),
            ord => ord,
        }
    }
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let angle = self.dy.atan2(self.dx);
        write!(f, "  {} - {} {:?}:{} {}", self.p0, self.p1, self.quadrant, angle, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn end(dx: f64, dy: f64) -> EdgeEnd {
        EdgeEnd::new(0, Coordinate::new(0.0, 0.0), Coordinate::new(dx, dy), Label::new_on(None))
    }

    #[test]
    fn quadrants() {
        assert_eq!(Quadrant::NorthEast, Quadrant::of(1.0, 0.0));
        assert_eq!(Quadrant::NorthEast, Quadrant::of(0.0, 1.0));
        assert_eq!(Quadrant::NorthWest, Quadrant::of(-1.0, 0.0));
        assert_eq!(Quadrant::SouthWest, Quadrant::of(-1.0, -1.0));
        assert_eq!(Quadrant::SouthEast, Quadrant::of(0.0, -1.0));
        assert!(Quadrant::NorthWest.is_northern());
        assert!(!Quadrant::SouthEast.is_northern());
    }

    #[test]
    fn ordered_counter_clockwise_from_x_axis() {
        let mut ends = vec![ end(1.0, -1.0), end(-1.0, 1.0), end(1.0, 1.0), end(-1.0, -2.0), end(2.0, 0.0), end(1.0, 3.0) ];
        ends.sort_by(|a, b| a.compare_direction(b));
        let dirs: Vec<(f64, f64)> = ends.iter().map(|e| (e.dx(), e.dy())).collect();
        assert_eq!(vec![ (2.0, 0.0), (1.0, 1.0), (1.0, 3.0), (-1.0, 1.0), (-1.0, -2.0), (1.0, -1.0) ], dirs);
    }

    #[test]
    fn magnitude_does_not_matter() {
        assert_eq!(Ordering::Equal, end(1.0, 1.0).compare_direction(&end(1.0, 1.0)));
        assert_eq!(Ordering::Greater, end(1.0, 2.0).compare_direction(&end(3.0, 3.0)));
        assert_eq!(Ordering::Less, end(3.0, 1.0).compare_direction(&end(1.0, 1.0)));
    }

    fn angle(e: &EdgeEnd) -> f64 {
        let a = e.dy().atan2(e.dx());
        if a < 0.0 { a + 2.0 * ::std::f64::consts::PI } else { a }
    }

    proptest! {
        #[test]
        fn direction_order_matches_angle(
            dirs in prop::collection::vec((-20i32..20, -20i32..20), 3..8)
        ) {
            let mut ends: Vec<EdgeEnd> = dirs.iter()
                .filter(|&&(x, y)| x != 0 || y != 0)
                .map(|&(x, y)| end(x as f64, y as f64))
                .collect();
            ends.sort_by(|a, b| a.compare_direction(b));
            for pair in ends.windows(2) {
                // Integer vectors with equal angles are parallel, so the
                // cross product is exact.
                let cross = pair[0].dx() * pair[1].dy() - pair[0].dy() * pair[1].dx();
                if cross != 0.0 || pair[0].quadrant() != pair[1].quadrant() {
                    prop_assert!(angle(&pair[0]) < angle(&pair[1]));
                }
            }
        }
    }
}
