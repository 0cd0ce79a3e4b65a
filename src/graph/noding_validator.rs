use crate::geo::intersector::LineIntersector;
use super::edge::Edge;
use super::index::candidate_segment_pairs;
use super::{TopologyError, TopologyErrorKind};

/// Checks that a set of split Edges is fully noded: no two segments meet
/// anywhere but at their endpoints.
///
/// Overlay splits every Edge at every intersection it found, so a
/// remaining interior intersection means the intersection computation
/// missed one (usually through floating-point robustness trouble). Building
/// rings from such a graph would fail later with a more obscure error.
///
/// ```
/// use topograph::geo::Coordinate;
/// use topograph::graph::{Edge, EdgeNodingValidator, Label, Location};
///
/// let label = Label::new_geom_on(0, Some(Location::Interior));
/// let edges = vec![
///     Edge::new(vec![ Coordinate::new(0., 0.), Coordinate::new(2., 2.) ], label),
///     Edge::new(vec![ Coordinate::new(0., 2.), Coordinate::new(2., 0.) ], label),
/// ];
/// let err = EdgeNodingValidator::new(&edges).check_valid().unwrap_err();
/// assert_eq!(Some(Coordinate::new(1., 1.)), err.coordinate);
/// ```
pub struct EdgeNodingValidator<'a> {
    edges: &'a [Edge],
}

impl<'a> EdgeNodingValidator<'a> {
    pub fn new(edges: &'a [Edge]) -> EdgeNodingValidator<'a> {
        EdgeNodingValidator { edges: edges }
    }

    /// Returns the first non-noded intersection found, if any.
    pub fn check_valid(&self) -> Result<(), TopologyError> {
        let mut li = LineIntersector::new();
        for (a, b) in candidate_segment_pairs(self.edges) {
            if a == b {
                continue;
            }

            let e0 = &self.edges[a.edge];
            let e1 = &self.edges[b.edge];
            li.compute_intersection(
                e0.coordinate(a.segment), e0.coordinate(a.segment + 1),
                e1.coordinate(b.segment), e1.coordinate(b.segment + 1),
            );
            if li.has_intersection() && li.is_interior_intersection() {
                return Err(TopologyError::at(TopologyErrorKind::NonNodedIntersection, li.intersection(0)));
            }
        }
        Ok(())
    }
}
